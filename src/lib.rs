//! Trello MCP Server
//!
//! A Model Context Protocol server for Trello with board-scoped access control.
//!
//! ## Features
//!
//! - **Board, list, and card tools** covering reads, writes, moves, and deletion
//! - **Board allow-list access control** - every tool call is authorized against
//!   a configured set of boards before any mutation reaches the Trello API
//! - **Identifier normalization** - short links and canonical ids are both
//!   accepted and resolved to canonical form, memoized for the process lifetime
//! - **Multiple transports** - stdio for local MCP clients, HTTP/SSE for web
//!   integrations
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Access Control Model
//!
//! ```text
//! tool call → resolve board (entity ops fetch idBoard fresh) → allow-list check → execute
//! ```
//!
//! An empty or absent allow-list means open access; the loader warns at
//! startup when that is in effect. Cross-board moves check both endpoints,
//! the source board first.
//!
//! ## Example Configuration
//!
//! ```toml
//! [trello]
//! # api_key and token from TRELLO_API_KEY / TRELLO_TOKEN env vars
//!
//! [access_control]
//! allowed_boards = [
//!     "5f2a6c1e8d3b4a0012345678",
//! ]
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;
pub mod transport;
pub mod trello;
pub mod util;

// Re-export main types
pub use access_control::{BoardAccessGate, BoardPolicy};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use server::TrelloMcpHandler;
pub use trello::TrelloClient;
