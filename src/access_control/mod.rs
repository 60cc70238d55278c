//! Access control module
//!
//! Provides board-scoped access control for Trello MCP tools.
//!
//! ## Access Control Model
//!
//! Authorization is an allow-list of boards. Every tool operation resolves
//! the board it touches and checks it against the list:
//!
//! 1. **Board operations** check the board identifier directly.
//! 2. **Card and list operations** fetch the entity, read its owning board
//!    (`idBoard`), and delegate to the board check. The owning board is
//!    fetched fresh on every call because entities can move between boards.
//! 3. **Cross-board moves** check both endpoints, source first, and stop at
//!    the first denial before any mutation is attempted.
//!
//! Board identifiers come in two accepted forms (short link and canonical
//! id); both are normalized to the canonical id through a process-lifetime
//! cache before the membership check, so the allow-list only ever deals in
//! canonical ids.
//!
//! An empty or absent allow-list means **open access**: every board is
//! authorized. That is the historical default of this server and operators
//! depend on it; the config loader warns at startup when it is in effect.
//!
//! ## Example Configuration
//!
//! ```toml
//! [access_control]
//! allowed_boards = [
//!     "5f2a6c1e8d3b4a0012345678",   # team roadmap
//!     "5f2a6c1e8d3b4a0087654321",   # sprint board
//! ]
//! ```
//!
//! or, equivalently, `TRELLO_BOARD_IDS=5f2a...,5f2a...` in the environment.

pub mod cache;
pub mod gate;
pub mod policy;

pub use cache::{BoardIdCache, InMemoryBoardIdCache};
pub use gate::{BoardAccessGate, BoardLookup};
pub use policy::BoardPolicy;
