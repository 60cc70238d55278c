//! MCP server
//!
//! The protocol-facing layer: translates MCP requests into tool invocations.

pub mod handler;

pub use handler::TrelloMcpHandler;
