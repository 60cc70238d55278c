//! Transport module
//!
//! Provides different transport implementations for the MCP server.

pub mod http;
pub mod stdio;

pub use http::{DEFAULT_HTTP_PORT, HttpConfig, run_http, run_http_blocking};
pub use stdio::run_stdio;
