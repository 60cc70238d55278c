//! Trello API module
//!
//! Typed HTTP client and response types for the Trello REST API.

pub mod client;
pub mod types;

pub use client::TrelloClient;
pub use types::{Board, Card, TrelloList};
