//! Error types for trello-mcp
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to appropriate MCP error responses at the boundary.
//!
//! The access-control failure kinds are deliberately separate types so that
//! callers distinguish "board not in the allow-list" from "board could not be
//! resolved" from "card/list could not be fetched" without string matching.

pub mod mcp_mapper;

use std::fmt;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Trello API error: {0}")]
    Trello(#[from] TrelloError),

    #[error("Access gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Tool execution error: {0}")]
    Tool(#[from] ToolError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trello API specific errors
#[derive(Error, Debug)]
pub enum TrelloError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Trello API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response from Trello: {0}")]
    InvalidResponse(String),

    #[error("Request timeout after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl TrelloError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => TrelloError::Unauthorized,
            404 => TrelloError::NotFound {
                resource: "requested resource".into(),
            },
            429 => TrelloError::RateLimited { retry_after: 10 },
            _ => TrelloError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }
}

/// Entity kinds that are scoped to a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Card,
    List,
}

impl EntityKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Card => "card",
            EntityKind::List => "list",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access gate errors
///
/// The three variants propagate unchanged to the tool layer; none is ever
/// collapsed into another. A timed-out lookup surfaces as `BoardNotResolvable`
/// or `EntityLookup`, never as a silent permit.
#[derive(Error, Debug)]
pub enum GateError {
    /// The input identifier could not be resolved to a canonical board.
    /// Retryable by the caller; never cached.
    #[error("board '{board}' could not be resolved during '{operation}': {source}")]
    BoardNotResolvable {
        board: String,
        operation: String,
        #[source]
        source: TrelloError,
    },

    /// The canonical board resolved but is not in the allow-list.
    /// A policy decision, not a transient fault.
    #[error(transparent)]
    AccessDenied(#[from] AccessDeniedError),

    /// The card or list itself could not be fetched.
    #[error("failed to look up {kind} '{id}' during '{operation}': {source}")]
    EntityLookup {
        kind: EntityKind,
        id: String,
        operation: String,
        #[source]
        source: TrelloError,
    },
}

impl GateError {
    pub fn is_denial(&self) -> bool {
        matches!(self, GateError::AccessDenied(_))
    }
}

/// Denial of access to a board
#[derive(Error, Debug)]
#[error("access denied to board '{board}' for operation '{operation}' (allow-list '{policy_key}')")]
pub struct AccessDeniedError {
    /// Canonical board identifier that was rejected
    pub board: String,
    /// Operation label, annotated with entity context where applicable
    pub operation: String,
    /// Provenance key of the allow-list, for operator-facing messages
    pub policy_key: String,
}

impl AccessDeniedError {
    pub fn new(
        board: impl Into<String>,
        operation: impl Into<String>,
        policy_key: impl Into<String>,
    ) -> Self {
        Self {
            board: board.into(),
            operation: operation.into(),
            policy_key: policy_key.into(),
        }
    }
}

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Trello API error: {0}")]
    Trello(#[from] TrelloError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Gate(#[from] GateError),
}

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("HTTP server error: {0}")]
    Http(String),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for tool operations
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Result type alias for Trello API operations
pub type TrelloResult<T> = std::result::Result<T, TrelloError>;

/// Result type alias for gate checks
pub type GateResult<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trello_error_from_response() {
        assert!(matches!(
            TrelloError::from_response(401, ""),
            TrelloError::Unauthorized
        ));

        assert!(matches!(
            TrelloError::from_response(404, ""),
            TrelloError::NotFound { .. }
        ));

        assert!(matches!(
            TrelloError::from_response(429, ""),
            TrelloError::RateLimited { .. }
        ));

        let api_err = TrelloError::from_response(500, "Internal server error");
        assert!(matches!(api_err, TrelloError::Api { status: 500, .. }));
    }

    #[test]
    fn test_access_denied_message_carries_context() {
        let err =
            AccessDeniedError::new("B3", "move_card (card C1)", "access_control.allowed_boards");
        let msg = err.to_string();
        assert!(msg.contains("B3"));
        assert!(msg.contains("move_card (card C1)"));
        assert!(msg.contains("access_control.allowed_boards"));
    }

    #[test]
    fn test_gate_error_kinds_are_distinct() {
        let denied: GateError =
            AccessDeniedError::new("B3", "get_card", "access_control.allowed_boards").into();
        assert!(denied.is_denial());

        let lookup = GateError::EntityLookup {
            kind: EntityKind::Card,
            id: "C1".into(),
            operation: "get_card".into(),
            source: TrelloError::NotFound {
                resource: "card C1".into(),
            },
        };
        assert!(!lookup.is_denial());

        let unresolvable = GateError::BoardNotResolvable {
            board: "bogus".into(),
            operation: "get_board".into(),
            source: TrelloError::NotFound {
                resource: "board bogus".into(),
            },
        };
        assert!(!unresolvable.is_denial());
    }
}
