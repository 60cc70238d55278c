//! MCP error code mapping.
//!
//! Maps application errors to MCP protocol errors with appropriate JSON-RPC error codes.
//!
//! # Strategy
//! - Protocol-level errors (tool not found, invalid params) → `Err(McpError)`
//! - Tool execution errors → `Ok(CallToolResult { is_error: true })`
//!
//! This distinction allows MCP clients to differentiate between:
//! - Problems with the request itself (protocol errors)
//! - Problems during tool execution (tool errors)

use rmcp::ErrorData as McpError;
use rmcp::model::ErrorCode;
use serde_json::json;
use std::borrow::Cow;

use super::{AccessDeniedError, GateError, ToolError, TrelloError};

/// Maps a `ToolError` to an MCP protocol error.
///
/// Use this for errors that should be returned as `Err(McpError)` rather than
/// `Ok(CallToolResult { is_error: true })`.
///
/// # When to use which
/// - **Protocol errors** (return `Err`): Tool not found, invalid arguments
/// - **Execution errors** (return `Ok` with `is_error: true`): Trello API failures, access denied
pub fn map_tool_error(error: &ToolError) -> McpError {
    match error {
        ToolError::NotFound(name) => McpError {
            code: ErrorCode::METHOD_NOT_FOUND,
            message: Cow::Owned(format!("Tool '{}' not found", name)),
            data: Some(json!({
                "tool": name,
                "error_type": "ToolNotFound"
            })),
        },

        ToolError::InvalidArguments(msg) => McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::Owned(msg.clone()),
            data: Some(json!({
                "error_type": "InvalidArguments"
            })),
        },

        ToolError::Serialization(e) => McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::Owned(format!("Invalid argument format: {}", e)),
            data: Some(json!({
                "error_type": "SerializationError"
            })),
        },

        ToolError::Trello(trello_err) => map_trello_error(trello_err),

        ToolError::Gate(gate_err) => map_gate_error(gate_err),
    }
}

/// Maps a `TrelloError` to an MCP protocol error.
pub fn map_trello_error(error: &TrelloError) -> McpError {
    match error {
        TrelloError::Unauthorized => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Borrowed("Trello authentication failed"),
            data: Some(json!({
                "error_type": "Unauthorized",
                "hint": "Check that your Trello API key and token are valid and not expired"
            })),
        },

        TrelloError::NotFound { resource } => McpError {
            code: ErrorCode::RESOURCE_NOT_FOUND,
            message: Cow::Owned(format!("Resource not found: {}", resource)),
            data: Some(json!({
                "error_type": "NotFound",
                "resource": resource
            })),
        },

        TrelloError::RateLimited { retry_after } => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Rate limited, retry after {} seconds", retry_after)),
            data: Some(json!({
                "error_type": "RateLimited",
                "retry_after": retry_after
            })),
        },

        TrelloError::Timeout { timeout_secs } => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Request timeout after {} seconds", timeout_secs)),
            data: Some(json!({
                "error_type": "Timeout",
                "timeout_secs": timeout_secs
            })),
        },

        TrelloError::Api { status, message } => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Trello API error (HTTP {}): {}", status, message)),
            data: Some(json!({
                "error_type": "ApiError",
                "status": status
            })),
        },

        TrelloError::Request(e) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("HTTP request failed: {}", e)),
            data: Some(json!({
                "error_type": "RequestError"
            })),
        },

        TrelloError::InvalidResponse(msg) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Invalid response from Trello: {}", msg)),
            data: Some(json!({
                "error_type": "InvalidResponse"
            })),
        },
    }
}

/// Maps a `GateError` to an MCP protocol error.
///
/// Denials, unresolvable boards, and entity lookup failures carry distinct
/// `error_type` markers so clients can tell an authorization refusal from an
/// infrastructure failure.
pub fn map_gate_error(error: &GateError) -> McpError {
    match error {
        GateError::AccessDenied(denied) => map_access_denied_error(denied),

        GateError::BoardNotResolvable {
            board,
            operation,
            source,
        } => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(error.to_string()),
            data: Some(json!({
                "error_type": "BoardNotResolvable",
                "board": board,
                "operation": operation,
                "cause": source.to_string()
            })),
        },

        GateError::EntityLookup {
            kind,
            id,
            operation,
            source,
        } => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(error.to_string()),
            data: Some(json!({
                "error_type": "EntityLookupFailed",
                "entity_kind": kind.as_str(),
                "entity_id": id,
                "operation": operation,
                "cause": source.to_string()
            })),
        },
    }
}

/// Maps an `AccessDeniedError` to an MCP protocol error.
pub fn map_access_denied_error(error: &AccessDeniedError) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::Owned(error.to_string()),
        data: Some(json!({
            "error_type": "AccessDenied",
            "board": error.board,
            "operation": error.operation,
            "policy_key": error.policy_key
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityKind;

    #[test]
    fn test_map_tool_not_found() {
        let error = ToolError::NotFound("unknown_tool".into());
        let mcp_error = map_tool_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(mcp_error.message.contains("unknown_tool"));
        assert!(mcp_error.data.is_some());
    }

    #[test]
    fn test_map_invalid_arguments() {
        let error = ToolError::InvalidArguments("board_id must be a string".into());
        let mcp_error = map_tool_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::INVALID_PARAMS);
        assert!(mcp_error.message.contains("board_id"));
    }

    #[test]
    fn test_map_trello_unauthorized() {
        let error = TrelloError::Unauthorized;
        let mcp_error = map_trello_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::INTERNAL_ERROR);
        assert!(mcp_error.message.contains("authentication"));
    }

    #[test]
    fn test_map_trello_rate_limited() {
        let error = TrelloError::RateLimited { retry_after: 10 };
        let mcp_error = map_trello_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::INTERNAL_ERROR);
        assert!(mcp_error.message.contains("10"));

        let data = mcp_error.data.unwrap();
        assert_eq!(data["retry_after"], 10);
    }

    #[test]
    fn test_map_trello_not_found() {
        let error = TrelloError::NotFound {
            resource: "board abc".into(),
        };
        let mcp_error = map_trello_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(mcp_error.message.contains("board abc"));
    }

    #[test]
    fn test_map_access_denied() {
        let error = AccessDeniedError::new("B3", "move_card", "TRELLO_BOARD_IDS");
        let mcp_error = map_access_denied_error(&error);

        assert_eq!(mcp_error.code, ErrorCode::INTERNAL_ERROR);
        assert!(mcp_error.message.contains("B3"));

        let data = mcp_error.data.unwrap();
        assert_eq!(data["board"], "B3");
        assert_eq!(data["error_type"], "AccessDenied");
    }

    #[test]
    fn test_map_entity_lookup_is_not_denial() {
        let error = GateError::EntityLookup {
            kind: EntityKind::Card,
            id: "C1".into(),
            operation: "get_card".into(),
            source: TrelloError::NotFound {
                resource: "card C1".into(),
            },
        };
        let mcp_error = map_gate_error(&error);

        let data = mcp_error.data.unwrap();
        assert_eq!(data["error_type"], "EntityLookupFailed");
        assert_eq!(data["entity_kind"], "card");
    }
}
