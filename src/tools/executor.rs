//! Tool execution framework
//!
//! Defines the traits and types tools are built from: static metadata
//! (`ToolInfo`), the execution pipeline (`ToolExecutor`), the shared request
//! context, and the output shape returned to the MCP layer.

use crate::access_control::BoardAccessGate;
use crate::error::{ToolError, ToolResult};
use crate::trello::TrelloClient;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Tool category, used for grouping in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCategory {
    Boards,
    Lists,
    Cards,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Boards => "boards",
            ToolCategory::Lists => "lists",
            ToolCategory::Cards => "cards",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a tool does to Trello state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Read,
    Write,
    Delete,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Read => "read",
            OperationType::Write => "write",
            OperationType::Delete => "delete",
        }
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, OperationType::Read)
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static tool metadata, implemented via the `#[trello_tool]` macro
pub trait ToolInfo {
    fn name() -> &'static str;
    fn description() -> &'static str;
    fn category() -> ToolCategory;
    fn operation_type() -> OperationType;
}

/// Shared context passed to every tool invocation
pub struct ToolContext {
    /// Trello API client
    pub trello: Arc<TrelloClient>,
    /// Board access gate; tools consult it in `check_access`
    pub gate: Arc<BoardAccessGate>,
    /// Request correlation id for logging
    pub request_id: String,
}

impl ToolContext {
    pub fn new(trello: Arc<TrelloClient>, gate: Arc<BoardAccessGate>, request_id: String) -> Self {
        Self {
            trello,
            gate,
            request_id,
        }
    }
}

/// The tool execution pipeline.
///
/// Invocations run `validate`, then `check_access`, then `execute`, in that
/// order; a failure at any stage stops the pipeline, so no Trello mutation
/// can happen before its access check has passed.
#[async_trait]
pub trait ToolExecutor {
    /// Validate argument preconditions before any network traffic
    fn validate(&self) -> ToolResult<()> {
        Ok(())
    }

    /// Check board access for every board this invocation touches
    async fn check_access(&self, ctx: &ToolContext) -> ToolResult<()>;

    /// Perform the operation
    async fn execute(&self, ctx: &ToolContext) -> ToolResult<ToolOutput>;
}

/// A block of tool output content
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Text(String),
}

/// Output returned by a tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
}

impl ToolOutput {
    /// Plain text output
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            is_error: false,
        }
    }

    /// JSON output, pretty-printed for readability in MCP clients
    pub fn json_value(value: Value) -> ToolResult<Self> {
        let text = serde_json::to_string_pretty(&value).map_err(ToolError::Serialization)?;
        Ok(Self::text(text))
    }

    /// Serialize any value as JSON output
    pub fn json<T: serde::Serialize>(value: &T) -> ToolResult<Self> {
        let text = serde_json::to_string_pretty(value).map_err(ToolError::Serialization)?;
        Ok(Self::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_mutating() {
        assert!(!OperationType::Read.is_mutating());
        assert!(OperationType::Write.is_mutating());
        assert!(OperationType::Delete.is_mutating());
    }

    #[test]
    fn test_output_text() {
        let output = ToolOutput::text("hello");
        assert!(!output.is_error);
        assert!(matches!(&output.content[0], ContentBlock::Text(t) if t == "hello"));
    }

    #[test]
    fn test_output_json() {
        let output = ToolOutput::json(&serde_json::json!({"id": "B1"})).unwrap();
        let ContentBlock::Text(text) = &output.content[0];
        assert!(text.contains("\"id\""));
    }
}
