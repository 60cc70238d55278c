//! Tools module
//!
//! Provides the framework for defining and executing Trello MCP tools.

pub mod definitions;
pub mod executor;
pub mod registry;

pub use executor::{
    ContentBlock, OperationType, ToolCategory, ToolContext, ToolExecutor, ToolInfo, ToolOutput,
};
pub use registry::{RegisteredTool, ToolRegistry};

// Re-export the macro for convenience
pub use trello_mcp_macros::trello_tool;
