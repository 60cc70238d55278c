//! Tool definitions
//!
//! This module contains all Trello MCP tool implementations.

pub mod boards;
pub mod cards;
pub mod lists;

use crate::tools::ToolRegistry;

/// Register all tools with the registry
pub fn register_all_tools(registry: &mut ToolRegistry) {
    boards::register(registry);
    lists::register(registry);
    cards::register(registry);
}
