//! Board tools
//!
//! Tools for reading boards and their lists.

use crate::error::ToolError;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::QueryBuilder;
use async_trait::async_trait;

use trello_mcp_macros::trello_tool;

/// List the boards visible to the authenticated member
#[trello_tool(
    name = "list_boards",
    description = "List the boards the authenticated member belongs to",
    category = "boards",
    operation = "read"
)]
pub struct ListBoards {
    /// Board filter: "open", "closed", or "all"
    #[serde(default)]
    pub filter: Option<String>,
}

#[async_trait]
impl ToolExecutor for ListBoards {
    async fn check_access(&self, _ctx: &ToolContext) -> Result<(), ToolError> {
        // Enumeration is not scoped to a single board; the allow-list
        // governs identified-board operations, not discovery
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("filter", self.filter.as_deref())
            .build();
        let endpoint = format!("/members/me/boards{}", query);

        let result: serde_json::Value = ctx.trello.get(&endpoint).await?;

        ToolOutput::json_value(result)
    }
}

/// Get a board
#[trello_tool(
    name = "get_board",
    description = "Get details of a specific board",
    category = "boards",
    operation = "read"
)]
pub struct GetBoard {
    /// Board ID or short link
    pub board_id: String,
}

#[async_trait]
impl ToolExecutor for GetBoard {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_board_access(&self.board_id, "get_board", true)
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = format!("/boards/{}", urlencoding::encode(&self.board_id));

        let result: serde_json::Value = ctx.trello.get(&endpoint).await?;

        ToolOutput::json_value(result)
    }
}

/// Get the lists on a board
#[trello_tool(
    name = "get_board_lists",
    description = "Get the lists on a board",
    category = "boards",
    operation = "read"
)]
pub struct GetBoardLists {
    /// Board ID or short link
    pub board_id: String,
    /// List filter: "open", "closed", or "all"
    #[serde(default)]
    pub filter: Option<String>,
}

#[async_trait]
impl ToolExecutor for GetBoardLists {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_board_access(&self.board_id, "get_board_lists", true)
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("filter", self.filter.as_deref())
            .build();
        let endpoint = format!(
            "/boards/{}/lists{}",
            urlencoding::encode(&self.board_id),
            query
        );

        let result: serde_json::Value = ctx.trello.get(&endpoint).await?;

        ToolOutput::json_value(result)
    }
}

/// Register all board tools
pub fn register(registry: &mut crate::tools::ToolRegistry) {
    registry.register::<ListBoards>();
    registry.register::<GetBoard>();
    registry.register::<GetBoardLists>();
}
