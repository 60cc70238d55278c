//! List tools
//!
//! Tools for reading and managing lists. Every identified-list operation
//! resolves the list's owning board and checks it against the allow-list
//! before touching the API; moving a list across boards checks the current
//! board first, then the destination.

use crate::error::ToolError;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::QueryBuilder;
use async_trait::async_trait;

use trello_mcp_macros::trello_tool;

/// Get a list
#[trello_tool(
    name = "get_list",
    description = "Get details of a specific list",
    category = "lists",
    operation = "read"
)]
pub struct GetList {
    /// List ID
    pub list_id: String,
}

#[async_trait]
impl ToolExecutor for GetList {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate.check_list_access(&self.list_id, "get_list").await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = format!("/lists/{}", urlencoding::encode(&self.list_id));

        let result: serde_json::Value = ctx.trello.get(&endpoint).await?;

        ToolOutput::json_value(result)
    }
}

/// Create a list on a board
#[trello_tool(
    name = "create_list",
    description = "Create a new list on a board",
    category = "lists",
    operation = "write"
)]
pub struct CreateList {
    /// Board ID or short link the list is created on
    pub board_id: String,
    /// List name
    pub name: String,
    /// Position: "top", "bottom", or a positive number
    #[serde(default)]
    pub pos: Option<String>,
}

#[async_trait]
impl ToolExecutor for CreateList {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_board_access(&self.board_id, "create_list", true)
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .param("name", &self.name)
            .param("idBoard", &self.board_id)
            .optional("pos", self.pos.as_deref())
            .build();
        let endpoint = format!("/lists{}", query);

        let result: serde_json::Value = ctx.trello.post(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Update a list
#[trello_tool(
    name = "update_list",
    description = "Update a list's name or position",
    category = "lists",
    operation = "write"
)]
pub struct UpdateList {
    /// List ID
    pub list_id: String,
    /// New list name
    #[serde(default)]
    pub name: Option<String>,
    /// New position: "top", "bottom", or a positive number
    #[serde(default)]
    pub pos: Option<String>,
}

#[async_trait]
impl ToolExecutor for UpdateList {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_list_access(&self.list_id, "update_list")
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("name", self.name.as_deref())
            .optional("pos", self.pos.as_deref())
            .build();
        let endpoint = format!("/lists/{}{}", urlencoding::encode(&self.list_id), query);

        let result: serde_json::Value = ctx.trello.put(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Archive a list
#[trello_tool(
    name = "archive_list",
    description = "Archive (close) a list",
    category = "lists",
    operation = "write"
)]
pub struct ArchiveList {
    /// List ID
    pub list_id: String,
}

#[async_trait]
impl ToolExecutor for ArchiveList {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_list_access(&self.list_id, "archive_list")
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = format!(
            "/lists/{}/closed?value=true",
            urlencoding::encode(&self.list_id)
        );

        let result: serde_json::Value = ctx.trello.put(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Move a list to another board
#[trello_tool(
    name = "move_list_to_board",
    description = "Move a list to a different board",
    category = "lists",
    operation = "write"
)]
pub struct MoveListToBoard {
    /// List ID
    pub list_id: String,
    /// Destination board ID or short link
    pub board_id: String,
}

#[async_trait]
impl ToolExecutor for MoveListToBoard {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        // Both endpoints must be authorized, current board first
        ctx.gate
            .check_list_access(&self.list_id, "move_list_to_board")
            .await?;
        ctx.gate
            .check_board_access(&self.board_id, "move_list_to_board (destination)", true)
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new().param("value", &self.board_id).build();
        let endpoint = format!(
            "/lists/{}/idBoard{}",
            urlencoding::encode(&self.list_id),
            query
        );

        let result: serde_json::Value = ctx.trello.put(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Register all list tools
pub fn register(registry: &mut crate::tools::ToolRegistry) {
    registry.register::<GetList>();
    registry.register::<CreateList>();
    registry.register::<UpdateList>();
    registry.register::<ArchiveList>();
    registry.register::<MoveListToBoard>();
}
