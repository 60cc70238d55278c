//! Card tools
//!
//! Tools for reading and managing cards. The owning board of a card is
//! fetched fresh on every check (cards move between boards), and moves
//! across lists check both the card's current board and the destination
//! list's board before the mutation.

use crate::error::ToolError;
use crate::tools::executor::{ToolContext, ToolExecutor, ToolOutput};
use crate::util::QueryBuilder;
use async_trait::async_trait;

use trello_mcp_macros::trello_tool;

/// Get a card
#[trello_tool(
    name = "get_card",
    description = "Get details of a specific card",
    category = "cards",
    operation = "read"
)]
pub struct GetCard {
    /// Card ID or short link
    pub card_id: String,
}

#[async_trait]
impl ToolExecutor for GetCard {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate.check_card_access(&self.card_id, "get_card").await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = format!("/cards/{}", urlencoding::encode(&self.card_id));

        let result: serde_json::Value = ctx.trello.get(&endpoint).await?;

        ToolOutput::json_value(result)
    }
}

/// Create a card in a list
#[trello_tool(
    name = "create_card",
    description = "Create a new card in a list",
    category = "cards",
    operation = "write"
)]
pub struct CreateCard {
    /// Target list ID
    pub list_id: String,
    /// Card name
    pub name: String,
    /// Card description
    #[serde(default)]
    pub desc: Option<String>,
    /// Due date (ISO 8601)
    #[serde(default)]
    pub due: Option<String>,
    /// Position: "top", "bottom", or a positive number
    #[serde(default)]
    pub pos: Option<String>,
}

#[async_trait]
impl ToolExecutor for CreateCard {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        // The card does not exist yet; authorization comes from the board
        // owning the target list
        ctx.gate
            .check_list_access(&self.list_id, "create_card")
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .param("idList", &self.list_id)
            .param("name", &self.name)
            .optional("desc", self.desc.as_deref())
            .optional("due", self.due.as_deref())
            .optional("pos", self.pos.as_deref())
            .build();
        let endpoint = format!("/cards{}", query);

        let result: serde_json::Value = ctx.trello.post(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Update a card
#[trello_tool(
    name = "update_card",
    description = "Update a card's name, description, due date, or position",
    category = "cards",
    operation = "write"
)]
pub struct UpdateCard {
    /// Card ID or short link
    pub card_id: String,
    /// New card name
    #[serde(default)]
    pub name: Option<String>,
    /// New description
    #[serde(default)]
    pub desc: Option<String>,
    /// New due date (ISO 8601), or "null" to clear
    #[serde(default)]
    pub due: Option<String>,
    /// New position: "top", "bottom", or a positive number
    #[serde(default)]
    pub pos: Option<String>,
}

#[async_trait]
impl ToolExecutor for UpdateCard {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_card_access(&self.card_id, "update_card")
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .optional("name", self.name.as_deref())
            .optional("desc", self.desc.as_deref())
            .optional("due", self.due.as_deref())
            .optional("pos", self.pos.as_deref())
            .build();
        let endpoint = format!("/cards/{}{}", urlencoding::encode(&self.card_id), query);

        let result: serde_json::Value = ctx.trello.put(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Move a card to another list
#[trello_tool(
    name = "move_card",
    description = "Move a card to a different list, possibly on another board",
    category = "cards",
    operation = "write"
)]
pub struct MoveCard {
    /// Card ID or short link
    pub card_id: String,
    /// Destination list ID
    pub list_id: String,
    /// Position in the destination list
    #[serde(default)]
    pub pos: Option<String>,
}

#[async_trait]
impl ToolExecutor for MoveCard {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        // Both endpoints must be authorized, the card's current board first.
        // The destination list may live on another board, which the Trello
        // API happily moves the card onto.
        ctx.gate.check_card_access(&self.card_id, "move_card").await?;
        ctx.gate
            .check_list_access(&self.list_id, "move_card (destination)")
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .param("idList", &self.list_id)
            .optional("pos", self.pos.as_deref())
            .build();
        let endpoint = format!("/cards/{}{}", urlencoding::encode(&self.card_id), query);

        let result: serde_json::Value = ctx.trello.put(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Archive a card
#[trello_tool(
    name = "archive_card",
    description = "Archive (close) a card",
    category = "cards",
    operation = "write"
)]
pub struct ArchiveCard {
    /// Card ID or short link
    pub card_id: String,
}

#[async_trait]
impl ToolExecutor for ArchiveCard {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_card_access(&self.card_id, "archive_card")
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = format!(
            "/cards/{}?closed=true",
            urlencoding::encode(&self.card_id)
        );

        let result: serde_json::Value = ctx.trello.put(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Add a comment to a card
#[trello_tool(
    name = "add_card_comment",
    description = "Add a comment to a card",
    category = "cards",
    operation = "write"
)]
pub struct AddCardComment {
    /// Card ID or short link
    pub card_id: String,
    /// Comment text
    pub text: String,
}

#[async_trait]
impl ToolExecutor for AddCardComment {
    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_card_access(&self.card_id, "add_card_comment")
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new().param("text", &self.text).build();
        let endpoint = format!(
            "/cards/{}/actions/comments{}",
            urlencoding::encode(&self.card_id),
            query
        );

        let result: serde_json::Value = ctx.trello.post(&endpoint, &serde_json::json!({})).await?;

        ToolOutput::json_value(result)
    }
}

/// Permanently delete a card
#[trello_tool(
    name = "delete_card",
    description = "Permanently delete a card (cannot be undone, requires confirm)",
    category = "cards",
    operation = "delete"
)]
pub struct DeleteCard {
    /// Card ID or short link
    pub card_id: String,
    /// Must be true to confirm the deletion
    #[serde(default)]
    pub confirm: bool,
}

#[async_trait]
impl ToolExecutor for DeleteCard {
    fn validate(&self) -> Result<(), ToolError> {
        if !self.confirm {
            return Err(ToolError::InvalidArguments(
                "Deletion is permanent; pass confirm=true to proceed".to_string(),
            ));
        }
        Ok(())
    }

    async fn check_access(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        ctx.gate
            .check_card_access(&self.card_id, "delete_card")
            .await?;
        Ok(())
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let endpoint = format!("/cards/{}", urlencoding::encode(&self.card_id));

        ctx.trello.delete(&endpoint).await?;

        Ok(ToolOutput::text(format!(
            "Card '{}' deleted",
            self.card_id
        )))
    }
}

/// Register all card tools
pub fn register(registry: &mut crate::tools::ToolRegistry) {
    registry.register::<GetCard>();
    registry.register::<CreateCard>();
    registry.register::<UpdateCard>();
    registry.register::<MoveCard>();
    registry.register::<ArchiveCard>();
    registry.register::<AddCardComment>();
    registry.register::<DeleteCard>();
}
