//! Tool registry
//!
//! Manages the collection of available tools and their metadata.

use crate::error::{GateError, ToolError};
use crate::tools::executor::{
    OperationType, ToolCategory, ToolContext, ToolExecutor, ToolInfo, ToolOutput,
};
// async_trait required for dyn-compatibility with Box<dyn ToolHandler>
use async_trait::async_trait;
use schemars::Schema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// A registered tool with all its metadata
pub struct RegisteredTool {
    /// Tool name
    pub name: &'static str,
    /// Tool description
    pub description: &'static str,
    /// Tool category
    pub category: ToolCategory,
    /// What the tool does to Trello state
    pub operation: OperationType,
    /// JSON Schema for the tool's input
    pub input_schema: Schema,
    /// The tool handler
    handler: Box<dyn ToolHandler>,
}

/// Internal trait for type-erased tool handling
#[async_trait]
trait ToolHandler: Send + Sync {
    /// Run the full pipeline with raw JSON arguments
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError>;
}

/// Generic tool handler implementation
struct TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + 'static,
{
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + 'static,
{
    fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T> ToolHandler for TypedToolHandler<T>
where
    T: ToolExecutor + DeserializeOwned + Send + Sync + 'static,
{
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<ToolOutput, ToolError> {
        // Deserialize arguments into the tool struct
        let tool: T = serde_json::from_value(args).map_err(|e| {
            ToolError::InvalidArguments(format!("Failed to parse arguments: {}", e))
        })?;

        // Pipeline order is load-bearing: the access check must complete
        // before execute issues any API call
        tool.validate()?;
        tool.check_access(ctx).await?;
        tool.execute(ctx).await
    }
}

/// Tool registry
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register<T>(&mut self)
    where
        T: ToolExecutor
            + DeserializeOwned
            + schemars::JsonSchema
            + ToolInfo
            + Send
            + Sync
            + 'static,
    {
        let name = <T as ToolInfo>::name();
        let description = <T as ToolInfo>::description();
        let category = <T as ToolInfo>::category();
        let operation = <T as ToolInfo>::operation_type();

        // Generate JSON Schema
        let input_schema = schemars::schema_for!(T);

        let tool = RegisteredTool {
            name,
            description,
            category,
            operation,
            input_schema,
            handler: Box::new(TypedToolHandler::<T>::new()),
        };

        self.tools.insert(name.to_string(), tool);

        debug!(name = name, category = %category, "Registered tool");
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Get all tools
    pub fn tools(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.values()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name
    #[instrument(skip(self, ctx, args), fields(tool = %name, request_id = %ctx.request_id))]
    pub async fn execute(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: Value,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let result = tool.handler.call(ctx, args).await;

        match &result {
            Err(ToolError::Gate(GateError::AccessDenied(denied))) => {
                // Audit record for the denial
                warn!(
                    tool = %name,
                    board = %denied.board,
                    operation = %denied.operation,
                    request_id = %ctx.request_id,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool call denied by board allow-list"
                );
            }
            Err(e) => {
                debug!(
                    tool = %name,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool call failed"
                );
            }
            Ok(_) => {
                debug!(
                    tool = %name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool call completed"
                );
            }
        }

        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
