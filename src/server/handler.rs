//! MCP server handler
//!
//! Implements the MCP protocol handler for Trello tools.

use crate::access_control::BoardAccessGate;
use crate::config::AppConfig;
use crate::error::mcp_mapper;
use crate::error::{GateError, ToolError};
use crate::tools::{ContentBlock, ToolContext, ToolOutput, ToolRegistry, definitions};
use crate::trello::TrelloClient;
use rmcp::ErrorData as McpError;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, CompleteRequestParam, CompleteResult, CompletionInfo,
    Content, Implementation, InitializeResult, ListToolsResult, PaginatedRequestParam,
    ProtocolVersion, ServerCapabilities, Tool, ToolsCapability,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Trello MCP server handler
#[derive(Clone)]
pub struct TrelloMcpHandler {
    /// Server name for MCP
    name: String,
    /// Server version
    version: String,
    /// Tool registry
    registry: Arc<ToolRegistry>,
    /// Trello client
    trello: Arc<TrelloClient>,
    /// Board access gate
    gate: Arc<BoardAccessGate>,
}

impl TrelloMcpHandler {
    /// Create a new handler from configuration
    pub fn new(config: &AppConfig, trello: TrelloClient, gate: BoardAccessGate) -> Self {
        Self::new_with_shared(config, Arc::new(trello), Arc::new(gate))
    }

    /// Create a new handler with shared (Arc-wrapped) resources
    ///
    /// This is useful when creating multiple handlers that share the same
    /// Trello client and access gate (e.g., for HTTP transport with
    /// multiple concurrent connections).
    pub fn new_with_shared(
        config: &AppConfig,
        trello: Arc<TrelloClient>,
        gate: Arc<BoardAccessGate>,
    ) -> Self {
        // Build tool registry
        let mut registry = ToolRegistry::new();
        definitions::register_all_tools(&mut registry);

        info!(tools = registry.len(), "Initialized Trello MCP handler");

        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            registry: Arc::new(registry),
            trello,
            gate,
        }
    }

    /// Create tool context for a request
    fn create_context(&self, request_id: &str) -> ToolContext {
        ToolContext::new(
            self.trello.clone(),
            self.gate.clone(),
            request_id.to_string(),
        )
    }

    /// Convert internal tool output to MCP result
    fn to_mcp_result(&self, output: ToolOutput) -> CallToolResult {
        let content = output
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text(text) => Content::text(text),
            })
            .collect();

        CallToolResult {
            content,
            is_error: Some(output.is_error),
            meta: None,
            structured_content: None,
        }
    }

    /// Convert registry tools to MCP tool definitions
    fn get_mcp_tools(&self) -> Vec<Tool> {
        self.registry
            .tools()
            .map(|tool| {
                // Convert schemars schema to MCP format (JsonObject = Map<String, Value>)
                let schema_value = serde_json::to_value(&tool.input_schema)
                    .unwrap_or_else(|_| serde_json::json!({}));

                // Build the input schema as a JsonObject
                let mut input_schema: Map<String, Value> = Map::new();
                input_schema.insert("type".to_string(), Value::String("object".to_string()));

                if let Some(props) = schema_value.get("properties") {
                    input_schema.insert("properties".to_string(), props.clone());
                }
                if let Some(required) = schema_value.get("required") {
                    input_schema.insert("required".to_string(), required.clone());
                }

                Tool {
                    name: Cow::Owned(tool.name.to_string()),
                    description: Some(Cow::Owned(tool.description.to_string())),
                    input_schema: Arc::new(input_schema),
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: None,
                }
            })
            .collect()
    }

    /// Get tool names for completion, filtered by prefix
    fn get_tool_completions(&self, prefix: &str) -> Vec<String> {
        self.registry
            .tools()
            .filter(|tool| tool.name.starts_with(prefix))
            .map(|tool| tool.name.to_string())
            .collect()
    }

    /// Execute a tool call
    ///
    /// Argument-shape problems are protocol errors (`Err`); everything the
    /// tool itself produced, including access denials, comes back as
    /// `Ok(is_error = true)` so clients see it as a tool-level failure.
    async fn execute_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        // Generate a request ID for tracing
        let request_id = format!("{:x}", rand::random::<u64>());
        let ctx = self.create_context(&request_id);

        // Get arguments or empty object - convert Map to Value
        let args = arguments
            .map(Value::Object)
            .unwrap_or_else(|| serde_json::json!({}));

        let result = self.registry.execute(name, &ctx, args).await;

        match result {
            Ok(output) => Ok(self.to_mcp_result(output)),
            Err(
                e @ (ToolError::NotFound(_)
                | ToolError::InvalidArguments(_)
                | ToolError::Serialization(_)),
            ) => Err(mcp_mapper::map_tool_error(&e)),
            Err(e) => {
                // Denials are expected under a restrictive allow-list; only
                // infrastructure failures are logged at error level
                if !matches!(&e, ToolError::Gate(GateError::AccessDenied(_))) {
                    error!(error = %e, "Tool execution failed");
                }
                Ok(CallToolResult {
                    content: vec![Content::text(format!("Error: {}", e))],
                    is_error: Some(true),
                    meta: None,
                    structured_content: None,
                })
            }
        }
    }
}

impl ServerHandler for TrelloMcpHandler {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                completions: Some(Map::new()),
                ..Default::default()
            },
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Trello MCP Server - Access Trello boards, lists, and cards with board-scoped access control"
                    .to_string(),
            ),
        }
    }

    #[instrument(skip(self, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!("Listing tools");
        async move {
            Ok(ListToolsResult {
                tools: self.get_mcp_tools(),
                next_cursor: None,
            })
        }
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        debug!(?request.arguments, "Calling tool");
        async move { self.execute_tool(&request.name, request.arguments).await }
    }

    #[instrument(skip(self, _context))]
    fn complete(
        &self,
        request: CompleteRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CompleteResult, McpError>> + Send + '_ {
        debug!(?request, "Processing completion request");
        async move {
            // Extract the argument name being completed
            let arg_name = &request.argument.name;
            let prefix = &request.argument.value;

            // Get completions based on what's being completed
            let values = match arg_name.as_str() {
                // For tool references, suggest tool names
                "name" => self.get_tool_completions(prefix),
                // Board/list/card ids would need an API call - no completions
                _ => Vec::new(),
            };

            let total = values.len() as u32;
            let has_more = values.len() > 100;
            let truncated = if has_more {
                values.into_iter().take(100).collect()
            } else {
                values
            };

            Ok(CompleteResult {
                completion: CompletionInfo {
                    values: truncated,
                    total: Some(total),
                    has_more: Some(has_more),
                },
            })
        }
    }
}
