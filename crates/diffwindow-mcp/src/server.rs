//! MCP server implementation for diffwindow-mcp
//!
//! This module provides the MCP server that exposes windowed git diffs and
//! contributor lists to LLMs via MCP tool calls.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_mcp_sdk::mcp_server::{McpServerOptions, ServerHandler, ToMcpServerHandler, server_runtime};
use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, Implementation, InitializeResult,
    LATEST_PROTOCOL_VERSION, ListToolsResult, PaginatedRequestParams, RpcError,
    ServerCapabilities, ServerCapabilitiesTools, TextContent, Tool, ToolInputSchema,
    schema_utils::CallToolError,
};
use rust_mcp_sdk::{McpServer, StdioTransport, TransportOptions};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::handlers::{self, HandlerError, ToolSettings};

/// Name of the windowed diff tool
pub const GIT_DIFF_TOOL: &str = "git_diff";
/// Name of the contributor listing tool
pub const CONTRIBUTORS_TOOL: &str = "git_contributors";

/// Convert a JSON object into the properties format expected by ToolInputSchema.
///
/// ToolInputSchema expects `HashMap<String, Map<String, Value>>` for properties,
/// where each key maps to a JSON object describing that property's schema.
fn make_properties(json_obj: Value) -> HashMap<String, Map<String, Value>> {
    let mut properties = HashMap::new();
    if let Value::Object(obj) = json_obj {
        for (key, value) in obj {
            if let Value::Object(inner) = value {
                properties.insert(key, inner);
            }
        }
    }
    properties
}

/// The diffwindow MCP server handler
///
/// Each tool call clones into its own scratch directory, so the handler
/// holds nothing but read-only settings.
pub struct DiffWindowServer {
    settings: Arc<ToolSettings>,
}

impl DiffWindowServer {
    /// Create a new server with the given settings
    #[must_use]
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Settings applied to every tool call
    #[must_use]
    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Build the list of available tools
    #[must_use]
    pub fn build_tools() -> Vec<Tool> {
        vec![Self::git_diff_tool(), Self::contributors_tool()]
    }

    fn git_diff_tool() -> Tool {
        Tool {
            name: GIT_DIFF_TOOL.into(),
            description: Some(
                "Get the net diff of a git repository over the last N days. \
                 Commits can be restricted to one author and one branch; \
                 lock files and other excluded paths are removed from the output."
                    .into(),
            ),
            input_schema: ToolInputSchema::new(
                vec!["repository_url".into(), "num_days".into()],
                Some(make_properties(json!({
                    "repository_url": {
                        "type": "string",
                        "description": "Clone URL or local path of the repository"
                    },
                    "num_days": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Size of the window in days (fractions allowed)"
                    },
                    "author_email": {
                        "type": "string",
                        "description": "Only include commits by this author email (optional)"
                    },
                    "branch": {
                        "type": "string",
                        "description": "Branch to walk instead of the default branch (optional)"
                    },
                    "depth": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Shallow clone depth, 0 for full history (optional)"
                    },
                    "include_stats": {
                        "type": "boolean",
                        "default": false,
                        "description": "Also return per-file insertion and deletion counts"
                    }
                }))),
                None,
            ),
            annotations: None,
            execution: None,
            icons: vec![],
            meta: None,
            output_schema: None,
            title: Some("Windowed Git Diff".into()),
        }
    }

    fn contributors_tool() -> Tool {
        Tool {
            name: CONTRIBUTORS_TOOL.into(),
            description: Some(
                "List the distinct commit authors of a git repository across all branches."
                    .into(),
            ),
            input_schema: ToolInputSchema::new(
                vec!["repository_url".into()],
                Some(make_properties(json!({
                    "repository_url": {
                        "type": "string",
                        "description": "Clone URL or local path of the repository"
                    },
                    "depth": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Shallow clone depth, 0 for full history (optional)"
                    }
                }))),
                None,
            ),
            annotations: None,
            execution: None,
            icons: vec![],
            meta: None,
            output_schema: None,
            title: Some("Repository Contributors".into()),
        }
    }

    /// Run a tool by name and render its result
    ///
    /// Blocking; the async path runs this on a blocking thread.
    fn run_tool(
        &self,
        name: &str,
        args: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, HandlerError> {
        match name {
            GIT_DIFF_TOOL => {
                let response = handlers::handle_git_diff(args, &self.settings)?;
                let mut content = vec![TextContent::new(response.text(), None, None)];
                if let Some(summary) = &response.summary {
                    let stats = serde_json::to_string_pretty(summary)?;
                    content.push(TextContent::new(stats, None, None));
                }
                Ok(CallToolResult::text_content(content))
            }
            CONTRIBUTORS_TOOL => {
                let response = handlers::handle_contributors(args, &self.settings)?;
                let json = serde_json::to_string_pretty(&response)?;
                Ok(CallToolResult::text_content(vec![TextContent::new(
                    json, None, None,
                )]))
            }
            _ => Err(HandlerError::UnknownTool(name.to_string())),
        }
    }

    /// Run a tool synchronously on the current thread
    pub fn call_tool(
        &self,
        name: &str,
        args: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, CallToolError> {
        self.run_tool(name, args).map_err(tool_error)
    }

    /// Run a tool on a blocking thread
    ///
    /// Only `Send` values cross the thread boundary; the result is
    /// converted to a `CallToolError` after the join.
    pub async fn dispatch(
        &self,
        name: String,
        args: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, CallToolError> {
        let server = Self {
            settings: Arc::clone(&self.settings),
        };

        tokio::task::spawn_blocking(move || server.run_tool(&name, args))
            .await
            .map_err(CallToolError::new)?
            .map_err(tool_error)
    }
}

fn tool_error(err: HandlerError) -> CallToolError {
    match err {
        HandlerError::UnknownTool(name) => CallToolError::unknown_tool(name),
        err => {
            warn!(error = %err, "Tool call failed");
            CallToolError::new(err)
        }
    }
}

/// ServerHandler implementation for the MCP protocol
#[async_trait]
impl ServerHandler for DiffWindowServer {
    /// Handle requests to list available tools
    async fn handle_list_tools_request(
        &self,
        _params: Option<PaginatedRequestParams>,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            tools: Self::build_tools(),
            meta: None,
            next_cursor: None,
        })
    }

    /// Handle requests to call a specific tool
    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        debug!(tool = %params.name, "Calling tool");

        let CallToolRequestParams {
            name, arguments, ..
        } = params;
        self.dispatch(name, arguments).await
    }
}

/// Server identity and capabilities announced during initialization
#[must_use]
pub fn server_details() -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            title: Some("Diffwindow".into()),
            description: Some(env!("CARGO_PKG_DESCRIPTION").into()),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some(
            "Use git_diff to see what changed in a repository over the last N days, \
             and git_contributors to find author emails to filter by."
                .into(),
        ),
        protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
    }
}

/// Serve MCP over stdin/stdout until the client disconnects
///
/// # Errors
///
/// Returns an error if the transport cannot be created or the server fails.
pub async fn serve_stdio(settings: ToolSettings) -> anyhow::Result<()> {
    let transport = StdioTransport::new(TransportOptions::default())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let handler = DiffWindowServer::new(settings);

    let server = server_runtime::create_server(McpServerOptions {
        server_details: server_details(),
        transport,
        handler: handler.to_mcp_server_handler(),
        task_store: None,
        client_task_store: None,
    });

    info!("Serving MCP over stdio");
    server.start().await.map_err(|e| anyhow::anyhow!("{e}"))
}
