//! The MCP server: routes JSON-RPC requests to the tool registry.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use trellis_tools::{ToolContext, ToolError, ToolRegistry};

use crate::error::Result;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, RequestId, ServerCapabilities, ServerInfo,
    ToolInfo, ToolsCapability, negotiate_version,
};
use crate::transport::{MessageReader, write_message};

/// Name advertised in `serverInfo`.
pub const SERVER_NAME: &str = "trellis-workflows";

const INSTRUCTIONS: &str = "Tools for building a single Trellis workflow. Discover ids with \
get_entities, get_entity_fields, get_transformations and get_transformation_details, inspect \
the current blocks with get_workflow_config, then change them with update_workflow_blocks.";

/// MCP server over a fixed tool registry.
///
/// Requests are handled one at a time in arrival order.
#[derive(Debug)]
pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
}

impl McpServer {
    /// Create a server exposing `registry`.
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Serve until `reader` reaches end of stream.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut messages = MessageReader::new(BufReader::new(reader));
        tracing::info!(tools = self.registry.len(), "MCP server ready");

        while let Some(frame) = messages.next_frame().await? {
            let response = match frame.text() {
                Ok(text) => self.handle_message(text).await,
                Err(e) => {
                    tracing::warn!(error = %e, "received message that is not UTF-8");
                    Some(JsonRpcResponse::failure(
                        None,
                        JsonRpcError::parse_error(format!("parse error: {}", e)),
                    ))
                }
            };
            let Some(response) = response else {
                continue;
            };
            let body = serde_json::to_string(&response)?;
            write_message(&mut writer, &body, frame.framing).await?;
        }

        tracing::info!("input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "received malformed JSON");
                return Some(JsonRpcResponse::failure(
                    None,
                    JsonRpcError::parse_error(format!("parse error: {}", e)),
                ));
            }
        };

        if value.get("id").is_some_and(Value::is_null) {
            tracing::warn!("received request with null id");
            return Some(JsonRpcResponse::failure(
                None,
                JsonRpcError::invalid_request("invalid request: id must not be null"),
            ));
        }

        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value
                    .get("id")
                    .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
                tracing::warn!(error = %e, "received invalid JSON-RPC request");
                return Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError::invalid_request(format!("invalid request: {}", e)),
                ));
            }
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        }

        Some(self.handle_request(request).await)
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;
        tracing::debug!(method = %method, id = ?id, "request received");

        let outcome = match method.as_str() {
            "initialize" => self.initialize(params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(id.as_ref(), params).await,
            other => {
                tracing::warn!(method = other, "unknown method");
                Err(JsonRpcError::method_not_found(other))
            }
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        }
    }

    fn initialize(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: InitializeParams = parse_params(params)?;
        let version = negotiate_version(params.protocol_version.as_deref());
        let (client_name, client_version) = params
            .client_info
            .as_ref()
            .map(|c| (c.name.as_str(), c.version.as_str()))
            .unwrap_or(("unknown", ""));
        tracing::info!(
            client = client_name,
            client_version,
            requested = params.protocol_version.as_deref().unwrap_or("-"),
            negotiated = version,
            "client initialized"
        );

        let result = InitializeResult {
            protocol_version: version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
            instructions: Some(INSTRUCTIONS.to_string()),
        };
        to_result(&result)
    }

    fn list_tools(&self) -> std::result::Result<Value, JsonRpcError> {
        let tools = self
            .registry
            .definitions()
            .into_iter()
            .map(ToolInfo::from)
            .collect();
        to_result(&ListToolsResult { tools })
    }

    async fn call_tool(
        &self,
        id: Option<&RequestId>,
        params: Option<Value>,
    ) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params)?;
        if !self.registry.contains(&params.name) {
            return Err(JsonRpcError::invalid_params(format!(
                "unknown tool: {}",
                params.name
            )));
        }

        let mut ctx = ToolContext::new();
        if let Some(id) = id {
            ctx = ctx.with_call_id(id.to_string());
        }
        let arguments = params.arguments.unwrap_or_else(|| json!({}));

        let result = match self.registry.execute(&params.name, arguments, &ctx).await {
            Ok(output) => CallToolResult::success(output.to_llm_content(), output.structured()),
            Err(ToolError::NotFound(name)) => {
                return Err(JsonRpcError::invalid_params(format!("unknown tool: {}", name)));
            }
            Err(e) => CallToolResult::error(e.to_payload()),
        };
        to_result(&result)
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> std::result::Result<T, JsonRpcError> {
    serde_json::from_value(params.unwrap_or_else(|| json!({})))
        .map_err(|e| JsonRpcError::invalid_params(format!("invalid params: {}", e)))
}

fn to_result<T: serde::Serialize>(value: &T) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal(e.to_string()))
}
