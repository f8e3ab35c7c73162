//! Tool trait and registry.
//!
//! A [`Tool`] is one named operation the host can invoke. The
//! [`ToolRegistry`] is built once at startup, owns every tool, and is the
//! single entry point for invocation: it resolves the name, runs the tool,
//! and logs the outcome.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{Instrument, Span};

use crate::error::{Result, ToolError};

// ─────────────────────────────────────────────────────────────────────────────
// Tool Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A named operation exposed to the host.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of this tool.
    fn name(&self) -> &str;

    /// Human-readable description, shown to the model choosing tools.
    fn description(&self) -> &str;

    /// JSON Schema for this tool's arguments.
    fn parameters(&self) -> Value;

    /// JSON Schema for this tool's result.
    fn output_schema(&self) -> Value {
        json!({"type": "object"})
    }

    /// Execute the tool.
    ///
    /// Implementations validate `params` before doing any I/O.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Context
// ─────────────────────────────────────────────────────────────────────────────

/// Per-invocation context.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Host-side id of the request that triggered this call.
    pub call_id: Option<String>,
}

impl ToolContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the host request id.
    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = Some(call_id.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Result
// ─────────────────────────────────────────────────────────────────────────────

/// Successful output of a tool: the remote JSON document, unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The JSON content.
    pub content: Value,
}

impl ToolResult {
    /// Create a JSON result.
    pub fn json(content: Value) -> Self {
        Self { content }
    }

    /// Content rendered as text for the model.
    pub fn to_llm_content(&self) -> String {
        serde_json::to_string_pretty(&self.content).unwrap_or_else(|_| self.content.to_string())
    }

    /// Content as a JSON object.
    ///
    /// Objects are returned as is; anything else is wrapped as
    /// `{"result": ...}`.
    pub fn structured(&self) -> Value {
        match &self.content {
            content @ Value::Object(_) => content.clone(),
            content => json!({"result": content}),
        }
    }

    /// Size of the rendered content in bytes.
    pub fn content_size(&self) -> usize {
        self.content.to_string().len()
    }
}

/// Description of a registered tool, as advertised to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for arguments.
    pub input_schema: Value,
    /// JSON Schema for results.
    pub output_schema: Value,
}

impl ToolDefinition {
    fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.parameters(),
            output_schema: tool.output_schema(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry of available tools, keyed and listed by name.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    span: Span,
}

impl ToolRegistry {
    /// Create an empty registry that logs under the current span.
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            span: Span::current(),
        }
    }

    /// Log invocations under `span` instead of the current one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Register a tool.
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a tool from an Arc.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for every tool, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition::from_tool(tool.as_ref()))
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
            .inspect_err(|_| {
                self.span.in_scope(|| tracing::warn!(tool = %name, "unknown tool requested"));
            })?;

        let call_id = ctx.call_id.as_deref().unwrap_or("-");
        async {
            tracing::info!(tool = %name, call_id, "tool invoked");
            let started = Instant::now();
            let outcome = tool.execute(params, ctx).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &outcome {
                Ok(result) => tracing::info!(
                    tool = %name,
                    call_id,
                    elapsed_ms,
                    size = result.content_size(),
                    "tool succeeded"
                ),
                Err(e @ ToolError::Validation(_)) => tracing::warn!(
                    tool = %name,
                    call_id,
                    error = %e,
                    "tool rejected arguments"
                ),
                Err(e) => tracing::error!(
                    tool = %name,
                    call_id,
                    elapsed_ms,
                    kind = e.kind(),
                    status = e.status(),
                    error = %e,
                    "tool failed"
                ),
            }
            outcome
        }
        .instrument(self.span.clone())
        .await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Tool (for testing)
// ─────────────────────────────────────────────────────────────────────────────

/// A mock tool for testing.
///
/// Returns a configurable response or remote failure and records calls.
#[cfg(test)]
#[derive(Debug)]
pub struct MockTool {
    name: String,
    response: std::sync::Mutex<Option<ToolResult>>,
    fail_status: Option<u16>,
    calls: std::sync::Mutex<Vec<Value>>,
}

#[cfg(test)]
impl MockTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: std::sync::Mutex::new(None),
            fail_status: None,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, response: ToolResult) -> Self {
        *self.response.lock().unwrap() = Some(response);
        self
    }

    pub fn failing_with(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "A mock tool for testing"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult> {
        self.calls.lock().unwrap().push(params);
        if let Some(status) = self.fail_status {
            return Err(ToolError::RemoteApi {
                status,
                body: "mock failure".to_string(),
            });
        }
        Ok(self
            .response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| ToolResult::json(json!({"ok": true}))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_passes_objects_through() {
        let result = ToolResult::json(json!({"data": [1, 2]}));
        assert_eq!(result.structured(), json!({"data": [1, 2]}));
    }

    #[test]
    fn test_structured_wraps_non_objects() {
        assert_eq!(
            ToolResult::json(json!([1, 2])).structured(),
            json!({"result": [1, 2]})
        );
        assert_eq!(
            ToolResult::json(Value::Null).structured(),
            json!({"result": null})
        );
        assert_eq!(
            ToolResult::json(json!("done")).structured(),
            json!({"result": "done"})
        );
    }

    #[test]
    fn test_llm_content_is_pretty_json() {
        let result = ToolResult::json(json!({"a": 1}));
        assert_eq!(result.to_llm_content(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_registry_names_are_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("zeta"));
        registry.register(MockTool::new("alpha"));
        registry.register(MockTool::new("mid"));
        assert_eq!(registry.names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("same"));
        registry.register(MockTool::new("same"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_definitions_carry_default_output_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("mock"));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].output_schema, json!({"type": "object"}));

        let serialized = serde_json::to_value(&defs[0]).unwrap();
        assert!(serialized.get("inputSchema").is_some());
        assert!(serialized.get("outputSchema").is_some());
    }

    #[tokio::test]
    async fn test_execute_runs_tool_once() {
        let tool = Arc::new(MockTool::new("mock").with_response(ToolResult::json(json!("hi"))));
        let mut registry = ToolRegistry::new();
        registry.register_arc(tool.clone());

        let result = registry
            .execute("mock", json!({"x": 1}), &ToolContext::new().with_call_id("7"))
            .await
            .unwrap();
        assert_eq!(result, ToolResult::json(json!("hi")));
        assert_eq!(tool.call_count(), 1);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute("missing", json!({}), &ToolContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_execute_propagates_failure() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("broken").failing_with(500));
        let err = registry
            .execute("broken", json!({}), &ToolContext::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("mock"));
        assert!(format!("{:?}", registry).contains("mock"));
    }
}
