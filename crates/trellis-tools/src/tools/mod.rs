//! The Trellis tool set.

mod entities;
mod transforms;
mod workflow;

pub use entities::{EntityFieldsTool, GetEntitiesTool};
pub use transforms::{GetTransformationsTool, TransformationDetailsTool};
pub use workflow::{UpdateWorkflowBlocksTool, WorkflowConfigTool};

use trellis_client::TrellisClient;

use crate::tool::ToolRegistry;

/// Register all six Trellis tools, sharing `client`.
pub fn register_trellis_tools(registry: &mut ToolRegistry, client: &TrellisClient) {
    registry.register(GetTransformationsTool::new(client.clone()));
    registry.register(TransformationDetailsTool::new(client.clone()));
    registry.register(GetEntitiesTool::new(client.clone()));
    registry.register(EntityFieldsTool::new(client.clone()));
    registry.register(WorkflowConfigTool::new(client.clone()));
    registry.register(UpdateWorkflowBlocksTool::new(client.clone()));
}

/// Build the registry served by the MCP server.
///
/// Invocations are logged under the current span.
pub fn trellis_registry(client: &TrellisClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_trellis_tools(&mut registry, client);
    tracing::debug!(tools = ?registry.names(), "tool registry built");
    registry
}
