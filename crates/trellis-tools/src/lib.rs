//! Tool adapter for the Trellis MCP server.
//!
//! Exposes six Trellis operations as named tools:
//!
//! | tool                         | remote call                              |
//! |------------------------------|------------------------------------------|
//! | `get_transformations`        | `GET /transforms`                        |
//! | `get_transformation_details` | `GET /transforms/{id}/operations`        |
//! | `get_entities`               | `GET /entities`                          |
//! | `get_entity_fields`          | `GET /entities/{id}/fields`              |
//! | `get_workflow_config`        | `GET /workflows/{workflow}/config`       |
//! | `update_workflow_blocks`     | `PATCH /workflows/{workflow}/blocks`     |
//!
//! Each invocation validates its arguments, performs at most one call
//! through [`trellis_client::TrellisClient`], and returns the remote JSON
//! unchanged. Invalid arguments fail before any network traffic.
//!
//! ```rust,ignore
//! let registry = trellis_tools::trellis_registry(&client);
//! let result = registry
//!     .execute("get_entity_fields", json!({"entity_id": "ent_1"}), &ToolContext::default())
//!     .await?;
//! ```

pub mod error;
pub mod params;
pub mod tool;
pub mod tools;

pub use error::{Result, ToolError};
pub use params::{ParamExt, ParameterValidationError};
pub use tool::{Tool, ToolContext, ToolDefinition, ToolRegistry, ToolResult};
pub use tools::{
    EntityFieldsTool, GetEntitiesTool, GetTransformationsTool, TransformationDetailsTool,
    UpdateWorkflowBlocksTool, WorkflowConfigTool, register_trellis_tools, trellis_registry,
};
