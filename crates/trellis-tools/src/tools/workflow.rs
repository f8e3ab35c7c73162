//! Tools that read and edit the scoped workflow.
//!
//! Neither tool routes on a caller-supplied workflow id. The target is
//! always the workflow the client was configured with.

use async_trait::async_trait;
use serde_json::{Value, json};
use trellis_client::{BlockChanges, TrellisClient};

use crate::error::Result;
use crate::params::UpdateBlocksParams;
use crate::tool::{Tool, ToolContext, ToolResult};

const CONFIG_DESCRIPTION: &str = "Get the current workflow configuration including all blocks and edges.

Use this tool to see what blocks already exist in the workflow before making changes. \
This helps you understand the current state and avoid duplicating blocks. The result \
includes the workflow id, name, is_active, nodes (the blocks) and edges (connections \
between blocks).";

const UPDATE_DESCRIPTION: &str = r#"Update workflow blocks: create new blocks, update existing ones, or delete blocks.

This is the primary tool for building workflows. The workflow is selected by the server; do NOT include a workflow id in blocks.

IMPORTANT: When creating a NEW block, you MUST provide a unique 'id' field. This can be any string like "my_trigger_001" or "patient_action_block".

Creating a block requires:
- id: a unique identifier you create (e.g. "new_trigger_123")
- name: human-readable name for the block
- type: either "trigger" or "action"
- position: visual position, {"x": int, "y": int}
TRIGGER blocks also need trigger: {"event_name": e.g. "new_asset", "entity_id": an entity id from get_entities}.
ACTION blocks also need action: {"name": e.g. "run_transformation" or "create_record", "entity_id" (if applicable), "transform_id" (for run_transformation), "mapping_config" (for create_record/update_entity)}.

Example new trigger block:
{"id": "referral_trigger_001", "name": "Watch for New Referrals", "type": "trigger", "position": {"x": 100, "y": 100}, "trigger": {"event_name": "new_asset", "entity_id": "entity_35Gos7u7s4FtuKX9cZGRBzQDNG6"}}

Example new action block:
{"id": "extract_patient_001", "name": "Extract Patient Data", "type": "action", "position": {"x": 300, "y": 100}, "action": {"name": "run_transformation", "transform_id": "transform_abc123"}}

Updating a block requires only its existing id from get_workflow_config (starts with "wblock_") plus the fields to change:
{"id": "wblock_35WmLblUNPVyNomrenTbffqTtLg", "name": "Updated Trigger Name", "position": {"x": 200, "y": 150}}

To delete blocks, pass their full ids from get_workflow_config in deleted_block_ids (e.g. ["wblock_abc123", "wblock_def456"]).

Returns the API response confirming the update with the workflow_id."#;

/// Reads the scoped workflow's configuration.
#[derive(Debug, Clone)]
pub struct WorkflowConfigTool {
    client: TrellisClient,
}

impl WorkflowConfigTool {
    pub fn new(client: TrellisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WorkflowConfigTool {
    fn name(&self) -> &str {
        "get_workflow_config"
    }

    fn description(&self) -> &str {
        CONFIG_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, _ctx: &ToolContext) -> Result<ToolResult> {
        let config = self.client.workflows().config().await?;
        Ok(ToolResult::json(config))
    }
}

/// Creates, updates, and deletes blocks in the scoped workflow.
#[derive(Debug, Clone)]
pub struct UpdateWorkflowBlocksTool {
    client: TrellisClient,
}

impl UpdateWorkflowBlocksTool {
    pub fn new(client: TrellisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for UpdateWorkflowBlocksTool {
    fn name(&self) -> &str {
        "update_workflow_blocks"
    }

    fn description(&self) -> &str {
        UPDATE_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "blocks": {
                    "type": "array",
                    "description": "Blocks to create or update. New blocks need id, name, type, position and a trigger or action; updates need the existing wblock_ id plus changed fields.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string"},
                            "name": {"type": "string"},
                            "type": {"type": "string", "enum": ["trigger", "action"]},
                            "position": {
                                "type": "object",
                                "properties": {
                                    "x": {"type": "integer"},
                                    "y": {"type": "integer"}
                                }
                            },
                            "trigger": {"type": "object"},
                            "action": {"type": "object"}
                        }
                    }
                },
                "deleted_block_ids": {
                    "type": "array",
                    "description": "Full ids of blocks to delete, from get_workflow_config",
                    "items": {"type": "string"}
                }
            },
            "required": ["blocks"]
        })
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult> {
        let params = UpdateBlocksParams::try_from(params)?;
        let workflows = self.client.workflows();

        if let Some(requested) = params.requested_workflow_id.as_deref()
            && requested != workflows.workflow_id()
        {
            tracing::warn!(
                requested,
                scoped = workflows.workflow_id(),
                "ignoring caller-supplied workflow id"
            );
        }

        let changes =
            BlockChanges::upsert(params.blocks).with_deletions(params.deleted_block_ids);
        let confirmation = workflows.update_blocks(&changes).await?;
        Ok(ToolResult::json(confirmation))
    }
}
