//! Workflows API.
//!
//! Every method here targets the workflow from the client's [`Scope`]:
//! no method takes a workflow id.
//!
//! [`Scope`]: trellis_config::Scope

use serde_json::Value;

use crate::client::TrellisClient;
use crate::error::Result;
use crate::types::BlockChanges;

/// Workflows API client, bound to the configured workflow.
pub struct WorkflowsApi {
    client: TrellisClient,
}

impl WorkflowsApi {
    pub(crate) fn new(client: TrellisClient) -> Self {
        Self { client }
    }

    /// Id of the workflow this handle operates on.
    pub fn workflow_id(&self) -> &str {
        &self.client.scope().workflow_id
    }

    /// Get the workflow configuration: blocks (nodes) and their edges.
    pub async fn config(&self) -> Result<Value> {
        let workflow_id = self.workflow_id();
        tracing::info!(workflow_id, "fetching workflow config");
        self.client
            .get(&["workflows", workflow_id, "config"])
            .await
    }

    /// Create, update, and delete blocks in one request.
    pub async fn update_blocks(&self, changes: &BlockChanges) -> Result<Value> {
        let workflow_id = self.workflow_id();
        tracing::info!(
            workflow_id,
            blocks = changes.blocks.len(),
            deleted = changes.deleted_block_ids.len(),
            "updating workflow blocks"
        );
        self.client
            .patch(&["workflows", workflow_id, "blocks"], changes)
            .await
    }
}
