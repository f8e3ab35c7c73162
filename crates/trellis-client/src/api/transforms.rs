//! Transformations API.

use serde_json::Value;

use crate::client::TrellisClient;
use crate::error::Result;
use crate::types::TransformsQuery;

/// Transformations API client.
///
/// Transformations are extraction schemas; this crate only reads them.
pub struct TransformsApi {
    client: TrellisClient,
}

impl TransformsApi {
    pub(crate) fn new(client: TrellisClient) -> Self {
        Self { client }
    }

    /// List every transformation in the configured project, including
    /// their parameters.
    pub async fn list(&self) -> Result<Value> {
        let scope = self.client.scope();
        tracing::info!(project_id = %scope.project_id, "fetching transformations");
        let query = TransformsQuery {
            proj_ids: &scope.project_id,
            include_transform_params: true,
        };
        self.client.get_with_query(&["transforms"], &query).await
    }

    /// Get the operation schema of one transformation.
    pub async fn operations(&self, transform_id: &str) -> Result<Value> {
        tracing::info!(transform_id, "fetching transformation operations");
        self.client
            .get(&["transforms", transform_id, "operations"])
            .await
    }
}
