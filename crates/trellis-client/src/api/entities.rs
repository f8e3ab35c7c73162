//! Entities API.

use serde_json::Value;

use crate::client::TrellisClient;
use crate::error::Result;
use crate::types::EntitiesQuery;

/// Entities API client.
pub struct EntitiesApi {
    client: TrellisClient,
}

impl EntitiesApi {
    pub(crate) fn new(client: TrellisClient) -> Self {
        Self { client }
    }

    /// List every entity (data table) in the configured project.
    pub async fn list(&self) -> Result<Value> {
        let scope = self.client.scope();
        tracing::info!(project_id = %scope.project_id, "fetching entities");
        let query = EntitiesQuery {
            project_id: &scope.project_id,
        };
        self.client.get_with_query(&["entities"], &query).await
    }

    /// List the fields (columns) of one entity.
    pub async fn fields(&self, entity_id: &str) -> Result<Value> {
        tracing::info!(entity_id, "fetching entity fields");
        self.client.get(&["entities", entity_id, "fields"]).await
    }
}
