//! Entity discovery tools.

use async_trait::async_trait;
use serde_json::{Value, json};
use trellis_client::TrellisClient;

use crate::error::Result;
use crate::params::EntityFieldsParams;
use crate::tool::{Tool, ToolContext, ToolResult};

const LIST_DESCRIPTION: &str = "Get all entities in the Trellis project.

Entities are data tables that store extracted information. Each entity has fields \
(columns) that define what data it holds. Entities can be related to each other in a \
hierarchical structure (parent-child relationships).

Use this tool to discover available entities before referencing them in workflow \
triggers or actions. Each entity includes its id (use this to reference it in \
workflows), name, entity_type (e.g. \"inbox\", \"custom\") and tags.";

const FIELDS_DESCRIPTION: &str = "Get fields (columns) for a specific entity.

Use this to understand what fields an entity has. This is essential when mapping \
transformation outputs to entity fields, and when working with child entities (look \
for fields of type row_relation). Each field includes its id, name and type \
(text, number, row_relation, ...).";

/// Lists the project's entities.
#[derive(Debug, Clone)]
pub struct GetEntitiesTool {
    client: TrellisClient,
}

impl GetEntitiesTool {
    pub fn new(client: TrellisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetEntitiesTool {
    fn name(&self) -> &str {
        "get_entities"
    }

    fn description(&self) -> &str {
        LIST_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, _ctx: &ToolContext) -> Result<ToolResult> {
        let entities = self.client.entities().list().await?;
        Ok(ToolResult::json(entities))
    }
}

/// Lists one entity's fields.
#[derive(Debug, Clone)]
pub struct EntityFieldsTool {
    client: TrellisClient,
}

impl EntityFieldsTool {
    pub fn new(client: TrellisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for EntityFieldsTool {
    fn name(&self) -> &str {
        "get_entity_fields"
    }

    fn description(&self) -> &str {
        FIELDS_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "entity_id": {
                    "type": "string",
                    "description": "The ID of the entity to get fields for"
                }
            },
            "required": ["entity_id"]
        })
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult> {
        let params = EntityFieldsParams::try_from(params)?;
        let fields = self.client.entities().fields(&params.entity_id).await?;
        Ok(ToolResult::json(fields))
    }
}
