//! Transformation discovery tools.

use async_trait::async_trait;
use serde_json::{Value, json};
use trellis_client::TrellisClient;

use crate::error::Result;
use crate::params::TransformDetailsParams;
use crate::tool::{Tool, ToolContext, ToolResult};

const LIST_DESCRIPTION: &str = "Get all transformations in the Trellis project.

Transformations are extraction schemas that define how to extract data from documents. \
Each transformation has operations that specify what data to extract and how.

Use this tool to discover available transformations before referencing them in workflow \
actions. Each transformation includes its id (use this to reference it in workflows), \
name, description, and its params.";

const DETAILS_DESCRIPTION: &str = "Get detailed operations/schema for a specific transformation.

Use this to understand what a transformation extracts and how it is configured, for \
example to learn which outputs it will produce before mapping them to entity fields.";

/// Lists the project's transformations.
#[derive(Debug, Clone)]
pub struct GetTransformationsTool {
    client: TrellisClient,
}

impl GetTransformationsTool {
    pub fn new(client: TrellisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetTransformationsTool {
    fn name(&self) -> &str {
        "get_transformations"
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
        let listing = self.client.transforms().list().await?;
        Ok(ToolResult::json(listing))
    }
}

/// Describes one transformation's operations.
#[derive(Debug, Clone)]
pub struct TransformationDetailsTool {
    client: TrellisClient,
}

impl TransformationDetailsTool {
    pub fn new(client: TrellisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for TransformationDetailsTool {
    fn name(&self) -> &str {
        "get_transformation_details"
    }

    fn description(&self) -> &str {
        DETAILS_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "transform_id": {
                    "type": "string",
                    "description": "The ID of the transformation to get details for"
                }
            },
            "required": ["transform_id"]
        })
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult> {
        let params = TransformDetailsParams::try_from(params)?;
        let operations = self
            .client
            .transforms()
            .operations(&params.transform_id)
            .await?;
        Ok(ToolResult::json(operations))
    }
}
