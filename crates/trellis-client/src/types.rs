//! Request types.
//!
//! Response documents (transformations, entities, workflow configs) are
//! owned by the remote service and passed through as JSON values; only
//! the shapes this crate sends are typed.

use serde::Serialize;
use serde_json::Value;

/// Query parameters for listing transformations.
#[derive(Debug, Clone, Serialize)]
pub struct TransformsQuery<'a> {
    /// Projects to list transformations for.
    pub proj_ids: &'a str,
    /// Include each transformation's parameters in the listing.
    pub include_transform_params: bool,
}

/// Query parameters for listing entities.
#[derive(Debug, Clone, Serialize)]
pub struct EntitiesQuery<'a> {
    /// Project to list entities for.
    pub project_id: &'a str,
}

/// A batch of block creations, updates, and deletions for one workflow.
///
/// Blocks whose `id` is new to the workflow are created, blocks with an
/// existing id are updated. The block documents are not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockChanges {
    /// Blocks to create or update.
    pub blocks: Vec<Value>,
    /// Ids of blocks to delete.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted_block_ids: Vec<String>,
}

impl BlockChanges {
    /// Create a change set that creates or updates `blocks`.
    pub fn upsert(blocks: Vec<Value>) -> Self {
        Self {
            blocks,
            deleted_block_ids: Vec::new(),
        }
    }

    /// Also delete the given block ids.
    pub fn with_deletions(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.deleted_block_ids
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// True when the change set neither writes nor deletes anything.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.deleted_block_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_changes_omits_empty_deletions() {
        let changes = BlockChanges::upsert(vec![json!({"name": "Trigger"})]);
        let body = serde_json::to_value(&changes).unwrap();
        assert_eq!(body, json!({"blocks": [{"name": "Trigger"}]}));
    }

    #[test]
    fn test_block_changes_with_deletions() {
        let changes = BlockChanges::upsert(vec![]).with_deletions(["wblock_1", "wblock_2"]);
        assert!(!changes.is_empty());
        let body = serde_json::to_value(&changes).unwrap();
        assert_eq!(
            body,
            json!({"blocks": [], "deleted_block_ids": ["wblock_1", "wblock_2"]})
        );
    }

    #[test]
    fn test_block_changes_empty() {
        assert!(BlockChanges::default().is_empty());
    }
}
