//! Argument validation for tool invocations.
//!
//! Every tool converts its raw JSON arguments into a typed parameter
//! struct through `TryFrom<Value>` before touching the network, so a bad
//! argument never produces a request.

use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Parameter Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Error type for tool argument validation failures.
///
/// Messages are phrased for the model on the other side of the host, so
/// they say what to send instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterValidationError {
    /// A required parameter is missing.
    #[error("missing required parameter '{name}': {hint}")]
    MissingRequired {
        /// The parameter name.
        name: &'static str,
        /// Hint on how to fix.
        hint: &'static str,
    },

    /// A parameter has the wrong JSON type.
    #[error("invalid type for '{name}': expected {expected}, got {actual}")]
    InvalidType {
        /// The parameter name.
        name: &'static str,
        /// The expected type.
        expected: &'static str,
        /// The actual type found.
        actual: String,
    },

    /// A parameter has the right type but an unusable value.
    #[error("'{name}' has invalid value '{value}': {message}")]
    InvalidValue {
        /// The parameter name.
        name: &'static str,
        /// The invalid value.
        value: String,
        /// Why it's invalid.
        message: String,
    },
}

impl ParameterValidationError {
    /// Create a missing required parameter error.
    pub fn missing(name: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { name, hint }
    }

    /// Create an invalid type error.
    pub fn invalid_type(
        name: &'static str,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            name,
            expected,
            actual: actual.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(
        name: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name,
            value: value.into(),
            message: message.into(),
        }
    }

    /// The parameter this error is about.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { name, .. } => Some(name),
            Self::InvalidType { name, .. } => Some(name),
            Self::InvalidValue { name, .. } => Some(name),
        }
    }
}

/// Result type for parameter validation.
pub type ParamResult<T> = std::result::Result<T, ParameterValidationError>;

/// JSON type name used in validation messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Typed accessors over raw JSON arguments.
///
/// An explicit `null` counts as absent.
pub trait ParamExt {
    /// Get a required string parameter.
    fn required_str(&self, name: &'static str, hint: &'static str) -> ParamResult<&str>;

    /// Get a required string parameter that must contain non-whitespace text.
    /// Returns the trimmed value.
    fn required_id(&self, name: &'static str, hint: &'static str) -> ParamResult<&str>;

    /// Get an optional string parameter.
    fn optional_str(&self, name: &str) -> Option<&str>;

    /// Get a required array parameter.
    fn required_array(&self, name: &'static str, hint: &'static str) -> ParamResult<&Vec<Value>>;

    /// Get an optional array parameter. Present values of another type are an error.
    fn optional_array(&self, name: &'static str) -> ParamResult<Option<&Vec<Value>>>;
}

impl ParamExt for Value {
    fn required_str(&self, name: &'static str, hint: &'static str) -> ParamResult<&str> {
        match self.get(name) {
            None | Some(Value::Null) => Err(ParameterValidationError::missing(name, hint)),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(ParameterValidationError::invalid_type(
                name,
                "string",
                json_type_name(other),
            )),
        }
    }

    fn required_id(&self, name: &'static str, hint: &'static str) -> ParamResult<&str> {
        let value = self.required_str(name, hint)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ParameterValidationError::invalid_value(
                name,
                value,
                format!("{} cannot be empty", name),
            ));
        }
        Ok(trimmed)
    }

    fn optional_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    fn required_array(&self, name: &'static str, hint: &'static str) -> ParamResult<&Vec<Value>> {
        match self.get(name) {
            None | Some(Value::Null) => Err(ParameterValidationError::missing(name, hint)),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(ParameterValidationError::invalid_type(
                name,
                "array",
                json_type_name(other),
            )),
        }
    }

    fn optional_array(&self, name: &'static str) -> ParamResult<Option<&Vec<Value>>> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(ParameterValidationError::invalid_type(
                name,
                "array",
                json_type_name(other),
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Validated parameters for `get_transformation_details`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformDetailsParams {
    /// Transformation to describe.
    pub transform_id: String,
}

impl TryFrom<Value> for TransformDetailsParams {
    type Error = ParameterValidationError;

    fn try_from(params: Value) -> std::result::Result<Self, Self::Error> {
        let transform_id = params.required_id(
            "transform_id",
            "provide the id of a transformation from get_transformations",
        )?;
        Ok(Self {
            transform_id: transform_id.to_string(),
        })
    }
}

/// Validated parameters for `get_entity_fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFieldsParams {
    /// Entity whose fields to list.
    pub entity_id: String,
}

impl TryFrom<Value> for EntityFieldsParams {
    type Error = ParameterValidationError;

    fn try_from(params: Value) -> std::result::Result<Self, Self::Error> {
        let entity_id =
            params.required_id("entity_id", "provide the id of an entity from get_entities")?;
        Ok(Self {
            entity_id: entity_id.to_string(),
        })
    }
}

/// Validated parameters for `update_workflow_blocks`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBlocksParams {
    /// Block documents to create or update, passed through unchanged.
    pub blocks: Vec<Value>,
    /// Ids of blocks to delete.
    pub deleted_block_ids: Vec<String>,
    /// Workflow id the caller asked for. Never used for routing.
    pub requested_workflow_id: Option<String>,
}

impl TryFrom<Value> for UpdateBlocksParams {
    type Error = ParameterValidationError;

    fn try_from(params: Value) -> std::result::Result<Self, Self::Error> {
        let blocks = params.required_array(
            "blocks",
            "provide an array of block objects (may be empty when deleting)",
        )?;
        if let Some((index, block)) = blocks.iter().enumerate().find(|(_, b)| !b.is_object()) {
            return Err(ParameterValidationError::invalid_value(
                "blocks",
                format!("blocks[{}]", index),
                format!("each block must be an object, got {}", json_type_name(block)),
            ));
        }

        let mut deleted_block_ids = Vec::new();
        if let Some(ids) = params.optional_array("deleted_block_ids")? {
            for (index, id) in ids.iter().enumerate() {
                match id.as_str().map(str::trim) {
                    Some(id) if !id.is_empty() => deleted_block_ids.push(id.to_string()),
                    _ => {
                        return Err(ParameterValidationError::invalid_value(
                            "deleted_block_ids",
                            format!("deleted_block_ids[{}]", index),
                            "each id must be a non-empty string",
                        ));
                    }
                }
            }
        }

        if blocks.is_empty() && deleted_block_ids.is_empty() {
            return Err(ParameterValidationError::invalid_value(
                "blocks",
                "[]",
                "nothing to change: provide blocks to write or ids in deleted_block_ids",
            ));
        }

        Ok(Self {
            blocks: blocks.clone(),
            deleted_block_ids,
            requested_workflow_id: params.optional_str("workflow_id").map(String::from),
        })
    }
}
