//! Error types for tool execution.

use serde_json::{Value, json};
use thiserror::Error;

use crate::params::ParameterValidationError;

/// Result type alias using the tool error type.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type for a single tool invocation.
///
/// None of these are retried; each is reported back to the host for the
/// invocation that produced it.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Caller-supplied arguments were missing or malformed. No request was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ParameterValidationError),

    /// The request could not be completed (connection, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote service rejected the request.
    #[error("remote API error ({status}): {body}")]
    RemoteApi {
        /// HTTP status code.
        status: u16,
        /// Response body as received.
        body: String,
    },

    /// The remote service accepted the request but its response body was
    /// not valid JSON.
    #[error("malformed response from remote API ({status}): {detail}")]
    MalformedResponse {
        /// HTTP status code, a success status.
        status: u16,
        /// Decoder error.
        detail: String,
    },

    /// No tool with this name is registered.
    #[error("tool not found: {0}")]
    NotFound(String),
}

impl From<trellis_client::Error> for ToolError {
    fn from(err: trellis_client::Error) -> Self {
        use trellis_client::Error as ClientError;
        match err {
            ClientError::Api { status, body } => ToolError::RemoteApi { status, body },
            ClientError::Decode { status, source } => ToolError::MalformedResponse {
                status,
                detail: source.to_string(),
            },
            ClientError::Transport(e) => ToolError::Transport(e.to_string()),
            // Construction-time errors; the request was never sent.
            other @ (ClientError::InvalidUrl(_) | ClientError::Config(_)) => {
                ToolError::Transport(other.to_string())
            }
        }
    }
}

impl ToolError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Transport(_) => "transport_error",
            Self::RemoteApi { .. } | Self::MalformedResponse { .. } => "remote_api_error",
            Self::NotFound(_) => "tool_not_found",
        }
    }

    /// HTTP status from the remote service, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } | Self::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured description handed back to the host.
    ///
    /// The remote body is embedded as JSON when it parses, otherwise as a
    /// string.
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match self {
            Self::RemoteApi { status, body } => {
                payload["status"] = json!(status);
                payload["body"] =
                    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.clone()));
            }
            Self::MalformedResponse { status, .. } => {
                payload["status"] = json!(status);
            }
            Self::Validation(e) => {
                if let Some(name) = e.parameter_name() {
                    payload["parameter"] = json!(name);
                }
            }
            _ => {}
        }
        payload
    }
}
