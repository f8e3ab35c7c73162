//! Error types for the MCP server loop.

use thiserror::Error;

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that stop the server loop.
///
/// Per-request failures (bad JSON, unknown methods, failing tools) are
/// answered on the wire and never surface here.
#[derive(Debug, Error)]
pub enum McpError {
    /// The byte stream could not be split into messages.
    #[error("framing error: {0}")]
    Framing(String),

    /// JSON serialization error while writing a response.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error on the underlying stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    /// Create a framing error.
    pub fn framing(msg: impl Into<String>) -> Self {
        Self::Framing(msg.into())
    }
}
