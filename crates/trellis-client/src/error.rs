//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response: connection refused, DNS
    /// failure, timeout, or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("remote API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A success response whose body is not valid JSON.
    #[error("invalid JSON in response ({status}): {source}")]
    Decode {
        /// HTTP status code.
        status: u16,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// URL parsing failed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status associated with this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::Decode { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api { status: 401 | 403, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// Check if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(e) if e.is_timeout())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> Error {
        Error::Api {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_status_classification() {
        assert!(api(404).is_not_found());
        assert!(api(401).is_auth_error());
        assert!(api(403).is_auth_error());
        assert!(api(502).is_server_error());
        assert!(!api(400).is_server_error());
        assert_eq!(api(418).status(), Some(418));
    }

    #[test]
    fn test_config_error_has_no_status() {
        let err = Error::Config("api key is required".into());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("api key"));
    }

    #[test]
    fn test_api_error_display_includes_body() {
        let err = Error::Api {
            status: 500,
            body: r#"{"message":"boom"}"#.to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("boom"));
    }
}
