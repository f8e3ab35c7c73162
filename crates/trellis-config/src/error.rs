//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading startup configuration.
///
/// Every variant is fatal: the server refuses to start rather than serve
/// tools with a partial scope.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("{var} environment variable is required")]
    MissingEnv { var: &'static str },

    /// An optional environment variable is set but unusable.
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },

    /// The log directory could not be created.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Name of the environment variable this error refers to, if any.
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Self::MissingEnv { var } | Self::InvalidValue { var, .. } => Some(var),
            Self::CreateDir { .. } => None,
        }
    }
}
