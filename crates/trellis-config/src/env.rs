//! Environment-sourced configuration.

use std::fmt;
use std::time::Duration;

use crate::{ConfigError, Result};

/// API credential.
pub const API_KEY_ENV: &str = "TRELLIS_API_KEY";
/// Workflow that block mutations are pinned to.
pub const WORKFLOW_ID_ENV: &str = "TRELLIS_WORKFLOW_ID";
/// Project used to scope transformation and entity listings.
pub const PROJECT_ID_ENV: &str = "TRELLIS_PROJECT_ID";
/// Optional override of the remote base URL.
pub const BASE_URL_ENV: &str = "TRELLIS_BASE_URL";
/// Optional per-request timeout in seconds.
pub const TIMEOUT_ENV: &str = "TRELLIS_TIMEOUT_SECS";

/// The fixed project/workflow pair every call is constrained to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Project whose transformations and entities are listed.
    pub project_id: String,
    /// The only workflow this process reads or modifies.
    pub workflow_id: String,
}

impl Scope {
    /// Create a scope from a project and workflow id.
    pub fn new(project_id: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            workflow_id: workflow_id.into(),
        }
    }
}

/// Immutable startup configuration.
#[derive(Clone)]
pub struct TrellisConfig {
    api_key: String,
    /// Project/workflow scope.
    pub scope: Scope,
    /// Base URL override; `None` means the client's built-in default.
    pub base_url: Option<String>,
    /// Per-request timeout override.
    pub timeout: Option<Duration>,
}

impl TrellisConfig {
    /// Build a config directly, bypassing the environment.
    pub fn new(api_key: impl Into<String>, scope: Scope) -> Self {
        Self {
            api_key: api_key.into(),
            scope,
            base_url: None,
            timeout: None,
        }
    }

    /// Set the base URL override.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout override.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Required values are checked in a fixed order (API key, workflow id,
    /// project id) and the first missing one is reported. Blank values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| -> Option<String> {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require =
            |var: &'static str| -> Result<String> { get(var).ok_or(ConfigError::MissingEnv { var }) };

        let api_key = require(API_KEY_ENV)?;
        let workflow_id = require(WORKFLOW_ID_ENV)?;
        let project_id = require(PROJECT_ID_ENV)?;

        let timeout = match get(TIMEOUT_ENV) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        let config = Self {
            api_key,
            scope: Scope::new(project_id, workflow_id),
            base_url: get(BASE_URL_ENV),
            timeout,
        };

        tracing::info!(
            project_id = %config.scope.project_id,
            workflow_id = %config.scope.workflow_id,
            base_url_override = config.base_url.is_some(),
            "loaded configuration"
        );

        Ok(config)
    }

    /// The API credential.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
        var: TIMEOUT_ENV,
        message: format!("'{}' is not a whole number of seconds", raw),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            var: TIMEOUT_ENV,
            message: "must be greater than 0".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

impl fmt::Debug for TrellisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrellisConfig")
            .field("api_key", &"<redacted>")
            .field("scope", &self.scope)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
