//! CLI command handlers.

pub mod check;
pub mod serve;
pub mod tools;

use anyhow::Result;
use trellis_client::{ClientBuilder, TrellisClient};
use trellis_config::TrellisConfig;

/// Shared context for all commands.
#[derive(Debug)]
pub struct Context {
    /// Startup configuration, loaded once.
    pub config: TrellisConfig,
}

impl Context {
    /// Span that every request and tool call is logged under.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "trellis",
            project_id = %self.config.scope.project_id,
            workflow_id = %self.config.scope.workflow_id,
        )
    }

    /// Build the API client, logging under `span`.
    pub fn client(&self, span: tracing::Span) -> Result<TrellisClient> {
        Ok(ClientBuilder::from_config(&self.config).span(span).build()?)
    }
}
