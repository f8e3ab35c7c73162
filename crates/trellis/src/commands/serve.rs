//! Serve command - runs the MCP server on stdin/stdout.

use anyhow::Result;
use clap::Args;
use trellis_mcp::McpServer;

use super::Context;

/// Arguments for the serve command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Run the server until the host closes stdin.
pub async fn run(_args: ServeArgs, ctx: &Context) -> Result<()> {
    let span = ctx.span();
    let client = ctx.client(span.clone())?;
    let registry = trellis_tools::trellis_registry(&client).with_span(span);

    tracing::info!(
        base_url = %client.base_url(),
        project_id = %client.scope().project_id,
        workflow_id = %client.scope().workflow_id,
        tools = registry.len(),
        "serving MCP on stdio"
    );

    McpServer::new(registry)
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await?;
    Ok(())
}
