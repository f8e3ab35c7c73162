//! Check command - validates configuration without contacting Trellis.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::Context;

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    base_url: &'a str,
    project_id: &'a str,
    workflow_id: &'a str,
    api_key: &'static str,
    timeout_secs: u64,
}

/// Print the resolved configuration. The API key is never shown.
pub fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client(ctx.span())?;
    let base_url = client.base_url().as_str();
    let scope = client.scope();
    let timeout_secs = client.timeout().as_secs();

    if args.json {
        let output = CheckOutput {
            base_url,
            project_id: &scope.project_id,
            workflow_id: &scope.workflow_id,
            api_key: "<redacted>",
            timeout_secs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("configuration ok");
        println!("  base url:    {}", base_url);
        println!("  project:     {}", scope.project_id);
        println!("  workflow:    {}", scope.workflow_id);
        println!("  api key:     <redacted>");
        println!("  timeout:     {}s", timeout_secs);
    }
    Ok(())
}
