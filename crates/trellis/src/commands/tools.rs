//! Tools command - prints what `tools/list` would advertise.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the tools command.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Print only the tool names
    #[arg(long)]
    pub names: bool,
}

pub fn run(args: ToolsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client(ctx.span())?;
    let registry = trellis_tools::trellis_registry(&client);

    if args.names {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
    Ok(())
}
