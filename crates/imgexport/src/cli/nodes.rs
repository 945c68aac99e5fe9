//! The `imgexport nodes` command: print node declarations.

use clap::Args;

/// Arguments for the `nodes` command.
#[derive(Args, Debug)]
pub struct NodesArgs {
    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the nodes command.
pub fn execute(args: NodesArgs) -> anyhow::Result<()> {
    let specs = imgexport_core::registry();
    let json = if args.pretty {
        serde_json::to_string_pretty(&specs)?
    } else {
        serde_json::to_string(&specs)?
    };
    println!("{json}");
    Ok(())
}
