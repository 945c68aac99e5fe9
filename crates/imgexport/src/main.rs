//! imgexport CLI - save images from an image directory as PNG, JPEG, WebP,
//! AVIF or TIFF.
//!
//! The CLI plays the part of a minimal pipeline host: it owns the image
//! directory and the outputs root, hands invocation records to the save
//! nodes and prints the path of every written file.
//!
//! # Usage
//!
//! ```bash
//! # Export one image
//! imgexport save jpeg --image render.png --quality 90 --subsampling 4:4:4
//!
//! # Execute invocation records (JSON or JSONL)
//! imgexport run records.jsonl --format jsonl
//!
//! # List node declarations
//! imgexport nodes
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// imgexport - save images as PNG, JPEG, WebP, AVIF or TIFF.
#[derive(Parser, Debug)]
#[command(name = "imgexport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "IMGEXPORT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Save one image in a given format
    Save(cli::save::SaveArgs),

    /// Execute invocation records read from a file or stdin
    Run(cli::run::RunArgs),

    /// Print the declarations of all save nodes
    Nodes(cli::nodes::NodesArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match cli::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. Check your config file with `imgexport config path`."
            );
            imgexport_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("imgexport v{}", imgexport_core::VERSION);

    match cli.command {
        Commands::Save(args) => cli::save::execute(args, config_path).await,
        Commands::Run(args) => cli::run::execute(args, config_path).await,
        Commands::Nodes(args) => cli::nodes::execute(args),
        Commands::Config(args) => cli::config::execute(args, config_path),
    }
}
