//! Weft — Microsoft Fabric CI/CD companion CLI.
//!
//! # Usage
//!
//! ```text
//! weft provision
//! weft vars --prefix <PREFIX> --environment <ENV> --file <PATH> [--repo owner/name] [--dry-run]
//! ```
//!
//! `provision` is configured entirely through the environment (it runs
//! inside a pipeline step); `vars` takes flags with environment fallbacks.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{provision::ProvisionArgs, vars::VarsArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "weft",
    version,
    about = "Provision Fabric workspaces and sync variable libraries from CI",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ensure the branch workspace exists and is connected to Git.
    Provision(ProvisionArgs),

    /// Mirror GitHub repository variables into a variable-library file.
    Vars(VarsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Provision(args) => args.run(),
        Commands::Vars(args) => args.run(),
    }
}
