//! Compass - plate-to-plate transfer runner
//!
//! Loads a transfer protocol, validates it against the labware catalog and
//! dry-runs it on the simulated deck, printing every hardware command the
//! run would issue.
//!
//! Named for the five-point compass pattern used to mix the source well
//! before each aspirate.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod dry_run;

use crate::config::load_protocol;
use crate::dry_run::{dry_run, validate_plan};

#[derive(Parser, Debug)]
#[command(name = "compass-runner")]
#[command(about = "Run plate-to-plate transfer protocols with compass-pattern mixing", long_about = None)]
struct Cli {
    /// Protocol file (TOML); the embedded protocol is used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Dry-run the protocol on the simulated deck and print the command log
    Run,
    /// Validate the protocol without running it
    Validate,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let protocol = load_protocol(cli.config.as_deref())?;
    validate_plan(&protocol)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Validate => Ok(()),
        Commands::Run => {
            let run = dry_run(&protocol);
            for (i, command) in run.commands.iter().enumerate() {
                println!("{:>4}  {}", i + 1, command);
            }

            match run.outcome {
                Ok(summary) => {
                    println!(
                        "\n{} transfers, {} tips used, {} tips left",
                        summary.transfers, summary.tips_consumed, summary.tips_remaining
                    );
                    Ok(())
                }
                Err(e) => bail!("run aborted: {}", e),
            }
        }
    }
}
