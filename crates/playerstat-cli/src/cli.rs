//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Library directory holding status.json (overrides configuration)
    #[arg(short, long, global = true)]
    pub library: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Write the status file and notify status periodically until interrupted
    Run {
        /// Seconds between status cycles (overrides configuration)
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Run a single status cycle and exit
    Once,
    /// Print the status file and notification payload for the current state
    Show,
    /// Print an example configuration file
    ExampleConfig,
}
