//! CLI argument definitions using clap
//!
//! Commands:
//! - searchtable scan --config <path> [--limit <n>]
//! - searchtable plan --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// searchtable - read search-index documents as typed rows
#[derive(Parser, Debug)]
#[command(name = "searchtable")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan one partition and print its rows as JSON lines
    Scan {
        /// Path to connection configuration file
        #[arg(long, default_value = "./searchtable.json")]
        config: PathBuf,

        /// Stop after this many rows
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Print the scroll request a scan would send, without sending it
    Plan {
        /// Path to connection configuration file
        #[arg(long, default_value = "./searchtable.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
