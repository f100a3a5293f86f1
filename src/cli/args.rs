//! CLI argument definitions using clap
//!
//! Commands:
//! - arbordb serve [--config <path>] [--port <port>]
//! - arbordb check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// arbordb - an in-memory key-value server over AVL, red-black and B-trees
#[derive(Parser, Debug)]
#[command(name = "arbordb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the TCP server
    Serve {
        /// Path to configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a configuration file and print the effective settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
