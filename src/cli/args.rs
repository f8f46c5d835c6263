//! CLI argument definitions using clap
//!
//! Commands:
//! - litedoc put [--id <id>] < doc.json
//! - litedoc get <id>
//! - litedoc delete <id>
//! - litedoc import <file>
//! - litedoc count
//!
//! Every command accepts `--config`, `--dir` and `--name`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// litedoc - An embedded JSON document store
#[derive(Parser, Debug)]
#[command(name = "litedoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding databases (overrides the config file)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Database name
    #[arg(long, global = true, default_value = "default")]
    pub name: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Save the JSON object read from stdin
    Put {
        /// Document id (a new one is generated if omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Print a document as JSON
    Get {
        /// Document id
        id: String,
    },

    /// Delete a document
    Delete {
        /// Document id
        id: String,
    },

    /// Import one document per line of a JSON-lines file
    Import {
        /// Path to the JSON-lines file
        file: PathBuf,
    },

    /// Print the number of live documents
    Count,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
