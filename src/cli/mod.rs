//! CLI module for litedoc
//!
//! Provides command-line access to a database:
//! - put: Save a JSON object from stdin as a document
//! - get: Print a document
//! - delete: Delete a document
//! - import: Import a JSON-lines file
//! - count: Print the number of live documents

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{count, delete, execute, get, import, load_config, put, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
