//! litedoc CLI entry point
//!
//! All logic is delegated to the CLI module. Errors have already been
//! reported on stdout as JSON; they are repeated on stderr and the process
//! exits non-zero.

use litedoc::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
