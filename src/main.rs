//! searchtable CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, reports failures as a
//! JSON error envelope on stderr, and exits non-zero on failure.

use searchtable::cli;

fn main() {
    if let Err(e) = cli::run() {
        if cli::write_error(e.code().code(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
