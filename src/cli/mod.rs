//! CLI module
//!
//! Provides command-line interface for:
//! - scan: read one partition and print its rows
//! - plan: print the scroll request without contacting the store

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{plan, run, run_command, scan, scan_rows, ScanRequest};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_line, write_response};
