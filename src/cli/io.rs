//! JSON I/O for the CLI
//!
//! - Input: one JSON scan request on stdin
//! - Output: one JSON object per line on stdout
//! - Logs and the error envelope go to stderr

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON document from stdin
pub fn read_request<T: DeserializeOwned>() -> CliResult<T> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::invalid_request("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Write one JSON value as a line
pub fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a success envelope to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    write_line(&mut stdout, &serde_json::json!({ "status": "ok", "data": data }))?;
    stdout.flush()?;
    Ok(())
}

/// Write an error envelope to stderr.
///
/// Rows may already be on stdout, so errors never join that stream.
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let mut stderr = io::stderr().lock();
    write_error_to(&mut stderr, code, message)?;
    stderr.flush()?;
    Ok(())
}

fn write_error_to<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    write_line(
        writer,
        &serde_json::json!({ "status": "error", "code": code, "message": message }),
    )
}
