//! CLI command implementations
//!
//! Both commands read the same scan request from stdin:
//!
//! ```json
//! {"partition": {"index": "users", "shard": 0},
//!  "columns": [{"name": "id", "path": "_id", "output_type": "varchar"}]}
//! ```

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::catalog::{ColumnDescriptor, ColumnSet, OutputType, PartitionDescriptor};
use crate::client::{HttpSearchClient, SearchClient};
use crate::config::ConnectionConfig;
use crate::cursor::{CursorError, CursorResult, RecordCursor, SearchRecordCursor};
use crate::observability::{Logger, MetricsRegistry, ObservationScope};
use crate::scan::RequestBuilder;

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::{read_request, write_line, write_response};

/// Scan request read from stdin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub partition: PartitionDescriptor,
    pub columns: Vec<ColumnDescriptor>,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

/// Dispatch one command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Scan { config, limit } => scan(&config, limit),
        Command::Plan { config } => plan(&config),
    }
}

/// Scan one partition over HTTP
pub fn scan(config_path: &Path, limit: Option<u64>) -> CliResult<()> {
    let config = ConnectionConfig::load(config_path)?;
    let request: ScanRequest = read_request()?;
    let client = HttpSearchClient::new(&config)?;
    let metrics = Arc::new(MetricsRegistry::new());

    let scope = ObservationScope::with_fields(
        "SCAN_COMMAND",
        &[("index", &request.partition.index)],
    );

    let mut stdout = io::stdout().lock();
    let rows = match scan_rows(request, &config, client, limit, &mut stdout, Arc::clone(&metrics)) {
        Ok(rows) => rows,
        Err(e) => {
            scope.fail(e.message());
            return Err(e);
        }
    };
    stdout.flush()?;
    drop(stdout);

    scope.complete_with_fields(&[("rows", &rows.to_string())]);
    write_response(json!({ "rows": rows, "metrics": metrics.to_json() }))
}

/// Print the request a scan would send
pub fn plan(config_path: &Path) -> CliResult<()> {
    let config = ConnectionConfig::load(config_path)?;
    let request: ScanRequest = read_request()?;
    let columns = ColumnSet::new(request.columns)?;

    let paged = RequestBuilder::build(&columns, &request.partition, &config);
    write_response(serde_json::to_value(&paged)?)
}

/// Drive a cursor to the end (or `limit`), writing one JSON object per row.
///
/// Returns the number of rows written.
pub fn scan_rows<C: SearchClient, W: Write>(
    request: ScanRequest,
    config: &ConnectionConfig,
    client: C,
    limit: Option<u64>,
    out: &mut W,
    metrics: Arc<MetricsRegistry>,
) -> CliResult<u64> {
    let columns = ColumnSet::new(request.columns)?;
    let mut cursor =
        SearchRecordCursor::with_metrics(columns, &request.partition, config, client, metrics);

    let mut rows = 0;
    while limit.map_or(true, |max| rows < max) && cursor.advance_position()? {
        let row = row_to_json(&cursor)?;
        write_line(out, &Value::Object(row))?;
        rows += 1;
    }

    cursor.close();
    Ok(rows)
}

/// Render the current row keyed by column name.
///
/// A value that does not coerce to its column type is written as `null`
/// and logged; the rest of the row is unaffected.
fn row_to_json<C: SearchClient>(cursor: &SearchRecordCursor<C>) -> CursorResult<Map<String, Value>> {
    let mut row = Map::new();

    for (field, column) in cursor.columns().iter().enumerate() {
        let value = if cursor.is_null(field)? {
            Value::Null
        } else {
            match read_typed(cursor, field, column.output_type) {
                Ok(value) => value,
                Err(CursorError::TypeCoercion { source, .. }) => {
                    Logger::warn(
                        "ROW_COERCION_FAILED",
                        &[
                            ("column", &column.name),
                            ("reason", &source.to_string()),
                            ("scan_id", cursor.scan_id()),
                        ],
                    );
                    Value::Null
                }
                Err(e) => return Err(e),
            }
        };
        row.insert(column.name.clone(), value);
    }

    Ok(row)
}

fn read_typed<C: SearchClient>(
    cursor: &SearchRecordCursor<C>,
    field: usize,
    output_type: OutputType,
) -> CursorResult<Value> {
    Ok(match output_type {
        OutputType::Boolean => Value::Bool(cursor.read_boolean(field)?),
        OutputType::Bigint => Value::from(cursor.read_integer(field)?),
        OutputType::Double => Value::from(cursor.read_float(field)?),
        OutputType::Varchar => Value::String(cursor.read_text(field)?),
        OutputType::Unsupported => cursor.read_value(field)?.to_json(),
    })
}
