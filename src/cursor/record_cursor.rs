//! Record cursor over one partition
//!
//! States: `NotStarted -> Active -> Exhausted`, with `Closed` reachable
//! from any state. Once `advance_position` returns false it keeps
//! returning false.
//!
//! Byte statistics count columns, not bytes: every advanced row adds the
//! column count to the running total. Downstream consumers rely on that
//! scale, so it is kept.

use std::sync::Arc;

use crate::catalog::{ColumnSet, OutputType, PartitionDescriptor};
use crate::client::{ProjectionMode, SearchClient};
use crate::config::ConnectionConfig;
use crate::observability::MetricsRegistry;
use crate::scan::{FieldValue, PageIterator, RequestBuilder, Row, RowProjector};

use super::errors::{CursorError, CursorResult};

/// Pull-based row iteration exposed to the query engine
pub trait RecordCursor {
    /// Approximate bytes read so far (see module docs)
    fn completed_bytes(&self) -> u64;

    /// Same value as [`RecordCursor::completed_bytes`]
    fn total_bytes(&self) -> u64;

    /// Read time is not measured; always zero
    fn read_time_nanos(&self) -> u64;

    /// Declared output type of a column
    fn column_type(&self, field: usize) -> CursorResult<OutputType>;

    /// Move to the next row; false once the partition is drained
    fn advance_position(&mut self) -> CursorResult<bool>;

    fn read_boolean(&self, field: usize) -> CursorResult<bool>;

    fn read_integer(&self, field: usize) -> CursorResult<i64>;

    fn read_float(&self, field: usize) -> CursorResult<f64>;

    /// Text of a varchar column; collections render as a JSON array
    fn read_text(&self, field: usize) -> CursorResult<String>;

    /// Raw stored value, for columns without a typed accessor
    fn read_value(&self, field: usize) -> CursorResult<&FieldValue>;

    fn is_null(&self, field: usize) -> CursorResult<bool>;

    /// Release paging resources; safe to call more than once
    fn close(&mut self);
}

/// Cursor lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    NotStarted,
    Active,
    Exhausted,
    Closed,
}

/// Record cursor reading one partition through a scroll
pub struct SearchRecordCursor<C: SearchClient> {
    projector: RowProjector,
    pages: PageIterator<C>,
    state: CursorState,
    row: Option<Row>,
    completed_bytes: u64,
    metrics: Arc<MetricsRegistry>,
}

impl<C: SearchClient> SearchRecordCursor<C> {
    /// Create a cursor; no request is sent until the first advance
    pub fn new(
        columns: ColumnSet,
        partition: &PartitionDescriptor,
        config: &ConnectionConfig,
        client: C,
    ) -> Self {
        Self::with_metrics(
            columns,
            partition,
            config,
            client,
            Arc::new(MetricsRegistry::new()),
        )
    }

    /// Create a cursor reporting into a shared registry
    pub fn with_metrics(
        columns: ColumnSet,
        partition: &PartitionDescriptor,
        config: &ConnectionConfig,
        client: C,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        let request = RequestBuilder::build(&columns, partition, config);
        let projector = RowProjector::new(columns, request.mode);
        let pages = PageIterator::new(client, request).with_metrics(Arc::clone(&metrics));

        Self {
            projector,
            pages,
            state: CursorState::NotStarted,
            row: None,
            completed_bytes: 0,
            metrics,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn columns(&self) -> &ColumnSet {
        self.projector.columns()
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.projector.mode()
    }

    /// Identifier carried on this cursor's log lines
    pub fn scan_id(&self) -> &str {
        self.pages.scan_id()
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    fn check_index(&self, field: usize) -> CursorResult<()> {
        let width = self.columns().len();
        if field >= width {
            return Err(CursorError::InvalidColumnIndex {
                index: field,
                width,
            });
        }
        Ok(())
    }

    fn value(&self, field: usize) -> CursorResult<&FieldValue> {
        self.check_index(field)?;

        if self.state == CursorState::Closed {
            return Err(CursorError::CursorClosed);
        }

        self.row
            .as_ref()
            .and_then(|row| row.get(field))
            .ok_or(CursorError::CursorNotAdvanced)
    }

    fn check_type(&self, field: usize, expected: OutputType) -> CursorResult<()> {
        let actual = self.column_type(field)?;
        if actual != expected {
            return Err(CursorError::TypeMismatch {
                index: field,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl<C: SearchClient> RecordCursor for SearchRecordCursor<C> {
    fn completed_bytes(&self) -> u64 {
        self.completed_bytes
    }

    fn total_bytes(&self) -> u64 {
        self.completed_bytes
    }

    fn read_time_nanos(&self) -> u64 {
        0
    }

    fn column_type(&self, field: usize) -> CursorResult<OutputType> {
        self.check_index(field)?;
        self.columns()
            .get(field)
            .map(|column| column.output_type)
            .ok_or(CursorError::InvalidColumnIndex {
                index: field,
                width: self.columns().len(),
            })
    }

    fn advance_position(&mut self) -> CursorResult<bool> {
        if matches!(self.state, CursorState::Exhausted | CursorState::Closed) {
            return Ok(false);
        }

        match self.pages.next() {
            None => {
                self.state = CursorState::Exhausted;
                Ok(false)
            }
            Some(Err(e)) => {
                self.state = CursorState::Exhausted;
                Err(e.into())
            }
            Some(Ok(hit)) => {
                let row = self.projector.project(hit);
                self.completed_bytes += row.len() as u64;
                self.metrics.increment_rows_projected();
                self.row = Some(row);
                self.state = CursorState::Active;
                Ok(true)
            }
        }
    }

    fn read_boolean(&self, field: usize) -> CursorResult<bool> {
        self.value(field)?
            .to_boolean()
            .map_err(|source| CursorError::TypeCoercion { index: field, source })
    }

    fn read_integer(&self, field: usize) -> CursorResult<i64> {
        self.value(field)?
            .to_integer()
            .map_err(|source| CursorError::TypeCoercion { index: field, source })
    }

    fn read_float(&self, field: usize) -> CursorResult<f64> {
        self.value(field)?
            .to_float()
            .map_err(|source| CursorError::TypeCoercion { index: field, source })
    }

    fn read_text(&self, field: usize) -> CursorResult<String> {
        self.check_type(field, OutputType::Varchar)?;
        self.value(field)?
            .to_text()
            .map_err(|source| CursorError::TypeCoercion { index: field, source })
    }

    fn read_value(&self, field: usize) -> CursorResult<&FieldValue> {
        self.value(field)
    }

    fn is_null(&self, field: usize) -> CursorResult<bool> {
        Ok(self.value(field)?.is_absent())
    }

    fn close(&mut self) {
        if self.state == CursorState::Closed {
            return;
        }
        self.pages.release();
        self.row = None;
        self.state = CursorState::Closed;
    }
}

impl<C: SearchClient> Drop for SearchRecordCursor<C> {
    fn drop(&mut self) {
        self.close();
    }
}
