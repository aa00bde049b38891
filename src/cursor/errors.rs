//! Record cursor error types
//!
//! Codes:
//! - CURSOR_INVALID_COLUMN_INDEX
//! - CURSOR_NOT_ADVANCED
//! - CURSOR_CLOSED
//! - CURSOR_TYPE_MISMATCH
//! - CURSOR_TYPE_COERCION
//! - CURSOR_STORE_PROTOCOL (fatal to the scan)

use thiserror::Error;

use crate::catalog::OutputType;
use crate::client::StoreError;
use crate::scan::CoercionError;

/// Result type for cursor operations
pub type CursorResult<T> = Result<T, CursorError>;

/// Errors surfaced synchronously by a record cursor
#[derive(Debug, Error)]
pub enum CursorError {
    /// Column position outside `0..width`
    #[error("Invalid column index {index} (cursor has {width} columns)")]
    InvalidColumnIndex { index: usize, width: usize },

    /// Value read before the first successful advance
    #[error("Cursor has not been advanced yet")]
    CursorNotAdvanced,

    /// Value read after close
    #[error("Cursor is closed")]
    CursorClosed,

    /// Typed read that does not match the column's declared type
    #[error("Expected column {index} to be type {expected} but is {actual}")]
    TypeMismatch {
        index: usize,
        expected: OutputType,
        actual: OutputType,
    },

    /// Stored value does not convert; only this read fails
    #[error("Cannot read column {index}: {source}")]
    TypeCoercion {
        index: usize,
        #[source]
        source: CoercionError,
    },

    /// Paging failed; the scan is over
    #[error("Store protocol error: {0}")]
    StoreProtocol(#[from] StoreError),
}

impl CursorError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CursorError::InvalidColumnIndex { .. } => "CURSOR_INVALID_COLUMN_INDEX",
            CursorError::CursorNotAdvanced => "CURSOR_NOT_ADVANCED",
            CursorError::CursorClosed => "CURSOR_CLOSED",
            CursorError::TypeMismatch { .. } => "CURSOR_TYPE_MISMATCH",
            CursorError::TypeCoercion { .. } => "CURSOR_TYPE_COERCION",
            CursorError::StoreProtocol(_) => "CURSOR_STORE_PROTOCOL",
        }
    }

    /// Whether the whole scan is aborted, rather than a single read
    pub fn is_fatal(&self) -> bool {
        matches!(self, CursorError::StoreProtocol(_))
    }
}
