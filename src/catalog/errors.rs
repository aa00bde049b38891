//! Catalog error types

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while accepting a column list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two columns read the same path
    #[error("Duplicate column path: {0}")]
    DuplicateColumnPath(String),

    /// No columns were requested
    #[error("Column list is empty")]
    EmptyColumnList,
}
