//! Paged request construction
//!
//! Field projection is a list-wide decision: one nested column sends the
//! whole scan to full-document retrieval, because the store's field
//! projection cannot extract nested objects.

use serde_json::{json, Value};

use crate::catalog::{ColumnSet, PartitionDescriptor};
use crate::client::{PagedRequest, ProjectionMode};
use crate::config::ConnectionConfig;

/// Builds the initial scroll request for one partition
pub struct RequestBuilder;

impl RequestBuilder {
    /// Projection mode for a column list
    pub fn projection_mode(columns: &ColumnSet) -> ProjectionMode {
        if columns.has_nested() {
            ProjectionMode::Source
        } else {
            ProjectionMode::Fields
        }
    }

    /// Build the scroll request.
    ///
    /// In fields mode exactly the document paths are projected; `_id` and
    /// `_index` come from hit metadata in both modes.
    pub fn build(
        columns: &ColumnSet,
        partition: &PartitionDescriptor,
        config: &ConnectionConfig,
    ) -> PagedRequest {
        let mode = Self::projection_mode(columns);

        let mut body = json!({
            "size": config.page_size,
            "query": { "match_all": {} },
            "sort": ["_doc"],
        });

        match mode {
            ProjectionMode::Fields => {
                body["_source"] = Value::Bool(false);
                body["fields"] = json!(columns.document_paths());
            }
            ProjectionMode::Source => {
                body["_source"] = Value::Bool(true);
            }
        }

        PagedRequest {
            index: partition.index.clone(),
            routing: partition.routing.clone(),
            preference: partition.preference(),
            keep_alive: config.scroll_keep_alive.clone(),
            mode,
            body,
        }
    }
}
