//! Paged search request

use serde::Serialize;
use serde_json::Value;

/// How hit values are retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Server-side field projection; values arrive in the hit's `fields` map
    Fields,
    /// Full documents; values arrive in the hit's `_source` body
    Source,
}

impl ProjectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectionMode::Fields => "fields",
            ProjectionMode::Source => "source",
        }
    }
}

/// An initial scroll search, ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedRequest {
    /// Target index
    pub index: String,
    /// Routing value, sent as a query parameter
    pub routing: Option<String>,
    /// Shard preference, sent as a query parameter
    pub preference: Option<String>,
    /// Scroll keep-alive for this and every continuation request
    pub keep_alive: String,
    /// Where hit values will be found
    pub mode: ProjectionMode,
    /// JSON search body
    pub body: Value,
}

impl PagedRequest {
    /// Page size requested in the body
    pub fn page_size(&self) -> Option<u64> {
        self.body.get("size").and_then(Value::as_u64)
    }

    /// Projected field names, empty in source mode
    pub fn projected_fields(&self) -> Vec<&str> {
        self.body
            .get("fields")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}
