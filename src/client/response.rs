//! Search responses and hits

use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};

/// One matching document as returned by the store
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawHit {
    /// Document identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Index the document lives in
    #[serde(rename = "_index")]
    pub index: String,
    /// Projected fields; each value is a list even for single-valued fields
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Full document body, absent when `_source` was disabled
    #[serde(rename = "_source", default)]
    pub source: Option<Map<String, Value>>,
}

impl RawHit {
    /// Hit carrying a full document body
    pub fn from_source(index: impl Into<String>, id: impl Into<String>, source: Value) -> Self {
        Self {
            id: id.into(),
            index: index.into(),
            fields: Map::new(),
            source: Some(into_object(source)),
        }
    }

    /// Hit carrying projected fields
    pub fn from_fields(index: impl Into<String>, id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            index: index.into(),
            fields: into_object(fields),
            source: None,
        }
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// One page of a scroll
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    /// Token for the next page
    pub scroll_id: Option<String>,
    /// Hits in store order
    pub hits: Vec<RawHit>,
}

impl SearchPage {
    pub fn new(scroll_id: impl Into<String>, hits: Vec<RawHit>) -> Self {
        Self {
            scroll_id: Some(scroll_id.into()),
            hits,
        }
    }

    /// The terminating page
    pub fn empty(scroll_id: impl Into<String>) -> Self {
        Self::new(scroll_id, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Decode a `_search` or `_search/scroll` response body
    pub fn from_json(body: &str) -> StoreResult<Self> {
        let wire: SearchResponse =
            serde_json::from_str(body).map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        Ok(Self {
            scroll_id: wire.scroll_id,
            hits: wire.hits.hits,
        })
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(rename = "_scroll_id", default)]
    scroll_id: Option<String>,
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}
