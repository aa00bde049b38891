//! Partition descriptor produced by split planning

use serde::{Deserialize, Serialize};

/// The slice of an index one cursor reads.
///
/// Owned by split planning; a cursor only reads it to scope its request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescriptor {
    /// Index (or alias) to search
    pub index: String,
    /// Restrict the search to one shard
    #[serde(default)]
    pub shard: Option<u32>,
    /// Custom routing value
    #[serde(default)]
    pub routing: Option<String>,
}

impl PartitionDescriptor {
    /// A partition covering the whole index
    pub fn whole_index(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            shard: None,
            routing: None,
        }
    }

    /// A partition covering one shard of the index
    pub fn shard(index: impl Into<String>, shard: u32) -> Self {
        Self {
            shard: Some(shard),
            ..Self::whole_index(index)
        }
    }

    /// Shard preference string understood by the store
    pub fn preference(&self) -> Option<String> {
        self.shard.map(|shard| format!("_shards:{}", shard))
    }
}
