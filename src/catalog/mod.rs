//! Column and partition descriptors
//!
//! Both are produced outside this crate (column resolution and split
//! planning) and are read-only here. A `ColumnSet` is the validated,
//! ordered column list one cursor projects into.

mod column;
mod errors;
mod partition;

pub use column::{
    ColumnDescriptor, ColumnPath, ColumnSet, FieldCategory, OutputType, SyntheticField,
};
pub use errors::{CatalogError, CatalogResult};
pub use partition::PartitionDescriptor;
