//! Result materialization
//!
//! # Flow
//!
//! 1. [`RequestBuilder`] picks the projection mode and builds the scroll request
//! 2. [`PageIterator`] pulls pages until the first empty one
//! 3. [`RowProjector`] turns each hit into a [`Row`] aligned with the columns
//! 4. [`FieldValue`] coerces a stored value when the caller reads it

mod builder;
mod pages;
mod projector;
mod value;

pub use builder::RequestBuilder;
pub use pages::{drain, PageIterator};
pub use projector::{Row, RowProjector};
pub use value::{CoercionError, CoercionResult, FieldValue};
