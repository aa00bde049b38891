//! Record cursor exposed to the query engine
//!
//! A cursor composes the scroll pager and the row projector behind the
//! advance / read / close contract. One cursor serves one partition and
//! is driven by one thread.

mod errors;
mod record_cursor;

pub use errors::{CursorError, CursorResult};
pub use record_cursor::{CursorState, RecordCursor, SearchRecordCursor};
