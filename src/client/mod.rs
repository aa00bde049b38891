//! Search store client
//!
//! The transport is a collaborator: this crate only needs three calls,
//! expressed by [`SearchClient`]. [`HttpSearchClient`] talks to a real
//! store over HTTP; [`MemorySearchClient`] replays scripted pages.

mod errors;
mod http;
mod memory;
mod request;
mod response;

pub use errors::{StoreError, StoreResult};
pub use http::HttpSearchClient;
pub use memory::{MemorySearchClient, RecordedRequest};
pub use request::{PagedRequest, ProjectionMode};
pub use response::{RawHit, SearchPage};

/// The scroll protocol as seen by a scan
pub trait SearchClient {
    /// Open a scroll and return its first page
    fn search(&mut self, request: &PagedRequest) -> StoreResult<SearchPage>;

    /// Fetch the page after `scroll_id`, extending the context by `keep_alive`
    fn scroll(&mut self, scroll_id: &str, keep_alive: &str) -> StoreResult<SearchPage>;

    /// Release a scroll context before it expires
    fn clear_scroll(&mut self, scroll_id: &str) -> StoreResult<()>;
}

impl<T: SearchClient + ?Sized> SearchClient for &mut T {
    fn search(&mut self, request: &PagedRequest) -> StoreResult<SearchPage> {
        (**self).search(request)
    }

    fn scroll(&mut self, scroll_id: &str, keep_alive: &str) -> StoreResult<SearchPage> {
        (**self).scroll(scroll_id, keep_alive)
    }

    fn clear_scroll(&mut self, scroll_id: &str) -> StoreResult<()> {
        (**self).clear_scroll(scroll_id)
    }
}

impl<T: SearchClient + ?Sized> SearchClient for Box<T> {
    fn search(&mut self, request: &PagedRequest) -> StoreResult<SearchPage> {
        (**self).search(request)
    }

    fn scroll(&mut self, scroll_id: &str, keep_alive: &str) -> StoreResult<SearchPage> {
        (**self).scroll(scroll_id, keep_alive)
    }

    fn clear_scroll(&mut self, scroll_id: &str) -> StoreResult<()> {
        (**self).clear_scroll(scroll_id)
    }
}
