//! In-memory scripted search client
//!
//! Replays a queue of pages (or errors) and records every request, so a
//! scan can be driven without a running store.

use std::collections::VecDeque;

use super::errors::{StoreError, StoreResult};
use super::request::PagedRequest;
use super::response::SearchPage;
use super::SearchClient;

/// A request as seen by [`MemorySearchClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Search(PagedRequest),
    Scroll { scroll_id: String, keep_alive: String },
}

/// Scripted client; responses are served in push order
#[derive(Debug, Default)]
pub struct MemorySearchClient {
    responses: VecDeque<StoreResult<SearchPage>>,
    requests: Vec<RecordedRequest>,
    cleared: Vec<String>,
    fail_clear: bool,
}

impl MemorySearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client serving `pages` in order
    pub fn with_pages(pages: impl IntoIterator<Item = SearchPage>) -> Self {
        let mut client = Self::new();
        for page in pages {
            client.push_page(page);
        }
        client
    }

    pub fn push_page(&mut self, page: SearchPage) {
        self.responses.push_back(Ok(page));
    }

    pub fn push_error(&mut self, error: StoreError) {
        self.responses.push_back(Err(error));
    }

    /// Make every `clear_scroll` fail
    pub fn fail_clear_scroll(&mut self) {
        self.fail_clear = true;
    }

    /// Every search and scroll request, in order
    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Scroll ids passed to `clear_scroll`
    pub fn cleared_scrolls(&self) -> &[String] {
        &self.cleared
    }

    fn next_response(&mut self) -> StoreResult<SearchPage> {
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(StoreError::Unavailable("no scripted response left".into())))
    }
}

impl SearchClient for MemorySearchClient {
    fn search(&mut self, request: &PagedRequest) -> StoreResult<SearchPage> {
        self.requests.push(RecordedRequest::Search(request.clone()));
        self.next_response()
    }

    fn scroll(&mut self, scroll_id: &str, keep_alive: &str) -> StoreResult<SearchPage> {
        self.requests.push(RecordedRequest::Scroll {
            scroll_id: scroll_id.to_string(),
            keep_alive: keep_alive.to_string(),
        });
        self.next_response()
    }

    fn clear_scroll(&mut self, scroll_id: &str) -> StoreResult<()> {
        if self.fail_clear {
            return Err(StoreError::Unavailable("clear_scroll disabled".into()));
        }
        self.cleared.push(scroll_id.to_string());
        Ok(())
    }
}
