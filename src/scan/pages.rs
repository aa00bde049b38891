//! Scroll paging
//!
//! [`PageIterator`] walks a scroll one page at a time and yields hits in
//! store order. The first page with zero hits ends the sequence, including
//! an empty first page. Any store error ends it too: the error is yielded
//! once and the iterator is fused afterwards. No retries happen here.
//!
//! An empty first page costs one request. No follow-up scroll call is
//! sent to confirm it, unlike connectors that always issue one scroll
//! after the initial search.

use std::iter::FusedIterator;
use std::sync::Arc;
use std::vec;

use uuid::Uuid;

use crate::client::{PagedRequest, RawHit, SearchClient, StoreError, StoreResult};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

/// Lazy hit sequence over one scroll
pub struct PageIterator<C: SearchClient> {
    client: C,
    request: PagedRequest,
    buffer: vec::IntoIter<RawHit>,
    scroll_id: Option<String>,
    started: bool,
    finished: bool,
    pages: u64,
    hits: u64,
    scan_id: String,
    metrics: Arc<MetricsRegistry>,
}

impl<C: SearchClient> PageIterator<C> {
    pub fn new(client: C, request: PagedRequest) -> Self {
        Self {
            client,
            request,
            buffer: Vec::new().into_iter(),
            scroll_id: None,
            started: false,
            finished: false,
            pages: 0,
            hits: 0,
            scan_id: Uuid::new_v4().to_string(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Report into a shared registry
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Identifier carried on every log line of this scan
    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    /// Pages received so far, including the final empty one
    pub fn pages_fetched(&self) -> u64 {
        self.pages
    }

    /// Latest scroll token, until released
    pub fn scroll_id(&self) -> Option<&str> {
        self.scroll_id.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished && self.buffer.len() == 0
    }

    /// Stop paging and release the scroll context on the store.
    ///
    /// A failed release is logged and otherwise ignored; the store drops
    /// the context once its keep-alive lapses. Calling this twice is a no-op.
    pub fn release(&mut self) {
        self.finished = true;
        self.buffer = Vec::new().into_iter();

        let Some(scroll_id) = self.scroll_id.take() else {
            return;
        };

        match self.client.clear_scroll(&scroll_id) {
            Ok(()) => {
                self.metrics.increment_scrolls_cleared();
                log_event_with_fields(Event::ScrollCleared, &[("scan_id", &self.scan_id)]);
            }
            Err(e) => {
                log_event_with_fields(
                    Event::ScrollClearFailed,
                    &[("scan_id", &self.scan_id), ("reason", &e.to_string())],
                );
            }
        }
    }

    /// Fetch one page into the buffer. Returns false on the empty page.
    fn fetch_page(&mut self) -> StoreResult<bool> {
        let page = if self.started {
            let scroll_id = self.scroll_id.as_deref().ok_or(StoreError::MissingScrollId)?;
            self.client.scroll(scroll_id, &self.request.keep_alive)?
        } else {
            self.started = true;
            self.metrics.increment_scans_started();
            log_event_with_fields(
                Event::ScanBegin,
                &[
                    ("scan_id", &self.scan_id),
                    ("index", &self.request.index),
                    ("mode", self.request.mode.as_str()),
                ],
            );
            self.client.search(&self.request)?
        };

        if page.scroll_id.is_some() {
            self.scroll_id = page.scroll_id;
        }

        let count = page.hits.len() as u64;
        self.pages += 1;
        self.hits += count;
        self.metrics.record_page(count);
        log_event_with_fields(
            Event::PageFetched,
            &[
                ("scan_id", &self.scan_id),
                ("page", &self.pages.to_string()),
                ("hits", &count.to_string()),
            ],
        );

        if page.hits.is_empty() {
            self.metrics.increment_scans_completed();
            log_event_with_fields(
                Event::ScanComplete,
                &[
                    ("scan_id", &self.scan_id),
                    ("pages", &self.pages.to_string()),
                    ("hits", &self.hits.to_string()),
                ],
            );
            return Ok(false);
        }

        self.buffer = page.hits.into_iter();
        Ok(true)
    }
}

impl<C: SearchClient> Iterator for PageIterator<C> {
    type Item = StoreResult<RawHit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(hit) = self.buffer.next() {
                return Some(Ok(hit));
            }
            if self.finished {
                return None;
            }

            match self.fetch_page() {
                Ok(true) => continue,
                Ok(false) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    self.metrics.increment_scans_failed();
                    log_event_with_fields(
                        Event::ScanFailed,
                        &[("scan_id", &self.scan_id), ("reason", &e.to_string())],
                    );
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<C: SearchClient> FusedIterator for PageIterator<C> {}

/// Collect every hit of a scroll before returning, then release it.
///
/// Memory grows with the partition; prefer iterating [`PageIterator`].
pub fn drain<C: SearchClient>(client: C, request: PagedRequest) -> StoreResult<Vec<RawHit>> {
    let mut pages = PageIterator::new(client, request);
    let hits = pages.by_ref().collect::<StoreResult<Vec<_>>>();
    pages.release();
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MemorySearchClient, ProjectionMode, RecordedRequest, SearchPage};
    use serde_json::json;

    fn request() -> PagedRequest {
        PagedRequest {
            index: "logs".into(),
            routing: None,
            preference: None,
            keep_alive: "1m".into(),
            mode: ProjectionMode::Source,
            body: json!({"size": 3}),
        }
    }

    fn hits(prefix: &str, count: usize) -> Vec<RawHit> {
        (0..count)
            .map(|i| RawHit::from_source("logs", format!("{prefix}{i}"), json!({"n": i})))
            .collect()
    }

    #[test]
    fn test_three_pages_then_empty() {
        let mut client = MemorySearchClient::with_pages([
            SearchPage::new("s1", hits("a", 3)),
            SearchPage::new("s2", hits("b", 2)),
            SearchPage::empty("s3"),
        ]);

        let ids: Vec<String> = drain(&mut client, request())
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();

        assert_eq!(ids, vec!["a0", "a1", "a2", "b0", "b1"]);
        assert_eq!(client.request_count(), 3);
    }

    #[test]
    fn test_continuations_use_latest_scroll_id() {
        let mut client = MemorySearchClient::with_pages([
            SearchPage::new("s1", hits("a", 1)),
            SearchPage::new("s2", hits("b", 1)),
            SearchPage::empty("s3"),
        ]);

        drain(&mut client, request()).unwrap();

        let scroll_ids: Vec<&str> = client
            .requests()
            .iter()
            .filter_map(|r| match r {
                RecordedRequest::Scroll { scroll_id, keep_alive } => {
                    assert_eq!(keep_alive, "1m");
                    Some(scroll_id.as_str())
                }
                RecordedRequest::Search(_) => None,
            })
            .collect();
        assert_eq!(scroll_ids, vec!["s1", "s2"]);
        assert_eq!(client.cleared_scrolls(), ["s3".to_string()]);
    }

    #[test]
    fn test_empty_index_yields_nothing() {
        let mut client = MemorySearchClient::with_pages([SearchPage::empty("s1")]);

        let hits = drain(&mut client, request()).unwrap();

        assert!(hits.is_empty());
        assert_eq!(client.request_count(), 1);
    }

    #[test]
    fn test_error_on_continuation_aborts_and_fuses() {
        let mut client = MemorySearchClient::with_pages([SearchPage::new("s1", hits("a", 2))]);
        client.push_error(StoreError::Status {
            status: 500,
            body: "search_context_missing_exception".into(),
        });
        client.push_page(SearchPage::new("s2", hits("b", 1)));

        let mut pages = PageIterator::new(&mut client, request());
        assert!(pages.next().unwrap().is_ok());
        assert!(pages.next().unwrap().is_ok());
        assert!(matches!(pages.next(), Some(Err(StoreError::Status { status: 500, .. }))));
        assert!(pages.next().is_none());
        assert!(pages.next().is_none());
        assert!(pages.is_finished());
    }

    #[test]
    fn test_drain_propagates_initial_failure() {
        let mut client = MemorySearchClient::new();
        client.push_error(StoreError::MalformedResponse("not json".into()));

        assert!(matches!(
            drain(&mut client, request()),
            Err(StoreError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_scroll_id_is_an_error() {
        let mut client = MemorySearchClient::new();
        client.push_page(SearchPage {
            scroll_id: None,
            hits: hits("a", 1),
        });

        let result = drain(&mut client, request());

        assert!(matches!(result, Err(StoreError::MissingScrollId)));
        assert_eq!(client.request_count(), 1);
    }

    #[test]
    fn test_pages_are_fetched_lazily() {
        let mut client = MemorySearchClient::with_pages([
            SearchPage::new("s1", hits("a", 2)),
            SearchPage::new("s2", hits("b", 2)),
            SearchPage::empty("s3"),
        ]);

        {
            let mut pages = PageIterator::new(&mut client, request());
            pages.next();
            pages.next();
            assert_eq!(pages.pages_fetched(), 1);
            pages.next();
            assert_eq!(pages.pages_fetched(), 2);
        }

        assert_eq!(client.request_count(), 2);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut client = MemorySearchClient::with_pages([SearchPage::new("s1", hits("a", 2))]);

        let mut pages = PageIterator::new(&mut client, request());
        pages.next();
        pages.release();
        pages.release();
        assert!(pages.next().is_none());
        drop(pages);

        assert_eq!(client.cleared_scrolls(), ["s1".to_string()]);
    }

    #[test]
    fn test_metrics_are_recorded() {
        let metrics = Arc::new(MetricsRegistry::new());
        let mut client = MemorySearchClient::with_pages([
            SearchPage::new("s1", hits("a", 3)),
            SearchPage::empty("s2"),
        ]);

        let pages = PageIterator::new(&mut client, request()).with_metrics(Arc::clone(&metrics));
        assert_eq!(pages.count(), 3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.scans_started, 1);
        assert_eq!(snapshot.scans_completed, 1);
        assert_eq!(snapshot.pages_fetched, 2);
        assert_eq!(snapshot.hits_fetched, 3);
    }
}
