//! Blocking HTTP client for the search store's scroll API
//!
//! - `POST /{index}/_search?scroll=..` opens the scroll
//! - `POST /_search/scroll` fetches the next page
//! - `DELETE /_search/scroll` releases the context

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::json;

use super::errors::{StoreError, StoreResult};
use super::request::PagedRequest;
use super::response::SearchPage;
use super::SearchClient;
use crate::config::ConnectionConfig;

/// Search client over the store's REST API
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http: Client,
    base_url: String,
}

impl HttpSearchClient {
    /// Build a client for a validated connection config
    pub fn new(config: &ConnectionConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
        })
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, index)
    }

    fn scroll_url(&self) -> String {
        format!("{}/_search/scroll", self.base_url)
    }

    fn search_params(request: &PagedRequest) -> Vec<(&'static str, &str)> {
        let mut params = vec![("scroll", request.keep_alive.as_str())];
        if let Some(routing) = &request.routing {
            params.push(("routing", routing.as_str()));
        }
        if let Some(preference) = &request.preference {
            params.push(("preference", preference.as_str()));
        }
        params
    }

    fn decode(response: Response) -> StoreResult<SearchPage> {
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        SearchPage::from_json(&body)
    }
}

impl SearchClient for HttpSearchClient {
    fn search(&mut self, request: &PagedRequest) -> StoreResult<SearchPage> {
        let response = self
            .http
            .post(self.search_url(&request.index))
            .query(&Self::search_params(request))
            .json(&request.body)
            .send()?;

        Self::decode(response)
    }

    fn scroll(&mut self, scroll_id: &str, keep_alive: &str) -> StoreResult<SearchPage> {
        let response = self
            .http
            .post(self.scroll_url())
            .json(&json!({ "scroll": keep_alive, "scroll_id": scroll_id }))
            .send()?;

        Self::decode(response)
    }

    fn clear_scroll(&mut self, scroll_id: &str) -> StoreResult<()> {
        let response = self
            .http
            .delete(self.scroll_url())
            .json(&json!({ "scroll_id": [scroll_id] }))
            .send()?;

        let status = response.status();
        // 404: the context already expired
        if status.is_success() || status.as_u16() == 404 {
            return Ok(());
        }

        Err(StoreError::Status {
            status: status.as_u16(),
            body: response.text()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ProjectionMode;

    fn client() -> HttpSearchClient {
        let config = ConnectionConfig::new("file:///tables.json", "es1", 9200, "search");
        HttpSearchClient::new(&config).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(client.search_url("logs"), "http://es1:9200/logs/_search");
        assert_eq!(client.scroll_url(), "http://es1:9200/_search/scroll");
    }

    #[test]
    fn test_search_params_include_partition_hints() {
        let request = PagedRequest {
            index: "logs".into(),
            routing: Some("tenant-7".into()),
            preference: Some("_shards:1".into()),
            keep_alive: "1m".into(),
            mode: ProjectionMode::Source,
            body: json!({}),
        };

        assert_eq!(
            HttpSearchClient::search_params(&request),
            vec![("scroll", "1m"), ("routing", "tenant-7"), ("preference", "_shards:1")]
        );
    }
}
