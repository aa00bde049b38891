//! Connection configuration for the search store
//!
//! Loaded from a JSON file, validated once, immutable afterwards.
//! Required: `metadata_uri`, `host_address`, `port`, `schema_name`.
//! Optional paging knobs carry defaults.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use crate::observability::{log_event_with_fields, Event};

/// Connection settings for one search store cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Location of the table metadata document
    pub metadata_uri: String,

    /// Store host name or address
    pub host_address: String,

    /// Store HTTP port
    pub port: u16,

    /// Schema exposed to the query engine
    pub schema_name: String,

    /// URL scheme (default: "http")
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// How long the store keeps a scroll context alive between pages (default: "1m")
    #[serde(default = "default_scroll_keep_alive")]
    pub scroll_keep_alive: String,

    /// Hits per page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request transport timeout; unset means the transport never times out
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_scroll_keep_alive() -> String {
    "1m".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn keep_alive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[1-9][0-9]*(ms|s|m|h|d)$").expect("static pattern"))
}

impl ConnectionConfig {
    /// Create a config with default paging settings
    pub fn new(
        metadata_uri: impl Into<String>,
        host_address: impl Into<String>,
        port: u16,
        schema_name: impl Into<String>,
    ) -> Self {
        Self {
            metadata_uri: metadata_uri.into(),
            host_address: host_address.into(),
            port,
            schema_name: schema_name.into(),
            scheme: default_scheme(),
            scroll_keep_alive: default_scroll_keep_alive(),
            page_size: default_page_size(),
            request_timeout_secs: None,
        }
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: ConnectionConfig = serde_json::from_str(&content)?;
        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("endpoint", &config.base_url()),
                ("schema", &config.schema_name),
            ],
        );

        Ok(config)
    }

    /// Validate every field
    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("metadata_uri", &self.metadata_uri),
            ("host_address", &self.host_address),
            ("schema_name", &self.schema_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(field, "must not be empty"));
            }
        }

        if self.port == 0 {
            return Err(ConfigError::invalid("port", "must be > 0"));
        }

        if self.scheme != "http" && self.scheme != "https" {
            return Err(ConfigError::invalid(
                "scheme",
                format!("expected http or https, got {}", self.scheme),
            ));
        }

        if !keep_alive_pattern().is_match(&self.scroll_keep_alive) {
            return Err(ConfigError::invalid(
                "scroll_keep_alive",
                format!(
                    "expected a duration like 30s or 1m, got {}",
                    self.scroll_keep_alive
                ),
            ));
        }

        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be > 0"));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::invalid("request_timeout_secs", "must be > 0"));
        }

        Ok(())
    }

    /// Base URL of the store, e.g. `http://localhost:9200`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host_address, self.port)
    }
}
