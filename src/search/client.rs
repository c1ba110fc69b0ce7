//! Transport to the search index.

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::{debug, info};

use super::results::SearchResponse;
use crate::config::Config;

/// Longest error body quoted back to the user
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Anything that can execute a `_search` request body
///
/// The CLI uses [`ElasticClient`]; tests substitute canned responses.
pub trait SearchBackend {
    fn search(&self, body: &Value) -> Result<SearchResponse>;
}

/// Blocking Elasticsearch client authenticated with an API key
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: Client,
    search_url: String,
    api_key: String,
}

impl ElasticClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("vcon-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            search_url: format!("{}/{}/_search", config.endpoint, config.index),
            api_key: config.api_key.clone(),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

impl SearchBackend for ElasticClient {
    fn search(&self, body: &Value) -> Result<SearchResponse> {
        debug!(url = %self.search_url, body = %body, "sending search request");

        let response = self
            .http
            .post(&self.search_url)
            .header(AUTHORIZATION, format!("ApiKey {}", self.api_key))
            .json(body)
            .send()
            .with_context(|| format!("Search request to {} failed", self.search_url))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let excerpt: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            bail!("Search index returned {}: {}", status, excerpt);
        }

        let parsed: SearchResponse =
            response.json().context("Failed to decode search response")?;
        info!(
            url = %self.search_url,
            hits = parsed.hits.hits.len(),
            took_ms = parsed.took.unwrap_or_default(),
            "search completed"
        );

        Ok(parsed)
    }
}
