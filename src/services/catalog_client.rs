//! Discogs catalog client
//!
//! Searches the Discogs database by barcode and reduces the response to
//! the first matching release. No retry, no response caching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DISCOGS_BASE_URL: &str = "https://api.discogs.com";
const USER_AGENT: &str = concat!("vinylscan/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// A release as reported by the catalog search, first match only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRelease {
    pub title: String,
    pub artist: String,
    pub year: String,
    pub thumb: Option<String>,
}

/// Barcode search against the external release catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search the catalog by barcode. Returns the first result, or
    /// `None` when the catalog has no match.
    async fn search_release(&self, barcode: &str) -> Result<Option<CatalogRelease>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
    /// Discogs reports year as either a number or a string.
    #[serde(default)]
    year: Option<serde_json::Value>,
    #[serde(default)]
    thumb: Option<String>,
}

impl SearchResult {
    fn into_release(self) -> CatalogRelease {
        CatalogRelease {
            artist: artist_from_title(&self.title).to_string(),
            year: normalize_year(self.year.as_ref()),
            thumb: self.thumb.filter(|t| !t.is_empty()),
            title: self.title,
        }
    }
}

/// Artist derivation is purely syntactic: the substring of the catalog
/// title before the first `" - "` separator, or the full title when the
/// separator is absent.
pub fn artist_from_title(title: &str) -> &str {
    title.split(" - ").next().unwrap_or(title)
}

fn normalize_year(year: Option<&serde_json::Value>) -> String {
    match year {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// Discogs API client
pub struct DiscogsClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscogsClient {
    pub fn new(token: String) -> Result<Self, CatalogError> {
        Self::with_base_url(DISCOGS_BASE_URL.to_string(), token)
    }

    /// Point the client at an alternate base URL (self-hosted proxy or
    /// test server).
    pub fn with_base_url(base_url: String, token: String) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[async_trait]
impl CatalogClient for DiscogsClient {
    async fn search_release(&self, barcode: &str) -> Result<Option<CatalogRelease>, CatalogError> {
        let url = format!("{}/database/search", self.base_url);

        tracing::debug!(barcode, url = %url, "Querying catalog");

        let response = self
            .http_client
            .get(&url)
            .query(&[("barcode", barcode), ("token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        match search.results.into_iter().next() {
            Some(first) => {
                let release = first.into_release();
                tracing::info!(
                    barcode,
                    title = %release.title,
                    year = %release.year,
                    "Catalog match"
                );
                Ok(Some(release))
            }
            None => {
                tracing::debug!(barcode, "No catalog results");
                Ok(None)
            }
        }
    }
}
