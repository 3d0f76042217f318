//! Backend-agnostic Wikipedia lookup types and traits.
//!
//! Nothing in here does IO. `wikiwire-http` provides the `reqwest` implementation of
//! [`WikiBackend`], and the MCP crate shapes these types into response envelopes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Article not found: \"{title}\"")]
    NotFound { title: String },
    #[error("Wikipedia API error: {reason}")]
    Upstream { status: u16, reason: String },
    #[error("{0}")]
    Transport(String),
    #[error("invalid upstream payload: {0}")]
    Decode(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Human-readable text for an HTTP status: the canonical reason phrase when one exists,
/// otherwise the bare code.
pub fn status_text(status: u16, canonical: Option<&str>) -> String {
    match canonical {
        Some(r) if !r.trim().is_empty() => r.to_string(),
        _ => status.to_string(),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Thumbnail {
    pub source: Option<String>,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlatformUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revisions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talk: Option<String>,
}

/// The subset of the REST `page/summary` payload we read. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageSummary {
    pub title: Option<String>,
    pub extract: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    pub description: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// Keyed by platform (`desktop`, `mobile`).
    pub content_urls: Option<BTreeMap<String, PlatformUrls>>,
    pub pageid: Option<u64>,
}

impl PageSummary {
    /// Desktop page URL, if upstream supplied one.
    pub fn desktop_url(&self) -> Option<&str> {
        self.content_urls
            .as_ref()?
            .get("desktop")?
            .page
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            title: self.title.clone(),
            extract: self.extract.clone(),
            kind: self.kind.clone(),
            thumbnail: self.thumbnail.as_ref().and_then(|t| t.source.clone()),
            description: self.description.clone(),
            coordinates: self.coordinates.clone(),
            content_urls: self.content_urls.clone(),
            pageid: self.pageid,
        }
    }
}

/// Stable page metadata view. Field order is the serialized key order, and absent
/// fields serialize as `null` rather than disappearing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageInfo {
    pub title: Option<String>,
    pub extract: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub content_urls: Option<BTreeMap<String, PlatformUrls>>,
    pub pageid: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub wordcount: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query named an article directly.
    Exact(PageSummary),
    /// No exact article; keyword search produced these hits (never empty).
    Matches(Vec<SearchHit>),
    NoResults,
}

#[async_trait::async_trait]
pub trait WikiBackend: Send + Sync {
    /// `GET {base}/page/summary/{title}`. A 404 is `Error::NotFound`.
    async fn page_summary(&self, title: &str) -> Result<PageSummary>;
    /// `GET {base}/page/html/{title}`, body returned verbatim.
    async fn page_html(&self, title: &str) -> Result<String>;
    /// Legacy `list=search` keyword search, at most `limit` hits.
    async fn keyword_search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>>;
}

/// Two-step search: exact article lookup first, keyword search only when that lookup
/// is a not-found. Any other failure of the exact lookup is returned as-is.
pub async fn search(backend: &dyn WikiBackend, query: &str, limit: u32) -> Result<SearchOutcome> {
    match backend.page_summary(query).await {
        Ok(summary) => Ok(SearchOutcome::Exact(summary)),
        Err(e) if e.is_not_found() => {
            let hits = backend.keyword_search(query, limit).await?;
            if hits.is_empty() {
                Ok(SearchOutcome::NoResults)
            } else {
                Ok(SearchOutcome::Matches(hits))
            }
        }
        Err(e) => Err(e),
    }
}
