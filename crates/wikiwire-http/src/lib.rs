//! `reqwest` implementation of [`WikiBackend`] against the Wikipedia REST API
//! (`page/summary`, `page/html`) and the legacy `api.php?list=search` endpoint.

use serde::Deserialize;
use std::time::Duration;
use wikiwire_core::{status_text, Error, PageSummary, Result, SearchHit, WikiBackend};

pub mod config;

pub use config::WikiConfig;

#[derive(Debug, Clone)]
pub struct WikiClient {
    http: reqwest::Client,
    api_url: reqwest::Url,
    search_url: reqwest::Url,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize, Default)]
struct LegacySearchResponse {
    #[serde(default)]
    query: Option<LegacySearchQuery>,
}

#[derive(Debug, Deserialize, Default)]
struct LegacySearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

fn upstream_error(status: reqwest::StatusCode) -> Error {
    Error::Upstream {
        status: status.as_u16(),
        reason: status_text(status.as_u16(), status.canonical_reason()),
    }
}

impl WikiClient {
    pub fn new(cfg: &WikiConfig) -> Result<Self> {
        cfg.validate()?;
        let api_url = reqwest::Url::parse(&cfg.api_url)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let search_url = reqwest::Url::parse(&cfg.search_url)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_url,
            search_url,
            timeout: cfg.timeout_ms.map(Duration::from_millis),
        })
    }

    /// `{base}/page/{kind}/{title}` with `title` percent-encoded as a single path segment
    /// (so `AC/DC` stays one segment). `.` and `..` would be swallowed as dot segments and
    /// are not valid article titles, so they are a not-found without a request.
    fn page_url(&self, kind: &str, title: &str) -> Result<reqwest::Url> {
        if matches!(title, "." | "..") {
            return Err(Error::NotFound {
                title: title.to_string(),
            });
        }
        let mut u = self.api_url.clone();
        u.path_segments_mut()
            .map_err(|_| Error::InvalidConfig(format!("cannot-be-a-base url: {}", self.api_url)))?
            .pop_if_empty()
            .extend(["page", kind, title]);
        Ok(u)
    }

    fn search_request_url(&self, query: &str, limit: u32) -> reqwest::Url {
        let mut u = self.search_url.clone();
        u.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("srsearch", query)
            .append_pair("format", "json")
            .append_pair("srlimit", &limit.to_string());
        u
    }

    async fn get(&self, url: reqwest::Url) -> Result<reqwest::Response> {
        tracing::debug!(%url, "upstream GET");
        let mut req = self.http.get(url);
        if let Some(t) = self.timeout {
            req = req.timeout(t);
        }
        req.send().await.map_err(|e| Error::Transport(e.to_string()))
    }

    /// 404 is a not-found for `title`; any other non-2xx is an upstream fault.
    async fn get_page(&self, kind: &str, title: &str) -> Result<reqwest::Response> {
        let resp = self.get(self.page_url(kind, title)?).await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                title: title.to_string(),
            });
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), kind, title, "upstream page lookup failed");
            return Err(upstream_error(status));
        }
        Ok(resp)
    }
}

#[async_trait::async_trait]
impl WikiBackend for WikiClient {
    async fn page_summary(&self, title: &str) -> Result<PageSummary> {
        let resp = self.get_page("summary", title).await?;
        resp.json::<PageSummary>()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }

    async fn page_html(&self, title: &str) -> Result<String> {
        let resp = self.get_page("html", title).await?;
        resp.text().await.map_err(|e| Error::Transport(e.to_string()))
    }

    async fn keyword_search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>> {
        let resp = self.get(self.search_request_url(query, limit)).await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), query, "keyword search failed");
            return Err(upstream_error(status));
        }
        let body = resp
            .json::<LegacySearchResponse>()
            .await
            .map_err(|e| Error::Decode(e.to_string()))?;
        Ok(body.query.map(|q| q.search).unwrap_or_default())
    }
}
