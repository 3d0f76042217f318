//! Environment-driven upstream configuration.
//!
//! Read once at startup. Blank values are treated the same as unset.

use serde::Serialize;
use wikiwire_core::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/api/rest_v1";
pub const DEFAULT_LANG: &str = "en";

pub const ENV_API_URL: &str = "WIKI_API_URL";
pub const ENV_LANG: &str = "WIKI_LANG";
pub const ENV_SEARCH_URL: &str = "WIKI_SEARCH_URL";
pub const ENV_USER_AGENT: &str = "WIKI_USER_AGENT";
pub const ENV_TIMEOUT_MS: &str = "WIKI_TIMEOUT_MS";

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Serialize)]
pub struct WikiConfig {
    /// REST base, e.g. `https://en.wikipedia.org/api/rest_v1`.
    pub api_url: String,
    pub lang: String,
    /// Legacy `api.php` endpoint used for keyword search.
    pub search_url: String,
    pub user_agent: String,
    /// No timeout when unset.
    pub timeout_ms: Option<u64>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            search_url: search_url_for_lang(DEFAULT_LANG),
            user_agent: default_user_agent(),
            timeout_ms: None,
        }
    }
}

pub fn search_url_for_lang(lang: &str) -> String {
    format!("https://{lang}.wikipedia.org/w/api.php")
}

fn default_user_agent() -> String {
    format!("wikiwire/{}", env!("CARGO_PKG_VERSION"))
}

impl WikiConfig {
    pub fn from_env() -> Result<Self> {
        let lang = env_nonempty(ENV_LANG).unwrap_or_else(|| DEFAULT_LANG.to_string());
        let timeout_ms = match env_nonempty(ENV_TIMEOUT_MS) {
            Some(v) => Some(v.parse::<u64>().map_err(|_| {
                Error::InvalidConfig(format!("{ENV_TIMEOUT_MS} must be an integer, got {v:?}"))
            })?),
            None => None,
        };
        let cfg = Self {
            api_url: env_nonempty(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            search_url: env_nonempty(ENV_SEARCH_URL).unwrap_or_else(|| search_url_for_lang(&lang)),
            lang,
            user_agent: env_nonempty(ENV_USER_AGENT).unwrap_or_else(default_user_agent),
            timeout_ms: timeout_ms.filter(|&n| n > 0),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Both endpoints must be absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        for (key, raw) in [(ENV_API_URL, &self.api_url), (ENV_SEARCH_URL, &self.search_url)] {
            let u = url::Url::parse(raw)
                .map_err(|e| Error::InvalidConfig(format!("{key}={raw:?}: {e}")))?;
            if !matches!(u.scheme(), "http" | "https") {
                return Err(Error::InvalidConfig(format!(
                    "{key}={raw:?}: expected an http(s) URL"
                )));
            }
        }
        Ok(())
    }
}
