//! The single `wikipedia://search` resource.

use rmcp::model::{Annotated, RawResource, Resource};

pub const SEARCH_RESOURCE_URI: &str = "wikipedia://search";
pub const SEARCH_URI_PREFIX: &str = "wikipedia://search?q=";
pub const RESOURCE_MIME_TYPE: &str = "application/json";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Unknown resource: {0}")]
    Unknown(String),
    #[error("Malformed resource URI {uri}: {reason}")]
    Malformed { uri: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    Search { query: String },
}

pub fn search_resource() -> Resource {
    let mut raw = RawResource::new(SEARCH_RESOURCE_URI, "Wikipedia Search");
    raw.description = Some(format!(
        "Search Wikipedia articles. Read `{SEARCH_URI_PREFIX}<percent-encoded query>` (e.g. `{}`) to get search results as JSON.",
        build_search_uri("Isaac Newton")
    ));
    raw.mime_type = Some(RESOURCE_MIME_TYPE.to_string());
    Annotated {
        raw,
        annotations: None,
    }
}

/// Parse a `wikipedia://search?q=<query>` URI. Everything after `?q=` is the
/// percent-encoded query.
pub fn parse_resource_uri(uri: &str) -> Result<ResourceRequest, ResourceError> {
    let Some(encoded) = uri.strip_prefix(SEARCH_URI_PREFIX) else {
        return Err(ResourceError::Unknown(uri.to_string()));
    };
    let query = urlencoding::decode(encoded).map_err(|e| ResourceError::Malformed {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    if query.trim().is_empty() {
        return Err(ResourceError::Malformed {
            uri: uri.to_string(),
            reason: "empty query".to_string(),
        });
    }
    Ok(ResourceRequest::Search {
        query: query.into_owned(),
    })
}

pub fn build_search_uri(query: &str) -> String {
    format!("{SEARCH_URI_PREFIX}{}", urlencoding::encode(query))
}
