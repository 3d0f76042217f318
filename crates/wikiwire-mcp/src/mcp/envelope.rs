//! Response shaping: every tool call ends up as a single `CallToolResult` with text
//! content and an explicit `is_error` flag.

use rmcp::model::{CallToolResult, Content};
use wikiwire_core::{Error as WikiError, PageSummary, SearchHit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidParams,
    UnknownTool,
    NotFound,
    UpstreamError,
    TransportError,
    DecodeError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParams => "invalid_params",
            Self::UnknownTool => "unknown_tool",
            Self::NotFound => "not_found",
            Self::UpstreamError => "upstream_error",
            Self::TransportError => "transport_error",
            Self::DecodeError => "decode_error",
        }
    }

    pub fn retryable(self) -> bool {
        match self {
            Self::UpstreamError | Self::TransportError => true,
            // Caller mistakes and missing articles do not change on retry.
            Self::InvalidParams | Self::UnknownTool | Self::NotFound | Self::DecodeError => false,
        }
    }
}

impl From<&WikiError> for ErrorCode {
    fn from(e: &WikiError) -> Self {
        match e {
            WikiError::NotFound { .. } => Self::NotFound,
            WikiError::Upstream { .. } => Self::UpstreamError,
            WikiError::Transport(_) | WikiError::InvalidConfig(_) => Self::TransportError,
            WikiError::Decode(_) => Self::DecodeError,
        }
    }
}

pub const NO_URL: &str = "N/A";

pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

pub fn error_result(code: ErrorCode, message: impl Into<String>) -> CallToolResult {
    let message = message.into();
    tracing::warn!(
        code = code.as_str(),
        retryable = code.retryable(),
        %message,
        "tool call failed"
    );
    CallToolResult::error(vec![Content::text(message)])
}

/// Wrap a backend failure with the operation's prefix, e.g. `Failed to get summary: …`.
pub fn wiki_error(prefix: &str, e: &WikiError) -> CallToolResult {
    error_result(ErrorCode::from(e), format!("{prefix}: {e}"))
}

fn source_url(s: &PageSummary) -> &str {
    s.desktop_url().unwrap_or(NO_URL)
}

/// Single-article block used when `search` hits an exact title.
pub fn format_exact_match(s: &PageSummary) -> String {
    format!(
        "**{}**\n\n{}\n\nSource: {}",
        s.title.as_deref().unwrap_or_default(),
        s.extract.as_deref().unwrap_or_default(),
        source_url(s)
    )
}

pub fn format_search_hits(hits: &[SearchHit]) -> String {
    let items = hits
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{}. **{}**\n   {}\n", i + 1, h.title, h.snippet))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Found {} search results:\n\n{items}", hits.len())
}

pub fn format_no_results(query: &str) -> String {
    format!("No results found for \"{query}\"")
}

pub fn format_summary(s: &PageSummary) -> String {
    format!(
        "# {}\n\n{}\n\n**Type:** {}\n**Original Source:** {}",
        s.title.as_deref().unwrap_or_default(),
        s.extract.as_deref().unwrap_or_default(),
        s.kind.as_deref().unwrap_or_default(),
        source_url(s)
    )
}

pub fn format_page_info(s: &PageSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&s.page_info())
}

/// First text block of a result (test and CLI convenience).
pub fn first_text(r: &CallToolResult) -> Option<&str> {
    r.content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.as_str())
}
