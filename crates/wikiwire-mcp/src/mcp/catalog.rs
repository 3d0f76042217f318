//! The fixed tool vocabulary and its input schemas.

use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
/// Upper bound accepted by the legacy `list=search` endpoint.
pub const MAX_SEARCH_LIMIT: u32 = 500;

fn default_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Search query (e.g., 'Archimedes', 'quantum mechanics')
    pub query: String,
    /// Maximum number of results (default: 10)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SummaryArgs {
    /// Exact Wikipedia article title (e.g., 'Archimedes', 'Isaac Newton')
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TitleArgs {
    /// Exact Wikipedia article title
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Search,
    GetSummary,
    GetContent,
    GetPageInfo,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::Search,
        ToolName::GetSummary,
        ToolName::GetContent,
        ToolName::GetPageInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::GetSummary => "get_summary",
            Self::GetContent => "get_content",
            Self::GetPageInfo => "get_page_info",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Search => {
                "Search Wikipedia articles by query. Returns the matching article directly when the query is an exact title, otherwise a list of matching article titles and snippets."
            }
            Self::GetSummary => {
                "Get a summary of a Wikipedia article by title. Returns a concise overview of the topic."
            }
            Self::GetContent => "Get the full HTML content of a Wikipedia article by title.",
            Self::GetPageInfo => {
                "Get detailed information about a Wikipedia page including summary, images, and metadata."
            }
        }
    }

    pub fn input_schema(self) -> Arc<JsonObject> {
        match self {
            Self::Search => schema_object::<SearchArgs>(),
            Self::GetSummary => schema_object::<SummaryArgs>(),
            Self::GetContent | Self::GetPageInfo => schema_object::<TitleArgs>(),
        }
    }

    pub fn descriptor(self) -> Tool {
        Tool::new(self.as_str(), self.description(), self.input_schema())
    }
}

fn schema_object<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(mut m)) => {
            m.remove("$schema");
            Arc::new(m)
        }
        _ => Arc::new(JsonObject::new()),
    }
}

pub fn list_tools() -> Vec<Tool> {
    ToolName::ALL.into_iter().map(ToolName::descriptor).collect()
}
