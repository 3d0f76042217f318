//! MCP surface for wikiwire: tool catalog, dispatcher, and the search resource.
//!
//! Every tool call produces exactly one `CallToolResult`. Failures (unknown tool,
//! invalid arguments, missing article, upstream or network faults) are returned as
//! results with `is_error: true`, never as protocol errors. Only `resources/read`
//! on an unrecognized URI is a protocol-level error.

pub mod catalog;
pub mod envelope;
pub mod lifecycle;
pub mod resources;
pub mod validate;

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListResourcesResult,
    ListToolsResult, PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult,
    ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ErrorData as McpError;
use serde::de::DeserializeOwned;
use wikiwire_core::{SearchOutcome, WikiBackend};
use wikiwire_http::{WikiClient, WikiConfig};

use catalog::{SearchArgs, SummaryArgs, TitleArgs, ToolName, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use envelope::{error_result, text_result, wiki_error, ErrorCode};
use resources::{ResourceError, ResourceRequest};
use validate::ArgumentError;

#[derive(Clone)]
pub struct WikiMcp {
    backend: Arc<dyn WikiBackend>,
}

fn invalid_args(tool: ToolName, e: &ArgumentError) -> CallToolResult {
    error_result(
        ErrorCode::InvalidParams,
        format!("Invalid arguments for {}: {e}", tool.as_str()),
    )
}

fn parse_args<T: DeserializeOwned>(tool: ToolName, args: JsonObject) -> Result<T, CallToolResult> {
    serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| invalid_args(tool, &ArgumentError::Malformed(e.to_string())))
}

impl WikiMcp {
    pub fn new(cfg: &WikiConfig) -> wikiwire_core::Result<Self> {
        Ok(Self::with_backend(Arc::new(WikiClient::new(cfg)?)))
    }

    pub fn with_backend(backend: Arc<dyn WikiBackend>) -> Self {
        Self { backend }
    }

    /// Route a named call: unknown names and argument violations short-circuit before
    /// any upstream request is made.
    pub async fn call_tool_by_name(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> CallToolResult {
        let Some(tool) = ToolName::parse(name) else {
            return error_result(ErrorCode::UnknownTool, format!("Unknown tool: {name}"));
        };
        let schema = tool.input_schema();
        let args = match validate::check_arguments(&schema, arguments.unwrap_or_default()) {
            Ok(a) => a,
            Err(e) => return invalid_args(tool, &e),
        };
        tracing::debug!(tool = tool.as_str(), "dispatching tool call");

        match tool {
            ToolName::Search => match parse_args::<SearchArgs>(tool, args) {
                Ok(a) => match validate::ensure_non_blank("query", &a.query) {
                    Ok(()) => self.search(&a.query, a.limit).await,
                    Err(e) => invalid_args(tool, &e),
                },
                Err(r) => r,
            },
            ToolName::GetSummary => match parse_args::<SummaryArgs>(tool, args) {
                Ok(a) => match validate::ensure_non_blank("title", &a.title) {
                    Ok(()) => self.get_summary(&a.title).await,
                    Err(e) => invalid_args(tool, &e),
                },
                Err(r) => r,
            },
            ToolName::GetContent => match parse_args::<TitleArgs>(tool, args) {
                Ok(a) => match validate::ensure_non_blank("title", &a.title) {
                    Ok(()) => self.get_content(&a.title).await,
                    Err(e) => invalid_args(tool, &e),
                },
                Err(r) => r,
            },
            ToolName::GetPageInfo => match parse_args::<TitleArgs>(tool, args) {
                Ok(a) => match validate::ensure_non_blank("title", &a.title) {
                    Ok(()) => self.get_page_info(&a.title).await,
                    Err(e) => invalid_args(tool, &e),
                },
                Err(r) => r,
            },
        }
    }

    /// `limit` 0 means the default; anything above the upstream maximum is capped.
    pub async fn search(&self, query: &str, limit: u32) -> CallToolResult {
        let limit = match limit {
            0 => DEFAULT_SEARCH_LIMIT,
            n => n.min(MAX_SEARCH_LIMIT),
        };
        match wikiwire_core::search(self.backend.as_ref(), query, limit).await {
            Ok(SearchOutcome::Exact(s)) => text_result(envelope::format_exact_match(&s)),
            Ok(SearchOutcome::Matches(hits)) => text_result(envelope::format_search_hits(&hits)),
            Ok(SearchOutcome::NoResults) => text_result(envelope::format_no_results(query)),
            Err(e) => wiki_error("Search failed", &e),
        }
    }

    pub async fn get_summary(&self, title: &str) -> CallToolResult {
        match self.backend.page_summary(title).await {
            Ok(s) => text_result(envelope::format_summary(&s)),
            Err(e) => wiki_error("Failed to get summary", &e),
        }
    }

    pub async fn get_content(&self, title: &str) -> CallToolResult {
        match self.backend.page_html(title).await {
            Ok(html) => text_result(html),
            Err(e) => wiki_error("Failed to get content", &e),
        }
    }

    pub async fn get_page_info(&self, title: &str) -> CallToolResult {
        match self.backend.page_summary(title).await {
            Ok(s) => match envelope::format_page_info(&s) {
                Ok(json) => text_result(json),
                Err(e) => error_result(
                    ErrorCode::DecodeError,
                    format!("Failed to get page info: {e}"),
                ),
            },
            Err(e) => wiki_error("Failed to get page info", &e),
        }
    }

    /// JSON text served for a resource read: the search envelope itself, pretty-printed.
    pub async fn resource_text(&self, req: &ResourceRequest) -> serde_json::Result<String> {
        match req {
            ResourceRequest::Search { query } => {
                let result = self.search(query, DEFAULT_SEARCH_LIMIT).await;
                serde_json::to_string_pretty(&result)
            }
        }
    }
}

impl rmcp::ServerHandler for WikiMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Wikipedia lookups. Tools: search (exact title, else keyword search), get_summary, get_content (raw HTML), get_page_info (JSON metadata). Resource: wikipedia://search?q=<query>."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "wikiwire".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(catalog::list_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .call_tool_by_name(&request.name, request.arguments)
            .await)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![
            resources::search_resource(),
        ]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = request.uri;
        let req = resources::parse_resource_uri(&uri).map_err(|e| match e {
            ResourceError::Unknown(_) => McpError::resource_not_found(e.to_string(), None),
            ResourceError::Malformed { .. } => McpError::invalid_params(e.to_string(), None),
        })?;
        let text = self
            .resource_text(&req)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri,
                mime_type: Some(resources::RESOURCE_MIME_TYPE.to_string()),
                text,
                meta: None,
            }],
        })
    }
}
