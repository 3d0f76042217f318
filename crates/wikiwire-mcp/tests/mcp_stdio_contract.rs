mod common;

use std::collections::BTreeSet;

fn text_of(r: &rmcp::model::CallToolResult) -> String {
    r.content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .unwrap_or_default()
}

fn args(v: serde_json::Value) -> Option<rmcp::model::JsonObject> {
    v.as_object().cloned()
}

#[test]
fn wikiwire_mcp_stdio_contract_stubbed_localhost() {
    // End-to-end over a spawned child, pointed at a local Wikipedia stand-in.
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    rt.block_on(async {
        use rmcp::{
            model::{CallToolRequestParam, ReadResourceRequestParam, ResourceContents},
            service::ServiceExt,
            transport::{ConfigureCommandExt, TokioChildProcess},
        };

        let (api_url, search_url) = common::spawn_stub().await;

        let bin = assert_cmd::cargo::cargo_bin!("wikiwire");
        let service = ()
            .serve(TokioChildProcess::new(
                tokio::process::Command::new(bin).configure(|cmd| {
                    cmd.args(["mcp-stdio"]);
                    cmd.env("WIKI_API_URL", &api_url);
                    cmd.env("WIKI_SEARCH_URL", &search_url);
                    cmd.env_remove("WIKIWIRE_ENV_FILE");
                    cmd.env("RUST_LOG", "error");
                }),
            )?)
            .await?;

        // Catalog.
        let tools = service.list_tools(Default::default()).await?;
        let names: BTreeSet<String> = tools.tools.iter().map(|t| t.name.to_string()).collect();
        let expected: BTreeSet<String> = ["search", "get_summary", "get_content", "get_page_info"]
            .into_iter()
            .map(str::to_string)
            .collect();
        assert_eq!(names, expected);
        for t in &tools.tools {
            assert!(t.description.is_some(), "tool {} has no description", t.name);
            assert_eq!(
                t.input_schema.get("type").and_then(|v| v.as_str()),
                Some("object")
            );
        }

        let resources = service.list_resources(Default::default()).await?;
        assert_eq!(resources.resources.len(), 1);
        assert_eq!(resources.resources[0].raw.uri, "wikipedia://search");
        assert_eq!(
            resources.resources[0].raw.mime_type.as_deref(),
            Some("application/json")
        );

        // get_summary: success and 404.
        let r = service
            .call_tool(CallToolRequestParam {
                name: "get_summary".into(),
                arguments: args(serde_json::json!({"title": "Archimedes"})),
            })
            .await?;
        assert_eq!(r.is_error, Some(false));
        assert_eq!(r.content.len(), 1);
        let text = text_of(&r);
        assert!(text.starts_with("# Archimedes\n\n"), "{text}");
        assert!(text.contains(common::ARCHIMEDES_EXTRACT));
        assert!(text.ends_with(
            "**Type:** standard\n**Original Source:** https://en.wikipedia.org/wiki/Archimedes"
        ));

        let r = service
            .call_tool(CallToolRequestParam {
                name: "get_summary".into(),
                arguments: args(serde_json::json!({"title": "ZZZNoSuchPageZZZ"})),
            })
            .await?;
        assert_eq!(r.is_error, Some(true));
        assert_eq!(
            text_of(&r),
            "Failed to get summary: Article not found: \"ZZZNoSuchPageZZZ\""
        );

        // Upstream 5xx is an error envelope, not a protocol error.
        let r = service
            .call_tool(CallToolRequestParam {
                name: "get_summary".into(),
                arguments: args(serde_json::json!({"title": "Flaky"})),
            })
            .await?;
        assert_eq!(r.is_error, Some(true));
        assert!(text_of(&r).starts_with("Failed to get summary: Wikipedia API error"));

        // get_content: raw HTML passthrough.
        let r = service
            .call_tool(CallToolRequestParam {
                name: "get_content".into(),
                arguments: args(serde_json::json!({"title": "Archimedes"})),
            })
            .await?;
        assert_eq!(r.is_error, Some(false));
        assert_eq!(text_of(&r), common::ARCHIMEDES_HTML);

        // get_page_info: JSON with the fixed field set.
        let r = service
            .call_tool(CallToolRequestParam {
                name: "get_page_info".into(),
                arguments: args(serde_json::json!({"title": "Archimedes"})),
            })
            .await?;
        assert_eq!(r.is_error, Some(false));
        let info: serde_json::Value = serde_json::from_str(&text_of(&r))?;
        let keys: BTreeSet<&str> = info
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        let want: BTreeSet<&str> = [
            "title",
            "extract",
            "type",
            "thumbnail",
            "description",
            "coordinates",
            "content_urls",
            "pageid",
        ]
        .into_iter()
        .collect();
        assert_eq!(keys, want);
        assert_eq!(info["pageid"].as_u64(), Some(1844));
        assert!(info["coordinates"].is_null());
        // The upstream `lang` field is not part of the page-info shape.
        assert!(info.get("lang").is_none());

        // search: exact title, keyword fallback with limit, nothing found.
        let r = service
            .call_tool(CallToolRequestParam {
                name: "search".into(),
                arguments: args(serde_json::json!({"query": "Archimedes"})),
            })
            .await?;
        assert_eq!(r.is_error, Some(false));
        let text = text_of(&r);
        assert!(text.starts_with("**Archimedes**\n\n"), "{text}");
        assert!(text.ends_with("Source: https://en.wikipedia.org/wiki/Archimedes"));

        let r = service
            .call_tool(CallToolRequestParam {
                name: "search".into(),
                arguments: args(serde_json::json!({"query": "Newton", "limit": 2})),
            })
            .await?;
        assert_eq!(r.is_error, Some(false));
        let text = text_of(&r);
        assert!(text.starts_with("Found 2 search results:\n\n1. **Isaac Newton**"), "{text}");
        assert!(text.contains("2. **Newton (unit)**"));
        assert!(!text.contains("3. "));

        let r = service
            .call_tool(CallToolRequestParam {
                name: "search".into(),
                arguments: args(serde_json::json!({"query": "qqqzzzxxx"})),
            })
            .await?;
        assert_eq!(r.is_error, Some(false));
        assert_eq!(text_of(&r), "No results found for \"qqqzzzxxx\"");

        // Dispatcher errors stay inside the envelope.
        let r = service
            .call_tool(CallToolRequestParam {
                name: "nope".into(),
                arguments: args(serde_json::json!({})),
            })
            .await?;
        assert_eq!(r.is_error, Some(true));
        assert_eq!(text_of(&r), "Unknown tool: nope");

        let r = service
            .call_tool(CallToolRequestParam {
                name: "get_content".into(),
                arguments: args(serde_json::json!({})),
            })
            .await?;
        assert_eq!(r.is_error, Some(true));
        assert!(text_of(&r).starts_with("Invalid arguments for get_content: "));

        // Resource read returns the search envelope as JSON.
        let read = service
            .read_resource(ReadResourceRequestParam {
                uri: "wikipedia://search?q=Newton".to_string(),
            })
            .await?;
        assert_eq!(read.contents.len(), 1);
        let ResourceContents::TextResourceContents {
            uri,
            mime_type,
            text,
            ..
        } = &read.contents[0]
        else {
            panic!("expected text resource contents");
        };
        assert_eq!(uri, "wikipedia://search?q=Newton");
        assert_eq!(mime_type.as_deref(), Some("application/json"));
        let from_resource: serde_json::Value = serde_json::from_str(text)?;
        let from_tool = serde_json::to_value(
            service
                .call_tool(CallToolRequestParam {
                    name: "search".into(),
                    arguments: args(serde_json::json!({"query": "Newton"})),
                })
                .await?,
        )?;
        assert_eq!(from_resource, from_tool);
        assert_eq!(from_resource["isError"], serde_json::json!(false));

        let unknown = service
            .read_resource(ReadResourceRequestParam {
                uri: "wikipedia://nowhere".to_string(),
            })
            .await;
        let err = unknown.expect_err("unknown resource must fail");
        assert!(err.to_string().contains("Unknown resource"), "{err}");

        service.cancel().await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
    .expect("mcp stdio contract");
}
