//! Local Wikipedia stand-in for offline contract tests.
//!
//! - `page/summary/Archimedes` and `page/html/Archimedes` succeed
//! - `page/summary/Flaky` returns 503
//! - every other title is a 404
//! - `w/api.php` returns three hits for queries containing "newton", none otherwise

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;

pub const ARCHIMEDES_EXTRACT: &str =
    "Archimedes of Syracuse was an Ancient Greek mathematician, physicist, engineer, astronomer, and inventor.";
pub const ARCHIMEDES_HTML: &str =
    "<!DOCTYPE html><html><head><title>Archimedes</title></head><body><p>Eureka!</p></body></html>";

async fn summary(Path(title): Path<String>) -> impl IntoResponse {
    match title.as_str() {
        "Archimedes" => (
            StatusCode::OK,
            Json(serde_json::json!({
                "type": "standard",
                "title": "Archimedes",
                "pageid": 1844,
                "lang": "en",
                "description": "Greek mathematician (c. 287 – c. 212 BC)",
                "thumbnail": {"source": "https://upload.wikimedia.org/archimedes.jpg", "width": 320, "height": 400},
                "content_urls": {
                    "desktop": {"page": "https://en.wikipedia.org/wiki/Archimedes"},
                    "mobile": {"page": "https://en.m.wikipedia.org/wiki/Archimedes"}
                },
                "extract": ARCHIMEDES_EXTRACT
            })),
        ),
        "Flaky" => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"type": "error"})),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"type": "https://mediawiki.org/wiki/HyperSwitch/errors/not_found"})),
        ),
    }
}

async fn html(Path(title): Path<String>) -> impl IntoResponse {
    if title == "Archimedes" {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            ARCHIMEDES_HTML.to_string(),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            "{}".to_string(),
        )
    }
}

async fn legacy_search(Query(q): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let term = q.get("srsearch").cloned().unwrap_or_default();
    let limit: usize = q
        .get("srlimit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let hits: Vec<serde_json::Value> = if term.to_lowercase().contains("newton") {
        ["Isaac Newton", "Newton (unit)", "Newton's laws of motion"]
            .iter()
            .take(limit)
            .map(|t| {
                serde_json::json!({
                    "ns": 0,
                    "title": t,
                    "snippet": format!("<span class=\"searchmatch\">Newton</span> {t}"),
                    "size": 4096,
                    "wordcount": 512
                })
            })
            .collect()
    } else {
        Vec::new()
    };
    Json(serde_json::json!({"batchcomplete": "", "query": {"search": hits}}))
}

/// Start the stub on an ephemeral port; returns `(api_url, search_url)`.
pub async fn spawn_stub() -> (String, String) {
    let app = Router::new()
        .route("/api/rest_v1/page/summary/:title", get(summary))
        .route("/api/rest_v1/page/html/:title", get(html))
        .route("/w/api.php", get(legacy_search));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr: SocketAddr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("axum serve");
    });
    (
        format!("http://{addr}/api/rest_v1"),
        format!("http://{addr}/w/api.php"),
    )
}
