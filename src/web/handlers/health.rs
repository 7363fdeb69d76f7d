//! Health and service information endpoints

use axum::response::Json;
use serde_json::{json, Value};

const SERVICE_NAME: &str = "IPTV Crawler API";

/// Basic health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Usage instructions
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Crawls IPTV playlists from any URL by extracting IPTV URLs and fetching M3U playlists",
        "endpoints": {
            "POST /crawl": "Crawl IPTV streams from any URL (JSON)",
            "POST /validate-stream": "Check whether a single stream responds",
            "POST /validate-streams": "Check a batch of streams",
            "GET /proxy-video": "Proxy video streams (use ?url=... parameter)",
            "GET /health": "Health check",
            "GET /": "This help message",
        },
        "usage": {
            "method": "POST",
            "endpoint": "/crawl",
            "body": {
                "url": "https://example.com (required)",
                "filter": "sports (optional)",
            },
        },
    }))
}
