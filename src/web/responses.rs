//! HTTP response types and utilities
//!
//! Every JSON body produced by the API carries a `success` flag; failures add
//! an `error` message. Request validation problems map to 4xx statuses, any
//! other error to 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::errors::{AppError, WebError};
use crate::models::{CrawlResult, StreamEntry};

/// Message returned when a crawl comes back empty
pub const NO_STREAMS_MESSAGE: &str = "No IPTV streams found at the provided URL";

/// Body of a successful crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResponse {
    pub success: bool,
    pub streams: Vec<StreamEntry>,
    pub total_streams: usize,
    pub source_url: String,
    pub filter_applied: Option<String>,
}

impl From<CrawlResult> for CrawlResponse {
    fn from(result: CrawlResult) -> Self {
        Self {
            success: true,
            total_streams: result.total_streams(),
            streams: result.streams,
            source_url: result.source_url,
            filter_applied: result.filter_applied,
        }
    }
}

impl IntoResponse for CrawlResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `{ "success": false, "error": message }` with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": message.into(),
        })),
    )
        .into_response()
}

pub fn not_found(message: impl Into<String>) -> Response {
    error_response(StatusCode::NOT_FOUND, message)
}

/// Convert AppError to appropriate HTTP response
pub fn handle_error(error: AppError) -> Response {
    match error {
        AppError::Web(web_error) => handle_web_error(web_error),
        other => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal server error: {}", other),
        ),
    }
}

fn handle_web_error(error: WebError) -> Response {
    let status = match &error {
        WebError::UnsupportedContentType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        WebError::InvalidRequest { .. }
        | WebError::MissingField { .. }
        | WebError::JsonParse(_) => StatusCode::BAD_REQUEST,
    };
    let message = match error {
        WebError::UnsupportedContentType { .. } => {
            "Content-Type must be application/json. Please set the header: Content-Type: application/json"
                .to_string()
        }
        other => other.to_string(),
    };
    error_response(status, message)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_error(self)
    }
}
