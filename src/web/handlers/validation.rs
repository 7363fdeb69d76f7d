//! Stream validation endpoints used by the player

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::WebError;
use crate::web::responses::handle_error;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateStreamRequest {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateStreamsRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Map an axum body rejection onto the boundary error taxonomy
fn rejection_error(rejection: JsonRejection) -> WebError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            WebError::unsupported_content_type("non-JSON request body")
        }
        other => WebError::invalid_request("body", other.body_text()),
    }
}

/// Probe one stream
pub async fn validate_stream(
    State(state): State<AppState>,
    body: Result<Json<ValidateStreamRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return handle_error(rejection_error(rejection).into()),
    };
    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return handle_error(WebError::missing_field("url").into());
    };

    let check = state.validator.validate(url.trim()).await;
    Json(json!({
        "success": true,
        "url": check.url,
        "status": check.status,
        "content_type": check.content_type,
        "response_time": check.response_time,
    }))
    .into_response()
}

/// Probe a batch of streams
pub async fn validate_streams(
    State(state): State<AppState>,
    body: Result<Json<ValidateStreamsRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return handle_error(rejection_error(rejection).into()),
    };
    if request.urls.is_empty() {
        return handle_error(WebError::missing_field("urls").into());
    }

    let results = state.validator.validate_many(request.urls).await;
    Json(json!({
        "success": true,
        "results": results,
    }))
    .into_response()
}
