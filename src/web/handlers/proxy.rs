//! Video pass-through endpoint

use std::borrow::Cow;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Deserialize;

use crate::proxy::http_stream::error_response;
use crate::proxy::StreamProxyOptions;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct ProxyVideoParams {
    pub url: Option<String>,
    /// `true` adds no-cache request headers
    pub headers: Option<String>,
    /// Accepted for player compatibility; the media-player agent is always used
    pub vlc: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Proxy a video stream to bypass CORS and picky upstreams
pub async fn proxy_video(
    State(state): State<AppState>,
    Query(params): Query<ProxyVideoParams>,
    headers: HeaderMap,
) -> Response {
    let Some(url) = params.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "No URL provided");
    };

    // players frequently double-encode the target
    let url = urlencoding::decode(url).unwrap_or(Cow::Borrowed(url));

    let options = StreamProxyOptions {
        no_cache: flag(&params.headers),
    };
    state.stream_proxy.proxy(url.trim(), &headers, options).await
}
