//! Byte-for-byte stream pass-through.
//!
//! Browsers cannot play most provider streams directly: the upstream sends no
//! CORS headers, and some servers only answer media players. This proxy
//! re-issues the request with a media-player header set and streams the
//! upstream body back unchanged.
//!
//! Key behaviors:
//!   - Connect timeout from `proxy.connect_timeout_secs`; the request timeout
//!     only bounds the wait for response headers, never the body, so live
//!     streams stay open.
//!   - Client `Range` is forwarded, defaulting to `bytes=0-`.
//!   - 200 and 206 are passed through with their status; any other upstream
//!     status is reported as a JSON error carrying that status.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::ProxyConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::url::UrlUtils;

const DEFAULT_RANGE: &str = "bytes=0-";
const DEFAULT_CONTENT_TYPE: &str = "video/mp4";

/// Per-request switches taken from the query string
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamProxyOptions {
    /// Ask the upstream and any intermediaries not to serve cached data
    pub no_cache: bool,
}

/// Streams upstream media to the client
#[derive(Clone)]
pub struct HttpStreamProxy {
    client: Client,
    user_agent: String,
    request_timeout: Duration,
}

impl HttpStreamProxy {
    pub fn new(config: &ProxyConfig, accept_invalid_certs: bool) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .danger_accept_invalid_certs(accept_invalid_certs)
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create proxy client: {e}")))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            request_timeout: config.request_timeout(),
        })
    }

    fn upstream_headers(
        &self,
        request_headers: &HeaderMap,
        options: StreamProxyOptions,
    ) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(header::USER_AGENT, v);
        }
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let range = request_headers
            .get(header::RANGE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_RANGE));
        headers.insert(header::RANGE, range);

        if options.no_cache {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        }

        headers
    }

    /// Proxy `stream_url` to the caller
    ///
    /// Never fails: upstream problems are turned into JSON error responses.
    pub async fn proxy(
        &self,
        stream_url: &str,
        request_headers: &HeaderMap,
        options: StreamProxyOptions,
    ) -> Response<Body> {
        let safe_url = UrlUtils::obfuscate_credentials(stream_url);
        info!("Proxying upstream stream: {}", safe_url);

        let request = self
            .client
            .get(stream_url)
            .headers(self.upstream_headers(request_headers, options))
            .send();

        let upstream_resp = match tokio::time::timeout(self.request_timeout, request).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => {
                error!("Failed to connect to upstream {}: {}", safe_url, e);
                return error_response(
                    StatusCode::BAD_GATEWAY,
                    "Proxy error: failed to connect to upstream",
                );
            }
            Err(_) => {
                error!(
                    "Upstream {} did not answer within {:?}",
                    safe_url, self.request_timeout
                );
                return error_response(
                    StatusCode::GATEWAY_TIMEOUT,
                    "Proxy error: upstream timed out",
                );
            }
        };

        let status = upstream_resp.status();
        if status != StatusCode::OK && status != StatusCode::PARTIAL_CONTENT {
            error!("Upstream responded with status {} for {}", status, safe_url);
            return error_response(status, &format!("Failed to proxy video: {}", status.as_u16()));
        }

        let upstream_headers = upstream_resp.headers().clone();
        let content_type = upstream_headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let content_length = upstream_resp.content_length();

        debug!(
            "Upstream accepted: status={} ct={} cl={:?} url={}",
            status, content_type, content_length, safe_url
        );

        let body = Body::from_stream(upstream_resp.bytes_stream());

        let mut builder = Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS")
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Range");

        if let Some(len) = content_length {
            builder = builder.header(header::CONTENT_LENGTH, len);
        }
        if let Some(range) = upstream_headers.get(header::CONTENT_RANGE) {
            builder = builder.header(header::CONTENT_RANGE, range);
        }

        match builder.body(body) {
            Ok(response) => {
                info!("Streaming proxy established for {}", safe_url);
                response
            }
            Err(e) => {
                error!("Failed building response object: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response")
            }
        }
    }
}

/// JSON error body with permissive CORS, as the player expects
pub fn error_response(status: StatusCode, msg: &str) -> Response<Body> {
    let payload = json!({ "error": msg }).to_string();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(payload))
        .unwrap_or_else(|_| {
            let mut fallback = Response::new(Body::from("internal error"));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
