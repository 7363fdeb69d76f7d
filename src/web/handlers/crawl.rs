//! Crawl endpoint

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::{AppError, WebError, WebResult};
use crate::models::CrawlRequest;
use crate::utils::url::UrlUtils;
use crate::web::responses::{handle_error, not_found, CrawlResponse, NO_STREAMS_MESSAGE};
use crate::web::AppState;

/// JSON body accepted by `POST /crawl`
#[derive(Debug, Deserialize)]
pub struct CrawlRequestBody {
    pub url: Option<String>,
    pub filter: Option<String>,
}

/// Validate content type and body before any crawl work starts
fn parse_crawl_request(headers: &HeaderMap, body: &[u8]) -> WebResult<CrawlRequest> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type
        .to_ascii_lowercase()
        .starts_with("application/json")
    {
        return Err(WebError::unsupported_content_type(content_type));
    }

    let parsed: CrawlRequestBody = serde_json::from_slice(body)?;
    let url = parsed
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| WebError::missing_field("url"))?;

    Ok(CrawlRequest::new(url, parsed.filter))
}

/// Crawl a URL for IPTV streams
pub async fn crawl(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let request = match parse_crawl_request(&headers, &body) {
        Ok(request) => request,
        Err(e) => return handle_error(e.into()),
    };

    info!(
        "Crawl requested for {}",
        UrlUtils::obfuscate_credentials(&request.root_url)
    );

    // Own task so a panic deep in the pipeline becomes a 500 instead of a dropped connection
    let orchestrator = state.orchestrator.clone();
    let outcome = tokio::spawn(async move { orchestrator.crawl(&request).await }).await;

    match outcome {
        Ok(result) if result.is_empty() => not_found(NO_STREAMS_MESSAGE),
        Ok(result) => CrawlResponse::from(result).into_response(),
        Err(e) => {
            error!("Crawl task failed: {}", e);
            handle_error(AppError::internal(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_rejects_non_json_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let err = parse_crawl_request(&headers, br#"{"url":"http://a.test"}"#).unwrap_err();
        assert!(matches!(err, WebError::UnsupportedContentType { .. }));

        let err = parse_crawl_request(&HeaderMap::new(), b"{}").unwrap_err();
        assert!(matches!(err, WebError::UnsupportedContentType { .. }));
    }

    #[test]
    fn test_requires_url() {
        let err = parse_crawl_request(&json_headers(), br#"{"filter":"news"}"#).unwrap_err();
        assert!(matches!(err, WebError::MissingField { ref field } if field == "url"));

        let err = parse_crawl_request(&json_headers(), br#"{"url":"  "}"#).unwrap_err();
        assert!(matches!(err, WebError::MissingField { .. }));

        let err = parse_crawl_request(&json_headers(), b"not json").unwrap_err();
        assert!(matches!(err, WebError::JsonParse(_)));
    }

    #[test]
    fn test_accepts_charset_suffix_and_blank_filter() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        let request =
            parse_crawl_request(&headers, br#"{"url":"http://a.test","filter":""}"#).unwrap();
        assert_eq!(request.root_url, "http://a.test");
        assert_eq!(request.filter_keyword, None);
    }
}
