//! Outbound HTTP for the crawl pipeline
//!
//! The [`HttpTransport`] trait is the only way the crawler touches the
//! network; [`ReqwestTransport`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, RequestBuilder};
use tracing::debug;

use crate::config::CrawlerConfig;
use crate::errors::{AppError, AppResult, AttemptResult, FetchError};
use crate::fetcher::profiles::HeaderProfile;
use crate::utils::url::UrlUtils;

/// What came back from a single request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// Decoded text body; only read for successful GET requests
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam of the fetch pipeline
///
/// Every outbound request made by the crawler goes through this trait so the
/// retry policy can be exercised against a scripted transport in tests.
/// Implementations return `Ok` for any HTTP response, whatever its status,
/// and `Err` only when no response was obtained.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` with the profile's headers and a per-attempt timeout
    async fn get(
        &self,
        url: &str,
        profile: &HeaderProfile,
        timeout: Duration,
    ) -> AttemptResult<TransportResponse>;

    /// HEAD `url`; the returned body is always empty
    async fn head(
        &self,
        url: &str,
        profile: &HeaderProfile,
        timeout: Duration,
    ) -> AttemptResult<TransportResponse>;

    /// GET `url` but stop once the headers arrive; the body is left unread
    async fn open(
        &self,
        url: &str,
        profile: &HeaderProfile,
        timeout: Duration,
    ) -> AttemptResult<TransportResponse>;
}

/// reqwest-backed transport shared by every fetcher
///
/// Built once from `CrawlerConfig` and never mutated afterwards; header
/// profiles travel with each request instead of living in client defaults.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &CrawlerConfig) -> AppResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn apply_profile(mut request: RequestBuilder, profile: &HeaderProfile) -> RequestBuilder {
        for (name, value) in profile.headers {
            request = request.header(*name, *value);
        }
        request
    }

    async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
        read_body: bool,
    ) -> AttemptResult<TransportResponse> {
        let response = request.send().await.map_err(|e| classify_error(url, &e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = if read_body && status.is_success() {
            response.text().await.map_err(|e| classify_error(url, &e))?
        } else {
            String::new()
        };

        debug!(
            "{} -> {} ({} bytes)",
            UrlUtils::obfuscate_credentials(url),
            status,
            body.len()
        );

        Ok(TransportResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        profile: &HeaderProfile,
        timeout: Duration,
    ) -> AttemptResult<TransportResponse> {
        let request = Self::apply_profile(self.client.get(url), profile).timeout(timeout);
        self.send(request, url, true).await
    }

    async fn head(
        &self,
        url: &str,
        profile: &HeaderProfile,
        timeout: Duration,
    ) -> AttemptResult<TransportResponse> {
        let request = Self::apply_profile(self.client.head(url), profile).timeout(timeout);
        self.send(request, url, false).await
    }

    async fn open(
        &self,
        url: &str,
        profile: &HeaderProfile,
        timeout: Duration,
    ) -> AttemptResult<TransportResponse> {
        let request = Self::apply_profile(self.client.get(url), profile).timeout(timeout);
        self.send(request, url, false).await
    }
}

/// Map a reqwest failure onto the attempt taxonomy
///
/// reqwest does not expose TLS failures as a distinct kind, so the error
/// chain is inspected for handshake and certificate wording.
fn classify_error(url: &str, error: &reqwest::Error) -> FetchError {
    let safe_url = UrlUtils::obfuscate_credentials(url);
    if error.is_timeout() {
        return FetchError::timeout(safe_url);
    }

    let chain = error_chain_text(error);
    let message = UrlUtils::obfuscate_credentials(&chain);
    if looks_like_tls_failure(&chain) {
        FetchError::tls(safe_url, message)
    } else {
        FetchError::network(safe_url, message)
    }
}

fn error_chain_text(error: &(dyn std::error::Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

fn looks_like_tls_failure(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_wording_detection() {
        assert!(looks_like_tls_failure(
            "error trying to connect: invalid peer certificate: Expired"
        ));
        assert!(looks_like_tls_failure("SSL routines:ssl3_get_record:wrong version number"));
        assert!(looks_like_tls_failure("TLS handshake eof"));
        assert!(!looks_like_tls_failure("connection refused"));
        assert!(!looks_like_tls_failure("dns error: no record found"));
    }

    #[test]
    fn test_success_range() {
        let mut response = TransportResponse {
            status: 200,
            ..Default::default()
        };
        assert!(response.is_success());
        response.status = 204;
        assert!(response.is_success());
        response.status = 301;
        assert!(!response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }

    #[test]
    fn test_transport_builds_from_config() {
        assert!(ReqwestTransport::new(&CrawlerConfig::default()).is_ok());
    }
}
