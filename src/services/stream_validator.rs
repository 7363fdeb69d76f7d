//! Stream liveness checks
//!
//! A cheap probe used by the player front end before it tries to play a
//! stream: HEAD first, then a ranged GET for servers that reject HEAD. The
//! body is never downloaded.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ValidationConfig;
use crate::fetcher::profiles::MEDIA_PROBE;
use crate::utils::http_client::{HttpTransport, TransportResponse};
use crate::utils::url::UrlUtils;

const MEDIA_EXTENSIONS: &[&str] = &[".m3u8", ".m3u", ".mp4", ".ts", ".mpd"];
const MEDIA_CONTENT_TYPES: &[&str] = &["video/", "audio/", "application/", "text/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    Working,
    Broken,
}

/// Result of probing one stream URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamCheck {
    pub url: String,
    pub status: StreamStatus,
    pub content_type: Option<String>,
    /// Milliseconds until the probe answered or gave up
    pub response_time: u64,
}

/// Probes stream URLs with bounded concurrency
#[derive(Clone)]
pub struct StreamValidator {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    max_concurrent: usize,
}

impl StreamValidator {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &ValidationConfig) -> Self {
        Self {
            transport,
            timeout: config.timeout(),
            max_concurrent: config.max_concurrent.max(1),
        }
    }

    pub async fn validate(&self, url: &str) -> StreamCheck {
        let started = Instant::now();
        let response = self.probe(url).await;
        let response_time = started.elapsed().as_millis() as u64;

        let (status, content_type) = match response {
            Some(response) if is_working(&response, url) => {
                (StreamStatus::Working, response.content_type)
            }
            Some(response) => (StreamStatus::Broken, response.content_type),
            None => (StreamStatus::Broken, None),
        };

        debug!(
            "Validated {}: {:?} in {}ms",
            UrlUtils::obfuscate_credentials(url),
            status,
            response_time
        );

        StreamCheck {
            url: url.to_string(),
            status,
            content_type,
            response_time,
        }
    }

    /// Status of every distinct URL in `urls`
    pub async fn validate_many(&self, urls: Vec<String>) -> HashMap<String, StreamStatus> {
        stream::iter(urls)
            .map(|url| async move {
                let check = self.validate(&url).await;
                (check.url, check.status)
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await
    }

    /// HEAD, falling back to a ranged GET when HEAD fails or is refused
    async fn probe(&self, url: &str) -> Option<TransportResponse> {
        match self.transport.head(url, &MEDIA_PROBE, self.timeout).await {
            Ok(response) if response.status < 400 => return Some(response),
            Ok(response) => debug!("HEAD refused with {}, retrying with GET", response.status),
            Err(e) => debug!("HEAD failed: {}", e),
        }

        self.transport
            .open(url, &MEDIA_PROBE, self.timeout)
            .await
            .ok()
    }
}

fn is_working(response: &TransportResponse, url: &str) -> bool {
    if response.status >= 400 {
        return false;
    }
    if response.status == 200 || response.status == 206 {
        return true;
    }

    let media_type = response
        .content_type
        .as_deref()
        .map(|ct| ct.to_ascii_lowercase())
        .is_some_and(|ct| MEDIA_CONTENT_TYPES.iter().any(|prefix| ct.starts_with(prefix)));

    media_type || has_media_extension(url)
}

fn has_media_extension(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    MEDIA_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
