#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use iptv_crawler::errors::{AttemptResult, FetchError};
use iptv_crawler::fetcher::HeaderProfile;
use iptv_crawler::utils::http_client::{HttpTransport, TransportResponse};

/// In-memory web: canned responses keyed by URL, everything else refuses
/// the connection
#[derive(Default)]
pub struct FakeWeb {
    pages: HashMap<String, (u16, String, Option<Duration>)>,
    requests: Mutex<Vec<String>>,
}

impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), (200, body.to_string(), None));
        self
    }

    pub fn slow_page(mut self, url: &str, body: &str, delay: Duration) -> Self {
        self.pages
            .insert(url.to_string(), (200, body.to_string(), Some(delay)));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), (status, String::new(), None));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }

    async fn respond(&self, url: &str, with_body: bool) -> AttemptResult<TransportResponse> {
        self.requests.lock().unwrap().push(url.to_string());

        let Some((status, body, delay)) = self.pages.get(url).cloned() else {
            return Err(FetchError::network(url, "connection refused"));
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let success = (200..300).contains(&status);
        Ok(TransportResponse {
            status,
            content_type: Some("text/plain".to_string()),
            body: if with_body && success { body } else { String::new() },
        })
    }
}

#[async_trait]
impl HttpTransport for FakeWeb {
    async fn get(
        &self,
        url: &str,
        _profile: &HeaderProfile,
        _timeout: Duration,
    ) -> AttemptResult<TransportResponse> {
        self.respond(url, true).await
    }

    async fn head(
        &self,
        url: &str,
        _profile: &HeaderProfile,
        _timeout: Duration,
    ) -> AttemptResult<TransportResponse> {
        self.respond(url, false).await
    }

    async fn open(
        &self,
        url: &str,
        _profile: &HeaderProfile,
        _timeout: Duration,
    ) -> AttemptResult<TransportResponse> {
        self.respond(url, false).await
    }
}

pub fn playlist(entries: &[(&str, &str)]) -> String {
    let mut text = String::from("#EXTM3U\n");
    for (name, url) in entries {
        text.push_str(&format!("#EXTINF:-1,{name}\n{url}\n"));
    }
    text
}
