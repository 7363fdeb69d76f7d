//! Resilient page and playlist fetching
//!
//! A [`PageFetcher`] walks an ordered list of [`FetchStrategy`] values, one
//! attempt per strategy, until a request returns a successful status. A TLS
//! failure on an `https://` URL earns one extra attempt over plain `http://`
//! with the same headers before the next strategy is tried.
//!
//! Nothing in here fails loudly: every transport, status and timeout error is
//! absorbed and logged, and the caller only sees a [`FetchResult`].

pub mod profiles;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::CrawlerConfig;
use crate::errors::{AttemptResult, FetchError};
use crate::utils::http_client::HttpTransport;
use crate::utils::url::UrlUtils;

pub use profiles::HeaderProfile;

/// One step of the retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchStrategy {
    pub profile: HeaderProfile,
    /// Retry over `http://` when the `https://` attempt fails TLS
    pub downgrade_on_tls: bool,
}

impl FetchStrategy {
    pub fn new(profile: HeaderProfile) -> Self {
        Self {
            profile,
            downgrade_on_tls: true,
        }
    }

    pub fn from_profiles(profiles: &[HeaderProfile]) -> Vec<Self> {
        profiles.iter().copied().map(Self::new).collect()
    }
}

/// Body of a successful fetch plus how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    pub body: String,
    /// The URL that actually answered, which differs from the requested one
    /// after a scheme downgrade
    pub url: String,
    pub profile: &'static str,
    pub attempts: usize,
}

/// Outcome of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Fetched(FetchedContent),
    Failed(FetchError),
}

impl FetchResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Fetched(content) => Some(&content.body),
            Self::Failed(_) => None,
        }
    }

    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Fetched(content) => Some(content.body),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Fetched(_) => None,
            Self::Failed(error) => Some(error),
        }
    }

    pub fn attempts(&self) -> usize {
        match self {
            Self::Fetched(content) => content.attempts,
            Self::Failed(FetchError::AllStrategiesFailed { attempts, .. }) => *attempts,
            Self::Failed(_) => 0,
        }
    }
}

/// Fetches a URL through an ordered list of strategies
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn HttpTransport>,
    strategies: Vec<FetchStrategy>,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        strategies: Vec<FetchStrategy>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            strategies,
            timeout,
        }
    }

    /// Fetcher for HTML pages that will be scanned for candidates
    pub fn for_pages(transport: Arc<dyn HttpTransport>, config: &CrawlerConfig) -> Self {
        Self::new(
            transport,
            FetchStrategy::from_profiles(profiles::PAGE_PROFILES),
            config.page_timeout(),
        )
    }

    /// Fetcher for candidate playlist URLs
    pub fn for_playlists(transport: Arc<dyn HttpTransport>, config: &CrawlerConfig) -> Self {
        Self::new(
            transport,
            FetchStrategy::from_profiles(profiles::PLAYLIST_PROFILES),
            config.playlist_timeout(),
        )
    }

    /// Upper bound on requests a single `fetch` can issue
    pub fn max_attempts(&self) -> usize {
        self.strategies
            .iter()
            .map(|s| if s.downgrade_on_tls { 2 } else { 1 })
            .sum()
    }

    /// Fetch `url`, returning the first successful body
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        let mut attempts = 0;

        for strategy in &self.strategies {
            attempts += 1;
            let error = match self.attempt(url, &strategy.profile).await {
                Ok(body) => return self.fetched(body, url, strategy, attempts),
                Err(error) => error,
            };
            debug!(
                "Strategy '{}' failed for {}: {}",
                strategy.profile.name, safe_url, error
            );

            if !(error.is_tls() && strategy.downgrade_on_tls) {
                continue;
            }
            let Some(http_url) = UrlUtils::downgrade_scheme(url) else {
                continue;
            };

            attempts += 1;
            match self.attempt(&http_url, &strategy.profile).await {
                Ok(body) => {
                    debug!("Recovered {} over plain http", safe_url);
                    return self.fetched(body, &http_url, strategy, attempts);
                }
                Err(error) => debug!(
                    "Plain http retry with '{}' failed for {}: {}",
                    strategy.profile.name, safe_url, error
                ),
            }
        }

        warn!(
            "All {} request strategies failed for {}",
            self.strategies.len(),
            safe_url
        );
        FetchResult::Failed(FetchError::AllStrategiesFailed {
            url: safe_url,
            attempts,
        })
    }

    async fn attempt(&self, url: &str, profile: &HeaderProfile) -> AttemptResult<String> {
        let response = self.transport.get(url, profile, self.timeout).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(FetchError::status(
                UrlUtils::obfuscate_credentials(url),
                response.status,
            ))
        }
    }

    fn fetched(
        &self,
        body: String,
        url: &str,
        strategy: &FetchStrategy,
        attempts: usize,
    ) -> FetchResult {
        FetchResult::Fetched(FetchedContent {
            body,
            url: url.to_string(),
            profile: strategy.profile.name,
            attempts,
        })
    }
}
