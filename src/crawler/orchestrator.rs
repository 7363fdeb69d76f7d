//! Direct and discovery crawls with bounded candidate fan-out

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::CrawlerConfig;
use crate::fetcher::{FetchResult, PageFetcher};
use crate::models::{CrawlMode, CrawlRequest, CrawlResult, StreamEntry};
use crate::sources::{CandidateExtractor, PlaylistFetcher, StreamParser};
use crate::utils::http_client::HttpTransport;
use crate::utils::url::UrlUtils;

use super::dedup::dedupe;

/// Drives a crawl from a root URL to a deduplicated stream list
///
/// A root URL that already looks like a provider endpoint is fetched as a
/// playlist directly. Anything else is scanned for candidate endpoints, which
/// are fetched and parsed concurrently with a bounded number in flight.
///
/// Streams are merged in completion order, so with more than one candidate
/// the order of the final list is not stable across runs.
#[derive(Clone)]
pub struct CrawlOrchestrator {
    page_fetcher: PageFetcher,
    playlist_fetcher: PlaylistFetcher,
    extractor: CandidateExtractor,
    max_concurrency: usize,
}

impl CrawlOrchestrator {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &CrawlerConfig) -> Self {
        Self::with_fetchers(
            PageFetcher::for_pages(transport.clone(), config),
            PlaylistFetcher::new(PageFetcher::for_playlists(transport, config)),
            config.max_concurrent_fetches,
        )
    }

    pub fn with_fetchers(
        page_fetcher: PageFetcher,
        playlist_fetcher: PlaylistFetcher,
        max_concurrency: usize,
    ) -> Self {
        Self {
            page_fetcher,
            playlist_fetcher,
            extractor: CandidateExtractor::new(),
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub async fn crawl(&self, request: &CrawlRequest) -> CrawlResult {
        self.crawl_with_cancellation(request, CancellationToken::new())
            .await
    }

    /// Crawl, stopping early once `cancel` fires
    ///
    /// Cancellation prevents further candidates from being dispatched and
    /// abandons those in flight; streams already collected are returned.
    pub async fn crawl_with_cancellation(
        &self,
        request: &CrawlRequest,
        cancel: CancellationToken,
    ) -> CrawlResult {
        let span = info_span!("crawl", id = %Uuid::new_v4());
        async move {
            info!(
                "Starting crawl of {} (filter: {:?})",
                UrlUtils::obfuscate_credentials(&request.root_url),
                request.filter_keyword
            );

            let result = if UrlUtils::is_iptv_endpoint(&request.root_url) {
                self.crawl_direct(request, &cancel).await
            } else {
                self.crawl_discovery(request, &cancel).await
            };

            info!(
                "Crawl finished in {:?} mode: {} unique streams from {} candidates",
                result.mode,
                result.total_streams(),
                result.candidates_found
            );
            result
        }
        .instrument(span)
        .await
    }

    async fn crawl_direct(
        &self,
        request: &CrawlRequest,
        cancel: &CancellationToken,
    ) -> CrawlResult {
        debug!("Root URL is a provider endpoint, fetching it directly");
        let mut result = CrawlResult::empty(request, CrawlMode::Direct);
        result.candidates_found = 1;

        let streams = tokio::select! {
            biased;
            _ = cancel.cancelled() => Vec::new(),
            streams = self.harvest(&request.root_url, request.filter_keyword.as_deref()) => streams,
        };
        result.streams = dedupe(streams);
        result
    }

    async fn crawl_discovery(
        &self,
        request: &CrawlRequest,
        cancel: &CancellationToken,
    ) -> CrawlResult {
        let mut result = CrawlResult::empty(request, CrawlMode::Discovery);

        let root_url = UrlUtils::normalize(&request.root_url);
        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => return result,
            page = self.page_fetcher.fetch(&root_url) => page,
        };
        let html = match page {
            FetchResult::Fetched(content) => content.body,
            FetchResult::Failed(error) => {
                warn!("Could not fetch root page: {}", error);
                return result;
            }
        };

        let candidates = self.extractor.extract(&html);
        result.candidates_found = candidates.len();
        if candidates.is_empty() {
            info!("No candidate endpoints found on root page");
            return result;
        }
        info!(
            "Fetching {} candidates, {} at a time",
            candidates.len(),
            self.max_concurrency
        );

        let filter = request.filter_keyword.as_deref();
        let mut batches = stream::iter(candidates)
            .map(|candidate| async move {
                if cancel.is_cancelled() {
                    return Vec::new();
                }
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Vec::new(),
                    streams = self.harvest(&candidate, filter) => streams,
                }
            })
            .buffer_unordered(self.max_concurrency);

        let mut collected: Vec<StreamEntry> = Vec::new();
        while let Some(batch) = batches.next().await {
            collected.extend(batch);
        }

        result.streams = dedupe(collected);
        result
    }

    /// Fetch and parse one candidate; any failure yields no streams
    async fn harvest(&self, candidate: &str, filter: Option<&str>) -> Vec<StreamEntry> {
        let safe_url = UrlUtils::obfuscate_credentials(candidate);
        match self.playlist_fetcher.try_fetch_playlist(candidate).await {
            Ok(body) => {
                let streams = StreamParser::new(filter).parse(&body);
                debug!("{} streams from {}", streams.len(), safe_url);
                streams
            }
            Err(error) => {
                debug!("Skipping candidate {}: {}", safe_url, error);
                Vec::new()
            }
        }
    }
}
