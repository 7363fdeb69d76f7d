//! Candidate playlist download and format check

use tracing::{debug, info};

use crate::errors::FetchError;
use crate::fetcher::{FetchResult, PageFetcher};
use crate::utils::url::UrlUtils;

use super::m3u::is_playlist_content;

/// Downloads candidate playlists and keeps only real M3U content
///
/// Wraps a [`PageFetcher`] configured with the playlist header profiles and
/// timeout. Unreachable candidates and non-playlist bodies both come back as
/// `None`.
#[derive(Clone)]
pub struct PlaylistFetcher {
    fetcher: PageFetcher,
}

impl PlaylistFetcher {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn fetch_playlist(&self, candidate_url: &str) -> Option<String> {
        self.try_fetch_playlist(candidate_url).await.ok()
    }

    /// Same as [`fetch_playlist`](Self::fetch_playlist) but keeps the reason
    /// a candidate was discarded
    pub async fn try_fetch_playlist(&self, candidate_url: &str) -> Result<String, FetchError> {
        let url = UrlUtils::normalize(candidate_url);
        let safe_url = UrlUtils::obfuscate_credentials(&url);
        debug!("Fetching playlist {}", safe_url);

        let body = match self.fetcher.fetch(&url).await {
            FetchResult::Fetched(content) => content.body,
            FetchResult::Failed(error) => return Err(error),
        };

        if is_playlist_content(&body) {
            info!("Fetched playlist {} ({} bytes)", safe_url, body.len());
            Ok(body)
        } else {
            info!("Discarding {}: not a playlist", safe_url);
            Err(FetchError::FormatRejected { url: safe_url })
        }
    }
}
