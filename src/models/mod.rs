//! Core crawl data types

use serde::{Deserialize, Serialize};

/// A single playable channel discovered in a playlist
///
/// `url` is the identity of an entry: two entries with the same URL are the
/// same stream regardless of name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEntry {
    pub name: String,
    pub url: String,
}

impl StreamEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Placeholder name for an entry without recoverable metadata
    pub fn placeholder_name(position: usize) -> String {
        format!("Channel {}", position)
    }
}

/// Input to a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub root_url: String,
    pub filter_keyword: Option<String>,
}

impl CrawlRequest {
    /// Build a request, treating a blank filter as no filter
    pub fn new(root_url: impl Into<String>, filter_keyword: Option<String>) -> Self {
        Self {
            root_url: root_url.into().trim().to_string(),
            filter_keyword: filter_keyword
                .map(|keyword| keyword.trim().to_string())
                .filter(|keyword| !keyword.is_empty()),
        }
    }
}

/// How the orchestrator approached the root URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// The root URL was itself a provider playlist endpoint
    Direct,
    /// The root URL was scanned for candidate endpoints
    Discovery,
}

/// Outcome of a crawl
///
/// An empty `streams` list is the uniform negative outcome: unreachable root,
/// no candidates and no parsable playlists all end up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub streams: Vec<StreamEntry>,
    pub source_url: String,
    pub filter_applied: Option<String>,
    pub mode: CrawlMode,
    pub candidates_found: usize,
}

impl CrawlResult {
    pub fn empty(request: &CrawlRequest, mode: CrawlMode) -> Self {
        Self {
            streams: Vec::new(),
            source_url: request.root_url.clone(),
            filter_applied: request.filter_keyword.clone(),
            mode,
            candidates_found: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn total_streams(&self) -> usize {
        self.streams.len()
    }
}
