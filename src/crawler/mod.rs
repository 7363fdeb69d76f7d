//! Crawl orchestration
//!
//! Ties the fetcher, the candidate extractor and the playlist parser into a
//! single `crawl` operation whose only negative outcome is an empty result.

pub mod dedup;
pub mod orchestrator;

pub use dedup::dedupe;
pub use orchestrator::CrawlOrchestrator;
