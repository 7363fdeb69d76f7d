//! Candidate endpoint discovery in HTML pages
//!
//! Blog posts and paste sites publish provider logins as prose, as links and
//! inside scripts. The extractor runs one ordered pattern table over all
//! three and returns every distinct match, most specific patterns first.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::utils::patterns::PatternTable;
use crate::utils::url::UrlUtils;

/// Endpoint patterns, most specific first
const CANDIDATE_PATTERNS: &[&str] = &[
    // generation path, both credentials, explicit playlist type
    r#"(?i)https?://[^\s<>"]*get\.php\?[^\s<>"]*username=[^\s<>"]*&password=[^\s<>"]*&type=m3u[^\s<>"]*"#,
    r#"(?i)https?://[^\s<>"]*get\.php\?[^\s<>"]*password=[^\s<>"]*&username=[^\s<>"]*&type=m3u[^\s<>"]*"#,
    r#"(?i)https?://[^\s<>"]*get\.php\?[^\s<>"]*type=m3u[^\s<>"]*"#,
    // generation path on the usual panel ports, then anywhere
    r#"(?i)https?://[^\s<>"]*:8080/get\.php\?[^\s<>"]*"#,
    r#"(?i)https?://[^\s<>"]*:80/get\.php\?[^\s<>"]*"#,
    r#"(?i)https?://[^\s<>"]*get\.php\?[^\s<>"]*"#,
    // any URL on a panel port
    r#"(?i)https?://[^\s<>"]*:8080/[^\s<>"]*"#,
    r#"(?i)https?://[^\s<>"]*:80/[^\s<>"]*"#,
    // both credentials, any path
    r#"(?i)https?://[^\s<>"]*\?[^\s<>"]*username=[^\s<>"]*&password=[^\s<>"]*"#,
    r#"(?i)https?://[^\s<>"]*\?[^\s<>"]*password=[^\s<>"]*&username=[^\s<>"]*"#,
];

fn candidate_patterns() -> &'static PatternTable {
    static TABLE: OnceLock<PatternTable> = OnceLock::new();
    TABLE.get_or_init(|| PatternTable::compile("candidates", CANDIDATE_PATTERNS))
}

fn trailing_junk() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\-.:/?=&%]+$").ok()).as_ref()
}

/// Extracts candidate playlist endpoints from page markup
#[derive(Debug, Default, Clone, Copy)]
pub struct CandidateExtractor;

impl CandidateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// All distinct candidate URLs in `html`, first-seen order
    ///
    /// Sources are scanned in a fixed order: visible text, then hyperlink
    /// targets, then inline scripts.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let patterns = candidate_patterns();
        let mut raw: Vec<String> = Vec::new();

        for source in Self::scan_sources(html) {
            raw.extend(patterns.all_matches(&source).into_iter().map(str::to_string));
        }

        let candidates = Self::clean(raw);
        debug!("Found {} unique candidate URLs", candidates.len());
        candidates
    }

    /// Text blobs to scan, in priority order
    fn scan_sources(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut sources = vec![document.root_element().text().collect::<String>()];

        if let Ok(links) = Selector::parse("a[href]") {
            sources.extend(
                document
                    .select(&links)
                    .filter_map(|a| a.value().attr("href"))
                    .map(str::to_string),
            );
        }

        if let Ok(scripts) = Selector::parse("script:not([src])") {
            sources.extend(
                document
                    .select(&scripts)
                    .map(|script| script.text().collect::<String>())
                    .filter(|text| !text.trim().is_empty()),
            );
        }

        sources
    }

    /// Trim, strip trailing junk, drop non-HTTP matches and dedupe
    fn clean(raw: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for candidate in raw {
            let trimmed = candidate.trim();
            let cleaned = match trailing_junk() {
                Some(re) => re.replace(trimmed, "").into_owned(),
                None => trimmed.to_string(),
            };

            if !UrlUtils::is_http_url(&cleaned) {
                continue;
            }
            if seen.insert(cleaned.clone()) {
                unique.push(cleaned);
            }
        }

        unique
    }
}
