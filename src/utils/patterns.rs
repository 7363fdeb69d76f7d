//! Ordered regex tables
//!
//! Scraping heuristics are kept as plain data: a list of pattern sources in
//! priority order, compiled once and shared. A source that fails to compile is
//! logged and skipped so one bad entry never disables the whole table.

use regex::Regex;
use tracing::warn;

/// A compiled, ordered pattern table
#[derive(Debug)]
pub struct PatternTable {
    name: &'static str,
    patterns: Vec<Regex>,
}

impl PatternTable {
    /// Compile `sources` in order, skipping any that are invalid
    pub fn compile(name: &'static str, sources: &[&str]) -> Self {
        let patterns = sources
            .iter()
            .filter_map(|source| match Regex::new(source) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Skipping invalid pattern in table '{}': {}", name, e);
                    None
                }
            })
            .collect();

        Self { name, patterns }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First match of the highest-priority pattern that matches at all
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.patterns
            .iter()
            .find_map(|re| re.find(text).map(|m| m.as_str()))
    }

    /// Every match of every pattern, in table order then text order
    pub fn all_matches<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.patterns
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| m.as_str()))
            .collect()
    }
}
