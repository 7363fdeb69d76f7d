//! M3U playlist recognition and parsing
//!
//! Provider playlists are extended M3U: an `#EXTINF:` metadata line followed
//! by the stream URL. The parser is deliberately forgiving. Unknown lines are
//! skipped, a URL without metadata still yields an entry, and nothing here
//! ever fails.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::models::StreamEntry;
use crate::utils::url::UrlUtils;

/// Playlist header marker
pub const EXTM3U_MARKER: &str = "#EXTM3U";
/// Entry-info marker
pub const EXTINF_MARKER: &str = "#EXTINF:";

/// Non-empty lines inspected by the format check
const FORMAT_PROBE_LINES: usize = 10;
/// Lines above a stream URL searched for the filter keyword
const FILTER_LOOKBACK_LINES: usize = 5;

fn tvg_name_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"tvg-name="([^"]*)""#).ok())
        .as_ref()
}

/// Whether `content` looks like an M3U playlist
///
/// Accepted iff one of the first ten non-empty lines, once trimmed, starts
/// with `#EXTM3U` or `#EXTINF:`. Markers are case-sensitive.
pub fn is_playlist_content(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(FORMAT_PROBE_LINES)
        .any(|line| line.starts_with(EXTM3U_MARKER) || line.starts_with(EXTINF_MARKER))
}

/// Display name carried by an `#EXTINF:` line, if any
///
/// The `tvg-name` attribute wins; otherwise the text after the last comma.
fn extinf_display_name(line: &str) -> Option<String> {
    let name = match tvg_name_regex().and_then(|re| re.captures(line)) {
        Some(captures) => captures.get(1).map(|m| m.as_str().to_string()),
        None => line.rsplit_once(',').map(|(_, title)| title.trim().to_string()),
    };
    name.filter(|name| !name.is_empty())
}

/// Turns playlist text into stream entries
///
/// Keeps a single pending-name register: an `#EXTINF:` line loads it, an
/// emitted entry consumes it. A URL dropped by the keyword filter leaves the
/// register untouched.
#[derive(Debug, Default, Clone)]
pub struct StreamParser {
    filter: Option<String>,
}

impl StreamParser {
    pub fn new(filter_keyword: Option<&str>) -> Self {
        Self {
            filter: filter_keyword
                .map(str::trim)
                .filter(|keyword| !keyword.is_empty())
                .map(str::to_lowercase),
        }
    }

    /// Entries in file order; duplicate URLs are kept
    pub fn parse(&self, content: &str) -> Vec<StreamEntry> {
        let lines: Vec<&str> = content.lines().collect();
        let mut streams: Vec<StreamEntry> = Vec::new();
        let mut pending_name: Option<String> = None;
        let mut filtered_out = 0usize;

        for (index, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with(EXTINF_MARKER) {
                pending_name = extinf_display_name(line);
                continue;
            }

            if !UrlUtils::is_http_url(line) {
                continue;
            }

            if !self.passes_filter(&lines, index) {
                filtered_out += 1;
                continue;
            }

            let name = pending_name
                .take()
                .unwrap_or_else(|| StreamEntry::placeholder_name(streams.len() + 1));
            streams.push(StreamEntry::new(name, line));
        }

        debug!(
            "Parsed {} streams ({} filtered out)",
            streams.len(),
            filtered_out
        );
        streams
    }

    /// Case-insensitive keyword search over the raw lines just above `index`
    fn passes_filter(&self, lines: &[&str], index: usize) -> bool {
        let Some(keyword) = &self.filter else {
            return true;
        };

        let start = index.saturating_sub(FILTER_LOOKBACK_LINES);
        lines[start..index]
            .iter()
            .any(|line| line.to_lowercase().contains(keyword.as_str()))
    }
}
