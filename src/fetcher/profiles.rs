//! Request header profiles
//!
//! Providers and blog hosts block or degrade some clients. Each profile
//! impersonates a different client family; fetchers walk a fixed list of
//! them until one gets through.

const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const MINIMAL_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const GOOGLEBOT_UA: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ANY_ACCEPT: &str = "*/*";

/// A named set of request headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderProfile {
    pub name: &'static str,
    pub headers: &'static [(&'static str, &'static str)],
}

impl HeaderProfile {
    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    pub fn user_agent(&self) -> Option<&'static str> {
        self.header("User-Agent")
    }
}

/// Full desktop browser asking for HTML
pub const BROWSER: HeaderProfile = HeaderProfile {
    name: "browser",
    headers: &[
        ("User-Agent", CHROME_UA),
        ("Accept", HTML_ACCEPT),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Connection", "keep-alive"),
        ("Upgrade-Insecure-Requests", "1"),
    ],
};

/// Bare client with a truncated user agent
pub const MINIMAL: HeaderProfile = HeaderProfile {
    name: "minimal",
    headers: &[
        ("User-Agent", MINIMAL_UA),
        ("Accept", ANY_ACCEPT),
        ("Connection", "keep-alive"),
    ],
};

/// Search engine crawler asking for HTML
pub const CRAWLER: HeaderProfile = HeaderProfile {
    name: "crawler",
    headers: &[
        ("User-Agent", GOOGLEBOT_UA),
        ("Accept", HTML_ACCEPT),
        ("Accept-Language", "en-US,en;q=0.5"),
    ],
};

/// Desktop browser accepting anything, for playlist downloads
pub const PLAYLIST_BROWSER: HeaderProfile = HeaderProfile {
    name: "playlist-browser",
    headers: &[
        ("User-Agent", CHROME_UA),
        ("Accept", ANY_ACCEPT),
        ("Connection", "keep-alive"),
    ],
};

/// Search engine crawler accepting anything, for playlist downloads
pub const PLAYLIST_CRAWLER: HeaderProfile = HeaderProfile {
    name: "playlist-crawler",
    headers: &[("User-Agent", GOOGLEBOT_UA), ("Accept", ANY_ACCEPT)],
};

/// Liveness probe for stream URLs; the range keeps ranged GETs small
pub const MEDIA_PROBE: HeaderProfile = HeaderProfile {
    name: "media-probe",
    headers: &[
        ("User-Agent", CHROME_UA),
        ("Accept", ANY_ACCEPT),
        ("Range", "bytes=0-1023"),
    ],
};

/// Profiles used when fetching an HTML page to scan, in attempt order
pub const PAGE_PROFILES: &[HeaderProfile] = &[BROWSER, MINIMAL, CRAWLER];

/// Profiles used when fetching candidate playlists, in attempt order
pub const PLAYLIST_PROFILES: &[HeaderProfile] = &[PLAYLIST_BROWSER, MINIMAL, PLAYLIST_CRAWLER];
