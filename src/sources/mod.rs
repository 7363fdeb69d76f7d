//! Where streams come from
//!
//! - `candidates` finds provider endpoints in scraped pages
//! - `playlist` downloads an endpoint and checks it is really a playlist
//! - `m3u` turns playlist text into stream entries

pub mod candidates;
pub mod m3u;
pub mod playlist;

pub use candidates::CandidateExtractor;
pub use m3u::{is_playlist_content, StreamParser};
pub use playlist::PlaylistFetcher;
