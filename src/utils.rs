//! Utility functions for the IPTV crawler
//!
//! - `utils::url` for URL normalization, classification and safe logging
//! - `utils::patterns` for compiling the ordered regex tables used by the
//!   normalizer and the candidate extractor
//! - `utils::http_client` for the injectable HTTP transport

pub mod http_client;
pub mod patterns;
pub mod url;

pub use http_client::{HttpTransport, ReqwestTransport, TransportResponse};
pub use url::UrlUtils;
