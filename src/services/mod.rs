//! Service layer
//!
//! Business operations that sit beside the crawl pipeline and are exposed
//! through the web layer.

pub mod stream_validator;

pub use stream_validator::{StreamCheck, StreamStatus, StreamValidator};
