//! Media pass-through for players that cannot reach upstream streams directly

pub mod http_stream;

pub use http_stream::{HttpStreamProxy, StreamProxyOptions};
