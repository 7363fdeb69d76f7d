//! Error type definitions for the IPTV crawler
//!
//! The crawl pipeline distinguishes transient per-attempt failures, which are
//! always retried through the next fetch strategy, from terminal outcomes
//! that are reported as "nothing found here".

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Web layer errors
    #[error("Web error: {0}")]
    Web(#[from] WebError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Failures of the fetch pipeline
///
/// `Tls`, `Status`, `Timeout` and `Network` describe a single attempt and are
/// never surfaced individually. `AllStrategiesFailed` and `FormatRejected`
/// are the terminal outcomes the caller treats as absent content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Certificate or handshake failure
    #[error("TLS failure: {url} - {message}")]
    Tls { url: String, message: String },

    /// Non-success HTTP status
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Per-attempt timeout elapsed
    #[error("Timed out: {url}")]
    Timeout { url: String },

    /// Connection, redirect or body read failure
    #[error("Network failure: {url} - {message}")]
    Network { url: String, message: String },

    /// Every strategy was exhausted for this URL
    #[error("All request strategies failed for {url} after {attempts} attempts")]
    AllStrategiesFailed { url: String, attempts: usize },

    /// Content was fetched but is not a recognised playlist
    #[error("Content from {url} is not a recognised playlist")]
    FormatRejected { url: String },
}

/// Web layer specific errors
#[derive(Error, Debug)]
pub enum WebError {
    /// Invalid request format
    #[error("Invalid request: {field} - {message}")]
    InvalidRequest { field: String, message: String },

    /// Missing required field in the request body
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Unsupported content type
    #[error("Unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },

    /// JSON parsing errors
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl FetchError {
    /// Create a TLS failure
    pub fn tls<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Tls {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a status failure
    pub fn status<U: Into<String>>(url: U, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Create a timeout failure
    pub fn timeout<U: Into<String>>(url: U) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Create a network failure
    pub fn network<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Whether the failure happened while negotiating TLS
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls { .. })
    }

    /// Whether this describes a single attempt rather than a terminal outcome
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Tls { .. } | Self::Status { .. } | Self::Timeout { .. } | Self::Network { .. }
        )
    }
}

impl WebError {
    /// Create an invalid request error
    pub fn invalid_request<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field<F: Into<String>>(field: F) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an unsupported content type error
    pub fn unsupported_content_type<C: Into<String>>(content_type: C) -> Self {
        Self::UnsupportedContentType {
            content_type: content_type.into(),
        }
    }
}
