//! Centralized error handling for the IPTV crawler
//!
//! This module unifies the error types used across the crawl pipeline and
//! the HTTP boundary.
//!
//! # Error Categories
//!
//! - **Fetch Errors**: single request attempts and exhausted strategy lists
//! - **Web Errors**: request validation at the HTTP boundary
//! - **App Errors**: everything that bubbles up to a handler
//!
//! Fetch errors are contained inside the pipeline: a failed attempt moves on
//! to the next strategy, a failed candidate is logged and skipped. Only web
//! errors reach the caller as hard failures.
//!
//! # Usage
//!
//! ```rust
//! use iptv_crawler::errors::{AppError, AppResult, WebError};
//!
//! fn example_function(url: Option<String>) -> AppResult<String> {
//!     url.ok_or_else(|| AppError::from(WebError::missing_field("url")))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for a single request attempt
pub type AttemptResult<T> = Result<T, FetchError>;

/// Convenience type alias for Web Results
pub type WebResult<T> = Result<T, WebError>;
