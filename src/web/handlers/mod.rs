//! HTTP request handlers organized by endpoint

pub mod crawl;
pub mod health;
pub mod proxy;
pub mod validation;
