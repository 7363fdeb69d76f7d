//! IPTV crawler
//!
//! Discovers provider playlist endpoints on arbitrary web pages, downloads
//! and parses the playlists they point to, and serves the deduplicated
//! channel list over a small HTTP API alongside a media pass-through proxy.

pub mod config;
pub mod crawler;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod proxy;
pub mod services;
pub mod sources;
pub mod utils;
pub mod web;
