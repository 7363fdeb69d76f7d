use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub crawler: CrawlerConfig,
    pub proxy: ProxyConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Per-attempt timeout when fetching the page to scan
    pub page_timeout_secs: u64,
    /// Per-attempt timeout when fetching a candidate playlist
    pub playlist_timeout_secs: u64,
    /// Upper bound on in-flight candidate fetches
    pub max_concurrent_fetches: usize,
    /// IPTV hosts routinely serve self-signed or expired certificates
    pub accept_invalid_certs: bool,
    pub max_redirects: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub timeout_secs: u64,
    pub max_concurrent: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            user_agent: "VLC/3.0.0 LibVLC/3.0.0".to_string(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_concurrent: 5,
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_timeout_secs: 30,
            playlist_timeout_secs: 15,
            max_concurrent_fetches: 5,
            accept_invalid_certs: true,
            max_redirects: 10,
        }
    }
}

impl CrawlerConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn playlist_timeout(&self) -> Duration {
        Duration::from_secs(self.playlist_timeout_secs)
    }
}

impl ProxyConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ValidationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }
}
