// src/config.rs
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub jobs: JobsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlerConfig {
    /// Maximum pages fetched per site during the BFS crawl.
    pub page_budget: usize,

    /// Timeout for a single page fetch.
    pub page_timeout_seconds: u64,

    /// Overall timeout for processing one target site.
    pub site_timeout_seconds: u64,

    /// Courtesy delay between consecutive requests to the same site.
    pub request_delay_ms: u64,

    /// Cap on emails reported per site.
    pub max_emails_per_site: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobsConfig {
    /// How long an unconsumed job stays in the registry.
    pub expiry_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl CrawlerConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_seconds)
    }

    pub fn site_timeout(&self) -> Duration {
        Duration::from_secs(self.site_timeout_seconds)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            jobs: JobsConfig {
                expiry_seconds: 3600,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_budget: 3,
            page_timeout_seconds: 5,
            site_timeout_seconds: 15,
            request_delay_ms: 500,
            max_emails_per_site: 15,
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
