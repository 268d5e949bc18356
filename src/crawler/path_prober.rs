// src/crawler/path_prober.rs
use crate::config::CrawlerConfig;
use crate::crawler::site_crawler::SiteCrawler;
use std::collections::HashSet;
use tracing::debug;

/// Paths that commonly carry contact information. Each is probed as a
/// single-page crawl, supplementing pages the BFS may not reach.
const CONTACT_PATHS: &[&str] = &[
    "/contact",
    "/about",
    "/team",
    "/support",
    "/contact-us",
    "/get-in-touch",
    "/staff",
    "/directory",
];

/// Sweeps the fixed contact-path list on a domain, one page per path.
pub struct PathProber<'a> {
    crawler: &'a SiteCrawler,
    config: &'a CrawlerConfig,
}

impl<'a> PathProber<'a> {
    pub fn new(crawler: &'a SiteCrawler, config: &'a CrawlerConfig) -> Self {
        Self { crawler, config }
    }

    /// Probe every contact path on `domain`, ignoring per-path failures,
    /// and return the union of emails found, in the order first seen.
    pub async fn probe(&self, domain: &str) -> Vec<String> {
        self.probe_base(&format!("https://{}", domain)).await
    }

    async fn probe_base(&self, base: &str) -> Vec<String> {
        let mut emails: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (i, probe_path) in CONTACT_PATHS.iter().enumerate() {
            let url = format!("{}{}", base, probe_path);
            debug!("Probing {}", url);

            for email in self.crawler.crawl(&url, 1).await {
                if seen.insert(email.clone()) {
                    emails.push(email);
                }
            }

            if i < CONTACT_PATHS.len() - 1 {
                tokio::time::sleep(self.config.request_delay()).await;
            }
        }

        emails
    }
}
