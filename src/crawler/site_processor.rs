// src/crawler/site_processor.rs
use crate::config::CrawlerConfig;
use crate::crawler::path_prober::PathProber;
use crate::crawler::site_crawler::SiteCrawler;
use crate::crawler::url_utils::{normalize_target, website_label};
use crate::models::SiteResult;
use std::collections::HashSet;
use tracing::{debug, info};

/// Runs the full discovery strategy for one target: a BFS crawl of the
/// seed plus the contact-path probe, unioned, raced against the overall
/// site timeout. Always resolves to a SiteResult.
pub struct SiteProcessor {
    crawler: SiteCrawler,
    config: CrawlerConfig,
}

impl SiteProcessor {
    pub fn new(crawler: SiteCrawler, config: CrawlerConfig) -> Self {
        Self { crawler, config }
    }

    pub async fn process(&self, target: &str) -> SiteResult {
        let website = website_label(target);
        let seed = normalize_target(target);

        info!("🕷️  Processing {} (seed {})", website, seed);

        let discovery = self.discover(&seed, &website);
        match tokio::time::timeout(self.config.site_timeout(), discovery).await {
            Ok(mut emails) => {
                emails.truncate(self.config.max_emails_per_site);
                info!("Found {} emails on {}", emails.len(), website);
                SiteResult {
                    website,
                    emails,
                    error: None,
                }
            }
            Err(_) => {
                // A site timeout means "nothing found", not a failure.
                debug!("Site timeout for {}", website);
                SiteResult {
                    website,
                    emails: Vec::new(),
                    error: None,
                }
            }
        }
    }

    /// BFS crawl followed by the path probe; the per-page timeouts of
    /// both count against the caller's overall deadline.
    async fn discover(&self, seed: &str, domain: &str) -> Vec<String> {
        let mut emails = self.crawler.crawl(seed, self.config.page_budget).await;
        let mut seen: HashSet<String> = emails.iter().cloned().collect();

        let prober = PathProber::new(&self.crawler, &self.config);
        for email in prober.probe(domain).await {
            if seen.insert(email.clone()) {
                emails.push(email);
            }
        }

        emails
    }
}
