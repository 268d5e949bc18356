// src/crawler/site_crawler.rs
use crate::config::CrawlerConfig;
use crate::crawler::email_extractor::EmailExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::url_utils::{normalize_target, scope_host};
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};
use url::Url;

/// Breadth-first crawler bounded to one site. Links are followed only
/// when their www-stripped host equals the seed's, and never more than
/// `page_budget` pages are fetched per invocation.
pub struct SiteCrawler {
    fetcher: PageFetcher,
    extractor: EmailExtractor,
    link_selector: Selector,
    config: CrawlerConfig,
}

impl SiteCrawler {
    pub fn new(fetcher: PageFetcher, config: CrawlerConfig) -> Self {
        Self {
            fetcher,
            extractor: EmailExtractor::new(),
            link_selector: Selector::parse("a[href]").unwrap(),
            config,
        }
    }

    /// Crawl `seed_url` and return every unique email found, in the
    /// order first seen. A page failure is logged and skipped; the
    /// crawl itself never fails.
    pub async fn crawl(&self, seed_url: &str, page_budget: usize) -> Vec<String> {
        // Round-trip the seed through Url so its string form matches
        // re-serialized links ("http://a.test" vs "http://a.test/").
        let seed = match Url::parse(&normalize_target(seed_url)) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot parse seed URL {}: {}", seed_url, e);
                return Vec::new();
            }
        };
        let scope = match scope_host(&seed) {
            Some(host) => host,
            None => {
                warn!("Cannot determine crawl scope for {}", seed_url);
                return Vec::new();
            }
        };

        let mut frontier: VecDeque<String> = VecDeque::from([seed.to_string()]);
        let mut visited: HashSet<String> = HashSet::new();
        let mut emails: Vec<String> = Vec::new();
        let mut seen_emails: HashSet<String> = HashSet::new();

        while visited.len() < page_budget {
            let url = match frontier.pop_front() {
                Some(url) => url,
                None => break,
            };
            if !visited.insert(url.clone()) {
                continue;
            }

            debug!(
                "Crawling page {}/{}: {}",
                visited.len(),
                page_budget,
                url
            );

            match self.fetcher.fetch(&url, self.config.page_timeout()).await {
                Ok(page) => {
                    for email in self.extractor.extract(&page.body) {
                        if seen_emails.insert(email.clone()) {
                            emails.push(email);
                        }
                    }
                    if visited.len() < page_budget {
                        for link in self.in_scope_links(&page.body, &url, &scope) {
                            if !visited.contains(&link) {
                                frontier.push_back(link);
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to crawl {}: {}", url, e);
                }
            }

            if !frontier.is_empty() && visited.len() < page_budget {
                tokio::time::sleep(self.config.request_delay()).await;
            }
        }

        emails
    }

    /// Anchor hrefs on a page, resolved against the page URL, filtered
    /// to http(s) links whose host stays inside the crawl scope.
    fn in_scope_links(&self, html: &str, page_url: &str, scope: &str) -> Vec<String> {
        let base = match Url::parse(page_url) {
            Ok(base) => base,
            Err(_) => return Vec::new(),
        };

        let document = Html::parse_document(html);
        let mut links = Vec::new();

        for element in document.select(&self.link_selector) {
            let href = match element.value().attr("href") {
                Some(href) => href,
                None => continue,
            };
            let mut resolved = match base.join(href) {
                Ok(url) => url,
                Err(_) => continue,
            };
            if resolved.scheme() != "http" && resolved.scheme() != "https" {
                continue;
            }
            // Same page, different anchor.
            resolved.set_fragment(None);
            if scope_host(&resolved).as_deref() == Some(scope) {
                links.push(resolved.to_string());
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> CrawlerConfig {
        CrawlerConfig {
            page_budget: 3,
            page_timeout_seconds: 5,
            site_timeout_seconds: 15,
            request_delay_ms: 0,
            max_emails_per_site: 15,
        }
    }

    fn crawler() -> SiteCrawler {
        SiteCrawler::new(PageFetcher::new().unwrap(), test_config())
    }

    #[tokio::test]
    async fn follows_in_domain_links_and_collects_emails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                    <p>root@example.com</p>
                    <a href="/contact">contact</a>
                </body></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/contact"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>deep@example.com</body></html>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let emails = crawler().crawl(&server.uri(), 3).await;
        assert_eq!(emails, vec!["root@example.com", "deep@example.com"]);
    }

    #[tokio::test]
    async fn never_fetches_the_same_url_twice() {
        let server = MockServer::start().await;
        // Both pages link back to the root.
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><a href="/a">a</a><a href="/">self</a></body></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><a href="/">back</a>a@example.com</body></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let emails = crawler().crawl(&server.uri(), 5).await;
        assert_eq!(emails, vec!["a@example.com"]);
    }

    #[tokio::test]
    async fn stays_inside_the_crawl_scope_domain() {
        let server = MockServer::start().await;
        let port = server.address().port();
        // Same port, different host: "localhost" != "127.0.0.1".
        let off_site = format!("http://localhost:{}/external", port);
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<html><body><a href="{}">other</a><a href="mailto:x@example.com">m</a></body></html>"#,
                off_site
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/external"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let emails = crawler().crawl(&server.uri(), 3).await;
        assert_eq!(emails, vec!["x@example.com"]);
    }

    #[tokio::test]
    async fn respects_the_page_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                    <a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>
                </body></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/c"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        crawler().crawl(&server.uri(), 2).await;
    }

    #[tokio::test]
    async fn a_failing_page_does_not_abort_the_crawl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><a href="/broken">x</a><a href="/ok">y</a></body></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>ok@example.com</body></html>"),
            )
            .mount(&server)
            .await;

        let emails = crawler().crawl(&server.uri(), 3).await;
        assert_eq!(emails, vec!["ok@example.com"]);
    }
}
