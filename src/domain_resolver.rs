// src/domain_resolver.rs
use crate::crawler::fetcher::PageFetcher;
use crate::models::ResolvedWebsite;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// DuckDuckGo HTML search endpoint. A static results page, no API key.
const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How many organic-result links are considered per query.
const MAX_CANDIDATES: usize = 5;

/// Hosts that are never a company's own website.
const DENYLIST: &[&str] = &[
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "youtube.com",
    "wikipedia.org",
    "amazon.com",
    "yelp.com",
    "tiktok.com",
    "pinterest.com",
    "reddit.com",
];

/// File extensions that indicate a document rather than a homepage.
const NON_HTML_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".zip"];

/// Words that hint a domain belongs to a reseller or aggregator when the
/// query itself does not mention them.
const GENERIC_TERMS: &[&str] = &["shop", "store", "online", "group", "inc", "corp", "global"];

#[derive(Debug)]
struct Candidate {
    host: String,
    link_text: String,
}

/// Resolves a free-text company query to its probable official domain by
/// scoring links scraped from a search-results page.
pub struct DomainResolver {
    client: Client,
    search_url: String,
}

impl DomainResolver {
    pub fn new() -> crate::models::Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            search_url: SEARCH_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_search_url(search_url: String) -> Self {
        Self {
            client: Client::new(),
            search_url,
        }
    }

    /// Resolve one query. Fetch failures are embedded in the result;
    /// "no candidate survived" is a normal outcome with no error.
    pub async fn resolve(&self, query: &str) -> ResolvedWebsite {
        let search = format!(
            "{}?q={}",
            self.search_url,
            urlencoding::encode(&format!("{} official site", query))
        );
        debug!("Resolving {:?} via {}", query, search);

        let response = match self
            .client
            .get(&search)
            .header("User-Agent", PageFetcher::random_user_agent())
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return self.failed(query, e.to_string()),
        };

        if !response.status().is_success() {
            return self.failed(query, format!("search returned HTTP {}", response.status()));
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => return self.failed(query, e.to_string()),
        };

        ResolvedWebsite {
            original_input: query.to_string(),
            found_website: pick_best_candidate(&html, query),
            error: None,
        }
    }

    /// Resolve a batch sequentially. One query's failure never fails
    /// the batch.
    pub async fn resolve_batch(&self, queries: &[String]) -> Vec<ResolvedWebsite> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(self.resolve(query).await);
        }
        results
    }

    fn failed(&self, query: &str, message: String) -> ResolvedWebsite {
        warn!("Domain resolution failed for {:?}: {}", query, message);
        ResolvedWebsite {
            original_input: query.to_string(),
            found_website: None,
            error: Some(message),
        }
    }
}

/// Parse the results page, filter the candidates, score them, and return
/// the winning host. First-seen order breaks ties.
fn pick_best_candidate(html: &str, query: &str) -> Option<String> {
    let candidates = parse_candidates(html);

    let mut best: Option<(&Candidate, i32)> = None;
    for candidate in &candidates {
        let score = score_candidate(candidate, query);
        debug!("Candidate {} scored {}", candidate.host, score);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(candidate, _)| candidate.host.clone())
}

/// Organic-result anchors, capped at the first MAX_CANDIDATES usable
/// links, with denylisted hosts and document links discarded.
fn parse_candidates(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let result_selector = Selector::parse("a.result__a").unwrap();

    let mut extracted = Vec::new();
    for element in document.select(&result_selector) {
        if extracted.len() >= MAX_CANDIDATES {
            break;
        }
        let href = match element.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let destination = match destination_url(href) {
            Some(url) => url,
            None => continue,
        };
        let parsed = match Url::parse(&destination) {
            Ok(url) => url,
            Err(_) => continue,
        };
        let host = match parsed.host_str() {
            Some(host) => host.trim_start_matches("www.").to_string(),
            None => continue,
        };
        let link_text = element.text().collect::<String>().trim().to_string();
        extracted.push((host, parsed.path().to_lowercase(), link_text));
    }

    extracted
        .into_iter()
        .filter(|(host, path, _)| {
            let denied = DENYLIST
                .iter()
                .any(|d| host == d || host.ends_with(&format!(".{}", d)));
            let document_link = NON_HTML_EXTENSIONS.iter().any(|ext| path.ends_with(ext));
            !denied && !document_link
        })
        .map(|(host, _, link_text)| Candidate { host, link_text })
        .collect()
}

/// The real destination behind a result link. Redirect-wrapper links
/// carry it in the `uddg` parameter; protocol-relative links get a
/// scheme; paths relative to the search engine itself are skipped.
fn destination_url(href: &str) -> Option<String> {
    if let Some(uddg_start) = href.find("uddg=") {
        let encoded = &href[uddg_start + 5..];
        let end = encoded.find('&').unwrap_or(encoded.len());
        return urlencoding::decode(&encoded[..end])
            .ok()
            .map(|s| s.into_owned());
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if href.starts_with("//") {
        Some(format!("https:{}", href))
    } else {
        None
    }
}

fn score_candidate(candidate: &Candidate, query: &str) -> i32 {
    let query_lower = query.to_lowercase();
    // Domains carry no whitespace, so multi-word queries are compacted
    // for the domain-side checks.
    let query_compact: String = query_lower.split_whitespace().collect();

    let host = candidate.host.to_lowercase();
    let text = candidate.link_text.to_lowercase();

    let mut score = 0;
    if !query_compact.is_empty() && host.contains(&query_compact) {
        score += 3;
    }
    if text.contains(&query_lower) {
        score += 2;
    }
    if host.starts_with(&query_compact) && !query_compact.is_empty() {
        score += 1;
    }
    for term in GENERIC_TERMS {
        if host.contains(term) && !query_lower.contains(term) {
            score -= 1;
        }
    }

    score
}
