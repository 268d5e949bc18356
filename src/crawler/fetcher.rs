// src/crawler/fetcher.rs
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Pool of realistic browser identifiers; one is picked uniformly at
/// random per request to reduce trivial bot-blocking.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
];

#[derive(Debug)]
pub enum FetchError {
    Timeout,
    HttpStatus(u16),
    Network(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::HttpStatus(code) => write!(f, "HTTP error: {}", code),
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug)]
pub struct FetchedPage {
    pub body: String,
    pub status: u16,
    pub elapsed: Duration,
}

/// Issues single bounded-time GET requests. No retries.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> crate::models::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    pub fn random_user_agent() -> &'static str {
        USER_AGENTS[fastrand::usize(..USER_AGENTS.len())]
    }

    pub async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<FetchedPage, FetchError> {
        debug!("Fetching: {}", url);
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .header("User-Agent", Self::random_user_agent())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_error)?;
        let elapsed = start.elapsed();
        debug!("Fetched {} bytes from {} in {:?}", body.len(), url, elapsed);

        Ok(FetchedPage {
            body,
            status: status.as_u16(),
            elapsed,
        })
    }
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = e.status() {
        FetchError::HttpStatus(status.as_u16())
    } else {
        FetchError::Network(e.to_string())
    }
}
