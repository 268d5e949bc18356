// src/crawler/url_utils.rs
use url::Url;

/// Normalize a caller-supplied target into a URL, prefixing `https://`
/// when no scheme is present.
pub fn normalize_target(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{}", target)
    }
}

/// Host of a URL with any leading `www.` stripped. This is the unit of
/// comparison that bounds a crawl to one site.
pub fn scope_host(url: &Url) -> Option<String> {
    url.host_str()
        .map(|h| h.trim_start_matches("www.").to_string())
}

/// Display label for a target: its hostname, or the raw input when the
/// target does not parse as a URL.
pub fn website_label(target: &str) -> String {
    Url::parse(&normalize_target(target))
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| target.to_string())
}
