// src/crawler/email_extractor.rs
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;

/// Pulls email addresses out of a page body. Three sources are scanned
/// and unioned: visible text, the `local [at] domain` obfuscation, and
/// `mailto:` anchors. Purely syntactic; no deliverability checks.
pub struct EmailExtractor {
    email_regex: Regex,
    obfuscated_regex: Regex,
    script_style_regex: Regex,
    mailto_selector: Selector,
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .unwrap(),
            obfuscated_regex: Regex::new(
                r"\b([A-Za-z0-9._%+-]+)\s*\[\s*[aA][tT]\s*\]\s*([A-Za-z0-9.-]+\.[A-Za-z]{2,})\b",
            )
            .unwrap(),
            script_style_regex: Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>")
                .unwrap(),
            mailto_selector: Selector::parse(r#"a[href^="mailto:"]"#).unwrap(),
        }
    }

    /// Extract every unique email-like string, in insertion order.
    /// Dedup is exact-match; casing is preserved as found.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let mut emails = Vec::new();
        let mut seen = HashSet::new();

        let visible_text = self.visible_text(html);

        for m in self.email_regex.find_iter(&visible_text) {
            let email = m.as_str().to_string();
            if seen.insert(email.clone()) {
                emails.push(email);
            }
        }

        for caps in self.obfuscated_regex.captures_iter(&visible_text) {
            let candidate = format!("{}@{}", &caps[1], &caps[2]);
            if self.email_regex.is_match(&candidate) && seen.insert(candidate.clone()) {
                emails.push(candidate);
            }
        }

        for candidate in self.mailto_addresses(html) {
            if self.email_regex.is_match(&candidate) && seen.insert(candidate.clone()) {
                emails.push(candidate);
            }
        }

        debug!("Extracted {} unique emails", emails.len());
        emails
    }

    /// Page text with script and style content removed.
    fn visible_text(&self, html: &str) -> String {
        let stripped = self.script_style_regex.replace_all(html, " ");
        let document = Html::parse_document(&stripped);
        document
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Addresses from `mailto:` hrefs, with any `?subject=...` suffix cut.
    fn mailto_addresses(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.mailto_selector)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| href.strip_prefix("mailto:"))
            .map(|addr| {
                addr.split('?')
                    .next()
                    .unwrap_or(addr)
                    .trim()
                    .to_string()
            })
            .collect()
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_emails_deduplicated() {
        let html = r#"<html><body>
            <p>Reach us at sales@example.com or support@example.com.</p>
            <p>Again: sales@example.com</p>
        </body></html>"#;

        let extractor = EmailExtractor::new();
        let emails = extractor.extract(html);

        assert_eq!(emails, vec!["sales@example.com", "support@example.com"]);
    }

    #[test]
    fn converts_at_obfuscation() {
        let html = "<html><body><p>Write to user [at] example.com for help.</p></body></html>";

        let extractor = EmailExtractor::new();
        let emails = extractor.extract(html);

        assert_eq!(emails, vec!["user@example.com"]);
    }

    #[test]
    fn obfuscation_tolerates_tight_spacing() {
        let html = "<html><body>user[at]example.com</body></html>";

        let extractor = EmailExtractor::new();
        assert_eq!(extractor.extract(html), vec!["user@example.com"]);
    }

    #[test]
    fn mailto_query_suffix_is_stripped() {
        let html = r#"<html><body>
            <a href="mailto:jane@example.com?subject=Hi">email Jane</a>
        </body></html>"#;

        let extractor = EmailExtractor::new();
        assert_eq!(extractor.extract(html), vec!["jane@example.com"]);
    }

    #[test]
    fn ignores_emails_inside_scripts() {
        let html = r#"<html><body>
            <script>var tracking = "bot@tracker.example";</script>
            <style>.a::before { content: "style@nowhere.example"; }</style>
            <p>real@example.com</p>
        </body></html>"#;

        let extractor = EmailExtractor::new();
        assert_eq!(extractor.extract(html), vec!["real@example.com"]);
    }

    #[test]
    fn preserves_casing_and_deduplicates_exactly() {
        let html = "<html><body>Sales@Example.com and Sales@Example.com and sales@example.com</body></html>";

        let extractor = EmailExtractor::new();
        assert_eq!(
            extractor.extract(html),
            vec!["Sales@Example.com", "sales@example.com"]
        );
    }

    #[test]
    fn unions_all_three_sources() {
        let html = r#"<html><body>
            <p>text@example.com</p>
            <p>fuzzy [at] example.com</p>
            <a href="mailto:anchor@example.com">mail</a>
        </body></html>"#;

        let extractor = EmailExtractor::new();
        assert_eq!(
            extractor.extract(html),
            vec![
                "text@example.com",
                "fuzzy@example.com",
                "anchor@example.com"
            ]
        );
    }
}
