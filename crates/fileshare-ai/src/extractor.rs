//! Best-effort plain-text extraction from a URL.
//!
//! This is explicitly not a real markup parser: tags are removed with a
//! regex, so script and style bodies leak through as text. The contract is
//! "never fails" -- every fetch or decode problem degrades to a fixed
//! placeholder string and the summarization flow carries on.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use fileshare_shared::constants::{EXTRACTION_PLACEHOLDER, MAX_EXTRACT_CHARS};

/// Extraction capability behind an interface so a structured parser could be
/// substituted without touching the summarizer contract.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch `url` and return its plain text. Never fails; degraded
    /// extractions return [`EXTRACTION_PLACEHOLDER`].
    async fn extract(&self, url: &str) -> String;
}

/// Extractor doing a single HTTP GET with no timeout, no redirect cap beyond
/// the client default, and no retry.
#[derive(Debug, Clone, Default)]
pub struct HttpExtractor {
    client: reqwest::Client,
}

impl HttpExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> String {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "Content fetch failed");
                return EXTRACTION_PLACEHOLDER.to_string();
            }
        };

        if !response.status().is_success() {
            warn!(url, status = %response.status(), "Content fetch returned error status");
            return EXTRACTION_PLACEHOLDER.to_string();
        }

        match response.text().await {
            Ok(body) => {
                let text = strip_markup(&body);
                debug!(url, chars = text.len(), "Extracted page text");
                text
            }
            Err(e) => {
                warn!(url, error = %e, "Content body unreadable");
                EXTRACTION_PLACEHOLDER.to_string()
            }
        }
    }
}

/// Remove angle-bracket tags, collapse whitespace runs and trim, capping the
/// result at [`MAX_EXTRACT_CHARS`] so huge pages do not blow up the prompt.
pub fn strip_markup(html: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"));

    let without_tags = tags.replace_all(html, " ");
    let collapsed = spaces.replace_all(&without_tags, " ");
    let trimmed = collapsed.trim();

    if trimmed.chars().count() > MAX_EXTRACT_CHARS {
        trimmed.chars().take(MAX_EXTRACT_CHARS).collect()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_basic() {
        let html = "<html><body><h1>Example Domain</h1>\n<p>This domain is for use.</p></body></html>";
        assert_eq!(strip_markup(html), "Example Domain This domain is for use.");
    }

    #[test]
    fn test_strip_markup_collapses_whitespace() {
        assert_eq!(strip_markup("a\n\n   b\t\tc"), "a b c");
    }

    #[test]
    fn test_strip_markup_keeps_script_bodies() {
        // Known limitation: script content is not specially excluded.
        let html = "<script>var x = 1;</script><p>real text</p>";
        assert_eq!(strip_markup(html), "var x = 1; real text");
    }

    #[test]
    fn test_strip_markup_truncates_large_pages() {
        let html = "x".repeat(MAX_EXTRACT_CHARS * 2);
        assert_eq!(strip_markup(&html).chars().count(), MAX_EXTRACT_CHARS);
    }
}
