//! HTML to Markdown conversion and content hashing.

use std::sync::LazyLock;

use htmd::options::{HeadingStyle, Options};
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::SyncError;

static TRAILING_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("valid regex"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Convert an article body to Markdown with ATX headings.
///
/// The result is normalised (LF line endings, no trailing whitespace, at most
/// one blank line in a row, trimmed) so that re-converting unchanged HTML
/// always yields the same string.
pub fn html_to_markdown(html: &str) -> Result<String, SyncError> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }

    let converter = htmd::HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .skip_tags(vec!["script", "style"])
        .build();
    let raw = converter
        .convert(html)
        .map_err(|e| SyncError::Conversion(format!("htmd conversion failed: {e}")))?;

    let markdown = normalize_markdown(&raw);
    debug!(html_len = html.len(), markdown_len = markdown.len(), "Converted HTML to Markdown");
    Ok(markdown)
}

pub fn normalize_markdown(markdown: &str) -> String {
    let unix = markdown.replace("\r\n", "\n");
    let stripped = TRAILING_WS.replace_all(&unix, "");
    EXCESS_NEWLINES
        .replace_all(&stripped, "\n\n")
        .trim()
        .to_string()
}

/// Lower-hex SHA-256 of the exact content bytes.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_paragraphs_convert() {
        let md = html_to_markdown("<h1>Getting started</h1><p>Install the <strong>app</strong>.</p>")
            .expect("conversion");
        assert!(md.starts_with("# Getting started"), "got: {md}");
        assert!(md.contains("Install the"), "got: {md}");
        assert!(!md.contains("<p>"), "got: {md}");
    }

    #[test]
    fn empty_and_blank_html_give_empty_markdown() {
        assert_eq!(html_to_markdown("").unwrap(), "");
        assert_eq!(html_to_markdown("   \n ").unwrap(), "");
    }

    #[test]
    fn normalisation_strips_trailing_space_and_collapses_blank_lines() {
        let out = normalize_markdown("line one   \r\n\r\n\r\n\r\nline two\t\n\n");
        assert_eq!(out, "line one\n\nline two");
    }

    #[test]
    fn hash_is_deterministic_and_exact() {
        let h = content_hash("hello");
        assert_eq!(h, content_hash("hello"));
        assert_eq!(h.len(), 64);
        assert_ne!(h, content_hash("hello "));
    }
}
