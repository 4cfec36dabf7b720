//! Ordered candidate-field resolution for loosely shaped upstream payloads.
//!
//! Pylon articles do not use one field name consistently (`id` vs `_id`,
//! `title` vs `name`, several timestamp spellings). Every candidate list here is
//! tried in order and the first non-empty string wins.

use serde_json::Value;
use tracing::warn;

use crate::contract::SourceArticle;

pub const ID_FIELDS: &[&str] = &["id", "_id"];
pub const TITLE_FIELDS: &[&str] = &["title", "name"];
pub const HTML_FIELDS: &[&str] = &["current_published_content_html", "content_html", "content"];
pub const UPDATED_AT_FIELDS: &[&str] = &[
    "updated_at",
    "modified_at",
    "last_modified_at",
    "last_updated_at",
    "updatedAt",
    "modifiedAt",
    "published_at",
    "created_at",
];

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_UPDATED_AT: &str = "1970-01-01T00:00:00Z";

/// First candidate holding a non-blank string. Numeric ids are accepted too.
pub fn first_present(value: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|name| match value.get(*name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Normalise one raw Pylon article. Returns `None` when no id field is present.
pub fn resolve_source_article(raw: &Value) -> Option<SourceArticle> {
    let Some(id) = first_present(raw, ID_FIELDS) else {
        warn!(candidates = ?ID_FIELDS, "Skipping article without an id field");
        return None;
    };
    Some(SourceArticle {
        title: first_present(raw, TITLE_FIELDS).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        html_content: first_present(raw, HTML_FIELDS).unwrap_or_default(),
        updated_at: first_present(raw, UPDATED_AT_FIELDS)
            .unwrap_or_else(|| DEFAULT_UPDATED_AT.to_string()),
        id,
    })
}
