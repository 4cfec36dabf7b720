//! Per-run, in-memory views of one system's articles keyed by id.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::contract::{ArticleUpsert, DestinationArticle, SourceArticle};
use crate::convert::{content_hash, html_to_markdown};
use crate::error::SyncError;

/// The normalised article record both snapshots are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub content_hash: String,
    pub updated_at: String,
}

impl Article {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        let content = content.into();
        Self {
            id: id.into(),
            title: title.into(),
            content_hash: content_hash(&content),
            content,
            updated_at: updated_at.into(),
        }
    }

    /// Bulk-upsert payload placing this article in `knowledge_source_id`.
    pub fn to_upsert(&self, knowledge_source_id: &str) -> ArticleUpsert {
        ArticleUpsert {
            id: self.id.clone(),
            name: self.title.clone(),
            content: self.content.clone(),
            knowledge_source_id: knowledge_source_id.to_string(),
            external_updated: self.updated_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    articles: HashMap<String, Article>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert upstream articles to Markdown, dropping those left blank.
    ///
    /// An article that converts to empty or whitespace-only content cannot be
    /// represented downstream, so it is treated as absent.
    pub fn from_source(articles: Vec<SourceArticle>) -> Result<Self, SyncError> {
        let fetched = articles.len();
        let mut snapshot = Snapshot::new();
        for article in articles {
            let content = html_to_markdown(&article.html_content)?;
            if content.trim().is_empty() {
                debug!(article_id = %article.id, title = %article.title, "Excluding article with blank content");
                continue;
            }
            snapshot.insert(Article::new(article.id, article.title, content, article.updated_at));
        }
        info!(
            fetched,
            kept = snapshot.len(),
            "Built source snapshot"
        );
        Ok(snapshot)
    }

    /// Destination content is hashed exactly as stored.
    pub fn from_destination(articles: Vec<DestinationArticle>) -> Self {
        let mut snapshot = Snapshot::new();
        for article in articles {
            snapshot.insert(Article::new(
                article.id,
                article.name,
                article.content,
                article.external_updated.unwrap_or_default(),
            ));
        }
        info!(count = snapshot.len(), "Built destination snapshot");
        snapshot
    }

    /// Later inserts with the same id replace earlier ones.
    pub fn insert(&mut self, article: Article) {
        self.articles.insert(article.id.clone(), article);
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.articles.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.articles.keys().map(String::as_str)
    }

    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.articles.values()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl FromIterator<Article> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Article>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for article in iter {
            snapshot.insert(article);
        }
        snapshot
    }
}
