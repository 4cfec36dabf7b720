//! # contract: interfaces to the two remote knowledge systems
//!
//! [`KnowledgeSource`] is the upstream side (Pylon): knowledge bases and their
//! articles. [`KnowledgeDestination`] is the downstream side (Ada): knowledge
//! sources and their articles, written in bulk.
//!
//! Records crossing these traits are already normalised: inconsistent field
//! names in the remote payloads are resolved by the implementors at ingestion
//! (see [`crate::fields`]), so orchestration never looks at raw JSON.
//!
//! ## Mocking & Testing
//! Both traits are annotated for `mockall`; the generated `MockKnowledgeSource`
//! and `MockKnowledgeDestination` are exported under the default
//! `test-export-mocks` feature for use in integration tests.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// A Pylon knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeBase {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl KnowledgeBase {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => "Untitled",
        }
    }
}

/// An upstream article after field resolution, body still in HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArticle {
    pub id: String,
    pub title: String,
    pub html_content: String,
    pub updated_at: String,
}

/// An article as stored in an Ada knowledge source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DestinationArticle {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub external_updated: Option<String>,
}

/// One element of the bulk-upsert request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleUpsert {
    pub id: String,
    pub name: String,
    pub content: String,
    pub knowledge_source_id: String,
    pub external_updated: String,
}

/// Outcome of asking the destination to create a knowledge source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCreation {
    Created,
    /// The destination already holds a source with this id.
    AlreadyExists,
}

/// Upstream system holding the articles of truth.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>, SyncError>;

    /// At most `limit` articles of one knowledge base.
    async fn list_articles(
        &self,
        knowledge_base_id: &str,
        limit: u32,
    ) -> Result<Vec<SourceArticle>, SyncError>;
}

/// Downstream system that mirrors the upstream articles.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait KnowledgeDestination: Send + Sync {
    async fn create_source(&self, id: &str, name: &str) -> Result<SourceCreation, SyncError>;

    /// At most `limit` articles of one knowledge source.
    async fn list_articles(
        &self,
        source_id: &str,
        limit: u32,
    ) -> Result<Vec<DestinationArticle>, SyncError>;

    /// Create or update every given article in a single request.
    async fn bulk_upsert_articles(&self, articles: Vec<ArticleUpsert>) -> Result<(), SyncError>;

    /// Delete the given article ids in a single request.
    async fn bulk_delete_articles(
        &self,
        source_id: &str,
        article_ids: Vec<String>,
    ) -> Result<(), SyncError>;

    async fn delete_source(&self, source_id: &str) -> Result<(), SyncError>;
}
