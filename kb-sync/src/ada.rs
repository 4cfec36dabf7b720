#![doc = "Ada client: implements the destination contract against the Ada knowledge REST API."]
//
//! # Ada Integration (CLI <-> Core)
//!
//! [`AdaClient`] is the concrete [`KnowledgeDestination`] used by the CLI. It
//! talks to `https://<bot>.ada.support/api/v2/knowledge/...` with a bearer key.
//!
//! - Construct it from the loaded [`AdaConfig`].
//! - Every non-success status becomes [`SyncError::Remote`] with the response
//!   body attached; `409` on source creation is reported as
//!   [`SourceCreation::AlreadyExists`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};

use kb_sync_core::config::AdaConfig;
use kb_sync_core::contract::{
    ArticleUpsert, DestinationArticle, KnowledgeDestination, SourceCreation,
};
use kb_sync_core::error::{RemoteSystem, SyncError};
use kb_sync_core::http::{ensure_success, read_data, warn_if_page_full};

pub struct AdaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AdaClient {
    pub fn new(config: &AdaConfig) -> Self {
        tracing::info!(
            api_key_set = !config.api_key.is_empty(),
            base_url = %config.base_url,
            "Initialized AdaClient"
        );
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v2/knowledge/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, SyncError> {
        request.bearer_auth(&self.api_key).send().await.map_err(|e| {
            tracing::error!(error = ?e, "Failed to reach Ada");
            SyncError::Transport(e)
        })
    }
}

#[async_trait]
impl KnowledgeDestination for AdaClient {
    async fn create_source(&self, id: &str, name: &str) -> Result<SourceCreation, SyncError> {
        tracing::info!(source_id = id, name, "Creating Ada knowledge source");
        let body = serde_json::json!({ "id": id, "name": name });
        let response = self
            .send(self.client.post(self.url("sources")).json(&body))
            .await?;

        if response.status() == StatusCode::CONFLICT {
            tracing::warn!(source_id = id, "Ada knowledge source already exists");
            return Ok(SourceCreation::AlreadyExists);
        }
        ensure_success(RemoteSystem::Ada, response).await?;
        tracing::info!(source_id = id, "Successfully created knowledge source");
        Ok(SourceCreation::Created)
    }

    async fn list_articles(
        &self,
        source_id: &str,
        limit: u32,
    ) -> Result<Vec<DestinationArticle>, SyncError> {
        let request = self
            .client
            .get(self.url("articles/"))
            .query(&[("knowledge_source_id", source_id.to_string()), ("limit", limit.to_string())]);
        let response = ensure_success(RemoteSystem::Ada, self.send(request).await?).await?;
        let articles: Vec<DestinationArticle> = read_data(RemoteSystem::Ada, response).await?;
        warn_if_page_full(RemoteSystem::Ada, source_id, articles.len(), limit);
        tracing::info!(source_id, count = articles.len(), "Retrieved articles from Ada");
        Ok(articles)
    }

    async fn bulk_upsert_articles(&self, articles: Vec<ArticleUpsert>) -> Result<(), SyncError> {
        tracing::info!(count = articles.len(), "Bulk upserting articles to Ada");
        let request = self.client.post(self.url("bulk/articles/")).json(&articles);
        ensure_success(RemoteSystem::Ada, self.send(request).await?).await?;
        Ok(())
    }

    async fn bulk_delete_articles(
        &self,
        source_id: &str,
        article_ids: Vec<String>,
    ) -> Result<(), SyncError> {
        tracing::info!(source_id, count = article_ids.len(), "Deleting articles from Ada");
        let query: Vec<(&str, &str)> = article_ids.iter().map(|id| ("id", id.as_str())).collect();
        let request = self.client.delete(self.url("articles/")).query(&query);
        ensure_success(RemoteSystem::Ada, self.send(request).await?).await?;
        Ok(())
    }

    async fn delete_source(&self, source_id: &str) -> Result<(), SyncError> {
        tracing::info!(source_id, "Deleting Ada knowledge source");
        let request = self.client.delete(self.url(&format!("sources/{source_id}")));
        ensure_success(RemoteSystem::Ada, self.send(request).await?).await?;
        tracing::info!(source_id, "Successfully deleted knowledge source");
        Ok(())
    }
}
