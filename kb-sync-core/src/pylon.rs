//! REST client for the Pylon knowledge-base API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};

use crate::config::PylonConfig;
use crate::contract::{KnowledgeBase, KnowledgeSource, SourceArticle};
use crate::error::{RemoteSystem, SyncError};
use crate::fields::resolve_source_article;
use crate::http::{ensure_success, read_data, warn_if_page_full};

pub struct PylonClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PylonClient {
    pub fn new(config: &PylonConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<reqwest::Response, SyncError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url, "Failed to reach Pylon");
                SyncError::Transport(e)
            })?;
        ensure_success(RemoteSystem::Pylon, response).await
    }
}

#[async_trait]
impl KnowledgeSource for PylonClient {
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>, SyncError> {
        let url = format!("{}/knowledge-bases", self.base_url);
        let response = self.get(&url, &[]).await?;
        let knowledge_bases: Vec<KnowledgeBase> = read_data(RemoteSystem::Pylon, response).await?;
        info!(count = knowledge_bases.len(), "Retrieved knowledge bases from Pylon");
        Ok(knowledge_bases)
    }

    async fn list_articles(
        &self,
        knowledge_base_id: &str,
        limit: u32,
    ) -> Result<Vec<SourceArticle>, SyncError> {
        let url = format!("{}/knowledge-bases/{}/articles", self.base_url, knowledge_base_id);
        let response = self.get(&url, &[("limit", limit.to_string())]).await?;
        let raw: Vec<Value> = read_data(RemoteSystem::Pylon, response).await?;
        let fetched = raw.len();
        warn_if_page_full(RemoteSystem::Pylon, knowledge_base_id, fetched, limit);
        let articles: Vec<SourceArticle> = raw.iter().filter_map(resolve_source_article).collect();
        info!(
            knowledge_base_id,
            fetched,
            resolved = articles.len(),
            "Retrieved articles from Pylon"
        );
        Ok(articles)
    }
}
