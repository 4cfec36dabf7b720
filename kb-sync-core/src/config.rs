//! Runtime settings for the Pylon and Ada clients and the sync run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::SyncError;

pub const DEFAULT_PYLON_BASE_URL: &str = "https://api.usepylon.com";
pub const DEFAULT_PYLON_ARTICLE_LIMIT: u32 = 200;
pub const DEFAULT_ADA_ARTICLE_LIMIT: u32 = 100;
pub const DEFAULT_SOURCE_IDS_FILE: &str = "source_ids.txt";

/// Connection settings for the Pylon API.
#[derive(Clone, Serialize, Deserialize)]
pub struct PylonConfig {
    pub api_key: String,
    pub base_url: String,
    pub article_limit: u32,
}

/// Connection settings for one Ada bot.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdaConfig {
    pub api_key: String,
    pub base_url: String,
    pub article_limit: u32,
}

impl AdaConfig {
    /// `my-bot` -> `https://my-bot.ada.support`
    pub fn base_url_for_handle(bot_handle: &str) -> String {
        format!("https://{}.ada.support", bot_handle.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Append-only record of created knowledge sources.
    pub source_ids_file: PathBuf,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            source_ids_file: PathBuf::from(DEFAULT_SOURCE_IDS_FILE),
        }
    }
}

/// Everything a sync run needs, passed explicitly to clients and orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub pylon: PylonConfig,
    pub ada: AdaConfig,
    pub sync: SyncSettings,
}

impl Config {
    /// Checks settings every command depends on. Credentials are checked per
    /// system by [`Config::require_pylon`] and [`Config::require_ada`].
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.pylon.base_url.trim().is_empty() {
            return Err(SyncError::validation("Pylon base URL must not be empty"));
        }
        if self.pylon.article_limit == 0 || self.ada.article_limit == 0 {
            return Err(SyncError::validation("article limits must be positive"));
        }
        Ok(())
    }

    pub fn require_pylon(&self) -> Result<&PylonConfig, SyncError> {
        if self.pylon.api_key.trim().is_empty() {
            return Err(SyncError::validation("Pylon API key is required (PYLON_API_KEY)"));
        }
        Ok(&self.pylon)
    }

    pub fn require_ada(&self) -> Result<&AdaConfig, SyncError> {
        if self.ada.api_key.trim().is_empty() {
            return Err(SyncError::validation("Ada API key is required (ADA_API_KEY)"));
        }
        if self.ada.base_url.trim().is_empty() {
            return Err(SyncError::validation(
                "Ada base URL or bot handle is required (ADA_BASE_URL / ADA_BOT_HANDLE)",
            ));
        }
        Ok(&self.ada)
    }

    pub fn trace_loaded(&self) {
        info!(
            pylon_base_url = %self.pylon.base_url,
            ada_base_url = %self.ada.base_url,
            pylon_article_limit = self.pylon.article_limit,
            ada_article_limit = self.ada.article_limit,
            source_ids_file = %self.sync.source_ids_file.display(),
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}

// API keys must never reach the logs, so Debug is written by hand.
impl std::fmt::Debug for PylonConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PylonConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("article_limit", &self.article_limit)
            .finish()
    }
}

impl std::fmt::Debug for AdaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("article_limit", &self.article_limit)
            .finish()
    }
}

fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() > 4 {
        format!("{prefix}...")
    } else {
        "***".to_string()
    }
}
