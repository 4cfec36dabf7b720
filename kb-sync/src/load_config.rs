//! `load_config` module: builds the core [`Config`] from an optional YAML file and the environment.
//!
//! Values are layered, highest precedence first:
//! 1. environment variables (`PYLON_API_KEY`, `PYLON_BASE_URL`, `ADA_API_KEY`,
//!    `ADA_BASE_URL`, `ADA_BOT_HANDLE`, `ARTICLE_LIMIT`, `SOURCE_IDS_FILE`),
//! 2. the YAML file given with `--config`,
//! 3. built-in defaults.
//!
//! Empty environment variables count as unset. An Ada bot handle expands to
//! `https://<handle>.ada.support` when no explicit base URL is configured.
//!
//! # Errors
//! All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{anyhow, Context, Result};
use kb_sync_core::config::{
    AdaConfig, Config, PylonConfig, SyncSettings, DEFAULT_ADA_ARTICLE_LIMIT,
    DEFAULT_PYLON_ARTICLE_LIMIT, DEFAULT_PYLON_BASE_URL,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub pylon: PylonSection,
    #[serde(default)]
    pub ada: AdaSection,
    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct PylonSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub article_limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdaSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub bot_handle: Option<String>,
    pub article_limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncSection {
    pub source_ids_file: Option<PathBuf>,
}

/// Parse a YAML config file. Nothing is validated yet.
pub fn read_config_file(path: &Path) -> Result<FileConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to read config file");
        anyhow!("Failed to read config file {:?}: {}", path, e)
    })?;

    // An empty file deserialises to null; treat it as "no settings".
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
        anyhow!("Failed to parse config YAML: {e}")
    })
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load, layer and validate the configuration.
///
/// Credentials may still be missing; commands check the ones they need.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let file = match path {
        Some(path) => read_config_file(path)?,
        None => FileConfig::default(),
    };

    let pylon_limit = match env_var("ARTICLE_LIMIT") {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("ARTICLE_LIMIT must be a positive integer, got {raw:?}"))?,
        None => file.pylon.article_limit.unwrap_or(DEFAULT_PYLON_ARTICLE_LIMIT),
    };

    let ada_base_url = env_var("ADA_BASE_URL")
        .or_else(|| env_var("ADA_BOT_HANDLE").map(|h| AdaConfig::base_url_for_handle(&h)))
        .or(file.ada.base_url)
        .or_else(|| file.ada.bot_handle.map(|h| AdaConfig::base_url_for_handle(&h)))
        .unwrap_or_default();

    let config = Config {
        pylon: PylonConfig {
            api_key: env_var("PYLON_API_KEY")
                .or(file.pylon.api_key)
                .unwrap_or_default(),
            base_url: env_var("PYLON_BASE_URL")
                .or(file.pylon.base_url)
                .unwrap_or_else(|| DEFAULT_PYLON_BASE_URL.to_string()),
            article_limit: pylon_limit,
        },
        ada: AdaConfig {
            api_key: env_var("ADA_API_KEY").or(file.ada.api_key).unwrap_or_default(),
            base_url: ada_base_url,
            article_limit: file.ada.article_limit.unwrap_or(DEFAULT_ADA_ARTICLE_LIMIT),
        },
        sync: SyncSettings {
            source_ids_file: env_var("SOURCE_IDS_FILE")
                .map(PathBuf::from)
                .or(file.sync.source_ids_file)
                .unwrap_or_else(|| SyncSettings::default().source_ids_file),
        },
    };

    config.validate().map_err(|e| {
        error!(error = %e, "Configuration is invalid");
        anyhow::Error::new(e)
    })?;
    config.trace_loaded();
    Ok(config)
}
