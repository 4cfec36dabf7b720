//! CLI interface for kb-sync: command parsing, config loading and dispatch.
//!
//! All business logic (snapshots, reconciliation, orchestration) lives in
//! `kb-sync-core`. This module only wires the loaded [`Config`] into the Pylon
//! and Ada clients and prints user-facing results.
//!
//! ## Extending
//! When adding subcommands, update [`Commands`] below and keep the logic in
//! `kb_sync_core::synchronise`.

use crate::ada::AdaClient;
use crate::load_config::load_config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use kb_sync_core::audit::AuditLog;
use kb_sync_core::config::Config;
use kb_sync_core::contract::KnowledgeSource;
use kb_sync_core::pylon::PylonClient;
use kb_sync_core::synchronise::{delete_source, delta_sync, full_sync, SyncLimits};
use std::path::PathBuf;

/// CLI for kb-sync: mirror Pylon knowledge bases into Ada knowledge sources.
#[derive(Parser)]
#[clap(
    name = "kb-sync",
    version,
    about = "Mirror Pylon knowledge-base articles into Ada knowledge sources"
)]
pub struct Cli {
    /// Optional YAML config file; environment variables take precedence
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// File that receives a copy of every log line
    #[clap(long, global = true, env = "LOG_FILE", default_value = "sync.log")]
    pub log_file: PathBuf,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the Pylon knowledge bases visible to the API key
    KnowledgeBases,
    /// Create an Ada knowledge source for a knowledge base and upload all its articles
    Sync {
        /// Knowledge base to mirror (defaults to the first one listed)
        #[clap(long)]
        knowledge_base_id: Option<String>,
    },
    /// Apply only the differences between a knowledge base and an Ada knowledge source
    Update {
        #[clap(long)]
        knowledge_base_id: String,
        /// Ada knowledge source id (defaults to the knowledge base id)
        #[clap(long)]
        source_id: Option<String>,
    },
    /// Delete an Ada knowledge source
    Delete {
        source_id: String,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = load_config(cli.config.as_deref())?;
    let result = dispatch(cli.command, &config).await;

    let exit_span = tracing::info_span!("exit");
    exit_span.in_scope(|| match &result {
        Ok(()) => tracing::info!("command finished"),
        Err(e) => tracing::error!(error = %e, "command failed"),
    });
    result
}

async fn dispatch(command: Commands, config: &Config) -> Result<()> {
    let limits = SyncLimits::from(config);
    match command {
        Commands::KnowledgeBases => {
            let pylon = PylonClient::new(config.require_pylon()?);
            for kb in pylon.list_knowledge_bases().await? {
                println!("{}\t{}", kb.id, kb.display_title());
            }
            Ok(())
        }
        Commands::Sync { knowledge_base_id } => {
            tracing::info!(command = "sync", "Starting full sync");
            let pylon = PylonClient::new(config.require_pylon()?);
            let ada = AdaClient::new(config.require_ada()?);
            let audit = AuditLog::new(&config.sync.source_ids_file);
            let report =
                full_sync(&pylon, &ada, &audit, limits, knowledge_base_id.as_deref()).await?;
            tracing::info!(command = "sync", ?report, "Full sync complete");
            match report.source_id {
                Some(source_id) => {
                    println!(
                        "Sync completed. {} articles uploaded to knowledge source {source_id}.",
                        report.uploaded
                    );
                    println!("To delete this source, run: kb-sync delete {source_id}");
                }
                None => println!("No articles found to sync"),
            }
            Ok(())
        }
        Commands::Update {
            knowledge_base_id,
            source_id,
        } => {
            tracing::info!(command = "update", "Starting delta sync");
            let pylon = PylonClient::new(config.require_pylon()?);
            let ada = AdaClient::new(config.require_ada()?);
            let source_id = source_id.unwrap_or_else(|| knowledge_base_id.clone());
            let report = delta_sync(&pylon, &ada, limits, &knowledge_base_id, &source_id).await?;
            println!(
                "Delta sync completed: {} created, {} updated, {} deleted",
                report.created, report.updated, report.deleted
            );
            Ok(())
        }
        Commands::Delete { source_id } => {
            let ada = AdaClient::new(config.require_ada()?);
            delete_source(&ada, &source_id).await?;
            println!("Successfully deleted Ada knowledge source: {source_id}");
            Ok(())
        }
    }
}
