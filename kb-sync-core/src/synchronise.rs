//! High-level pipelines: full sync, delta sync and source deletion.
//!
//! Every pipeline runs its remote calls strictly in sequence and stops at the
//! first failure. Nothing is retried or rolled back: a failed upsert leaves
//! the destination partially updated and the delete batch unsent.
//!
//! # Pipelines
//! - [`full_sync`]: pick a knowledge base, create its destination source,
//!   upload every article.
//! - [`delta_sync`]: snapshot both sides, compute a [`ReconciliationPlan`],
//!   apply it with at most one upsert and one delete call.
//! - [`delete_source`]: remove a destination knowledge source.

use tracing::{debug, error, info};

use crate::audit::AuditLog;
use crate::contract::{KnowledgeBase, KnowledgeDestination, KnowledgeSource, SourceCreation};
use crate::error::SyncError;
use crate::reconcile::ReconciliationPlan;
use crate::snapshot::Snapshot;

/// List limits for one run.
#[derive(Debug, Clone, Copy)]
pub struct SyncLimits {
    pub source_articles: u32,
    pub destination_articles: u32,
}

impl From<&crate::config::Config> for SyncLimits {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            source_articles: config.pylon.article_limit,
            destination_articles: config.ada.article_limit,
        }
    }
}

#[derive(Debug)]
pub struct FullSyncReport {
    pub knowledge_base: KnowledgeBase,
    /// `None` when there was nothing to upload and no source was touched.
    pub source_id: Option<String>,
    pub creation: Option<SourceCreation>,
    pub uploaded: usize,
}

#[derive(Debug)]
pub struct DeltaSyncReport {
    pub knowledge_base_id: String,
    pub source_id: String,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

/// Name given to the destination source mirroring `knowledge_base`.
pub fn source_name(knowledge_base: &KnowledgeBase) -> String {
    format!("Pylon ({})", knowledge_base.display_title())
}

/// The requested knowledge base, or the first one listed.
pub async fn resolve_knowledge_base<S>(
    source: &S,
    requested: Option<&str>,
) -> Result<KnowledgeBase, SyncError>
where
    S: KnowledgeSource + ?Sized,
{
    let knowledge_bases = source.list_knowledge_bases().await?;
    let chosen = match requested {
        Some(id) => knowledge_bases
            .into_iter()
            .find(|kb| kb.id == id)
            .ok_or_else(|| SyncError::validation(format!("knowledge base {id} not found")))?,
        None => knowledge_bases
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::validation("no knowledge bases found"))?,
    };
    info!(knowledge_base_id = %chosen.id, title = chosen.display_title(), "Using knowledge base");
    Ok(chosen)
}

/// Create the destination source for a knowledge base and upload all its articles.
pub async fn full_sync<S, D>(
    source: &S,
    destination: &D,
    audit: &AuditLog,
    limits: SyncLimits,
    requested_knowledge_base: Option<&str>,
) -> Result<FullSyncReport, SyncError>
where
    S: KnowledgeSource + ?Sized,
    D: KnowledgeDestination + ?Sized,
{
    info!("[SYNC] Starting full sync");
    let knowledge_base = resolve_knowledge_base(source, requested_knowledge_base).await?;

    let articles = source
        .list_articles(&knowledge_base.id, limits.source_articles)
        .await?;
    let snapshot = Snapshot::from_source(articles)?;
    if snapshot.is_empty() {
        info!(knowledge_base_id = %knowledge_base.id, "[SYNC] No articles found to sync");
        return Ok(FullSyncReport {
            knowledge_base,
            source_id: None,
            creation: None,
            uploaded: 0,
        });
    }

    let source_id = knowledge_base.id.clone();
    let name = source_name(&knowledge_base);
    info!(source_id = %source_id, name = %name, "[SYNC] Creating destination knowledge source");
    let creation = destination.create_source(&source_id, &name).await.map_err(|e| {
        error!(error = %e, source_id = %source_id, "[SYNC][ERROR] create_source failed");
        e
    })?;
    match creation {
        SourceCreation::Created => {
            audit.record(&source_id, Some(knowledge_base.display_title()))?;
        }
        SourceCreation::AlreadyExists => {
            info!(source_id = %source_id, "[SYNC] Knowledge source already exists, reusing it");
        }
    }

    let upserts: Vec<_> = snapshot.articles().map(|a| a.to_upsert(&source_id)).collect();
    let uploaded = upserts.len();
    info!(count = uploaded, "[SYNC] Uploading articles");
    destination.bulk_upsert_articles(upserts).await.map_err(|e| {
        error!(error = %e, source_id = %source_id, "[SYNC][ERROR] bulk upsert failed");
        e
    })?;
    info!(count = uploaded, source_id = %source_id, "[SYNC] Full sync completed");

    Ok(FullSyncReport {
        knowledge_base,
        source_id: Some(source_id),
        creation: Some(creation),
        uploaded,
    })
}

/// Bring one destination source in line with one knowledge base.
pub async fn delta_sync<S, D>(
    source: &S,
    destination: &D,
    limits: SyncLimits,
    knowledge_base_id: &str,
    source_id: &str,
) -> Result<DeltaSyncReport, SyncError>
where
    S: KnowledgeSource + ?Sized,
    D: KnowledgeDestination + ?Sized,
{
    if knowledge_base_id.trim().is_empty() {
        return Err(SyncError::validation("knowledge base id is required"));
    }
    if source_id.trim().is_empty() {
        return Err(SyncError::validation("knowledge source id is required"));
    }
    info!(knowledge_base_id, source_id, "[DELTA] Starting delta sync");

    let source_snapshot =
        Snapshot::from_source(source.list_articles(knowledge_base_id, limits.source_articles).await?)?;
    let destination_snapshot = Snapshot::from_destination(
        destination
            .list_articles(source_id, limits.destination_articles)
            .await?,
    );

    let plan = ReconciliationPlan::compute(&source_snapshot, &destination_snapshot);
    for id in &plan.to_update {
        if let (Some(new), Some(old)) = (source_snapshot.get(id), destination_snapshot.get(id)) {
            debug!(
                article_id = %id,
                title = %new.title,
                source_hash = %new.content_hash,
                destination_hash = %old.content_hash,
                "[DELTA] Content changed"
            );
        }
    }
    info!(
        to_create = plan.to_create.len(),
        to_update = plan.to_update.len(),
        to_delete = plan.to_delete.len(),
        unchanged = plan.unchanged.len(),
        "[DELTA] Computed reconciliation plan"
    );

    apply_plan(destination, &plan, &source_snapshot, source_id).await?;

    let report = DeltaSyncReport {
        knowledge_base_id: knowledge_base_id.to_string(),
        source_id: source_id.to_string(),
        created: plan.to_create.len(),
        updated: plan.to_update.len(),
        deleted: plan.to_delete.len(),
        unchanged: plan.unchanged.len(),
    };
    info!(
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        "[DELTA] Delta sync completed"
    );
    Ok(report)
}

/// Send the plan: one upsert batch, then one delete batch, each only if non-empty.
pub async fn apply_plan<D>(
    destination: &D,
    plan: &ReconciliationPlan,
    source_snapshot: &Snapshot,
    source_id: &str,
) -> Result<(), SyncError>
where
    D: KnowledgeDestination + ?Sized,
{
    let upserts: Vec<_> = plan
        .to_upsert(source_snapshot)
        .into_iter()
        .map(|article| article.to_upsert(source_id))
        .collect();
    if upserts.is_empty() {
        debug!(source_id, "[DELTA] Nothing to upsert, skipping call");
    } else {
        let titles: Vec<String> = upserts.iter().take(3).map(|a| a.name.clone()).collect();
        let count = upserts.len();
        destination.bulk_upsert_articles(upserts).await.map_err(|e| {
            error!(error = %e, source_id, "[DELTA][ERROR] bulk upsert failed");
            e
        })?;
        info!(count, sample = ?titles, source_id, "[DELTA] Bulk upserted articles");
    }

    let to_delete: Vec<String> = plan.to_delete.iter().cloned().collect();
    if to_delete.is_empty() {
        debug!(source_id, "[DELTA] Nothing to delete, skipping call");
    } else {
        let count = to_delete.len();
        let sample: Vec<String> = to_delete.iter().take(3).cloned().collect();
        destination
            .bulk_delete_articles(source_id, to_delete)
            .await
            .map_err(|e| {
                error!(error = %e, source_id, "[DELTA][ERROR] bulk delete failed");
                e
            })?;
        info!(count, sample = ?sample, source_id, "[DELTA] Deleted articles");
    }
    Ok(())
}

pub async fn delete_source<D>(destination: &D, source_id: &str) -> Result<(), SyncError>
where
    D: KnowledgeDestination + ?Sized,
{
    if source_id.trim().is_empty() {
        return Err(SyncError::validation("knowledge source id is required"));
    }
    destination.delete_source(source_id).await?;
    info!(source_id, "Deleted knowledge source");
    Ok(())
}
