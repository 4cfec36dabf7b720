//! Delta reconciliation between a source and a destination snapshot.
//!
//! Pure computation: given both snapshots, decide which ids must be created,
//! updated or deleted for the destination to match the source. Content is
//! compared by hash only; `updated_at` and titles never trigger an update.

use std::collections::BTreeSet;

use crate::snapshot::{Article, Snapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// In the source only.
    pub to_create: BTreeSet<String>,
    /// In both, with differing content hashes.
    pub to_update: BTreeSet<String>,
    /// In the destination only.
    pub to_delete: BTreeSet<String>,
    /// Shared ids whose hashes match.
    pub unchanged: BTreeSet<String>,
}

impl ReconciliationPlan {
    pub fn compute(source: &Snapshot, destination: &Snapshot) -> Self {
        let mut plan = ReconciliationPlan::default();

        for article in source.articles() {
            match destination.get(&article.id) {
                None => {
                    plan.to_create.insert(article.id.clone());
                }
                Some(existing) if existing.content_hash != article.content_hash => {
                    plan.to_update.insert(article.id.clone());
                }
                Some(_) => {
                    plan.unchanged.insert(article.id.clone());
                }
            }
        }

        plan.to_delete = destination
            .ids()
            .filter(|id| !source.contains(id))
            .map(str::to_string)
            .collect();

        plan
    }

    /// Source records for every id to create or update.
    pub fn to_upsert<'a>(&self, source: &'a Snapshot) -> Vec<&'a Article> {
        self.to_create
            .iter()
            .chain(self.to_update.iter())
            .filter_map(|id| source.get(id))
            .collect()
    }

    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}
