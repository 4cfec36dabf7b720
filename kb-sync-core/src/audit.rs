//! Append-only record of knowledge sources created in the destination.
//!
//! Operators use this file to find sources for later manual deletion; nothing
//! in this crate reads it back. Every write opens, appends and closes the file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::SyncError;

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `<timestamp> - <source_id>[ - <label>]`.
    pub fn record(&self, source_id: &str, label: Option<&str>) -> Result<(), SyncError> {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
        let line = match label {
            Some(label) => format!("{timestamp} - {source_id} - {label}\n"),
            None => format!("{timestamp} - {source_id}\n"),
        };

        let io_err = |source| SyncError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).map_err(io_err)?;

        info!(source_id, path = %self.path.display(), "Recorded source id");
        Ok(())
    }
}
