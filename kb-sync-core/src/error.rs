//! Error taxonomy shared by every sync operation.
//!
//! Each variant corresponds to one cause so callers can decide how to react:
//! validation failures are never worth retrying, transport failures usually are,
//! and remote rejections carry the status and body the remote system returned.

use std::fmt;
use std::path::PathBuf;

/// Which remote system produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteSystem {
    Pylon,
    Ada,
}

impl fmt::Display for RemoteSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteSystem::Pylon => f.write_str("pylon"),
            RemoteSystem::Ada => f.write_str("ada"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Missing or malformed input (credentials, ids, config values).
    #[error("validation error: {0}")]
    Validation(String),

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote system answered with a non-success status.
    #[error("{system} responded with status {status}: {body}")]
    Remote {
        system: RemoteSystem,
        status: u16,
        body: String,
    },

    /// A success response whose body did not have the expected shape.
    #[error("failed to decode {system} response: {message}")]
    Decode {
        system: RemoteSystem,
        message: String,
    },

    #[error("conversion error: {0}")]
    Conversion(String),

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SyncError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SyncError::Validation(msg.into())
    }

    /// Whether repeating the same call could reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport(_) => true,
            SyncError::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
