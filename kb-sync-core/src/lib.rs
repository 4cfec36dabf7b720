#![doc = "kb-sync-core: core logic library for kb-sync."]

//! Data model, delta reconciliation and orchestration for mirroring Pylon
//! knowledge bases into Ada knowledge sources.
//!
//! The CLI crate only parses arguments, loads configuration and provides the
//! Ada client; everything else lives here.

pub mod audit;
pub mod config;
pub mod contract;
pub mod convert;
pub mod error;
pub mod fields;
pub mod http;
pub mod pylon;
pub mod reconcile;
pub mod snapshot;
pub mod synchronise;

pub use error::{RemoteSystem, SyncError};
