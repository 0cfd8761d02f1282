//! Catalog-to-index synchronization engine for docbridge.
//!
//! # Architecture
//!
//! The engine drives a poll → validate → hash → diff → encode → publish
//! loop against two independently failing remote services, with
//! at-least-once, idempotent semantics.
//!
//! ## Components
//!
//! - **Remote**: collaborator traits for the source catalog and the
//!   metadata index, plus their HTTP implementations
//! - **Hasher**: derives content keys from document bytes via the external
//!   content-addressing tool
//! - **Engine**: one poll cycle — validates records, assigns content keys,
//!   diffs against tracker state, publishes changed fields
//! - **Supervisor**: restarts the polling worker after any error escape,
//!   flushing tracker state first
//!
//! ## Failure model
//!
//! Per-entity problems (ineligible records, rejected write-backs, failed
//! publishes) are absorbed and retried next cycle through re-diffing.
//! Cross-cutting problems (unhashable files, unwritable state) escape to
//! the supervisor, which flushes state, backs off, and restarts.

mod engine;
mod error;
pub mod hasher;
pub mod remote;
mod supervisor;

pub use engine::{CycleReport, SyncConfig, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use hasher::{ContentHasher, IpfsHasher, KEY_FORMAT_VERSION};
pub use remote::{
    Catalog, CatalogConfig, HttpCatalog, HttpIndex, IndexConfig, MetadataIndex, WriteBack,
};
pub use supervisor::Supervisor;
