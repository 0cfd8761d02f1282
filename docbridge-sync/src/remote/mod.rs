//! Remote collaborators.
//!
//! Defines the abstract contracts the engine consumes (the source catalog
//! and the metadata index) and their HTTP implementations.

pub mod catalog;
pub mod index;

pub use catalog::{CatalogConfig, HttpCatalog};
pub use index::{HttpIndex, IndexConfig};

use crate::error::SyncResult;
use async_trait::async_trait;
use docbridge_model::{CatalogRecord, Template};
use docbridge_types::{ContentKey, TemplateId, WireRecord};
use std::collections::HashMap;

/// Outcome of writing a record back to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBack {
    /// The catalog accepted the update.
    Accepted,
    /// The catalog rejected the update because the record's template does
    /// not (or no longer does) declare the field being written.
    UnsupportedField,
}

/// The source catalog holding entities, templates, and files.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Authenticates and establishes a session.
    async fn login(&self) -> SyncResult<()>;

    /// Re-authenticates if the current session has expired.
    async fn ensure_login(&self) -> SyncResult<()>;

    /// Fetches the full entity listing. Every cycle re-scans everything;
    /// there is no cursor.
    async fn fetch_entities(&self) -> SyncResult<Vec<CatalogRecord>>;

    /// Fetches all template schemas, keyed by template id. Loaded fresh
    /// every cycle since schemas can evolve.
    async fn fetch_templates(&self) -> SyncResult<HashMap<TemplateId, Template>>;

    /// Submits an updated record back to the catalog. Used only to persist
    /// a freshly computed content key.
    async fn write_back(&self, record: &CatalogRecord) -> SyncResult<WriteBack>;
}

/// The external key/metadata index.
#[async_trait]
pub trait MetadataIndex: Send + Sync {
    /// Publishes a batch of wire records under a content key.
    ///
    /// Idempotent from the caller's perspective; republishing the same
    /// batch is harmless. Must succeed before tracker state is committed.
    async fn publish(
        &self,
        key: &ContentKey,
        batch: &[WireRecord],
        indexing: bool,
    ) -> SyncResult<()>;
}
