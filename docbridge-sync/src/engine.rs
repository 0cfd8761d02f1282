//! The sync engine — one poll cycle over the catalog.
//!
//! The engine owns the change tracker and drives the per-entity pipeline:
//! validate → ensure content key → diff → encode → publish → commit.
//! Tracker state is committed only after a publish succeeded, so a failed
//! publish is retried automatically next cycle when the diff regenerates
//! the same batch.

use crate::error::SyncResult;
use crate::hasher::ContentHasher;
use crate::remote::{Catalog, MetadataIndex, WriteBack};
use docbridge_model::{CatalogRecord, Entity, Template};
use docbridge_store::{ChangeTracker, TitlePolicy};
use docbridge_types::{ContentKey, TemplateId, WireRecord};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Configuration for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory holding the catalog's uploaded documents.
    pub files_root: PathBuf,
    /// Metadata field that stores the content key.
    pub cid_field: String,
    /// Path of the durable tracker snapshot.
    pub state_path: PathBuf,
    /// Ask the index service to index published values.
    pub indexing: bool,
    /// Whether a title change alone can trigger a sync.
    pub title_policy: TitlePolicy,
    /// Skip entities whose edit timestamp hasn't advanced since the last
    /// commit. Sound only when the source bumps the timestamp on every
    /// metadata mutation; the per-field diff stays authoritative.
    pub edit_date_gating: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            files_root: PathBuf::from("uploaded_documents"),
            cid_field: "sha256cid".to_string(),
            state_path: PathBuf::from("docbridge-state.json"),
            indexing: true,
            title_policy: TitlePolicy::default(),
            edit_date_gating: true,
        }
    }
}

/// Counters for one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Records returned by the catalog scan.
    pub scanned: usize,
    /// Records that failed eligibility validation.
    pub rejected: usize,
    /// Content keys computed and accepted by the catalog this cycle.
    pub keys_assigned: usize,
    /// Entities whose key write-back did not stick (retried next cycle).
    pub deferred: usize,
    /// Entities with nothing to sync.
    pub unchanged: usize,
    /// Batches published to the index.
    pub published: usize,
    /// Batches dropped because the index refused them (retried next cycle).
    pub publish_failed: usize,
}

/// The sync engine — owns the tracker, consumes the collaborators.
pub struct SyncEngine {
    catalog: Arc<dyn Catalog>,
    index: Arc<dyn MetadataIndex>,
    hasher: Arc<dyn ContentHasher>,
    tracker: ChangeTracker,
    config: SyncConfig,
}

impl SyncEngine {
    /// Creates a new engine.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        index: Arc<dyn MetadataIndex>,
        hasher: Arc<dyn ContentHasher>,
        tracker: ChangeTracker,
        config: SyncConfig,
    ) -> Self {
        Self {
            catalog,
            index,
            hasher,
            tracker,
            config,
        }
    }

    /// Returns the catalog collaborator.
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Returns the change tracker.
    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    /// Writes the tracker snapshot to disk.
    pub fn flush_state(&self) -> SyncResult<()> {
        self.tracker.save(&self.config.state_path)?;
        Ok(())
    }

    /// Runs one poll cycle: scans the catalog, processes every record, and
    /// flushes tracker state.
    ///
    /// Remote fetch failures abort the cycle's work but return `Ok`; the
    /// next cycle retries. Errors that escape (unhashable files, unwritable
    /// state) are for the supervisor.
    pub async fn run_cycle(&mut self) -> SyncResult<CycleReport> {
        let mut report = CycleReport::default();

        let templates = match self.catalog.fetch_templates().await {
            Ok(templates) => templates,
            Err(e) => {
                error!("failed to fetch templates, skipping cycle: {e}");
                return Ok(report);
            }
        };
        let records = match self.catalog.fetch_entities().await {
            Ok(records) => records,
            Err(e) => {
                error!("failed to fetch entities, skipping cycle: {e}");
                return Ok(report);
            }
        };
        report.scanned = records.len();

        for record in records {
            self.process_record(record, &templates, &mut report).await?;
        }

        self.tracker.save(&self.config.state_path)?;
        Ok(report)
    }

    async fn process_record(
        &mut self,
        record: CatalogRecord,
        templates: &HashMap<TemplateId, Template>,
        report: &mut CycleReport,
    ) -> SyncResult<()> {
        let mut entity = match Entity::from_record(record, templates, &self.config.cid_field) {
            Ok(entity) => entity,
            Err(rejection) => {
                debug!("skipping ineligible record: {rejection}");
                report.rejected += 1;
                return Ok(());
            }
        };
        debug!("processing {}", entity.title());

        let key = match entity.content_key.clone() {
            Some(key) => key,
            None => match self.assign_content_key(&mut entity).await? {
                Some(key) => {
                    report.keys_assigned += 1;
                    key
                }
                None => {
                    report.deferred += 1;
                    return Ok(());
                }
            },
        };

        self.sync_metadata(&entity, &key, report).await;
        Ok(())
    }

    /// Computes the content key, writes it into the record's metadata, and
    /// submits the record back to the catalog.
    ///
    /// Returns `None` when the write-back did not stick; the key is
    /// treated as unassigned and the entity is revisited next cycle.
    /// Hasher failures propagate: an unreadable file is not something the
    /// loop can paper over.
    async fn assign_content_key(&self, entity: &mut Entity) -> SyncResult<Option<ContentKey>> {
        let path = self.config.files_root.join(&entity.filename);
        let key = self.hasher.content_key(&path).await?;

        entity.record.set_content_key(&self.config.cid_field, &key);
        match self.catalog.write_back(&entity.record).await {
            Ok(WriteBack::Accepted) => {
                info!("assigned content key {key} to {}", entity.title());
                Ok(Some(key))
            }
            Ok(WriteBack::UnsupportedField) => {
                warn!(
                    "catalog rejected content key field for {}, retrying next cycle",
                    entity.title()
                );
                Ok(None)
            }
            Err(e) => {
                error!("failed to write content key back for {}: {e}", entity.title());
                Ok(None)
            }
        }
    }

    /// Diffs the entity against tracker state, publishes the changed
    /// fields, and commits on success.
    async fn sync_metadata(&mut self, entity: &Entity, key: &ContentKey, report: &mut CycleReport) {
        if self.config.edit_date_gating && self.tracker.is_unmodified_since(key, entity.edit_date())
        {
            debug!("edit timestamp unchanged for {}, skipping", entity.title());
            report.unchanged += 1;
            return;
        }

        let changes = self.tracker.diff(
            key,
            &entity.record.metadata,
            entity.title(),
            &self.config.cid_field,
            self.config.title_policy,
        );
        if changes.is_empty() {
            debug!("nothing to sync for {}", entity.title());
            report.unchanged += 1;
            return;
        }

        let mut batch: Vec<WireRecord> = changes
            .fields
            .iter()
            .filter_map(|(field, values)| entity.template.encode_field(field, values))
            .collect();
        if let Some(title) = &changes.title {
            // The title lives outside the metadata map and is always a string
            batch.push(WireRecord::str("title", title));
        }
        if batch.is_empty() {
            debug!("no encodable changes for {}", entity.title());
            report.unchanged += 1;
            return;
        }

        match self.index.publish(key, &batch, self.config.indexing).await {
            Ok(()) => {
                self.tracker.commit(key, &changes, entity.edit_date());
                info!("published {} records for {}", batch.len(), entity.title());
                report.published += 1;
            }
            Err(e) => {
                // Batch dropped; the next cycle diffs against the
                // uncommitted state and regenerates it.
                error!("failed to publish metadata for {}: {e}", entity.title());
                report.publish_failed += 1;
            }
        }
    }
}
