//! Per-content-key change tracking.
//!
//! Diffing compares raw value-entry lists, not encoded wire values: a field
//! counts as changed when its current list differs from what was stored at
//! the last successful publish (never-synced counts as changed). Commits
//! store only the fields that were in the change set; unchanged fields
//! keep their prior stored value.

use docbridge_model::{Metadata, MetadataValue};
use docbridge_types::ContentKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Whether a title change alone is enough to trigger a sync.
///
/// The two behaviors both occur in the wild; which one a deployment wants
/// depends on whether title-only records are worth indexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitlePolicy {
    /// The title is only considered when the record has a non-empty
    /// metadata map (title alone never syncs).
    #[default]
    WithMetadataOnly,
    /// A changed title syncs even when the metadata map is empty.
    Standalone,
}

/// Last-synced state for one content key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncedRecord {
    /// Raw value-entry lists as of the last successful publish.
    pub fields: BTreeMap<String, Vec<MetadataValue>>,
    /// Title as of the last successful publish.
    pub title: Option<String>,
    /// Edit timestamp as of the last successful publish.
    pub edit_date: i64,
}

/// The fields that differ from the last-synced snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Changed fields with their current raw value lists, in field order.
    pub fields: BTreeMap<String, Vec<MetadataValue>>,
    /// The current title, present iff it changed.
    pub title: Option<String>,
}

impl ChangeSet {
    /// True when there is nothing to sync.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.title.is_none()
    }
}

/// Per-content-key table of last-synced values.
///
/// Owned by the sync engine and passed into diff operations explicitly;
/// load/save live in the snapshot module.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    pub(crate) entities: HashMap<ContentKey, SyncedRecord>,
}

impl ChangeTracker {
    /// Creates an empty tracker (cold start).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked content keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no content key has ever been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Last-synced state for a content key.
    #[must_use]
    pub fn record(&self, key: &ContentKey) -> Option<&SyncedRecord> {
        self.entities.get(key)
    }

    /// Fast-skip pre-filter: true when the stored edit timestamp is at
    /// least the record's current one.
    ///
    /// Only sound when the source bumps the edit timestamp on every
    /// metadata mutation; the per-field diff remains authoritative.
    #[must_use]
    pub fn is_unmodified_since(&self, key: &ContentKey, edit_date: i64) -> bool {
        self.entities
            .get(key)
            .is_some_and(|r| r.edit_date >= edit_date)
    }

    /// Computes the minimal change set for a content key.
    ///
    /// Every metadata field except `cid_field` is compared by raw value
    /// list; a field with no stored value counts as changed. The title is
    /// compared separately, subject to `policy` when the metadata map is
    /// empty.
    #[must_use]
    pub fn diff(
        &self,
        key: &ContentKey,
        metadata: &Metadata,
        title: &str,
        cid_field: &str,
        policy: TitlePolicy,
    ) -> ChangeSet {
        let mut changes = ChangeSet::default();

        if metadata.is_empty() && policy == TitlePolicy::WithMetadataOnly {
            return changes;
        }

        let prior = self.entities.get(key);
        for (field, values) in metadata {
            if field == cid_field {
                continue;
            }
            if prior.and_then(|p| p.fields.get(field)) != Some(values) {
                changes.fields.insert(field.clone(), values.clone());
            }
        }

        if prior.and_then(|p| p.title.as_deref()) != Some(title) {
            changes.title = Some(title.to_string());
        }

        changes
    }

    /// Records a successful publish.
    ///
    /// Must only be called after the publish returned success: stores the
    /// changed fields' current values, the title when it changed, and the
    /// record's edit timestamp.
    pub fn commit(&mut self, key: &ContentKey, changes: &ChangeSet, edit_date: i64) {
        let record = self.entities.entry(key.clone()).or_default();
        for (field, values) in &changes.fields {
            record.fields.insert(field.clone(), values.clone());
        }
        if let Some(title) = &changes.title {
            record.title = Some(title.clone());
        }
        record.edit_date = edit_date;
    }
}
