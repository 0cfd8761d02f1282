//! Raw catalog records.
//!
//! A [`CatalogRecord`] is deserialized straight from the catalog's JSON and
//! serialized back verbatim on write-back, so every type here flattens
//! unknown keys into a passthrough map instead of dropping them.

use docbridge_types::{ContentKey, TemplateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata map: field name → ordered list of value entries.
///
/// A `BTreeMap` so that iteration (and therefore batch order) is
/// deterministic.
pub type Metadata = BTreeMap<String, Vec<MetadataValue>>;

/// One entry in a metadata field's value list.
///
/// Always carries at least `value`; select-style fields also carry `label`
/// (the human-readable option text, as opposed to the internal option id in
/// `value`). Anything else the catalog attaches is preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MetadataValue {
    /// An entry holding only a value.
    pub fn of(value: impl Into<serde_json::Value>) -> Self {
        Self {
            value: Some(value.into()),
            label: None,
            extra: serde_json::Map::new(),
        }
    }

    /// An entry holding a value and a display label.
    pub fn labeled(value: impl Into<serde_json::Value>, label: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            label: Some(label.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// An attached file on a catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Storage filename under the catalog's upload directory.
    pub filename: String,
    /// The name the file was uploaded with.
    pub originalname: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Attachment {
    /// Preview files (`"preview"` or `"preview.*"`) don't count as the
    /// entity's document.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.originalname == "preview" || self.originalname.starts_with("preview.")
    }
}

/// A raw entity record from the source catalog.
///
/// Owned by the catalog; the core treats it as an immutable snapshot per
/// poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Legacy attachment slot; must be empty for eligibility.
    #[serde(default)]
    pub documents: Vec<serde_json::Value>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Source-assigned, monotonically non-decreasing edit timestamp.
    #[serde(rename = "editDate", default)]
    pub edit_date: i64,
    pub template: TemplateId,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CatalogRecord {
    /// Returns the already-assigned content key, if the given metadata field
    /// carries a non-empty value.
    #[must_use]
    pub fn content_key(&self, cid_field: &str) -> Option<ContentKey> {
        let value = self.metadata.get(cid_field)?.first()?.value.as_ref()?;
        ContentKey::parse(value.as_str()?).ok()
    }

    /// Writes the content key into the given metadata field, replacing any
    /// previous entries.
    pub fn set_content_key(&mut self, cid_field: &str, key: &ContentKey) {
        self.metadata
            .insert(cid_field.to_string(), vec![MetadataValue::of(key.as_str())]);
    }
}
