//! Template schemas and per-kind field encoding.
//!
//! A [`Template`] is the catalog's per-type field registry. [`FieldKind`] is
//! a closed enum over the kinds the catalog can declare; each kind knows how
//! to encode a raw value-entry list into one [`WireRecord`], or that it
//! can't (`None`). Encoding is total: unrecognized kinds deserialize to
//! [`FieldKind::Unknown`] and encode to nothing with a warning.

use crate::record::MetadataValue;
use docbridge_types::{TemplateId, WireRecord};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The schema-declared kind of a metadata field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    RichText,
    Markdown,
    Numeric,
    Select,
    MultiSelect,
    Relationship,
    Date,
    Link,
    Image,
    Preview,
    Media,
    Geolocation,
    GeneratedId,
    /// A kind this version doesn't recognize; carries the raw tag so the
    /// encoder can name it in its warning.
    Unknown(String),
}

impl FieldKind {
    /// Parses the catalog's kind tag. Total: unknown tags become
    /// [`FieldKind::Unknown`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "rich_text" => Self::RichText,
            "markdown" => Self::Markdown,
            "numeric" => Self::Numeric,
            "select" => Self::Select,
            "multiselect" => Self::MultiSelect,
            "relationship" => Self::Relationship,
            "date" => Self::Date,
            "link" => Self::Link,
            "image" => Self::Image,
            "preview" => Self::Preview,
            "media" => Self::Media,
            "geolocation" => Self::Geolocation,
            "generatedid" => Self::GeneratedId,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The catalog's tag for this kind.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::RichText => "rich_text",
            Self::Markdown => "markdown",
            Self::Numeric => "numeric",
            Self::Select => "select",
            Self::MultiSelect => "multiselect",
            Self::Relationship => "relationship",
            Self::Date => "date",
            Self::Link => "link",
            Self::Image => "image",
            Self::Preview => "preview",
            Self::Media => "media",
            Self::Geolocation => "geolocation",
            Self::GeneratedId => "generatedid",
            Self::Unknown(tag) => tag,
        }
    }

    /// Encodes one field's raw value-entry list into a wire record.
    ///
    /// Returns `None` when the field is not encodable: unsupported kind,
    /// ambiguous shape (every kind except multi-select expects exactly one
    /// entry), or a malformed value inside a well-shaped entry.
    #[must_use]
    pub fn encode(&self, name: &str, values: &[MetadataValue]) -> Option<WireRecord> {
        match self {
            Self::MultiSelect => {
                // Like select but over all entries.
                let labels: Vec<String> = values.iter().filter_map(|v| v.label.clone()).collect();
                Some(WireRecord::str_array(name, labels))
            }
            Self::Relationship => None,
            // Internal upload paths, not useful outside the catalog
            Self::Image | Self::Preview | Self::Media => None,
            Self::Unknown(kind) => {
                warn!("unsupported metadata field kind: {kind}");
                None
            }
            Self::Text
            | Self::RichText
            | Self::Markdown
            | Self::Numeric
            | Self::Select
            | Self::Date
            | Self::Link
            | Self::Geolocation
            | Self::GeneratedId => {
                let [entry] = values else {
                    // Multiple accumulated values on a single-valued kind
                    return None;
                };
                self.encode_single(name, entry)
            }
        }
    }

    fn encode_single(&self, name: &str, entry: &MetadataValue) -> Option<WireRecord> {
        match self {
            Self::Text | Self::RichText | Self::Markdown => {
                let text = entry.value.as_ref()?.as_str()?;
                if text.is_empty() {
                    return None;
                }
                Some(WireRecord::str(name, text))
            }
            Self::Numeric => {
                // The catalog has no separate int and float kinds, so
                // float64 is the catch-all. Values usually arrive as
                // strings; an empty string means "not set".
                let number = match entry.value.as_ref()? {
                    serde_json::Value::String(s) if s.is_empty() => return None,
                    serde_json::Value::String(s) => s.parse::<f64>().ok()?,
                    other => other.as_f64()?,
                };
                Some(WireRecord::float64(name, number))
            }
            // The label, not the internal option id
            Self::Select => Some(WireRecord::str(name, entry.label.as_deref()?)),
            Self::Date => {
                // Stored as unix seconds; the index wants millis
                let seconds = entry.value.as_ref()?.as_i64()?;
                Some(WireRecord::unix(name, seconds * 1000))
            }
            Self::Link => {
                // Shape: {"label": "...", "url": "..."}; keep the url,
                // drop the display label
                let url = entry.value.as_ref()?.get("url")?.as_str()?;
                Some(WireRecord::str(name, url))
            }
            Self::Geolocation => Some(WireRecord::untyped(name, entry.value.clone()?)),
            Self::GeneratedId => Some(WireRecord::str(name, entry.value.as_ref()?.as_str()?)),
            Self::MultiSelect
            | Self::Relationship
            | Self::Image
            | Self::Preview
            | Self::Media
            | Self::Unknown(_) => None,
        }
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// One declared field in a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

/// A catalog template: the field-type registry for one entity type.
///
/// Loaded fresh every poll cycle; schemas can evolve underneath the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "_id")]
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: Vec<TemplateProperty>,
}

impl Template {
    /// Whether the template declares a field with this name.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TemplateProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Encodes one field's value list per the declared kind. `None` when
    /// the field isn't declared or isn't encodable.
    #[must_use]
    pub fn encode_field(&self, name: &str, values: &[MetadataValue]) -> Option<WireRecord> {
        self.get(name)?.kind.encode(name, values)
    }
}
