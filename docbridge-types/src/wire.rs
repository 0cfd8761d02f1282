//! The wire schema published to the index service.
//!
//! Every exported field becomes one [`WireRecord`]: a `{key, value, type}`
//! triple. The value space is deliberately small: the index service accepts
//! strings, 64-bit floats, string arrays, unix-millisecond timestamps, and
//! (for structured values like geolocations) an untyped JSON passthrough
//! with a `null` type tag.

use serde::{Deserialize, Serialize};

/// Type tag attached to a published value.
///
/// A record without a tag (`"type": null` on the wire) carries an untyped
/// passthrough value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireTag {
    #[serde(rename = "str")]
    Str,
    #[serde(rename = "float64")]
    Float64,
    #[serde(rename = "str-array")]
    StrArray,
    #[serde(rename = "unix")]
    Unix,
}

/// A published value.
///
/// Serialized untagged: the wire shape is the bare JSON value, with
/// [`WireTag`] carrying the type information separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Str(String),
    Millis(i64),
    Float(f64),
    StrArray(Vec<String>),
    Raw(serde_json::Value),
}

/// The normalized unit exported to the index service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub key: String,
    pub value: WireValue,
    #[serde(rename = "type")]
    pub tag: Option<WireTag>,
}

impl WireRecord {
    /// A string record.
    pub fn str(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: WireValue::Str(value.into()),
            tag: Some(WireTag::Str),
        }
    }

    /// A 64-bit float record.
    pub fn float64(key: &str, value: f64) -> Self {
        Self {
            key: key.to_string(),
            value: WireValue::Float(value),
            tag: Some(WireTag::Float64),
        }
    }

    /// A string-array record.
    pub fn str_array(key: &str, values: Vec<String>) -> Self {
        Self {
            key: key.to_string(),
            value: WireValue::StrArray(values),
            tag: Some(WireTag::StrArray),
        }
    }

    /// A unix-millisecond timestamp record.
    pub fn unix(key: &str, millis: i64) -> Self {
        Self {
            key: key.to_string(),
            value: WireValue::Millis(millis),
            tag: Some(WireTag::Unix),
        }
    }

    /// An untyped passthrough record (`"type": null` on the wire).
    pub fn untyped(key: &str, value: serde_json::Value) -> Self {
        Self {
            key: key.to_string(),
            value: WireValue::Raw(value),
            tag: None,
        }
    }
}
