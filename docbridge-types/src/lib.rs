//! Core type definitions for docbridge.
//!
//! This crate defines the fundamental types shared by every other crate:
//! - [`ContentKey`] — the content-derived identifier joining catalog entities
//!   to index records
//! - [`TemplateId`] — the catalog's template identifier
//! - [`WireRecord`] — the normalized `{key, value, type}` unit published to
//!   the index service
//!
//! Catalog-shaped types (records, templates, metadata values) belong in
//! `docbridge-model`, not here.

mod ids;
mod wire;

pub use ids::{ContentKey, TemplateId};
pub use wire::{WireRecord, WireTag, WireValue};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("content key cannot be empty")]
    EmptyContentKey,

    #[error("template id cannot be empty")]
    EmptyTemplateId,
}
