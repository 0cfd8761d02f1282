//! Catalog data model for docbridge.
//!
//! Defines the types the sync core operates on:
//! - [`CatalogRecord`] — a raw entity snapshot from the source catalog
//! - [`Template`] / [`FieldKind`] — the per-template field-type registry that
//!   answers "does field X exist?" and "how is field X's value encoded?"
//! - [`Entity`] — a record that passed eligibility validation
//!
//! Records are treated as immutable snapshots per poll cycle; the only
//! mutation the core ever performs is inserting the content-key field before
//! writing a record back to the catalog.

mod record;
mod template;
mod validate;

pub use record::{Attachment, CatalogRecord, Metadata, MetadataValue};
pub use template::{FieldKind, Template, TemplateProperty};
pub use validate::{Entity, Rejection};
