//! Eligibility validation for catalog records.
//!
//! A record must carry exactly one real (non-preview) attachment and a
//! loaded template that declares the content-key field. Rejections are
//! non-fatal: the engine skips the record and re-evaluates it next cycle,
//! since both the record and the schema can change underneath it.

use crate::record::{Attachment, CatalogRecord};
use crate::template::Template;
use docbridge_types::{ContentKey, TemplateId};
use std::collections::HashMap;
use thiserror::Error;

/// Why a catalog record is ineligible for processing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    /// The legacy document slot must be unused.
    #[error("legacy document slot is occupied")]
    LegacyDocuments,

    /// Zero or multiple non-preview attachments; no unambiguous document.
    #[error("expected exactly one non-preview attachment, found {found}")]
    NotExactlyOneFile { found: usize },

    /// The record's template is not in the loaded schema map.
    #[error("template {0} is not loaded")]
    UnknownTemplate(TemplateId),

    /// The template does not declare the content-key field.
    #[error("template {template} does not declare field {field}")]
    NoContentKeyField { template: TemplateId, field: String },
}

/// A catalog record that passed eligibility validation.
#[derive(Debug, Clone)]
pub struct Entity {
    /// The underlying record, mutated only to insert the content key.
    pub record: CatalogRecord,
    /// Storage filename of the single non-preview attachment.
    pub filename: String,
    /// The record's resolved template.
    pub template: Template,
    /// Already-assigned content key, if the record's metadata carries one.
    pub content_key: Option<ContentKey>,
}

impl Entity {
    /// Validates a raw record against the loaded schema map.
    ///
    /// Rules are applied in order: legacy slot empty, exactly one real
    /// attachment, template loaded, content-key field declared.
    pub fn from_record(
        record: CatalogRecord,
        templates: &HashMap<TemplateId, Template>,
        cid_field: &str,
    ) -> Result<Self, Rejection> {
        if !record.documents.is_empty() {
            return Err(Rejection::LegacyDocuments);
        }

        let real: Vec<&Attachment> = record
            .attachments
            .iter()
            .filter(|a| !a.is_preview())
            .collect();
        let [attachment] = real.as_slice() else {
            return Err(Rejection::NotExactlyOneFile { found: real.len() });
        };
        let filename = attachment.filename.clone();

        let Some(template) = templates.get(&record.template) else {
            return Err(Rejection::UnknownTemplate(record.template.clone()));
        };
        if !template.has(cid_field) {
            return Err(Rejection::NoContentKeyField {
                template: template.id.clone(),
                field: cid_field.to_string(),
            });
        }

        let content_key = record.content_key(cid_field);
        Ok(Self {
            record,
            filename,
            template: template.clone(),
            content_key,
        })
    }

    /// The record's title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.record.title
    }

    /// The record's source-assigned edit timestamp.
    #[must_use]
    pub fn edit_date(&self) -> i64 {
        self.record.edit_date
    }
}
