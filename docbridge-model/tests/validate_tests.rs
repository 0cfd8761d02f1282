use docbridge_model::{CatalogRecord, Entity, Rejection, Template};
use docbridge_types::TemplateId;
use serde_json::json;
use std::collections::HashMap;

const CID_FIELD: &str = "sha256cid";

fn record_with_attachments(attachments: serde_json::Value) -> CatalogRecord {
    serde_json::from_value(json!({
        "_id": "64f1c2d3a4b5c6d7e8f90a1b",
        "title": "Field Report 12",
        "documents": [],
        "attachments": attachments,
        "metadata": {},
        "editDate": 1700000001234i64,
        "template": "tpl-report"
    }))
    .unwrap()
}

fn templates() -> HashMap<TemplateId, Template> {
    let template: Template = serde_json::from_value(json!({
        "_id": "tpl-report",
        "name": "Report",
        "properties": [
            {"name": "summary", "type": "text"},
            {"name": "sha256cid", "type": "generatedid"}
        ]
    }))
    .unwrap();
    HashMap::from([(template.id.clone(), template)])
}

// ── attachment eligibility ───────────────────────────────────────

#[test]
fn one_real_file_plus_preview_is_valid() {
    let record = record_with_attachments(json!([
        {"filename": "169doc.pdf", "originalname": "doc.pdf"},
        {"filename": "169prev.png", "originalname": "preview.png"}
    ]));
    let entity = Entity::from_record(record, &templates(), CID_FIELD).unwrap();
    assert_eq!(entity.filename, "169doc.pdf");
}

#[test]
fn preview_only_is_invalid() {
    let record = record_with_attachments(json!([
        {"filename": "169prev", "originalname": "preview"}
    ]));
    let err = Entity::from_record(record, &templates(), CID_FIELD).unwrap_err();
    assert_eq!(err, Rejection::NotExactlyOneFile { found: 0 });
}

#[test]
fn two_real_files_is_invalid() {
    let record = record_with_attachments(json!([
        {"filename": "169a.pdf", "originalname": "a.pdf"},
        {"filename": "169b.pdf", "originalname": "b.pdf"}
    ]));
    let err = Entity::from_record(record, &templates(), CID_FIELD).unwrap_err();
    assert_eq!(err, Rejection::NotExactlyOneFile { found: 2 });
}

#[test]
fn no_attachments_is_invalid() {
    let record = record_with_attachments(json!([]));
    let err = Entity::from_record(record, &templates(), CID_FIELD).unwrap_err();
    assert_eq!(err, Rejection::NotExactlyOneFile { found: 0 });
}

#[test]
fn bare_preview_name_counts_as_preview() {
    // "preview" exactly, no extension
    let record = record_with_attachments(json!([
        {"filename": "169doc.pdf", "originalname": "doc.pdf"},
        {"filename": "169prev", "originalname": "preview"}
    ]));
    assert!(Entity::from_record(record, &templates(), CID_FIELD).is_ok());
}

#[test]
fn preview_prefix_without_dot_is_a_real_file() {
    // "preview_notes.pdf" does not match "preview" or "preview.*"
    let record = record_with_attachments(json!([
        {"filename": "169doc.pdf", "originalname": "doc.pdf"},
        {"filename": "169p.pdf", "originalname": "preview_notes.pdf"}
    ]));
    let err = Entity::from_record(record, &templates(), CID_FIELD).unwrap_err();
    assert_eq!(err, Rejection::NotExactlyOneFile { found: 2 });
}

// ── legacy document slot ─────────────────────────────────────────

#[test]
fn occupied_legacy_slot_is_invalid() {
    let mut record = record_with_attachments(json!([
        {"filename": "169doc.pdf", "originalname": "doc.pdf"}
    ]));
    record.documents = vec![json!({"filename": "legacy.pdf"})];
    let err = Entity::from_record(record, &templates(), CID_FIELD).unwrap_err();
    assert_eq!(err, Rejection::LegacyDocuments);
}

// ── template support ─────────────────────────────────────────────

#[test]
fn unknown_template_is_invalid() {
    let record = record_with_attachments(json!([
        {"filename": "169doc.pdf", "originalname": "doc.pdf"}
    ]));
    let err = Entity::from_record(record, &HashMap::new(), CID_FIELD).unwrap_err();
    assert!(matches!(err, Rejection::UnknownTemplate(_)));
}

#[test]
fn template_without_cid_field_is_invalid() {
    let record = record_with_attachments(json!([
        {"filename": "169doc.pdf", "originalname": "doc.pdf"}
    ]));
    let err = Entity::from_record(record, &templates(), "othercid").unwrap_err();
    assert!(matches!(err, Rejection::NoContentKeyField { .. }));
}

// ── content key passthrough ──────────────────────────────────────

#[test]
fn existing_content_key_is_surfaced() {
    let mut record = record_with_attachments(json!([
        {"filename": "169doc.pdf", "originalname": "doc.pdf"}
    ]));
    record.metadata.insert(
        CID_FIELD.to_string(),
        vec![docbridge_model::MetadataValue::of("bafybeigdyrzt5s")],
    );
    let entity = Entity::from_record(record, &templates(), CID_FIELD).unwrap();
    assert_eq!(entity.content_key.unwrap().as_str(), "bafybeigdyrzt5s");
}

#[test]
fn missing_content_key_is_none() {
    let record = record_with_attachments(json!([
        {"filename": "169doc.pdf", "originalname": "doc.pdf"}
    ]));
    let entity = Entity::from_record(record, &templates(), CID_FIELD).unwrap();
    assert!(entity.content_key.is_none());
}
