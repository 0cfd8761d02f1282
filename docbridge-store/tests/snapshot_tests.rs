use docbridge_model::{Metadata, MetadataValue};
use docbridge_store::{ChangeTracker, StoreError, TitlePolicy, FORMAT_VERSION};
use docbridge_types::ContentKey;
use tempfile::TempDir;

const CID_FIELD: &str = "sha256cid";

fn key() -> ContentKey {
    ContentKey::parse("bafkreicq4s4oweux2bkwsuktmjyl4gagx3englpwd7fa6uvsv3mvokzgzy").unwrap()
}

fn committed_tracker() -> ChangeTracker {
    let mut tracker = ChangeTracker::new();
    let mut meta = Metadata::new();
    meta.insert("summary".to_string(), vec![MetadataValue::of("text")]);
    let changes = tracker.diff(&key(), &meta, "Report", CID_FIELD, TitlePolicy::default());
    tracker.commit(&key(), &changes, 100);
    tracker
}

#[test]
fn missing_file_is_cold_start() {
    let dir = TempDir::new().unwrap();
    let tracker = ChangeTracker::load(&dir.path().join("state.json")).unwrap();
    assert!(tracker.is_empty());
}

#[test]
fn save_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let tracker = committed_tracker();
    tracker.save(&path).unwrap();

    let loaded = ChangeTracker::load(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    let record = loaded.record(&key()).unwrap();
    assert_eq!(record.fields["summary"], vec![MetadataValue::of("text")]);
    assert_eq!(record.title.as_deref(), Some("Report"));
    assert_eq!(record.edit_date, 100);
}

#[test]
fn reloaded_state_diffs_like_the_original() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    committed_tracker().save(&path).unwrap();

    let loaded = ChangeTracker::load(&path).unwrap();
    let mut meta = Metadata::new();
    meta.insert("summary".to_string(), vec![MetadataValue::of("text")]);
    let changes = loaded.diff(&key(), &meta, "Report", CID_FIELD, TitlePolicy::default());
    assert!(changes.is_empty());
}

#[test]
fn save_overwrites_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    ChangeTracker::new().save(&path).unwrap();
    committed_tracker().save(&path).unwrap();

    let loaded = ChangeTracker::load(&path).unwrap();
    assert_eq!(loaded.len(), 1);
}

#[test]
fn save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    committed_tracker().save(&path).unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("state.tmp").exists());
}

#[test]
fn snapshot_carries_format_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    committed_tracker().save(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["format_version"], serde_json::json!(FORMAT_VERSION));
}

#[test]
fn unknown_format_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"format_version": 99, "entities": {}}"#).unwrap();

    let err = ChangeTracker::load(&path).unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnsupportedVersion { found: 99, .. }
    ));
}

#[test]
fn corrupt_snapshot_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(matches!(
        ChangeTracker::load(&path),
        Err(StoreError::Serialization(_))
    ));
}
