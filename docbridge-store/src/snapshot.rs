//! Durable tracker snapshots.
//!
//! The snapshot is a versioned JSON document; the version tag is checked on
//! load so a future field addition can migrate explicitly instead of
//! misparsing. Saves go through a temp file and a rename so a crash
//! mid-write never leaves a truncated snapshot behind.

use crate::error::{StoreError, StoreResult};
use crate::tracker::{ChangeTracker, SyncedRecord};
use docbridge_types::ContentKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    format_version: u32,
    entities: HashMap<ContentKey, SyncedRecord>,
}

impl ChangeTracker {
    /// Loads a tracker from a snapshot file.
    ///
    /// A missing file is a cold start, not an error. A snapshot with an
    /// unknown format version is an error.
    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            info!("no tracker snapshot at {}, starting cold", path.display());
            return Ok(Self::new());
        }

        let bytes = fs::read(path)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        if snapshot.format_version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.format_version,
                expected: FORMAT_VERSION,
            });
        }

        info!(
            "loaded tracker snapshot with {} entities from {}",
            snapshot.entities.len(),
            path.display()
        );
        Ok(Self {
            entities: snapshot.entities,
        })
    }

    /// Writes the tracker to a snapshot file atomically.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let snapshot = Snapshot {
            format_version: FORMAT_VERSION,
            entities: self.entities.clone(),
        };

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(&snapshot)?)?;
        fs::rename(&tmp, path)?;

        debug!("saved tracker snapshot to {}", path.display());
        Ok(())
    }
}
