//! Content-key derivation.
//!
//! Keys are derived by the external content-addressing tool in hash-only
//! mode, so any implementation speaking the same scheme can reproduce them
//! byte-for-byte. The parameter set below is fixed: changing any value
//! changes every derived key, so a change requires bumping
//! [`KEY_FORMAT_VERSION`] and re-keying existing records.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use docbridge_types::ContentKey;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Version of the derivation parameter set below.
pub const KEY_FORMAT_VERSION: u32 = 1;

/// Content identifier format version.
pub const CID_VERSION: u32 = 1;
/// Hash function used over file bytes.
pub const HASH_FUNCTION: &str = "sha2-256";
/// Fixed chunk size in bytes.
pub const CHUNK_SIZE: u32 = 262_144;
/// Inline-block size limit in bytes (inlining itself is disabled).
pub const INLINE_LIMIT: u32 = 32;

/// Derives content keys from file bytes.
///
/// Must be deterministic: identical bytes always yield the identical key.
#[async_trait]
pub trait ContentHasher: Send + Sync {
    async fn content_key(&self, path: &Path) -> SyncResult<ContentKey>;
}

/// Hasher that shells out to the IPFS CLI in hash-only mode.
#[derive(Debug, Clone)]
pub struct IpfsHasher {
    binary: PathBuf,
}

impl IpfsHasher {
    /// Creates a hasher invoking the given binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for IpfsHasher {
    fn default() -> Self {
        Self::new("ipfs")
    }
}

#[async_trait]
impl ContentHasher for IpfsHasher {
    async fn content_key(&self, path: &Path) -> SyncResult<ContentKey> {
        let output = Command::new(&self.binary)
            .arg("add")
            .arg("--only-hash=true")
            .arg("--wrap-with-directory=false")
            .arg(format!("--cid-version={CID_VERSION}"))
            .arg(format!("--hash={HASH_FUNCTION}"))
            .arg("--pin=true")
            .arg("--raw-leaves=true")
            .arg(format!("--chunker=size-{CHUNK_SIZE}"))
            .arg("--nocopy=false")
            .arg("--fscache=false")
            .arg("--inline=false")
            .arg(format!("--inline-limit={INLINE_LIMIT}"))
            .arg("--quieter")
            .arg(path)
            .output()
            .await
            .map_err(SyncError::HasherSpawn)?;

        if !output.status.success() {
            return Err(SyncError::HasherFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(ContentKey::parse(&key)?)
    }
}
