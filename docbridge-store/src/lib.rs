//! Change tracking and durable sync state for docbridge.
//!
//! The [`ChangeTracker`] is the per-content-key table of last-synced field
//! values and edit timestamps. It decides which fields changed since the
//! last successful publish, and it is only ever mutated after a publish
//! succeeded. Failed publishes leave no trace, so the next cycle's diff
//! regenerates the same batch (idempotent retry through re-diffing).
//!
//! State is persisted as a versioned JSON snapshot at poll-cycle boundaries
//! and on the crash-flush path, and reloaded at process start. There is
//! exactly one writer (the sync loop), so no locking.

mod error;
mod snapshot;
mod tracker;

pub use error::{StoreError, StoreResult};
pub use snapshot::FORMAT_VERSION;
pub use tracker::{ChangeSet, ChangeTracker, SyncedRecord, TitlePolicy};
