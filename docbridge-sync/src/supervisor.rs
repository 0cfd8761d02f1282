//! Supervised execution of the sync worker.
//!
//! The worker logs in once and then polls forever. The supervisor restarts
//! it after any error escape, flushing tracker state to disk first so a
//! restart resumes from the last committed snapshot. This is the sole
//! fault-tolerance mechanism; errors the engine can absorb never reach
//! the supervisor.

use crate::engine::SyncEngine;
use crate::error::SyncResult;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Restarts the polling worker whenever it fails.
pub struct Supervisor {
    engine: SyncEngine,
    poll_interval: Duration,
    restart_backoff: Duration,
}

impl Supervisor {
    /// Creates a supervisor around an engine.
    pub fn new(engine: SyncEngine, poll_interval: Duration, restart_backoff: Duration) -> Self {
        Self {
            engine,
            poll_interval,
            restart_backoff,
        }
    }

    /// Writes the tracker snapshot to disk.
    pub fn flush_state(&self) -> SyncResult<()> {
        self.engine.flush_state()
    }

    /// Runs the worker forever, restarting it after any failure.
    pub async fn run(&mut self) {
        loop {
            if let Err(e) = self.worker().await {
                error!(
                    "sync worker failed: {e}; restarting in {}s",
                    self.restart_backoff.as_secs()
                );
                if let Err(e) = self.engine.flush_state() {
                    error!("failed to flush tracker state: {e}");
                }
                sleep(self.restart_backoff).await;
            }
        }
    }

    /// One worker lifetime: authenticate, then poll until an error escapes.
    async fn worker(&mut self) -> SyncResult<()> {
        self.engine.catalog().login().await?;
        info!("logged in to catalog");

        loop {
            let report = self.engine.run_cycle().await?;
            debug!(
                scanned = report.scanned,
                rejected = report.rejected,
                published = report.published,
                "cycle complete"
            );

            sleep(self.poll_interval).await;
            // Catalog sessions expire; re-authenticate before the next scan
            self.engine.catalog().ensure_login().await?;
        }
    }
}
