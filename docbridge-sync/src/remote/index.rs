//! HTTP client for the metadata index service.

use crate::error::{SyncError, SyncResult};
use crate::remote::MetadataIndex;
use async_trait::async_trait;
use docbridge_types::{ContentKey, WireRecord};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Configuration for the index client.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Base URL of the index service (e.g. `http://localhost:3001`).
    pub base_url: String,
    /// Bearer token authorizing writes.
    pub token: String,
    /// Fixed per-request deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Index client publishing wire-record batches keyed by content key.
pub struct HttpIndex {
    config: IndexConfig,
    client: Client,
}

impl HttpIndex {
    /// Creates a new index client.
    pub fn new(config: IndexConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }
}

#[async_trait]
impl MetadataIndex for HttpIndex {
    async fn publish(
        &self,
        key: &ContentKey,
        batch: &[WireRecord],
        indexing: bool,
    ) -> SyncResult<()> {
        let mut request = self
            .client
            .post(format!("{}/c/{}", self.config.base_url, key))
            .bearer_auth(&self.config.token)
            .json(&batch);
        if indexing {
            request = request.query(&[("index", "1")]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Status {
                operation: "metadata publish",
                status: response.status().as_u16(),
            });
        }

        debug!("published {} records under {key}", batch.len());
        Ok(())
    }
}
