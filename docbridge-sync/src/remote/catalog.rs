//! HTTP client for the source catalog.
//!
//! The catalog uses cookie-session authentication: `login` stores the
//! session cookie in the client's jar, `ensure_login` probes the API root
//! and re-authenticates on 401. Sessions are server-side and can expire
//! between poll cycles.

use crate::error::{SyncError, SyncResult};
use crate::remote::{Catalog, WriteBack};
use async_trait::async_trait;
use docbridge_model::{CatalogRecord, Template};
use docbridge_types::TemplateId;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog server (e.g. `http://localhost:3000`).
    pub base_url: String,
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Fixed per-request deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Fixed query the catalog expects on the entity listing call.
const SEARCH_PARAMS: [(&str, &str); 6] = [
    ("includeUnpublished", "true"),
    ("order", "desc"),
    ("sort", "creationDate"),
    ("aggregatePublishingStatus", "true"),
    ("aggregatePermissionsByUsers", "true"),
    ("include", "[\"permissions\"]"),
];

/// Envelope the catalog wraps list responses in.
#[derive(Debug, Deserialize)]
struct Rows<T> {
    rows: Vec<T>,
}

/// Catalog client backed by a cookie-session HTTP client.
pub struct HttpCatalog {
    config: CatalogConfig,
    client: Client,
}

impl HttpCatalog {
    /// Creates a new catalog client.
    pub fn new(config: CatalogConfig) -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.config.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.config.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn login(&self) -> SyncResult<()> {
        let response = self
            .post("/api/login")
            .json(&serde_json::json!({
                "username": self.config.username,
                "password": self.config.password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::Status {
                operation: "catalog login",
                status: response.status().as_u16(),
            });
        }

        // The session cookie is now in the jar
        Ok(())
    }

    async fn ensure_login(&self) -> SyncResult<()> {
        let response = self.get("/api/").send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.login().await?;
        }
        Ok(())
    }

    async fn fetch_entities(&self) -> SyncResult<Vec<CatalogRecord>> {
        let response = self.get("/api/search").query(&SEARCH_PARAMS).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Status {
                operation: "entity search",
                status: response.status().as_u16(),
            });
        }

        let rows: Rows<CatalogRecord> = response.json().await?;
        debug!("search retrieved {} entities", rows.rows.len());
        Ok(rows.rows)
    }

    async fn fetch_templates(&self) -> SyncResult<HashMap<TemplateId, Template>> {
        let response = self.get("/api/templates").send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Status {
                operation: "template fetch",
                status: response.status().as_u16(),
            });
        }

        let rows: Rows<Template> = response.json().await?;
        Ok(rows
            .rows
            .into_iter()
            .map(|template| (template.id.clone(), template))
            .collect())
    }

    async fn write_back(&self, record: &CatalogRecord) -> SyncResult<WriteBack> {
        let body = serde_json::to_string(record)?;
        let form =
            reqwest::multipart::Form::new().part("entity", reqwest::multipart::Part::text(body));

        let response = self.post("/api/entities").multipart(form).send().await?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            // The template stopped declaring the field between validation
            // and write-back
            return Ok(WriteBack::UnsupportedField);
        }
        if !response.status().is_success() {
            return Err(SyncError::Status {
                operation: "entity write-back",
                status: response.status().as_u16(),
            });
        }

        Ok(WriteBack::Accepted)
    }
}
