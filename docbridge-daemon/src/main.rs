//! docbridge — catalog-to-index metadata sync daemon.
//!
//! Polls a document catalog for entities carrying exactly one attached
//! document, derives a content key from the document bytes, writes the key
//! back into the catalog, and publishes changed metadata fields to an
//! external index service keyed by that content key.
//!
//! Usage:
//!   docbridge --catalog-url http://localhost:3000 \
//!             --index-url http://localhost:3001 \
//!             --files-root /var/catalog/uploaded_documents
//!
//! Every option can also come from the environment (`DOCBRIDGE_*`),
//! including a `.env` file in the working directory.

use anyhow::{Context, Result};
use clap::Parser;
use docbridge_store::{ChangeTracker, TitlePolicy};
use docbridge_sync::{
    CatalogConfig, HttpCatalog, HttpIndex, IndexConfig, IpfsHasher, Supervisor, SyncConfig,
    SyncEngine,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "docbridge")]
#[command(about = "Catalog-to-index metadata sync daemon")]
struct Args {
    /// Base URL of the document catalog
    #[arg(long, env = "DOCBRIDGE_CATALOG_URL")]
    catalog_url: String,

    /// Catalog login username
    #[arg(long, env = "DOCBRIDGE_CATALOG_USERNAME")]
    username: String,

    /// Catalog login password
    #[arg(long, env = "DOCBRIDGE_CATALOG_PASSWORD", hide_env_values = true)]
    password: String,

    /// Base URL of the metadata index service
    #[arg(long, env = "DOCBRIDGE_INDEX_URL")]
    index_url: String,

    /// Bearer token authorizing index writes
    #[arg(long, env = "DOCBRIDGE_INDEX_TOKEN", hide_env_values = true)]
    index_token: String,

    /// Directory holding the catalog's uploaded documents
    #[arg(long, env = "DOCBRIDGE_FILES_ROOT")]
    files_root: PathBuf,

    /// Metadata field that stores the content key
    #[arg(long, env = "DOCBRIDGE_CID_FIELD", default_value = "sha256cid")]
    cid_field: String,

    /// Path of the durable change-tracker snapshot
    #[arg(long, env = "DOCBRIDGE_STATE_FILE", default_value = "docbridge-state.json")]
    state_file: PathBuf,

    /// Content hashing binary
    #[arg(long, env = "DOCBRIDGE_HASHER_BIN", default_value = "ipfs")]
    hasher_bin: PathBuf,

    /// Seconds between poll cycles
    #[arg(long, env = "DOCBRIDGE_POLL_SECS", default_value = "5")]
    poll_secs: u64,

    /// Seconds to wait before restarting after an unexpected failure
    #[arg(long, env = "DOCBRIDGE_BACKOFF_SECS", default_value = "30")]
    backoff_secs: u64,

    /// Per-request deadline in seconds for remote calls
    #[arg(long, env = "DOCBRIDGE_TIMEOUT_SECS", default_value = "10")]
    timeout_secs: u64,

    /// Don't ask the index service to index published values
    #[arg(long)]
    skip_indexing: bool,

    /// Publish a changed title even when the metadata map is empty
    #[arg(long)]
    standalone_title: bool,

    /// Disable the edit-timestamp fast skip (diff every entity every cycle)
    #[arg(long)]
    no_edit_date_gate: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("docbridge starting...");

    let catalog = HttpCatalog::new(CatalogConfig {
        base_url: args.catalog_url.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
        timeout_secs: args.timeout_secs,
    });
    let index = HttpIndex::new(IndexConfig {
        base_url: args.index_url.clone(),
        token: args.index_token.clone(),
        timeout_secs: args.timeout_secs,
    });
    let hasher = IpfsHasher::new(&args.hasher_bin);

    let tracker = ChangeTracker::load(&args.state_file).context("failed to load tracker state")?;
    let title_policy = if args.standalone_title {
        TitlePolicy::Standalone
    } else {
        TitlePolicy::WithMetadataOnly
    };

    let engine = SyncEngine::new(
        Arc::new(catalog),
        Arc::new(index),
        Arc::new(hasher),
        tracker,
        SyncConfig {
            files_root: args.files_root.clone(),
            cid_field: args.cid_field.clone(),
            state_path: args.state_file.clone(),
            indexing: !args.skip_indexing,
            title_policy,
            edit_date_gating: !args.no_edit_date_gate,
        },
    );
    let mut supervisor = Supervisor::new(
        engine,
        Duration::from_secs(args.poll_secs),
        Duration::from_secs(args.backoff_secs),
    );

    tokio::select! {
        _ = supervisor.run() => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    info!("shutting down");
    if let Err(e) = supervisor.flush_state() {
        error!("failed to flush tracker state on shutdown: {e}");
    }
    Ok(())
}
