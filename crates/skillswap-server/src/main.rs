//! # skillswap-server
//!
//! HTTP backend for the SkillSwap marketplace.
//!
//! This binary provides:
//! - **Accounts**: registration, login and bearer credentials
//! - **Directory**: paginated discovery of public profiles with search and
//!   availability filters
//! - **Swap requests**: creation and a one-shot accept/reject by the recipient
//! - **Notifications**: per-user feed written by the request lifecycle
//!
//! State lives in SQLite by default, or in memory with `STORE_BACKEND=memory`.

mod api;
mod config;
mod error;
mod extract;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skillswap_core::Marketplace;
use skillswap_shared::constants::APP_NAME;
use skillswap_store::{MemoryStore, SqliteStore};

use crate::api::AppState;
use crate::config::{ServerConfig, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,skillswap=debug")),
        )
        .init();

    info!("Starting {} server v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open the store and wire the marketplace
    // -----------------------------------------------------------------------
    let signer = config.credential_signer();
    let market = match config.store_backend {
        StoreBackend::Sqlite => {
            let store = match &config.database_path {
                Some(path) => SqliteStore::open_at(path)
                    .with_context(|| format!("opening database at {}", path.display()))?,
                None => SqliteStore::open_default().context("opening default database")?,
            };
            info!("Using SQLite store");
            Marketplace::new(Arc::new(store), signer, config.max_page_size)
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on shutdown");
            Marketplace::new(Arc::new(MemoryStore::new()), signer, config.max_page_size)
        }
    };

    let app_state = AppState { market };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
