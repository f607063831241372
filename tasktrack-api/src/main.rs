//! # Tasktrack API Server
//!
//! This is the HTTP server for Tasktrack, a small multi-tenant task tracker
//! and notes app.
//!
//! ## Architecture
//!
//! The server is built with Axum and provides:
//! - Task and comment CRUD endpoints
//! - Notes folders and pages endpoints
//! - Bearer-token authentication against the configured identity provider
//! - Static file serving with SPA fallback
//!
//! Storage is a document store: Postgres when `DATABASE_URL` is set, a
//! local JSON file otherwise.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasktrack-api
//! ```

use std::sync::Arc;

use tasktrack_api::app::{build_router, AppState};
use tasktrack_api::config::{AuthConfig, Config, StorageConfig};
use tasktrack_shared::auth::{EntraVerifier, GoogleVerifier, TokenVerifier};
use tasktrack_shared::store::{DocumentStore, FileStore, PostgresConfig, PostgresStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Tasktrack API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store: Arc<dyn DocumentStore> = match &config.storage {
        StorageConfig::Postgres {
            url,
            max_connections,
        } => Arc::new(
            PostgresStore::connect(PostgresConfig {
                url: url.clone(),
                max_connections: *max_connections,
            })
            .await?,
        ),
        StorageConfig::File { path } => {
            tracing::info!(path = %path.display(), "Using local JSON file storage");
            Arc::new(FileStore::open(path)?)
        }
    };

    let verifier = Arc::new(match &config.auth {
        AuthConfig::Entra {
            tenant_id,
            client_id,
        } => {
            tracing::info!("Authenticating against Microsoft Entra ID");
            TokenVerifier::Entra(EntraVerifier::new(tenant_id, client_id))
        }
        AuthConfig::Google => {
            tracing::info!("Authenticating against Google OAuth");
            TokenVerifier::Google(GoogleVerifier::new())
        }
        AuthConfig::LocalDev => {
            tracing::warn!("No identity provider configured; using the local development identity");
            TokenVerifier::LocalDev
        }
    });

    let bind_address = config.bind_address();
    let state = AppState::new(store, verifier, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received, exiting...");
    }
}
