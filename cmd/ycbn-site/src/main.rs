//! # YCBN Site Binary
//!
//! Loads settings, picks the storage backend and serves the JSON API.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use auth_adapters::{Argon2Hasher, JwtIssuer};
use configs::{DatabaseBackend, LogFormat, Settings};
use secrecy::ExposeSecret;
use storage_adapters::MemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings);

    let hasher = Arc::new(Argon2Hasher::new());
    let tokens = Arc::new(JwtIssuer::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        settings.auth.token_ttl_minutes,
    ));
    let policy = settings.membership.join_policy;
    let source = settings.newsletter.source_label.clone();

    let state = match settings.database.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on shutdown");
            AppState::assemble(Arc::new(MemoryStore::new()), hasher, tokens, policy, source)
        }
        DatabaseBackend::Postgres => {
            let store = connect_postgres(&settings).await?;
            AppState::assemble(Arc::new(store), hasher, tokens, policy, source)
        }
    };

    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    tracing::info!(%address, join_policy = %policy, "ycbn-site listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("ycbn-site stopped");
    Ok(())
}

/// `RUST_LOG` wins over `logging.level` when set.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match settings.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[cfg(feature = "db-postgres")]
async fn connect_postgres(settings: &Settings) -> anyhow::Result<storage_adapters::PgStore> {
    let url = settings
        .database
        .url
        .as_ref()
        .context("database.url is required for the postgres backend")?;
    let store = storage_adapters::PgStore::connect(
        url.expose_secret(),
        settings.database.max_connections,
        std::time::Duration::from_secs(settings.database.acquire_timeout_secs),
    )
    .await
    .context("connecting to postgres")?;
    store.migrate().await.context("running migrations")?;
    tracing::info!(max_connections = settings.database.max_connections, "postgres ready");
    Ok(store)
}

#[cfg(not(feature = "db-postgres"))]
async fn connect_postgres(_settings: &Settings) -> anyhow::Result<MemoryStore> {
    anyhow::bail!("this build has no postgres support; rebuild with --features db-postgres")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
