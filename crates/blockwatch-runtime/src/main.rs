//! # Blockwatch Runtime
//!
//! The watcher binary. Construction is explicit: the startup sequence
//! builds the RPC gateway, opens the block store, wires the scheduler with
//! both timers, and registers the HTTP handlers, then runs the scheduler
//! and the server side by side until a termination signal.

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing::{info, warn};

use blockwatch_api::{build_router, AppState};
use blockwatch_ingest::IngestService;
use blockwatch_rpc::{JsonRpcGateway, RpcGateway};
use blockwatch_store::{BlockStore, PgBlockStore, MIGRATOR};
use blockwatch_telemetry::PrometheusStoreObserver;

use crate::config::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    blockwatch_telemetry::init_logging().context("logging init failed")?;
    blockwatch_telemetry::register_metrics().context("metrics init failed")?;

    let config = RuntimeConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("database connection failed")?;
    MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;

    let store = Arc::new(PgBlockStore::new(
        pool,
        Arc::new(PrometheusStoreObserver),
    ));
    let rpc = Arc::new(JsonRpcGateway::from_env());
    if rpc.configured_chain_ids().is_empty() {
        warn!("no RPC endpoints configured; nothing will be ingested");
    }

    let ingest = Arc::new(IngestService::new(
        config.ingest.clone(),
        Arc::clone(&rpc),
        Arc::clone(&store),
    ));

    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn BlockStore>,
        config.max_rss_bytes,
    );
    let router = build_router(state);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = {
        let ingest = Arc::clone(&ingest);
        tokio::spawn(async move { ingest.run(shutdown_rx).await })
    };

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    info!(addr = %listener.local_addr()?, chains = ?rpc.configured_chain_ids(), "blockwatch listening");

    let mut server_shutdown = shutdown_tx.subscribe();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = server_shutdown.changed().await;
    });

    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await.context("http server failed")?;
    scheduler.await.context("scheduler task panicked")?;
    info!("blockwatch stopped");

    Ok(())
}

/// Resolves on SIGINT, and on SIGTERM where the platform has it.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable; watching ctrl-c only");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
