//! Telegram ingress: receives webhook updates and appends each message, with
//! a timestamp and coordinate, to an append-only CSV log.
//!
//! ```text
//! Telegram POSTs updates to `/webhook`; the `message` object is flattened
//! into one CSV row and the request is acknowledged with `{"ok": true}`.
//! ```

use anyhow::{Context, Result};
use msglog_core::LogStore;

mod app;
mod config;
mod reqid;
mod respond;
mod telemetry;

use app::{AppState, router};
use config::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    msglog_telemetry::install("msglog-ingress-telegram", env!("CARGO_PKG_VERSION"))?;

    let cfg = load_config()?;
    let addr = cfg.bind_addr()?;

    let store = LogStore::new(&cfg.log_path);
    store
        .ensure_initialized()
        .with_context(|| format!("initialise message log {}", cfg.log_path.display()))?;

    if cfg.secret_token.is_none() {
        tracing::warn!("TELEGRAM_SECRET_TOKEN not set; webhook accepts unauthenticated updates");
    }
    let state = AppState::new(store, cfg.secret_token.clone());
    let app = router(state, &cfg.webhook_path);

    tracing::info!(
        path = %cfg.webhook_path,
        log = %cfg.log_path.display(),
        "ingress-telegram listening on {}",
        addr
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("ingress-telegram stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
