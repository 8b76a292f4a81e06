// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server bootstrap: state construction, binding and graceful shutdown.

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::router;
use crate::config::{AppConfig, ConfigError};
use crate::state::AppState;
use crate::storage::{ContentDatabase, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open content database: {0}")]
    Storage(#[from] StorageError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the database and build the verifier described by `config`.
pub fn build_state(config: &AppConfig) -> Result<AppState, ServerError> {
    let verifier = config.jwt.build_verifier()?;
    let db = ContentDatabase::open_in_dir(&config.data_dir)?;

    info!(
        data_dir = %config.data_dir.display(),
        issuer = verifier.issuer(),
        subject = verifier.subject(),
        ownership = config.ownership.as_str(),
        "Application state ready"
    );

    Ok(AppState::new(db, verifier, config.ownership))
}

/// Serve the API on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let app = router(state);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            info!("Gracefully shutting down");
        })
        .await
}

/// Build state, bind and serve until SIGINT/SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), ServerError> {
    let state = build_state(&config)?;
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Portfolio server listening on http://{addr} (docs at /docs)");

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    serve(listener, state, shutdown).await?;
    Ok(())
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    wait_for_signal().await;
    shutdown.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Failed to register signal handlers, falling back to Ctrl+C");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sigint.recv() => info!("Received SIGINT"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    info!("Received Ctrl+C");
}
