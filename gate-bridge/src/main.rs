//! Entry point for the `gate-bridge` HTTP server.

use std::sync::Arc;

use gate_bridge::{create_router, spawn_heartbeat, AppState, BridgeConfig};
use gate_phone::HttpPhone;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "gate_bridge=info,gate_phone=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let config = match BridgeConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let phone = Arc::new(HttpPhone::new(config.phone.clone()));
    let state = AppState::new(&config.api_key, phone, config.min_interval);
    let heartbeat = spawn_heartbeat(
        Arc::clone(&state.phone),
        Arc::clone(&state.health),
        config.heartbeat_period,
    );

    let addr = config.listen_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(
        addr = %addr,
        phone = %config.phone.authority(),
        min_interval_secs = config.min_interval.as_secs(),
        heartbeat_period = ?config.heartbeat_period,
        "gate-bridge listening"
    );

    let served = axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    heartbeat.abort();

    if let Err(e) = served {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
    info!("gate-bridge stopped");
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutting down");
}
