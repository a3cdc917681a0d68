//! Portfolio Cache - blog API server
//!
//! Serves the article API behind an expiring response cache and guards the
//! admin login against credential guessing.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_cache::api::create_router;
use portfolio_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the blog API server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache store and the guard store
/// 4. Start one expiry sweep per store
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio cache server");

    let config = Config::from_env();
    info!(
        max_entries = config.max_entries,
        guard_max_entries = config.guard_max_entries,
        port = config.server_port,
        cleanup_interval_secs = config.cleanup_interval().as_secs(),
        login_max_failures = config.login_max_failures,
        login_lockout_secs = config.login_lockout_secs,
        "configuration loaded"
    );

    let state = AppState::from_config(&config);

    let sweeps = vec![
        spawn_cleanup_task(
            state.cache.store().clone(),
            config.cleanup_interval(),
            "response_cache",
        ),
        spawn_cleanup_task(
            state.guard.store().clone(),
            config.cleanup_interval(),
            "login_guard",
        ),
    ];

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    // Peer addresses identify login clients when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(sweeps))
    .await
    .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeps.
async fn shutdown_signal(sweeps: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for handle in sweeps {
        handle.abort();
    }
    warn!("Expiry sweep tasks aborted");
}
