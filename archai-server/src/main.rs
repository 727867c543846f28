//! ArchAI Server - REST API for architectural style classification
//!
//! Exposes archai-core functionality via HTTP endpoints:
//! - POST /classify - Predict the style of an uploaded photograph
//! - POST /feedback/{correct,incorrect} - Record a verdict on the last prediction
//! - GET /styles - List the style catalog

use std::net::SocketAddr;

use archai_server::{create_router_with_config, AppState, Config};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "archai_server=info,archai_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.model_path.display(),
        feedback_log = %config.feedback_log_path.display(),
        "Starting ArchAI server"
    );

    // The classifier must be ready before the port is bound
    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to load the classifier, refusing to start");
            std::process::exit(1);
        }
    };
    info!(
        classifier = %state.service.gateway().describe(),
        styles = state.service.catalog().len(),
        "Classifier loaded"
    );

    let app = create_router_with_config(&config, state);
    let addr = config.socket_addr();

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };
    info!("Listening on http://{}", addr);
    info!("API docs at http://{}/docs/", addr);

    // Peer addresses are needed by the rate limiter
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    if let Err(e) = served {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
    info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
