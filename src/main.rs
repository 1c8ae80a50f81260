use std::net::SocketAddr;

use coffeeshop_server::config::AppConfig;
use coffeeshop_server::create_app;
use coffeeshop_server::state::AppState;
use log::{error, info};

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| format!("configuration error: {}", e))?;

    let state = AppState::new(config.clone())?;

    // The drinks table must exist before the first request hits the store
    state
        .store
        .initialize_schema()
        .await
        .map_err(|e| format!("failed to prepare database: {}", e))?;

    let app = create_app(state).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind to {}: {}", addr, e))?;

    info!("Coffee shop API listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("server error: {}", e))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when the process receives Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
