use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

use product_catalog::{
    bootstrap, config, create_router, infrastructure::logger::Logger, AppState, ProductService,
    SnapshotWriter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    Logger::init(&config.logging);
    info!("Starting product catalog service...");

    let store = match bootstrap::connect(&config.database).await {
        Ok(store) => store,
        Err(e) => {
            error!("Store connection error: {}", e);
            std::process::exit(1);
        }
    };

    match bootstrap::prepare(store.as_ref(), &config.snapshot.path).await {
        Ok(outcome) => info!("Bootstrap finished: {:?}", outcome),
        Err(_) => info!("Bootstrap finished without initial data"),
    }

    let snapshot = Arc::new(SnapshotWriter::new(config.snapshot.path.clone()));
    let service = ProductService::new(store.clone(), snapshot);
    let state = AppState::new(service).with_fail_on_snapshot_error(config.snapshot.fail_on_error);
    let app = create_router(state, Duration::from_secs(config.http.timeout_seconds));

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
