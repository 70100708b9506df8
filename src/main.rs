mod checkmk;
mod config;
mod downtime;
mod handlers;
mod models;
mod oplog;
mod router;
mod topology;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkmk::{CheckmkClient, MonitoringApi};
use config::Config;
use oplog::OperationLog;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub checkmk: Arc<dyn MonitoringApi>,
    pub oplog: OperationLog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "downtime_manager=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    let client = CheckmkClient::new(&cfg)?;
    tracing::info!("Starting Downtime Manager v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Checkmk API: {}", client.base_url());
    tracing::info!("Frontend: {}", cfg.frontend_dir);

    // Create app state
    let state = Arc::new(AppState {
        config: cfg.clone(),
        checkmk: Arc::new(client),
        oplog: OperationLog::default(),
    });

    // Build router
    let app = router::build(state, &cfg.frontend_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("Downtime Manager listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Downtime Manager shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
