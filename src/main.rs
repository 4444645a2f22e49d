use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use singmeasong_api::{
    api::{create_router, AppState},
    config::{Config, StorageBackend},
    db::{self, MemoryRecommendationStore, PgRecommendationStore, RecommendationStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("singmeasong_api=info,tower_http=info")),
        )
        .init();

    let store = build_store(&config).await?;
    tracing::info!(store = store.name(), "Recommendation store ready");

    let state = AppState::with_store(store).with_test_routes(config.enable_test_routes);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn RecommendationStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database_url, config.max_db_connections).await?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgRecommendationStore::new(pool)))
        }
        StorageBackend::Memory => Ok(Arc::new(MemoryRecommendationStore::new())),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
