use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seen_it_api::{
    config::Config,
    db::{create_redis_client, Cache, RedisStore},
    routes::{create_router, AppState},
    services::KinopoiskClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seen_it_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client.clone()).await;
    let store = RedisStore::connect(redis_client)
        .await
        .context("Failed to connect user data store")?;

    let catalog = KinopoiskClient::new(
        cache,
        config.catalog_api_key.clone(),
        config.catalog_api_url.clone(),
    );

    let state = Arc::new(AppState::new(
        Arc::new(catalog),
        Arc::new(store),
        config.detail_fetch_concurrency,
        config.poster_policy(),
    )?);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
