mod api;
mod config;
mod models;
mod services;
mod sources;

use std::sync::Arc;
use tokio::time::Duration;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::Config;
use services::{PoolCollector, PoolStore};
use sources::price::PriceClient;
use sources::raydium::RaydiumClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pool_scout=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🚀 Pool Scout Starting...\n");

    // Load configuration
    let config = Config::load()?;
    tracing::info!("✓ Configuration loaded");

    // Initialize clients and services
    let source = Arc::new(RaydiumClient::new(&config.upstream));
    let price = Arc::new(PriceClient::new(&config.price));
    let store = Arc::new(PoolStore::new());
    let collector = Arc::new(PoolCollector::new(
        source,
        store.clone(),
        config.upstream.max_pages,
    ));

    // Background: pool collection cycle
    let refresh_secs = config.upstream.refresh_secs.max(1);
    println!("📥 Starting pool collection ({}s cycle)...\n", refresh_secs);
    let collector_clone = collector.clone();
    tokio::spawn(async move {
        loop {
            match collector_clone.refresh().await {
                Ok(summary) => {
                    if summary.applied {
                        tracing::info!(
                            "✓ Cycle complete: {}/{} pools eligible over {} pages (generation {})",
                            summary.kept,
                            summary.fetched,
                            summary.pages,
                            summary.generation
                        );
                    }
                }
                Err(e) => tracing::warn!("Refresh failed: {}", e),
            }
            tokio::time::sleep(Duration::from_secs(refresh_secs)).await;
        }
    });

    // Application state
    let state = Arc::new(AppState {
        store,
        collector,
        price,
    });

    // Router
    let app = api::create_rest_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    println!("\n✓ Server ready on http://{}\n", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
