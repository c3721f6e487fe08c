//! Game Details Service
//!
//! REST API for batched store metadata lookups

use anyhow::{Context, Result};
use game_details_service::{
    create_router, AppState, BatchRetriever, Config, GameParser, MemoryCache, MetadataCache,
    RedisCache,
};
use std::sync::Arc;
use steamfilter_common::{HttpFetcher, RedirectMode};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_details_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting Game Details Service");
    info!("Store URL: {}", config.store_base_url);
    info!("Batch failure policy: {:?}", config.failure_policy);

    // Redirects are the store's answer for unknown app ids, so they must be observed
    let fetcher = HttpFetcher::new(RedirectMode::Observe, config.fetch_timeout())
        .context("Failed to create HTTP client")?;
    let parser = GameParser::new().context("Failed to compile store page selectors")?;

    let cache: Arc<dyn MetadataCache> = match &config.redis_url {
        Some(redis_url) => Arc::new(
            RedisCache::new(redis_url)
                .await
                .context("Failed to initialize cache")?,
        ),
        None => {
            warn!("REDIS_URL not set, using in-process cache");
            Arc::new(MemoryCache::new())
        }
    };

    // Create application state
    let state = AppState {
        retriever: BatchRetriever::new(
            Arc::new(fetcher),
            parser,
            config.store_base_url.clone(),
            config.failure_policy,
        ),
        cache: Some(cache),
    };

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.api_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Game Details Service running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
