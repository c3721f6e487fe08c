//! Game List Service
//!
//! REST API for owned games lookups by profile reference

use anyhow::{Context, Result};
use game_list_service::{
    create_router, AppState, Config, IdentifierResolver, OwnedGamesClient, ProfileFetcher,
};
use std::sync::Arc;
use steamfilter_common::{DocumentFetcher, HttpFetcher, RedirectMode};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_list_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting Game List Service");
    info!("Community URL: {}", config.community_base_url);
    info!("Web API URL: {}", config.web_api_base_url);

    if config.web_api_key.is_empty() {
        warn!("STEAM_WEB_API_KEY not set, owned games lookups will be rejected upstream");
    }

    let fetcher: Arc<dyn DocumentFetcher> = Arc::new(
        HttpFetcher::new(RedirectMode::Follow, config.fetch_timeout())
            .context("Failed to create HTTP client")?,
    );
    let resolver = IdentifierResolver::new().context("Failed to compile profile patterns")?;

    // Create application state
    let state = AppState {
        profiles: ProfileFetcher::new(fetcher.clone(), resolver, config.community_base_url.clone()),
        owned_games: OwnedGamesClient::new(
            fetcher,
            config.web_api_base_url.clone(),
            config.web_api_key.clone(),
        ),
        allowed_origin: config.allowed_origin.clone(),
    };

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.api_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Game List Service running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
