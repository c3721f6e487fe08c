//! Game List Service
//!
//! Resolves a user-supplied profile reference (vanity name, account id or
//! profile URL) to a community profile and returns the games the account
//! owns, annotated with the profile's id, name and avatar.

pub mod config;
pub mod handlers;
pub mod owned_games;
pub mod profile;
pub mod resolver;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use handlers::AppState;
pub use owned_games::OwnedGamesClient;
pub use profile::ProfileFetcher;
pub use resolver::{IdentifierKind, IdentifierResolver, ResolvedIdentifier};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/gamelist", get(handlers::game_list_handler))
        .with_state(shared_state)
        .layer(TraceLayer::new_for_http())
}
