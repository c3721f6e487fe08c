//! Game Details Service
//!
//! Serves store metadata for batches of app ids. Store pages are scraped on
//! demand and kept in a cache so each app id is fetched at most once,
//! including ids the store does not know.
//!
//! **Components:**
//! - `parser`: store page extraction
//! - `cache`: Redis and in-process game caches
//! - `retriever`: cache-aside batch orchestration
//! - `response`: wire formatting
//! - `handlers`: HTTP endpoints
//! - `config`: configuration management

pub mod cache;
pub mod config;
pub mod handlers;
pub mod parser;
pub mod response;
pub mod retriever;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use cache::{MemoryCache, MetadataCache, RedisCache};
pub use config::Config;
pub use handlers::AppState;
pub use parser::GameParser;
pub use retriever::{BatchRetriever, FailurePolicy};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/gamedetails", get(handlers::game_details_handler))
        .with_state(shared_state)
        .layer(TraceLayer::new_for_http())
}
