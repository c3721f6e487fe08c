//! API request handlers for the Game Details Service

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header::ORIGIN, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use steamfilter_common::Error;
use tracing::{error, info};

use crate::{
    cache::MetadataCache,
    response::{api_response, format_records},
    retriever::BatchRetriever,
};

/// Shared application state
pub struct AppState {
    pub retriever: BatchRetriever,
    pub cache: Option<Arc<dyn MetadataCache>>,
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Render the error with its message as the body
    pub fn respond(self, origin: &str) -> Response {
        api_response(self.status, self.message, origin)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.is_client_error() {
            StatusCode::IM_A_TEAPOT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

/// Query string of a game details request
#[derive(Debug, Default, Deserialize)]
pub struct GameDetailsQuery {
    /// Comma-separated app ids
    #[serde(rename = "appId", default)]
    pub app_id: String,

    /// Any non-empty value bypasses the cache for this request
    #[serde(rename = "skipCache", default)]
    pub skip_cache: String,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "game-details-service"
    }))
}

/// Look up details for a batch of app ids
pub async fn game_details_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<GameDetailsQuery>, QueryRejection>,
) -> Response {
    let origin = headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            let reason = rejection.body_text();
            info!("Rejected game details query: {}", reason);
            let err = Error::InvalidInput(reason);
            return ApiError::from(err).respond(origin);
        }
    };

    if query.app_id.is_empty() {
        let err = Error::InvalidInput("No appIds specified".to_string());
        return ApiError::from(err).respond(origin);
    }

    let ids: Vec<String> = query.app_id.split(',').map(str::to_string).collect();
    let cache = if query.skip_cache.is_empty() {
        state.cache.as_deref()
    } else {
        None
    };

    info!(
        "Getting details for {} app ids (cache: {})",
        ids.len(),
        cache.is_some()
    );

    let result = state
        .retriever
        .retrieve_batch(&ids, cache)
        .await
        .and_then(|records| format_records(&records));

    match result {
        Ok(body) => api_response(StatusCode::OK, body, origin),
        Err(e) => {
            error!("Game details request failed: {}", e);
            ApiError::from(e).respond(origin)
        }
    }
}
