//! API handlers for the Game List Service

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use steamfilter_common::{Error, Profile};
use tracing::{error, info};

use crate::{
    owned_games::{merge_profile, OwnedGamesClient},
    profile::ProfileFetcher,
};

/// Shared application state
pub struct AppState {
    pub profiles: ProfileFetcher,
    pub owned_games: OwnedGamesClient,
    pub allowed_origin: String,
}

/// Status of every failed game list request
pub const ERROR_STATUS: StatusCode = StatusCode::IM_A_TEAPOT;

/// API Error type; reported with [`ERROR_STATUS`] and the message as body
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError {
            message: err.to_string(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError {
            message: rejection.body_text(),
        }
    }
}

/// Query string of a game list request
#[derive(Debug, Default, Deserialize)]
pub struct GameListQuery {
    /// Vanity name, account id or profile URL
    #[serde(default)]
    pub user: String,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "game-list-service"
    }))
}

/// List the games owned by a user, annotated with their profile
pub async fn game_list_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<GameListQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            let e = ApiError::from(rejection);
            info!("Rejected game list query: {}", e.message);
            return respond(&state, ERROR_STATUS, e.message);
        }
    };

    if query.user.is_empty() {
        return respond(&state, ERROR_STATUS, "No user given".to_string());
    }

    info!("Getting game list for {:?}", query.user);

    match game_list(&state, &query.user).await {
        Ok(body) => respond(&state, StatusCode::OK, body),
        Err(e) => {
            error!("Game list request for {:?} failed: {}", query.user, e.message);
            respond(&state, ERROR_STATUS, e.message)
        }
    }
}

async fn game_list(state: &AppState, user: &str) -> Result<String, ApiError> {
    let profile = state.profiles.fetch_profile(user).await?;
    ensure_found(&profile)?;

    let owned = state.owned_games.fetch(&profile.account_id).await?;
    let merged = merge_profile(&owned, &profile);

    serde_json::to_string(&merged).map_err(|e| Error::from(e).into())
}

/// A profile document without an account id describes no account
fn ensure_found(profile: &Profile) -> Result<(), Error> {
    if profile.account_id.is_empty() {
        let reason = profile
            .error
            .clone()
            .unwrap_or_else(|| "profile has no account id".to_string());
        return Err(Error::NotFound(reason));
    }
    Ok(())
}

fn respond(state: &AppState, status: StatusCode, body: String) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    if let Ok(origin) = HeaderValue::from_str(&state.allowed_origin) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    response
}
