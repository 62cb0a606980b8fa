//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::Utc;
use tracing::{error, info};

use crate::catalog::StaticCatalog;
use crate::domain::{Favourite, LineAtStop, StopOnLine, filter_stops};
use crate::jobs::{self, ProbeOutcome};
use crate::siri::LiveFeed;
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<F, C>(state: AppState<F, C>) -> Router
where
    F: LiveFeed + 'static,
    C: StaticCatalog + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/departures", get(departures::<F, C>))
        .route("/api/lines", get(search_lines::<F, C>))
        .route("/api/stops", get(stops_on_line::<F, C>))
        .route("/api/directions", get(directions::<F, C>))
        .route(
            "/api/favourites",
            get(list_favourites::<F, C>)
                .post(add_favourite::<F, C>)
                .delete(remove_favourite::<F, C>),
        )
        .route("/api/settings/token", put(save_token::<F, C>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Refresh departures for every stored favourite.
///
/// Never skipped for quiet hours: this is a user-triggered refresh.
async fn departures<F, C>(State(state): State<AppState<F, C>>) -> Json<UnitResponse<Vec<BoardEntry>>>
where
    F: LiveFeed + 'static,
    C: StaticCatalog + 'static,
{
    let favourites = state.favourites.lock().await.load();
    let outcome = jobs::departures(
        state.feed.clone(),
        favourites.clone(),
        (*state.aggregator).clone(),
    )
    .outcome()
    .await;

    let now = Utc::now().timestamp_millis() as f64 / 1000.0;
    let errors = outcome.errors.iter().map(ToString::to_string).collect();
    Json(UnitResponse {
        result: board(favourites, &outcome.result, now),
        errors,
    })
}

/// Search lines by label and mode.
async fn search_lines<F, C>(
    State(state): State<AppState<F, C>>,
    Query(req): Query<LineSearchRequest>,
) -> Json<UnitResponse<Vec<LineAtStop>>>
where
    F: LiveFeed + 'static,
    C: StaticCatalog + 'static,
{
    let outcome = jobs::line_search(state.catalog.clone(), req.q, req.mode)
        .outcome()
        .await;
    Json(outcome.into())
}

/// List a line's stops, optionally filtered by name.
async fn stops_on_line<F, C>(
    State(state): State<AppState<F, C>>,
    Query(req): Query<StopsRequest>,
) -> Result<Json<UnitResponse<Vec<StopOnLine>>>, AppError>
where
    F: LiveFeed + 'static,
    C: StaticCatalog + 'static,
{
    if req.route_id.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "route_id is required".to_string(),
        });
    }

    let mut response: UnitResponse<Vec<StopOnLine>> =
        jobs::stops_on_line(state.catalog.clone(), req.route_id)
            .outcome()
            .await
            .into();
    if !req.filter.is_empty() {
        response.result = filter_stops(&response.result, &req.filter)
            .into_iter()
            .cloned()
            .collect();
    }
    Ok(Json(response))
}

/// Resolve a stop and list the directions in service there.
async fn directions<F, C>(
    State(state): State<AppState<F, C>>,
    Query(req): Query<DirectionsRequest>,
) -> Result<Json<UnitResponse<ProbeOutcome>>, AppError>
where
    F: LiveFeed + 'static,
    C: StaticCatalog + 'static,
{
    if req.stop_id.trim().is_empty() || req.line_id.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "stop_id and line_id are required".to_string(),
        });
    }

    let outcome = jobs::resolve_and_probe(
        state.catalog.clone(),
        state.feed.clone(),
        req.stop_id,
        req.line_id,
        req.stop_name,
    )
    .outcome()
    .await;
    Ok(Json(outcome.into()))
}

async fn list_favourites<F, C>(State(state): State<AppState<F, C>>) -> Json<Vec<Favourite>> {
    Json(state.favourites.lock().await.load())
}

/// Save a favourite; a duplicate of an existing target is not added.
async fn add_favourite<F, C>(
    State(state): State<AppState<F, C>>,
    Json(favourite): Json<Favourite>,
) -> Result<Json<FavouriteAdded>, AppError> {
    if favourite.stop_area_id.is_empty() || favourite.line_id.is_empty() {
        return Err(AppError::BadRequest {
            message: "stop_area_id and line_id are required".to_string(),
        });
    }

    let added = state.favourites.lock().await.add(favourite)?;
    Ok(Json(FavouriteAdded { added }))
}

async fn remove_favourite<F, C>(
    State(state): State<AppState<F, C>>,
    Json(target): Json<FavouriteTarget>,
) -> Result<Json<FavouriteRemoved>, AppError> {
    let removed = state
        .favourites
        .lock()
        .await
        .remove(&target.to_favourite())?;
    if !removed {
        return Err(AppError::NotFound {
            message: format!(
                "no favourite for stop {} line {}",
                target.stop_area_id, target.line_id
            ),
        });
    }
    Ok(Json(FavouriteRemoved { removed }))
}

/// Store a new API key; the next live-feed request uses it.
async fn save_token<F, C>(
    State(state): State<AppState<F, C>>,
    Json(req): Json<TokenRequest>,
) -> Result<StatusCode, AppError> {
    let token = req.token.trim().to_string();
    state
        .settings
        .lock()
        .await
        .save_token(token, &state.credential)
        .await?;
    info!("API token updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, error = %message, "request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod routes_tests;
