//! REST API endpoints.
//!
//! Axum-based HTTP API serving comp statistics, standings, activity and
//! representation charts. Every endpoint reads the `bracket`, `region`,
//! `season` and `term` query parameters to select what it shows.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::query::QueryError;
use crate::store::StoreError;
use state::AppState;

/// Where requests for missing records are sent.
pub const DEFAULT_VIEW: &str = "/api/leaderboard";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Answered with a redirect to the default view.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(msg) => ApiError::NotFound(msg),
            QueryError::StoreUnavailable(msg) => ApiError::Unavailable(msg),
            // Redirecting here would loop on the default view
            QueryError::MissingReference(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        QueryError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(msg) => {
                tracing::debug!("Redirecting to {}: {}", DEFAULT_VIEW, msg);
                return Redirect::to(DEFAULT_VIEW).into_response();
            }
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        warn!("{}", self);

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, allowing any", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the API router over `state`.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/api/options", get(routes::options::get_options))
        .route("/api/comps", get(routes::comps::list_comps))
        .route("/api/comps/:id", get(routes::comps::get_comp))
        .route("/api/leaderboard", get(routes::leaderboard::get_leaderboard))
        .route("/api/activity", get(routes::activity::get_activity))
        .route(
            "/api/activity/:leaderboard_id",
            get(routes::activity::get_leaderboard_activity),
        )
        .route("/api/stats", get(routes::stats::get_stats))
        .route("/api/players/:id", get(routes::players::get_player))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
