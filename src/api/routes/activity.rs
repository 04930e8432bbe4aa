use axum::extract::{Path, Query, State};
use axum::Json;

use super::{page_param, resolve_context, Params};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::LeaderboardId;
use crate::query::ActivityFeed;

async fn feed(
    state: &AppState,
    params: &Params,
    leaderboard_id: Option<LeaderboardId>,
) -> Result<ActivityFeed, ApiError> {
    let ctx = resolve_context(state, params).await?;
    Ok(ActivityFeed::load(
        state.store.as_ref(),
        &ctx,
        leaderboard_id,
        page_param(params),
        state.query.activity_page_size,
    )
    .await?)
}

pub async fn get_activity(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<ActivityFeed>, ApiError> {
    Ok(Json(feed(&state, &params, None).await?))
}

pub async fn get_leaderboard_activity(
    State(state): State<AppState>,
    Path(leaderboard_id): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<ActivityFeed>, ApiError> {
    let id: LeaderboardId = leaderboard_id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("leaderboard {:?}", leaderboard_id)))?;
    Ok(Json(feed(&state, &params, Some(id)).await?))
}
