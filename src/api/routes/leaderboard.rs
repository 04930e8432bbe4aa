use axum::extract::{Query, State};
use axum::Json;

use super::{page_param, resolve_context, Params};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::query::Standings;

/// Standings across the latest leaderboard of every region. `class`
/// restricts them to one role.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Standings>, ApiError> {
    let ctx = resolve_context(&state, &params).await?;
    let standings = Standings::load(
        state.store.as_ref(),
        &ctx,
        params.get("class").map(String::as_str),
        page_param(&params),
        state.query.page_size,
    )
    .await?;
    Ok(Json(standings))
}
