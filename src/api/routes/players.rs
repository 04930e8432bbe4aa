use axum::extract::{Path, Query, State};
use axum::Json;

use super::{page_param, resolve_context, Params};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::PlayerId;
use crate::query::PlayerProfile;

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<PlayerProfile>, ApiError> {
    let id: PlayerId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("player {:?}", id)))?;
    let ctx = resolve_context(&state, &params).await?;

    let profile = PlayerProfile::load(
        state.store.as_ref(),
        &ctx,
        id,
        page_param(&params),
        state.query.page_size,
    )
    .await?;
    Ok(Json(profile))
}
