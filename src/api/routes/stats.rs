use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;

use super::{resolve_context, Params};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::query::{RepresentationSeriesBuilder, StatsReport};

pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<StatsReport>, ApiError> {
    let ctx = resolve_context(&state, &params).await?;
    let today = Utc::now().date_naive();

    let report = RepresentationSeriesBuilder::new(state.store.as_ref(), state.query.series_max_days)
        .report(&ctx, today)
        .await?;
    Ok(Json(report))
}
