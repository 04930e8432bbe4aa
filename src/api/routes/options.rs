use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use super::{resolve_context, Params};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Bracket, Region, Season, Term};
use crate::query::FilterContext;

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub brackets: Vec<Bracket>,
    pub regions: Vec<Region>,
    pub seasons: Vec<Season>,

    /// Terms of the selected season.
    pub terms: Vec<Term>,

    pub selected: FilterContext,
}

pub async fn get_options(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let ctx = resolve_context(&state, &params).await?;
    let catalog = state.store.catalog().await?;

    Ok(Json(OptionsResponse {
        brackets: catalog.brackets.clone(),
        regions: catalog.regions.clone(),
        seasons: catalog.seasons.clone(),
        terms: catalog
            .season_terms(ctx.season.id)
            .into_iter()
            .cloned()
            .collect(),
        selected: ctx,
    }))
}
