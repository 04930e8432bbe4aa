use axum::extract::{Path, Query, State};
use axum::Json;

use super::{page_param, resolve_context, Params};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::CompId;
use crate::query::{CompReport, CompsPage, PerformanceAggregator};

pub async fn list_comps(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<CompsPage>, ApiError> {
    let ctx = resolve_context(&state, &params).await?;
    let page = PerformanceAggregator::new(state.store.as_ref(), state.query.page_size)
        .comps_page(&ctx, &params, page_param(&params))
        .await?;
    Ok(Json(page))
}

pub async fn get_comp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<CompReport>, ApiError> {
    let id: CompId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("comp {:?}", id)))?;
    let ctx = resolve_context(&state, &params).await?;

    let report = CompReport::load(
        state.store.as_ref(),
        &ctx,
        id,
        page_param(&params),
        state.query.page_size,
    )
    .await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{app, app_with, get_json, get_location, unavailable_app};
    use crate::config::QueryConfig;
    use crate::fixtures::*;
    use crate::storage::LadderData;
    use axum::http::StatusCode;

    fn data() -> LadderData {
        let mut data = ladder();
        data.players = vec![player(1, Some(1)), player(2, Some(2))];
        data.comps = vec![
            comp(1, [Some(1), Some(3), Some(5)]),
            comp(2, [Some(2), Some(4), Some(6)]),
        ];
        data.teams = vec![team(1, 1, &[1, 2])];
        data.performances = vec![
            performance(1, 1, 30, 10),
            performance(2, 2, 10, 0),
            team_performance(3, 1, 1, 12, 4),
        ];
        data
    }

    #[tokio::test]
    async fn test_list_comps() {
        let (status, json) = get_json(app(data()), "/api/comps?bracket=2&season=1").await;

        assert_eq!(status, StatusCode::OK);
        let items = json["rows"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], 1);
        assert_eq!(items[0]["ratio"], 3.0);
        assert_eq!(items[0]["comp"]["specs"][0]["name"], "Arms");
        assert_eq!(json["rows"]["total"], 2);
        assert_eq!(json["query_string"], "");
    }

    #[tokio::test]
    async fn test_list_comps_with_filters() {
        let (status, json) = get_json(
            app(data()),
            "/api/comps?bracket=2&season=1&class1=2&spec1=4&s=ratio&d=1&mg=-3",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let items = json["rows"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["comp_id"], 2);
        assert_eq!(json["filters"]["min_games"], 3);
        assert_eq!(
            json["query_string"],
            "class1=2&spec1=4&mg=3&s=ratio&d=1"
        );
    }

    #[tokio::test]
    async fn test_next_query_keeps_selection_and_filters() {
        let mut data = ladder();
        data.comps = vec![comp(1, [Some(1), Some(3), Some(5)])];
        data.performances = (1..=45).map(|id| performance(id, 1, 10, 1)).collect();

        let (status, first) = get_json(app(data.clone()), "/api/comps?bracket=2&season=1&mg=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["rows"]["items"].as_array().unwrap().len(), 20);
        let next = first["next_query"].as_str().unwrap();
        assert_eq!(next, "bracket=2&season=1&mg=5&page=2");

        let (status, second) = get_json(app(data), &format!("/api/comps?{}", next)).await;
        assert_eq!(status, StatusCode::OK);
        let items = second["rows"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 20);
        assert_eq!(items[0]["id"], 21);
        assert_eq!(second["rows"]["current_page"], 2);
        assert_eq!(second["filters"]["min_games"], 5);
        assert_eq!(
            second["next_query"],
            "bracket=2&season=1&mg=5&page=3"
        );
    }

    #[tokio::test]
    async fn test_configured_page_size() {
        let mut data = ladder();
        data.comps = vec![comp(1, [Some(1), Some(3), Some(5)])];
        data.performances = (1..=45).map(|id| performance(id, 1, 10, 1)).collect();
        let query = QueryConfig {
            page_size: 10,
            ..QueryConfig::default()
        };

        let (status, json) = get_json(app_with(data, query), "/api/comps?bracket=2&season=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["rows"]["items"].as_array().unwrap().len(), 10);
        assert_eq!(json["rows"]["per_page"], 10);
        assert_eq!(json["next_query"], "bracket=2&season=1&page=2");
    }

    #[tokio::test]
    async fn test_get_comp() {
        let (status, json) = get_json(app(data()), "/api/comps/1?bracket=2&season=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["comp"]["id"], 1);
        assert_eq!(json["performance"]["wins"], 30);
        let teams = json["teams"]["items"].as_array().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0]["players"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_comp_in_other_bracket_redirects() {
        let (status, location) = get_location(app(data()), "/api/comps/1?bracket=1").await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/api/leaderboard"));
    }

    #[tokio::test]
    async fn test_malformed_comp_id_redirects() {
        let (status, _) = get_location(app(data()), "/api/comps/abc").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_comps_store_unavailable() {
        let (status, _) = get_json(unavailable_app(), "/api/comps").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
