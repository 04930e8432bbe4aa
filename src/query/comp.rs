//! Comp detail: the comp's performance and the teams playing it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::{load_players, CompDetail, FilterContext, PlayerDetail, QueryError};
use crate::models::{Catalog, CompId, Performance, PlayerId, Team, TeamId};
use crate::store::{Page, PageRequest, PerformancePredicate, Scope, Store};

/// A team with its performance for the context and its players loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRow {
    #[serde(flatten)]
    pub team: Team,
    pub performance: Option<Performance>,
    pub players: Vec<PlayerDetail>,
}

/// Per-team rows for the context's bracket, season, region and term.
fn team_predicate(ctx: &FilterContext) -> PerformancePredicate {
    PerformancePredicate {
        region: ctx.region_scope(),
        term: ctx.term_scope(),
        team: Scope::NotNull,
        ..PerformancePredicate::for_season(ctx.bracket.id, ctx.season.id)
    }
}

async fn players_by_id(
    store: &dyn Store,
    catalog: &Catalog,
    teams: &[&Team],
) -> Result<HashMap<PlayerId, PlayerDetail>, QueryError> {
    let mut ids: Vec<PlayerId> = teams
        .iter()
        .flat_map(|t| t.player_ids.iter().copied())
        .collect();
    ids.sort();
    ids.dedup();
    load_players(store, catalog, &ids).await
}

fn team_players(team: &Team, players: &HashMap<PlayerId, PlayerDetail>) -> Vec<PlayerDetail> {
    team.player_ids
        .iter()
        .filter_map(|id| players.get(id).cloned())
        .collect()
}

/// Load the context performance and players of `teams` in two batched reads.
pub async fn team_rows(
    store: &dyn Store,
    catalog: &Catalog,
    ctx: &FilterContext,
    teams: Vec<Team>,
) -> Result<Vec<TeamRow>, QueryError> {
    if teams.is_empty() {
        return Ok(Vec::new());
    }

    let predicate = PerformancePredicate {
        team: Scope::OneOf(teams.iter().map(|t| t.id).collect()),
        ..team_predicate(ctx)
    };
    let mut performances: HashMap<TeamId, Performance> = HashMap::new();
    for row in store
        .select_performances(&predicate, PageRequest::all())
        .await?
        .items
    {
        if let Some(team_id) = row.team_id {
            // Keep the first row per team in wins order
            performances.entry(team_id).or_insert(row);
        }
    }

    let players = players_by_id(store, catalog, &teams.iter().collect::<Vec<_>>()).await?;

    Ok(teams
        .into_iter()
        .map(|team| TeamRow {
            performance: performances.remove(&team.id),
            players: team_players(&team, &players),
            team,
        })
        .collect())
}

/// A comp, its aggregate for the context and a page of its teams.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompReport {
    pub comp: CompDetail,
    pub performance: Option<Performance>,

    /// Teams ordered by wins, highest first.
    pub teams: Page<TeamRow>,
}

impl CompReport {
    pub async fn load(
        store: &dyn Store,
        ctx: &FilterContext,
        id: CompId,
        page: Option<u32>,
        page_size: u32,
    ) -> Result<Self, QueryError> {
        let catalog = store.catalog().await?;
        let comp = store
            .comps(&[id])
            .await?
            .into_iter()
            .find(|c| c.bracket_id == ctx.bracket.id)
            .ok_or_else(|| QueryError::NotFound(format!("comp {} in {}", id, ctx.bracket.name)))?;

        let aggregate = PerformancePredicate {
            region: ctx.region_scope(),
            term: ctx.term_scope(),
            comp: Scope::Exact(comp.id),
            team: Scope::Null,
            ..PerformancePredicate::for_season(ctx.bracket.id, ctx.season.id)
        };
        let performance = store
            .select_performances(&aggregate, PageRequest::first())
            .await?
            .items
            .into_iter()
            .next();

        let per_team = PerformancePredicate {
            comp: Scope::Exact(comp.id),
            ..team_predicate(ctx)
        };
        let rows = store
            .select_performances(&per_team, PageRequest::standard(page, page_size))
            .await?;

        let team_ids: Vec<TeamId> = rows.items.iter().filter_map(|p| p.team_id).collect();
        let teams: HashMap<TeamId, Team> = store
            .teams(&team_ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let players = players_by_id(store, &catalog, &teams.values().collect::<Vec<_>>()).await?;

        debug!(
            "Comp {}: {} teams on page {}",
            comp.id,
            rows.items.len(),
            rows.current_page
        );

        let teams = rows.filter_map(|performance| {
            let team = performance.team_id.and_then(|id| teams.get(&id))?.clone();
            Some(TeamRow {
                players: team_players(&team, &players),
                team,
                performance: Some(performance),
            })
        });

        Ok(Self {
            comp: CompDetail::resolve(comp, &catalog),
            performance,
            teams,
        })
    }
}
