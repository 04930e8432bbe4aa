//! Leaderboard resolution and player standings.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use super::{load_players, FilterContext, PlayerDetail, QueryError};
use crate::models::{parse_id, Leaderboard, LeaderboardId, PlayerId, Role, RoleId, Stat};
use crate::store::{LeaderboardQuery, Page, PageRequest, Scope, StatQuery, Store};

/// Picks the leaderboards a request is served from.
pub struct LeaderboardResolver<'a> {
    store: &'a dyn Store,
}

impl<'a> LeaderboardResolver<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// The newest published leaderboard of every region for the context's
    /// bracket, season and term. Regions without one are left out.
    pub async fn resolve_latest_per_region(
        &self,
        ctx: &FilterContext,
    ) -> Result<Vec<LeaderboardId>, QueryError> {
        let mut ids = Vec::with_capacity(ctx.regions.len());
        for region in &ctx.regions {
            let query = LeaderboardQuery {
                bracket_id: ctx.bracket.id,
                season_id: ctx.season.id,
                region: Scope::Exact(region.id),
                term: ctx.term_filter(),
            };
            match self.store.latest_leaderboard(&query).await? {
                Some(lb) => ids.push(lb.id),
                None => debug!("No published leaderboard for region {}", region.name),
            }
        }
        Ok(ids)
    }

    /// A leaderboard the context is allowed to show.
    pub async fn resolve_specific(
        &self,
        id: LeaderboardId,
        ctx: &FilterContext,
    ) -> Result<Leaderboard, QueryError> {
        let query = LeaderboardQuery {
            bracket_id: ctx.bracket.id,
            season_id: ctx.season.id,
            region: ctx.region_filter(),
            term: ctx.term_filter(),
        };

        self.store
            .leaderboard(id)
            .await?
            .filter(|lb| query.matches(lb))
            .ok_or_else(|| QueryError::NotFound(format!("leaderboard {}", id)))
    }
}

/// A standing with its player loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    #[serde(flatten)]
    pub stat: Stat,
    pub player: Option<PlayerDetail>,
}

/// Ranked players across the current leaderboard of every region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standings {
    /// Role filter as understood; unknown roles are dropped.
    pub role: Option<Role>,
    pub leaderboard_ids: Vec<LeaderboardId>,
    pub rows: Page<StandingRow>,
}

impl Standings {
    /// `class` is the raw role filter.
    pub async fn load(
        store: &dyn Store,
        ctx: &FilterContext,
        class: Option<&str>,
        page: Option<u32>,
        page_size: u32,
    ) -> Result<Self, QueryError> {
        let catalog = store.catalog().await?;
        let role = parse_id::<RoleId>(class)
            .and_then(|id| catalog.role(id))
            .cloned();

        let leaderboard_ids = LeaderboardResolver::new(store)
            .resolve_latest_per_region(ctx)
            .await?;

        let query = StatQuery {
            bracket_id: None,
            leaderboards: Scope::OneOf(leaderboard_ids.clone()),
            player_id: None,
            role_id: role.as_ref().map(|r| r.id),
            region: Scope::Any,
        };
        let stats = store
            .select_stats(&query, PageRequest::standard(page, page_size))
            .await?;

        let mut player_ids: Vec<PlayerId> = stats.items.iter().map(|s| s.player_id).collect();
        player_ids.sort();
        player_ids.dedup();
        let players: HashMap<PlayerId, PlayerDetail> =
            load_players(store, &catalog, &player_ids).await?;

        info!(
            "Standings from {} leaderboards: page {} with {} rows",
            leaderboard_ids.len(),
            stats.current_page,
            stats.items.len()
        );

        let rows = stats.map(|stat| StandingRow {
            player: players.get(&stat.player_id).cloned(),
            stat,
        });

        Ok(Self {
            role,
            leaderboard_ids,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::models::{RegionId, StatId, TermId};
    use crate::store::{MemoryStore, UnavailableStore};
    use pretty_assertions::assert_eq;

    fn store() -> MemoryStore {
        let mut data = ladder();
        data.leaderboards = vec![
            leaderboard(1, 1, at(2024, 3, 1), Some(at(2024, 3, 1))),
            leaderboard(2, 1, at(2024, 3, 2), Some(at(2024, 3, 2))),
            // newest US leaderboard still ingesting
            leaderboard(3, 1, at(2024, 3, 3), None),
            leaderboard(4, 2, at(2024, 3, 1), Some(at(2024, 3, 1))),
        ];
        data.players = vec![player(1, Some(1)), player(2, Some(2)), player(3, Some(1))];
        data.stats = vec![
            stat(1, 1, 1, 3000),
            stat(2, 2, 1, 2200),
            stat(3, 4, 2, 2400),
            stat(4, 2, 3, 1900),
            stat(5, 3, 2, 2900),
        ];
        MemoryStore::new(data)
    }

    #[tokio::test]
    async fn test_latest_per_region() {
        let store = store();
        let ids = LeaderboardResolver::new(&store)
            .resolve_latest_per_region(&context())
            .await
            .unwrap();
        assert_eq!(ids, vec![LeaderboardId(2), LeaderboardId(4)]);
    }

    #[tokio::test]
    async fn test_latest_ties_go_to_higher_id() {
        let mut data = ladder();
        data.leaderboards = vec![
            leaderboard(7, 1, at(2024, 3, 1), Some(at(2024, 3, 1))),
            leaderboard(5, 1, at(2024, 3, 1), Some(at(2024, 3, 1))),
        ];
        let store = MemoryStore::new(data);
        let ids = LeaderboardResolver::new(&store)
            .resolve_latest_per_region(&context())
            .await
            .unwrap();
        assert_eq!(ids, vec![LeaderboardId(7)]);
    }

    #[tokio::test]
    async fn test_latest_respects_term() {
        let store = store();
        let mut ctx = context();
        ctx.term = catalog().term(TermId(2)).cloned();

        let ids = LeaderboardResolver::new(&store)
            .resolve_latest_per_region(&ctx)
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_specific() {
        let store = store();
        let resolver = LeaderboardResolver::new(&store);

        let lb = resolver
            .resolve_specific(LeaderboardId(4), &context())
            .await
            .unwrap();
        assert_eq!(lb.region_id, RegionId(2));

        // unpublished
        let err = resolver
            .resolve_specific(LeaderboardId(3), &context())
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));

        // missing
        let err = resolver
            .resolve_specific(LeaderboardId(99), &context())
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));

        // outside the selected region
        let mut ctx = context();
        ctx.region = catalog().region(RegionId(1)).cloned();
        let err = resolver
            .resolve_specific(LeaderboardId(4), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));

        // other season
        let mut ctx = context();
        ctx.season = catalog().seasons[1].clone();
        let err = resolver
            .resolve_specific(LeaderboardId(1), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_standings_from_latest_leaderboards() {
        let store = store();
        let standings = Standings::load(&store, &context(), None, None, 20)
            .await
            .unwrap();

        let ids: Vec<StatId> = standings.rows.items.iter().map(|r| r.stat.id).collect();
        assert_eq!(ids, vec![StatId(3), StatId(2), StatId(4)]);
        assert_eq!(standings.rows.total, Some(3));
        assert_eq!(
            standings.rows.items[0]
                .player
                .as_ref()
                .and_then(|p| p.role.as_ref())
                .map(|r| r.name.as_str()),
            Some("Priest")
        );
    }

    #[tokio::test]
    async fn test_standings_role_filter() {
        let store = store();
        let standings = Standings::load(&store, &context(), Some("1"), None, 20)
            .await
            .unwrap();

        assert_eq!(standings.role.as_ref().map(|r| r.id), Some(RoleId(1)));
        let ids: Vec<StatId> = standings.rows.items.iter().map(|r| r.stat.id).collect();
        assert_eq!(ids, vec![StatId(2), StatId(4)]);

        // unknown role means no filter
        let standings = Standings::load(&store, &context(), Some("77"), None, 20)
            .await
            .unwrap();
        assert!(standings.role.is_none());
        assert_eq!(standings.rows.items.len(), 3);
    }

    #[tokio::test]
    async fn test_standings_without_leaderboards() {
        let store = MemoryStore::new(ladder());
        let standings = Standings::load(&store, &context(), None, None, 20)
            .await
            .unwrap();
        assert!(standings.leaderboard_ids.is_empty());
        assert!(standings.rows.items.is_empty());
    }

    #[tokio::test]
    async fn test_resolver_store_unavailable() {
        let err = LeaderboardResolver::new(&UnavailableStore)
            .resolve_latest_per_region(&context())
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::StoreUnavailable(_)));
    }
}
