//! Store backed by ladder tables held in memory.
//!
//! Tables are loaded once from JSONL at startup and never mutated, so the
//! store is shared between requests without locking.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{
    JoinedSnapshot, LeaderboardQuery, Page, PageRequest, PerformancePredicate, RepQuery,
    SnapshotOrder, SnapshotQuery, StatQuery, Store, StoreError,
};
use crate::models::{
    BracketId, Catalog, Comp, CompId, Group, GroupId, Leaderboard, LeaderboardId, Performance,
    Player, PlayerId, Rep, Snapshot, Stat, Team, TeamId,
};
use crate::storage::{LadderData, StorageConfig, StorageError};

pub struct MemoryStore {
    catalog: Arc<Catalog>,
    leaderboards: BTreeMap<LeaderboardId, Leaderboard>,
    groups: BTreeMap<GroupId, Group>,
    snapshots: Vec<Snapshot>,
    stats: Vec<Stat>,
    players: BTreeMap<PlayerId, Player>,
    comps: BTreeMap<CompId, Comp>,
    teams: BTreeMap<TeamId, Team>,
    performances: Vec<Performance>,
    reps: Vec<Rep>,
}

impl MemoryStore {
    pub fn new(data: LadderData) -> Self {
        Self {
            catalog: Arc::new(data.catalog.normalized()),
            leaderboards: data.leaderboards.into_iter().map(|l| (l.id, l)).collect(),
            groups: data.groups.into_iter().map(|g| (g.id, g)).collect(),
            snapshots: data.snapshots,
            stats: data.stats,
            players: data.players.into_iter().map(|p| (p.id, p)).collect(),
            comps: data.comps.into_iter().map(|c| (c.id, c)).collect(),
            teams: data.teams.into_iter().map(|t| (t.id, t)).collect(),
            performances: data.performances,
            reps: data.reps,
        }
    }

    /// Load every table from the data directory.
    pub fn load(config: &StorageConfig) -> Result<Self, StorageError> {
        LadderData::load(config).map(Self::new)
    }

    fn join_snapshot(&self, snapshot: &Snapshot) -> Option<(&Group, &Leaderboard)> {
        let group = self.groups.get(&snapshot.group_id)?;
        let leaderboard = self.leaderboards.get(&group.leaderboard_id)?;
        Some((group, leaderboard))
    }
}

fn by_ids<K: Ord, V: Clone>(table: &BTreeMap<K, V>, ids: &[K]) -> Vec<V> {
    let mut rows: Vec<V> = Vec::with_capacity(ids.len());
    let mut seen: Vec<&K> = Vec::with_capacity(ids.len());
    for id in ids {
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);
        if let Some(row) = table.get(id) {
            rows.push(row.clone());
        }
    }
    rows
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn catalog(&self) -> Result<Arc<Catalog>, StoreError> {
        Ok(Arc::clone(&self.catalog))
    }

    async fn select_performances(
        &self,
        predicate: &PerformancePredicate,
        page: PageRequest,
    ) -> Result<Page<Performance>, StoreError> {
        if predicate.is_unsatisfiable() {
            debug!("Performance predicate unsatisfiable, skipping scan");
            return Ok(Page::from_rows(Vec::new(), page));
        }

        let mut rows: Vec<&Performance> = self
            .performances
            .iter()
            .filter(|p| {
                let comp = p.comp_id.and_then(|id| self.comps.get(&id));
                predicate.matches(p, comp)
            })
            .collect();
        rows.sort_by(|a, b| predicate.order.compare(a, b));

        debug!("Performance scan matched {} rows", rows.len());
        Ok(Page::from_rows(rows, page).map(Clone::clone))
    }

    async fn comps(&self, ids: &[CompId]) -> Result<Vec<Comp>, StoreError> {
        Ok(by_ids(&self.comps, ids))
    }

    async fn teams(&self, ids: &[TeamId]) -> Result<Vec<Team>, StoreError> {
        Ok(by_ids(&self.teams, ids))
    }

    async fn player_teams(
        &self,
        player: PlayerId,
        bracket: BracketId,
    ) -> Result<Vec<Team>, StoreError> {
        Ok(self
            .teams
            .values()
            .filter(|t| t.bracket_id == bracket && t.player_ids.contains(&player))
            .cloned()
            .collect())
    }

    async fn players(&self, ids: &[PlayerId]) -> Result<Vec<Player>, StoreError> {
        Ok(by_ids(&self.players, ids))
    }

    async fn leaderboard(&self, id: LeaderboardId) -> Result<Option<Leaderboard>, StoreError> {
        Ok(self.leaderboards.get(&id).cloned())
    }

    async fn latest_leaderboard(
        &self,
        query: &LeaderboardQuery,
    ) -> Result<Option<Leaderboard>, StoreError> {
        Ok(self
            .leaderboards
            .values()
            .filter(|lb| query.matches(lb))
            .max_by_key(|lb| (lb.created_at, lb.id))
            .cloned())
    }

    async fn select_stats(
        &self,
        query: &StatQuery,
        page: PageRequest,
    ) -> Result<Page<Stat>, StoreError> {
        let mut rows: Vec<&Stat> = self
            .stats
            .iter()
            .filter(|s| query.bracket_id.map_or(true, |b| s.bracket_id == b))
            .filter(|s| query.leaderboards.matches(Some(&s.leaderboard_id)))
            .filter(|s| query.player_id.map_or(true, |p| s.player_id == p))
            .filter(|s| {
                let region = self.leaderboards.get(&s.leaderboard_id).map(|l| &l.region_id);
                query.region.matches(region)
            })
            .filter(|s| {
                query.role_id.map_or(true, |role| {
                    self.players
                        .get(&s.player_id)
                        .is_some_and(|p| p.role_id == Some(role))
                })
            })
            .collect();
        rows.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));

        Ok(Page::from_rows(rows, page).map(Clone::clone))
    }

    async fn select_snapshots(
        &self,
        query: &SnapshotQuery,
        page: PageRequest,
    ) -> Result<Page<JoinedSnapshot>, StoreError> {
        let mut rows: Vec<(&Snapshot, &Group, &Leaderboard)> = self
            .snapshots
            .iter()
            .filter_map(|s| {
                let (group, lb) = self.join_snapshot(s)?;
                query.matches(lb, s.player_id).then_some((s, group, lb))
            })
            .collect();

        match query.order {
            SnapshotOrder::RatingDesc => rows.sort_by(|a, b| {
                b.0.rating.cmp(&a.0.rating).then_with(|| a.0.id.cmp(&b.0.id))
            }),
            // Unpublished leaderboards sort last
            SnapshotOrder::CompletedDesc => rows.sort_by(|a, b| {
                b.2.completed_at
                    .cmp(&a.2.completed_at)
                    .then_with(|| b.0.rating.cmp(&a.0.rating))
                    .then_with(|| a.0.id.cmp(&b.0.id))
            }),
        }

        Ok(Page::from_rows(rows, page).map(|(snapshot, group, leaderboard)| JoinedSnapshot {
            snapshot: snapshot.clone(),
            group: group.clone(),
            leaderboard: leaderboard.clone(),
        }))
    }

    async fn reps(&self, query: &RepQuery) -> Result<Vec<Rep>, StoreError> {
        let mut rows: Vec<&Rep> = self.reps.iter().filter(|r| query.matches(r)).collect();
        rows.sort_by(|a, b| query.compare(a, b));
        Ok(rows.into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::models::{RegionId, RoleId, SeasonId, SnapshotId, StatId};
    use crate::store::{RepOrder, Scope};

    #[tokio::test]
    async fn test_latest_leaderboard_skips_unpublished() {
        let mut data = ladder();
        data.leaderboards = vec![
            leaderboard(1, 1, at(2024, 3, 1), Some(at(2024, 3, 1))),
            leaderboard(2, 1, at(2024, 3, 2), None),
            leaderboard(3, 2, at(2024, 3, 3), Some(at(2024, 3, 3))),
        ];
        let store = MemoryStore::new(data);

        let query = LeaderboardQuery {
            bracket_id: BracketId(2),
            season_id: SeasonId(1),
            region: Scope::Exact(RegionId(1)),
            term: Scope::Any,
        };
        let latest = store.latest_leaderboard(&query).await.unwrap().unwrap();
        assert_eq!(latest.id, LeaderboardId(1));
    }

    #[tokio::test]
    async fn test_comps_dedups_and_skips_missing() {
        let mut data = ladder();
        data.comps = vec![comp(1, [Some(1), Some(3), None]), comp(2, [Some(5), None, None])];
        let store = MemoryStore::new(data);

        let comps = store
            .comps(&[CompId(2), CompId(9), CompId(2), CompId(1)])
            .await
            .unwrap();
        let ids: Vec<CompId> = comps.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CompId(2), CompId(1)]);
    }

    #[tokio::test]
    async fn test_select_stats_filters_role_and_orders_by_rating() {
        let mut data = ladder();
        data.leaderboards = vec![leaderboard(1, 1, at(2024, 3, 1), Some(at(2024, 3, 1)))];
        data.players = vec![player(1, Some(1)), player(2, Some(2)), player(3, Some(1))];
        data.stats = vec![stat(1, 1, 1, 2100), stat(2, 1, 2, 2500), stat(3, 1, 3, 2300)];
        let store = MemoryStore::new(data);

        let query = StatQuery {
            bracket_id: None,
            leaderboards: Scope::OneOf(vec![LeaderboardId(1)]),
            player_id: None,
            role_id: Some(RoleId(1)),
            region: Scope::Any,
        };
        let page = store
            .select_stats(&query, PageRequest::standard(None, 20))
            .await
            .unwrap();
        let ids: Vec<StatId> = page.items.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![StatId(3), StatId(1)]);
        assert_eq!(page.total, Some(2));
    }

    #[tokio::test]
    async fn test_select_snapshots_joins_leaderboard() {
        let mut data = ladder();
        data.leaderboards = vec![
            leaderboard(1, 1, at(2024, 3, 1), Some(at(2024, 3, 1))),
            leaderboard(2, 1, at(2024, 3, 5), Some(at(2024, 3, 5))),
            leaderboard(3, 1, at(2024, 3, 6), None),
        ];
        data.groups = vec![group(1, 1), group(2, 2), group(3, 3)];
        data.snapshots = vec![
            snapshot(1, 1, 1, 2000),
            snapshot(2, 2, 1, 1900),
            snapshot(3, 3, 1, 2400),
            // dangling group
            snapshot(4, 99, 1, 3000),
        ];
        let store = MemoryStore::new(data);

        let query = SnapshotQuery {
            bracket_id: BracketId(2),
            region: Scope::Any,
            term: Scope::Any,
            leaderboard_id: None,
            player_id: None,
            published_only: true,
            order: SnapshotOrder::CompletedDesc,
        };
        let page = store
            .select_snapshots(&query, PageRequest::simple(None, 30))
            .await
            .unwrap();
        let ids: Vec<SnapshotId> = page.items.iter().map(|j| j.snapshot.id).collect();
        assert_eq!(ids, vec![SnapshotId(2), SnapshotId(1)]);
        assert_eq!(page.items[0].leaderboard.id, LeaderboardId(2));
    }

    #[tokio::test]
    async fn test_reps_by_cut_puts_nulls_first() {
        let mut data = ladder();
        data.reps = vec![
            rep(1, date(2024, 5, 1), Some(1), Some(2), None, 3),
            rep(2, date(2024, 5, 1), Some(1), None, None, 9),
            rep(3, date(2024, 5, 1), None, None, None, 20),
            rep(4, date(2024, 5, 2), Some(1), None, None, 8),
        ];
        let store = MemoryStore::new(data);

        let query = RepQuery {
            bracket_id: BracketId(2),
            region: Scope::Null,
            from: date(2024, 5, 1),
            to: date(2024, 5, 1),
            role_totals_only: false,
            order: RepOrder::ByCut,
        };
        let reps = store.reps(&query).await.unwrap();
        let ids: Vec<u32> = reps.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
