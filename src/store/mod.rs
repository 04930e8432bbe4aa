//! Read access to the ladder store.
//!
//! Queries never talk to storage directly; they describe what they need
//! with the descriptors in [`query`] and hand them to a [`Store`].

mod memory;
mod page;
mod query;

pub use memory::*;
pub use page::*;
pub use query::*;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::{
    BracketId, Catalog, Comp, CompId, Group, Leaderboard, LeaderboardId, Performance, Player,
    PlayerId, Rep, Snapshot, Stat, Team, TeamId,
};

/// Errors raised by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transient infrastructure failure. Retrying is the store client's job.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A snapshot joined to its group and the group's leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinedSnapshot {
    pub snapshot: Snapshot,
    pub group: Group,
    pub leaderboard: Leaderboard,
}

/// Query capability over the ladder tables.
///
/// Every method is a single read; implementations must not hold state that
/// a dropped call could leave inconsistent.
#[async_trait]
pub trait Store: Send + Sync {
    /// Store name for logging.
    fn name(&self) -> &'static str;

    /// Reference tables.
    async fn catalog(&self) -> Result<Arc<Catalog>, StoreError>;

    async fn select_performances(
        &self,
        predicate: &PerformancePredicate,
        page: PageRequest,
    ) -> Result<Page<Performance>, StoreError>;

    async fn comps(&self, ids: &[CompId]) -> Result<Vec<Comp>, StoreError>;

    async fn teams(&self, ids: &[TeamId]) -> Result<Vec<Team>, StoreError>;

    /// Teams in `bracket` that `player` is on.
    async fn player_teams(
        &self,
        player: PlayerId,
        bracket: BracketId,
    ) -> Result<Vec<Team>, StoreError>;

    async fn players(&self, ids: &[PlayerId]) -> Result<Vec<Player>, StoreError>;

    async fn leaderboard(&self, id: LeaderboardId) -> Result<Option<Leaderboard>, StoreError>;

    /// Most recently created leaderboard matching the query.
    async fn latest_leaderboard(
        &self,
        query: &LeaderboardQuery,
    ) -> Result<Option<Leaderboard>, StoreError>;

    async fn select_stats(
        &self,
        query: &StatQuery,
        page: PageRequest,
    ) -> Result<Page<Stat>, StoreError>;

    async fn select_snapshots(
        &self,
        query: &SnapshotQuery,
        page: PageRequest,
    ) -> Result<Page<JoinedSnapshot>, StoreError>;

    async fn reps(&self, query: &RepQuery) -> Result<Vec<Rep>, StoreError>;
}

/// Store that fails every call, for exercising error paths.
#[cfg(test)]
pub struct UnavailableStore;

#[cfg(test)]
#[async_trait]
impl Store for UnavailableStore {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn catalog(&self) -> Result<Arc<Catalog>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn select_performances(
        &self,
        _predicate: &PerformancePredicate,
        _page: PageRequest,
    ) -> Result<Page<Performance>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn comps(&self, _ids: &[CompId]) -> Result<Vec<Comp>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn teams(&self, _ids: &[TeamId]) -> Result<Vec<Team>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn player_teams(
        &self,
        _player: PlayerId,
        _bracket: BracketId,
    ) -> Result<Vec<Team>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn players(&self, _ids: &[PlayerId]) -> Result<Vec<Player>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn leaderboard(&self, _id: LeaderboardId) -> Result<Option<Leaderboard>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn latest_leaderboard(
        &self,
        _query: &LeaderboardQuery,
    ) -> Result<Option<Leaderboard>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn select_stats(
        &self,
        _query: &StatQuery,
        _page: PageRequest,
    ) -> Result<Page<Stat>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn select_snapshots(
        &self,
        _query: &SnapshotQuery,
        _page: PageRequest,
    ) -> Result<Page<JoinedSnapshot>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn reps(&self, _query: &RepQuery) -> Result<Vec<Rep>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}
