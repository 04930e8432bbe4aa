//! Leaderboard records: published standings, rating groups, snapshots and
//! per-player season stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BracketId, FactionId, GenderId, GroupId, LeaderboardId, PlayerId, RaceId, RealmId, RegionId,
    RoleId, SeasonId, SnapshotId, SpecId, StatId, TermId,
};

/// A ranked standings snapshot for one (bracket, season, region, term).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub id: LeaderboardId,
    pub bracket_id: BracketId,
    pub season_id: SeasonId,
    pub region_id: RegionId,
    pub term_id: Option<TermId>,
    pub created_at: DateTime<Utc>,

    /// Set once ingestion finished; unpublished leaderboards are never served.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Leaderboard {
    pub fn is_published(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Players whose rating moved together between two leaderboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub leaderboard_id: LeaderboardId,
    pub wins: u32,
    pub losses: u32,
}

/// A player's rating at the time a leaderboard was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub group_id: GroupId,
    pub player_id: PlayerId,
    pub spec_id: Option<SpecId>,
    pub rating: u32,
    pub ranking: u32,
}

/// A player's standing on a specific leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub id: StatId,
    pub leaderboard_id: LeaderboardId,
    pub bracket_id: BracketId,
    pub player_id: PlayerId,
    pub ranking: u32,
    pub rating: u32,
    pub season_wins: u32,
    pub season_losses: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub realm_id: RealmId,
    pub faction_id: Option<FactionId>,
    pub race_id: Option<RaceId>,
    pub role_id: Option<RoleId>,
    pub spec_id: Option<SpecId>,
    pub gender_id: Option<GenderId>,
}
