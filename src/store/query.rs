//! Store-agnostic descriptions of the reads the ladder pages issue.
//!
//! Each descriptor carries its own row predicate and ordering so any store
//! implementation evaluates them identically.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    BracketId, Comp, CompId, Leaderboard, LeaderboardId, Performance, PlayerId, RegionId, Rep,
    RoleId, SeasonId, SpecId, TeamId, TermId,
};

/// Constraint on a nullable column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Scope<T> {
    Any,
    Null,
    NotNull,
    Exact(T),
    OneOf(Vec<T>),
}

impl<T> Scope<T> {
    /// Exact match when a value is selected, otherwise the column must be null.
    pub fn exact_or_null(value: Option<T>) -> Self {
        value.map_or(Scope::Null, Scope::Exact)
    }

    /// Exact match when a value is selected, otherwise unconstrained.
    pub fn exact_or_any(value: Option<T>) -> Self {
        value.map_or(Scope::Any, Scope::Exact)
    }
}

impl<T: PartialEq> Scope<T> {
    pub fn matches(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (Scope::Any, _) => true,
            (Scope::Null, v) => v.is_none(),
            (Scope::NotNull, v) => v.is_some(),
            (Scope::Exact(want), Some(v)) => want == v,
            (Scope::OneOf(set), Some(v)) => set.contains(v),
            (Scope::Exact(_) | Scope::OneOf(_), None) => false,
        }
    }
}

/// Sortable performance columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Wins,
    Losses,
    Ratio,
    NumTeams,
}

impl SortKey {
    /// Parse a request value; unknown keys are `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "wins" => Some(SortKey::Wins),
            "losses" => Some(SortKey::Losses),
            "ratio" => Some(SortKey::Ratio),
            "num_teams" => Some(SortKey::NumTeams),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Wins => "wins",
            SortKey::Losses => "losses",
            SortKey::Ratio => "ratio",
            SortKey::NumTeams => "num_teams",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PerformanceOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl PerformanceOrder {
    /// Order by the sort key, ties broken by ascending row id.
    pub fn compare(&self, a: &Performance, b: &Performance) -> Ordering {
        let ord = match self.key {
            SortKey::Wins => a.wins.cmp(&b.wins),
            SortKey::Losses => a.losses.cmp(&b.losses),
            SortKey::NumTeams => a.num_teams.cmp(&b.num_teams),
            SortKey::Ratio => a.ratio().total_cmp(&b.ratio()),
        };
        self.direction.apply(ord).then_with(|| a.id.cmp(&b.id))
    }
}

/// Restriction and ordering over performance rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePredicate {
    pub bracket_id: BracketId,
    pub season_id: SeasonId,
    pub region: Scope<RegionId>,
    pub term: Scope<TermId>,
    pub comp: Scope<CompId>,
    pub team: Scope<TeamId>,

    /// Each entry requires the row's comp to hold one of the listed specs in
    /// any of its slots.
    pub comp_includes: Vec<Vec<SpecId>>,

    /// Rows need strictly more games than this when non-zero.
    pub min_games: u32,

    /// Rows need strictly more teams than this when non-zero.
    pub min_teams: u32,

    pub order: PerformanceOrder,
}

impl PerformancePredicate {
    /// Every row of a bracket and season, default order.
    pub fn for_season(bracket_id: BracketId, season_id: SeasonId) -> Self {
        Self {
            bracket_id,
            season_id,
            region: Scope::Any,
            term: Scope::Any,
            comp: Scope::Any,
            team: Scope::Any,
            comp_includes: Vec::new(),
            min_games: 0,
            min_teams: 0,
            order: PerformanceOrder::default(),
        }
    }

    /// A spec constraint with nothing to match can never be satisfied.
    pub fn is_unsatisfiable(&self) -> bool {
        self.comp_includes.iter().any(Vec::is_empty)
    }

    /// Whether `row`, joined to its comp, passes the predicate.
    pub fn matches(&self, row: &Performance, comp: Option<&Comp>) -> bool {
        if row.bracket_id != self.bracket_id || row.season_id != self.season_id {
            return false;
        }
        if !self.region.matches(row.region_id.as_ref())
            || !self.term.matches(row.term_id.as_ref())
            || !self.comp.matches(row.comp_id.as_ref())
            || !self.team.matches(row.team_id.as_ref())
        {
            return false;
        }
        if self.min_games > 0 && row.games() <= u64::from(self.min_games) {
            return false;
        }
        if self.min_teams > 0 && row.num_teams <= self.min_teams {
            return false;
        }
        self.comp_includes
            .iter()
            .all(|specs| comp.is_some_and(|c| c.includes_any(specs)))
    }
}

/// Published leaderboards for a scope. Newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub bracket_id: BracketId,
    pub season_id: SeasonId,
    pub region: Scope<RegionId>,
    pub term: Scope<TermId>,
}

impl LeaderboardQuery {
    pub fn matches(&self, lb: &Leaderboard) -> bool {
        lb.is_published()
            && lb.bracket_id == self.bracket_id
            && lb.season_id == self.season_id
            && self.region.matches(Some(&lb.region_id))
            && self.term.matches(lb.term_id.as_ref())
    }
}

/// Player standing rows ordered by rating, highest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatQuery {
    pub bracket_id: Option<BracketId>,
    pub leaderboards: Scope<LeaderboardId>,
    pub player_id: Option<PlayerId>,

    /// Role of the player the stat belongs to.
    pub role_id: Option<RoleId>,

    /// Region of the leaderboard the stat belongs to.
    pub region: Scope<RegionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrder {
    /// Highest rating first.
    RatingDesc,
    /// Most recently completed leaderboard first.
    CompletedDesc,
}

/// Snapshots joined through their group to the owning leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotQuery {
    pub bracket_id: BracketId,
    pub region: Scope<RegionId>,
    pub term: Scope<TermId>,
    pub leaderboard_id: Option<LeaderboardId>,
    pub player_id: Option<PlayerId>,
    pub published_only: bool,
    pub order: SnapshotOrder,
}

impl SnapshotQuery {
    pub fn matches(&self, lb: &Leaderboard, player_id: PlayerId) -> bool {
        lb.bracket_id == self.bracket_id
            && (!self.published_only || lb.is_published())
            && self.region.matches(Some(&lb.region_id))
            && self.term.matches(lb.term_id.as_ref())
            && self.leaderboard_id.map_or(true, |id| lb.id == id)
            && self.player_id.map_or(true, |id| player_id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepOrder {
    /// Ascending `for_date`.
    ByDate,
    /// Ascending (role, spec, race), nulls first.
    ByCut,
}

/// Daily representation rows within an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepQuery {
    pub bracket_id: BracketId,
    pub region: Scope<RegionId>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub role_totals_only: bool,
    pub order: RepOrder,
}

impl RepQuery {
    pub fn matches(&self, rep: &Rep) -> bool {
        rep.bracket_id == self.bracket_id
            && self.region.matches(rep.region_id.as_ref())
            && rep.for_date >= self.from
            && rep.for_date <= self.to
            && (!self.role_totals_only || rep.is_role_total())
    }

    pub fn compare(&self, a: &Rep, b: &Rep) -> Ordering {
        let ord = match self.order {
            RepOrder::ByDate => a.for_date.cmp(&b.for_date),
            RepOrder::ByCut => (a.role_id, a.spec_id, a.race_id).cmp(&(b.role_id, b.spec_id, b.race_id)),
        };
        ord.then_with(|| a.id.cmp(&b.id))
    }
}
