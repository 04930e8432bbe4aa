//! Compositions, teams and their aggregated win/loss records.

use serde::{Deserialize, Serialize};

use super::{
    BracketId, CompId, PerformanceId, PlayerId, RegionId, SeasonId, SpecId, TeamId, TermId,
};

/// A team archetype: an ordered combination of up to three specs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comp {
    pub id: CompId,
    pub bracket_id: BracketId,
    pub spec_id1: Option<SpecId>,
    pub spec_id2: Option<SpecId>,
    pub spec_id3: Option<SpecId>,
}

impl Comp {
    /// Specs filling the comp's slots, in slot order.
    pub fn spec_ids(&self) -> Vec<SpecId> {
        [self.spec_id1, self.spec_id2, self.spec_id3]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Whether any slot of the comp holds one of `specs`.
    ///
    /// Slot position is not considered.
    pub fn includes_any(&self, specs: &[SpecId]) -> bool {
        [self.spec_id1, self.spec_id2, self.spec_id3]
            .into_iter()
            .flatten()
            .any(|s| specs.contains(&s))
    }
}

/// A fixed roster of players seen together in a bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub bracket_id: BracketId,
    pub comp_id: Option<CompId>,
    pub player_ids: Vec<PlayerId>,
}

/// Aggregated results for one scope.
///
/// `comp_id = None` is the ungrouped row for the scope; `team_id = Some`
/// marks a per-team row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    pub id: PerformanceId,
    pub bracket_id: BracketId,
    pub season_id: SeasonId,
    pub region_id: Option<RegionId>,
    pub term_id: Option<TermId>,
    pub comp_id: Option<CompId>,
    pub team_id: Option<TeamId>,
    pub wins: u32,
    pub losses: u32,
    pub num_teams: u32,
}

impl Performance {
    pub fn games(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }

    /// Derived win/loss ratio; losses floor at 1.
    pub fn ratio(&self) -> f64 {
        f64::from(self.wins) / f64::from(self.losses.max(1))
    }
}
