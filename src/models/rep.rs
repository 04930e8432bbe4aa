//! Daily representation snapshots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BracketId, RaceId, RegionId, RepId, RoleId, SpecId};

/// Number of ranked players matching a (role, spec, race) cut on one day.
///
/// Null columns widen the cut: a row with a role but no spec and no race is
/// the role's daily total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rep {
    pub id: RepId,
    pub for_date: NaiveDate,
    pub bracket_id: BracketId,
    pub region_id: Option<RegionId>,
    pub role_id: Option<RoleId>,
    pub spec_id: Option<SpecId>,
    pub race_id: Option<RaceId>,
    pub num: u32,
}

impl Rep {
    /// Whether this row is a role-level daily total.
    pub fn is_role_total(&self) -> bool {
        self.role_id.is_some() && self.spec_id.is_none() && self.race_id.is_none()
    }
}
