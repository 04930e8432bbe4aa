//! Typed integer identifiers for ladder records.
//!
//! Every table in the ladder store is keyed by a positive integer. Wrapping
//! each key in its own type keeps a `RoleId` from being passed where a
//! `SpecId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! entity_ids {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub u32);

            impl $name {
                /// Raw integer value.
                pub fn get(self) -> u32 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<u32> for $name {
                fn from(id: u32) -> Self {
                    Self(id)
                }
            }

            impl FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse().map(Self)
                }
            }
        )+
    };
}

entity_ids!(
    BracketId,
    RegionId,
    SeasonId,
    TermId,
    LeaderboardId,
    GroupId,
    SnapshotId,
    StatId,
    PlayerId,
    RealmId,
    RaceId,
    GenderId,
    FactionId,
    RoleId,
    SpecId,
    CompId,
    TeamId,
    PerformanceId,
    RepId,
);

/// Parse a raw request value into an id, treating anything malformed as absent.
pub fn parse_id<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}
