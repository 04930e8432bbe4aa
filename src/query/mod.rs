//! Ladder queries.
//!
//! Every query takes the request's [`FilterContext`] explicitly and returns
//! structured rows with their associations already loaded:
//!
//! - **filters**: request parameters → composed performance predicate
//! - **performance**: paginated comp statistics
//! - **leaderboard**: latest leaderboards per region and standings
//! - **series**: daily role representation charts
//! - **activity**, **comp**, **player**: feed, comp detail and profile pages

mod activity;
mod comp;
mod context;
mod filters;
mod leaderboard;
mod performance;
mod player;
mod series;

pub use activity::*;
pub use comp::*;
pub use context::*;
pub use filters::*;
pub use leaderboard::*;
pub use performance::*;
pub use player::*;
pub use series::*;

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced to the presentation layer.
///
/// Invalid request parameters are never an error; they are normalized to
/// defaults while parsing.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The requested record does not exist or lies outside the selected
    /// bracket/season/region/term.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Reference data needed to serve any page is missing.
    #[error("Ladder not initialised: {0}")]
    MissingReference(String),
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => QueryError::StoreUnavailable(msg),
        }
    }
}
