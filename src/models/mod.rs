//! Ladder records as persisted by the ingestion pipeline.

mod catalog;
mod ids;
mod ladder;
mod performance;
mod reference;
mod rep;

pub use catalog::*;
pub use ids::*;
pub use ladder::*;
pub use performance::*;
pub use reference::*;
pub use rep::*;
