//! # Ladder Stats
//!
//! Read-only statistics service for a ranked PvP ladder: comp performance,
//! standings, rating activity and role representation over time.
//!
//! ## Architecture
//!
//! - **models**: Ladder entities and reference tables
//! - **storage**: JSONL table files under the data directory
//! - **store**: The `Store` query capability and its in-memory implementation
//! - **query**: Predicate building, aggregation and chart series
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use models::*;
