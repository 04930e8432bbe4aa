//! The bracket/region/season/term selection a request is served under.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::QueryError;
use crate::models::{
    parse_id, Bracket, BracketId, Catalog, Region, RegionId, Season, SeasonId, Term, TermId,
};
use crate::store::{Scope, Store};

/// Raw selection ids as sent by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionParams {
    pub bracket: Option<BracketId>,
    pub region: Option<RegionId>,
    pub season: Option<SeasonId>,
    pub term: Option<TermId>,
}

impl OptionParams {
    /// Read `bracket`, `region`, `season` and `term`; malformed ids are absent.
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        Self {
            bracket: parse_id(raw.get("bracket").map(String::as_str)),
            region: parse_id(raw.get("region").map(String::as_str)),
            season: parse_id(raw.get("season").map(String::as_str)),
            term: parse_id(raw.get("term").map(String::as_str)),
        }
    }
}

/// Immutable per-request selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterContext {
    pub bracket: Bracket,
    pub region: Option<Region>,
    pub season: Season,
    pub term: Option<Term>,

    /// Every region the ladder knows, ascending by id.
    pub regions: Vec<Region>,
}

impl FilterContext {
    /// Resolve the selection against the store's reference tables.
    pub async fn resolve(store: &dyn Store, params: &OptionParams) -> Result<Self, QueryError> {
        let catalog = store.catalog().await?;
        Self::from_catalog(&catalog, params)
    }

    /// Unknown or missing bracket falls back to the first bracket, season to
    /// the latest season. An unknown region means all regions; a term outside
    /// the season means no term.
    pub fn from_catalog(catalog: &Catalog, params: &OptionParams) -> Result<Self, QueryError> {
        let bracket = params
            .bracket
            .and_then(|id| catalog.bracket(id))
            .or_else(|| catalog.brackets.first())
            .cloned()
            .ok_or_else(|| QueryError::MissingReference("no brackets".to_string()))?;

        let season = params
            .season
            .and_then(|id| catalog.season(id))
            .or_else(|| catalog.seasons.iter().max_by_key(|s| (s.start_date, s.id)))
            .cloned()
            .ok_or_else(|| QueryError::MissingReference("no seasons".to_string()))?;

        let region = params.region.and_then(|id| catalog.region(id)).cloned();

        let term = params
            .term
            .and_then(|id| catalog.term(id))
            .filter(|t| t.season_id == season.id)
            .cloned();

        debug!(
            "Resolved context: bracket={} season={} region={:?} term={:?}",
            bracket.id,
            season.id,
            region.as_ref().map(|r| r.id),
            term.as_ref().map(|t| t.id)
        );

        Ok(Self {
            bracket,
            region,
            season,
            term,
            regions: catalog.regions.clone(),
        })
    }

    pub fn region_id(&self) -> Option<RegionId> {
        self.region.as_ref().map(|r| r.id)
    }

    pub fn term_id(&self) -> Option<TermId> {
        self.term.as_ref().map(|t| t.id)
    }

    /// Aggregated rows: the selected region, or the all-regions (null) row.
    pub fn region_scope(&self) -> Scope<RegionId> {
        Scope::exact_or_null(self.region_id())
    }

    /// Aggregated rows: the selected term, or the whole-season (null) row.
    pub fn term_scope(&self) -> Scope<TermId> {
        Scope::exact_or_null(self.term_id())
    }

    /// Leaderboard-backed rows: the selected region, or any region.
    pub fn region_filter(&self) -> Scope<RegionId> {
        Scope::exact_or_any(self.region_id())
    }

    /// Leaderboard-backed rows: the selected term, or any term.
    pub fn term_filter(&self) -> Scope<TermId> {
        Scope::exact_or_any(self.term_id())
    }

    /// The resolved selection as request parameters: bracket and season
    /// always, region and term when chosen.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("bracket", self.bracket.id.to_string()),
            ("season", self.season.id.to_string()),
        ];
        if let Some(id) = self.region_id() {
            pairs.push(("region", id.to_string()));
        }
        if let Some(id) = self.term_id() {
            pairs.push(("term", id.to_string()));
        }
        pairs
    }

    /// Region names joined for display, e.g. "US / EU".
    pub fn region_label(&self) -> String {
        self.regions
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}
