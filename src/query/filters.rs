//! Comp filters: request parameters to a performance predicate.
//!
//! Slot filters arrive as `class{N}` / `spec{N}` for N in `1..=bracket.size`,
//! alongside `s` (sort key), `d` (ascending when truthy), `mg` (minimum games)
//! and `mt` (minimum teams). Anything unrecognised is ignored and anything
//! malformed falls back to its default.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use super::FilterContext;
use crate::models::{parse_id, Catalog, Role, RoleId, Spec, SpecId};
use crate::store::{PerformanceOrder, PerformancePredicate, Scope, SortDirection, SortKey};

const SORT_PARAM: &str = "s";
const DIRECTION_PARAM: &str = "d";
const MIN_GAMES_PARAM: &str = "mg";
const MIN_TEAMS_PARAM: &str = "mt";
const PAGE_PARAM: &str = "page";

/// Role/spec selection for one roster slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotFilter {
    pub role: Option<Role>,
    pub spec: Option<Spec>,
}

impl SlotFilter {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.spec.is_none()
    }

    /// Specs a comp must hold one of to satisfy this slot, or `None` when the
    /// slot is unconstrained. A chosen spec is used as-is; otherwise every
    /// spec of the chosen role qualifies.
    pub fn spec_set(&self, catalog: &Catalog) -> Option<Vec<SpecId>> {
        if let Some(spec) = &self.spec {
            return Some(vec![spec.id]);
        }
        self.role.as_ref().map(|role| catalog.role_spec_ids(role.id))
    }
}

/// Normalized comp filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompFilters {
    /// Exactly `bracket.size` entries.
    pub slots: Vec<SlotFilter>,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub min_games: u32,
    pub min_teams: u32,
}

impl CompFilters {
    /// No slot filters, default sort, no thresholds.
    pub fn unfiltered(slots: usize) -> Self {
        Self {
            slots: vec![SlotFilter::default(); slots],
            sort: SortKey::default(),
            direction: SortDirection::default(),
            min_games: 0,
            min_teams: 0,
        }
    }

    pub fn order(&self) -> PerformanceOrder {
        PerformanceOrder {
            key: self.sort,
            direction: self.direction,
        }
    }

    /// Canonical query string of every non-default filter, for rebuilding
    /// pagination links. Parsing it back yields the same filters.
    pub fn query_string(&self) -> String {
        let mut qs = form_urlencoded::Serializer::new(String::new());
        self.append_pairs(&mut qs);
        qs.finish()
    }

    /// Query string for another page of the same result: the context's
    /// selection, then the filters, then the page.
    pub fn page_query(&self, ctx: &FilterContext, page: u32) -> String {
        let mut qs = form_urlencoded::Serializer::new(String::new());
        for (key, value) in ctx.query_pairs() {
            qs.append_pair(key, &value);
        }
        self.append_pairs(&mut qs);
        qs.append_pair(PAGE_PARAM, &page.to_string());
        qs.finish()
    }

    fn append_pairs(&self, qs: &mut form_urlencoded::Serializer<'_, String>) {
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(role) = &slot.role {
                qs.append_pair(&format!("class{}", i + 1), &role.id.to_string());
            }
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(spec) = &slot.spec {
                qs.append_pair(&format!("spec{}", i + 1), &spec.id.to_string());
            }
        }
        if self.min_games > 0 {
            qs.append_pair(MIN_GAMES_PARAM, &self.min_games.to_string());
        }
        if self.min_teams > 0 {
            qs.append_pair(MIN_TEAMS_PARAM, &self.min_teams.to_string());
        }
        // The direction only survives parsing alongside an explicit sort key
        let ascending = self.direction == SortDirection::Asc;
        if self.sort != SortKey::default() || ascending {
            qs.append_pair(SORT_PARAM, self.sort.as_str());
        }
        if ascending {
            qs.append_pair(DIRECTION_PARAM, "1");
        }
    }
}

/// Composes comp filters into a performance predicate for one context.
pub struct PredicateBuilder<'a> {
    ctx: &'a FilterContext,
    catalog: &'a Catalog,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(ctx: &'a FilterContext, catalog: &'a Catalog) -> Self {
        Self { ctx, catalog }
    }

    /// Normalize raw request parameters.
    pub fn parse(&self, raw: &HashMap<String, String>) -> CompFilters {
        let get = |key: &str| raw.get(key).map(String::as_str);

        let slots = (1..=self.ctx.bracket.slots())
            .map(|n| SlotFilter {
                role: parse_id::<RoleId>(get(&format!("class{}", n)))
                    .and_then(|id| self.catalog.role(id))
                    .cloned(),
                spec: parse_id::<SpecId>(get(&format!("spec{}", n)))
                    .and_then(|id| self.catalog.spec(id))
                    .cloned(),
            })
            .collect();

        // An unknown sort key resets the direction along with it
        let (sort, direction) = match get(SORT_PARAM).and_then(SortKey::parse) {
            Some(key) if parse_flag(get(DIRECTION_PARAM)) => (key, SortDirection::Asc),
            Some(key) => (key, SortDirection::Desc),
            None => (SortKey::default(), SortDirection::default()),
        };

        CompFilters {
            slots,
            sort,
            direction,
            min_games: parse_threshold(get(MIN_GAMES_PARAM)),
            min_teams: parse_threshold(get(MIN_TEAMS_PARAM)),
        }
    }

    /// Restrict performance rows to comp-level rows of the context that
    /// satisfy every filter.
    ///
    /// Slot filters are matched against any slot of the comp, not the slot
    /// with the same index.
    pub fn build(&self, filters: &CompFilters) -> PerformancePredicate {
        let comp_includes: Vec<Vec<SpecId>> = filters
            .slots
            .iter()
            .filter_map(|slot| slot.spec_set(self.catalog))
            .collect();

        debug!(
            "Built comp predicate: {} slot constraints, sort={} {:?}, mg={}, mt={}",
            comp_includes.len(),
            filters.sort.as_str(),
            filters.direction,
            filters.min_games,
            filters.min_teams
        );

        PerformancePredicate {
            bracket_id: self.ctx.bracket.id,
            season_id: self.ctx.season.id,
            region: self.ctx.region_scope(),
            term: self.ctx.term_scope(),
            comp: Scope::NotNull,
            team: Scope::Null,
            comp_includes,
            min_games: filters.min_games,
            min_teams: filters.min_teams,
            order: filters.order(),
        }
    }
}

/// Truthy unless absent, empty, `0` or `false`.
fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") | Some("0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}

/// Absolute value of an integer parameter; malformed input is 0.
fn parse_threshold(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| u32::try_from(n.unsigned_abs()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
