//! Paginated comp statistics.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use super::{CompFilters, FilterContext, PredicateBuilder, QueryError};
use crate::models::{Catalog, Comp, CompId, Performance, Spec};
use crate::store::{Page, PageRequest, PerformancePredicate, Store};

/// A comp with its specs resolved, in slot order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompDetail {
    #[serde(flatten)]
    pub comp: Comp,
    pub specs: Vec<Spec>,
}

impl CompDetail {
    pub fn resolve(comp: Comp, catalog: &Catalog) -> Self {
        let specs = comp
            .spec_ids()
            .into_iter()
            .filter_map(|id| catalog.spec(id).cloned())
            .collect();
        Self { comp, specs }
    }
}

/// A performance row with its derived ratio and loaded comp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompRow {
    #[serde(flatten)]
    pub performance: Performance,
    pub ratio: f64,
    pub comp: Option<CompDetail>,
}

/// The comps page: filters as understood, their canonical query string and
/// one page of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompsPage {
    pub filters: CompFilters,
    pub query_string: String,

    /// Query string of the following page, when there is one.
    pub next_query: Option<String>,

    pub rows: Page<CompRow>,
}

/// Runs comp predicates against the store.
pub struct PerformanceAggregator<'a> {
    store: &'a dyn Store,
    page_size: u32,
}

impl<'a> PerformanceAggregator<'a> {
    pub fn new(store: &'a dyn Store, page_size: u32) -> Self {
        Self { store, page_size }
    }

    /// Execute `predicate` and load the comp of every returned row with one
    /// batched lookup.
    pub async fn execute(
        &self,
        predicate: &PerformancePredicate,
        page: Option<u32>,
    ) -> Result<Page<CompRow>, QueryError> {
        let request = PageRequest::standard(page, self.page_size);
        let rows = self.store.select_performances(predicate, request).await?;

        let catalog = self.store.catalog().await?;
        let mut comp_ids: Vec<CompId> = rows.items.iter().filter_map(|p| p.comp_id).collect();
        comp_ids.sort();
        comp_ids.dedup();
        let comps: HashMap<CompId, Comp> = self
            .store
            .comps(&comp_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(rows.map(|performance| {
            let comp = performance
                .comp_id
                .and_then(|id| comps.get(&id))
                .map(|c| CompDetail::resolve(c.clone(), &catalog));
            CompRow {
                ratio: performance.ratio(),
                performance,
                comp,
            }
        }))
    }

    /// Parse the request's filters, compose the predicate and fetch a page.
    pub async fn comps_page(
        &self,
        ctx: &FilterContext,
        raw: &HashMap<String, String>,
        page: Option<u32>,
    ) -> Result<CompsPage, QueryError> {
        let catalog = self.store.catalog().await?;
        let builder = PredicateBuilder::new(ctx, &catalog);
        let filters = builder.parse(raw);
        let predicate = builder.build(&filters);

        let rows = self.execute(&predicate, page).await?;
        info!(
            "Comps page {} for bracket {}: {} rows (total {:?})",
            rows.current_page,
            ctx.bracket.id,
            rows.items.len(),
            rows.total
        );

        Ok(CompsPage {
            query_string: filters.query_string(),
            next_query: rows
                .has_more
                .then(|| filters.page_query(ctx, rows.current_page + 1)),
            filters,
            rows,
        })
    }
}
