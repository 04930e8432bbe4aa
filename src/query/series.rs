//! Daily role representation: the chart series and the point-in-time
//! breakdown shown on the stats page.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use super::{FilterContext, QueryError};
use crate::models::{Catalog, Race, Rep, Role, RoleId, Spec};
use crate::store::{RepOrder, RepQuery, Store};

/// Inclusive date range a chart covers. Empty when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeriesWindow {
    /// Ends at the earlier of the season and term end (open ends are
    /// `today`) and starts at the later of the season and term start,
    /// never more than `max_days` before the end.
    pub fn for_context(ctx: &FilterContext, today: NaiveDate, max_days: u32) -> Self {
        let season_end = ctx.season.end_date.unwrap_or(today);
        let term_end = ctx
            .term
            .as_ref()
            .and_then(|t| t.end_date)
            .unwrap_or(today);
        let end = season_end.min(term_end);

        let floor = end
            .checked_sub_signed(Duration::days(i64::from(max_days)))
            .unwrap_or(NaiveDate::MIN);
        let start = [
            ctx.season.start_date,
            ctx.term.as_ref().and_then(|t| t.start_date),
            Some(floor),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(floor);

        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Every date of the window, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }
}

/// One series per role, parallel to `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepresentationChart {
    pub labels: Vec<NaiveDate>,
    pub roles: Vec<Role>,
    pub series: Vec<Vec<u32>>,
}

/// A representation row for the window's last day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    #[serde(flatten)]
    pub rep: Rep,
    pub role: Option<Role>,
    pub spec: Option<Spec>,
    pub race: Option<Race>,

    /// Fraction of the role's total for the day; 0 without a total.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub region_label: String,
    pub window: SeriesWindow,
    pub chart: RepresentationChart,
    pub breakdown: Vec<BreakdownRow>,
}

pub struct RepresentationSeriesBuilder<'a> {
    store: &'a dyn Store,
    max_days: u32,
}

impl<'a> RepresentationSeriesBuilder<'a> {
    pub fn new(store: &'a dyn Store, max_days: u32) -> Self {
        Self { store, max_days }
    }

    /// Zero-filled daily counts per role over the context's window.
    pub async fn chart(
        &self,
        ctx: &FilterContext,
        today: NaiveDate,
    ) -> Result<RepresentationChart, QueryError> {
        let window = SeriesWindow::for_context(ctx, today, self.max_days);
        let catalog = self.store.catalog().await?;
        self.chart_for(ctx, &catalog, window).await
    }

    async fn chart_for(
        &self,
        ctx: &FilterContext,
        catalog: &Catalog,
        window: SeriesWindow,
    ) -> Result<RepresentationChart, QueryError> {
        let labels = window.dates();
        let roles = catalog.roles.clone();

        let mut counts: BTreeMap<RoleId, BTreeMap<NaiveDate, u32>> = roles
            .iter()
            .map(|r| (r.id, labels.iter().map(|d| (*d, 0)).collect()))
            .collect();

        if !window.is_empty() {
            let query = RepQuery {
                bracket_id: ctx.bracket.id,
                region: ctx.region_scope(),
                from: window.start,
                to: window.end,
                role_totals_only: true,
                order: RepOrder::ByDate,
            };
            let reps = self.store.reps(&query).await?;
            debug!("Overlaying {} role totals on {} days", reps.len(), labels.len());

            for rep in reps {
                let Some(role_id) = rep.role_id else { continue };
                if let Some(slot) = counts
                    .get_mut(&role_id)
                    .and_then(|days| days.get_mut(&rep.for_date))
                {
                    *slot = rep.num;
                }
            }
        }

        let series = roles
            .iter()
            .map(|r| {
                counts
                    .remove(&r.id)
                    .map(|days| days.into_values().collect())
                    .unwrap_or_default()
            })
            .collect();

        Ok(RepresentationChart {
            labels,
            roles,
            series,
        })
    }

    /// Every representation cut recorded for `date`, ordered by role, spec
    /// and race with the totals first.
    pub async fn breakdown(
        &self,
        ctx: &FilterContext,
        date: NaiveDate,
    ) -> Result<Vec<BreakdownRow>, QueryError> {
        let catalog = self.store.catalog().await?;
        self.breakdown_for(ctx, &catalog, date).await
    }

    async fn breakdown_for(
        &self,
        ctx: &FilterContext,
        catalog: &Catalog,
        date: NaiveDate,
    ) -> Result<Vec<BreakdownRow>, QueryError> {
        let query = RepQuery {
            bracket_id: ctx.bracket.id,
            region: ctx.region_scope(),
            from: date,
            to: date,
            role_totals_only: false,
            order: RepOrder::ByCut,
        };
        let reps = self.store.reps(&query).await?;

        let totals: HashMap<RoleId, u32> = reps
            .iter()
            .filter(|r| r.is_role_total())
            .filter_map(|r| r.role_id.map(|id| (id, r.num)))
            .collect();

        Ok(reps
            .into_iter()
            .map(|rep| {
                let share = match rep.role_id.and_then(|id| totals.get(&id)) {
                    Some(&total) if total > 0 => f64::from(rep.num) / f64::from(total),
                    _ => 0.0,
                };
                BreakdownRow {
                    role: rep.role_id.and_then(|id| catalog.role(id)).cloned(),
                    spec: rep.spec_id.and_then(|id| catalog.spec(id)).cloned(),
                    race: rep.race_id.and_then(|id| catalog.race(id)).cloned(),
                    share,
                    rep,
                }
            })
            .collect())
    }

    /// Chart, breakdown for the window's last day and the region label.
    pub async fn report(
        &self,
        ctx: &FilterContext,
        today: NaiveDate,
    ) -> Result<StatsReport, QueryError> {
        let window = SeriesWindow::for_context(ctx, today, self.max_days);
        let catalog = self.store.catalog().await?;

        let chart = self.chart_for(ctx, &catalog, window).await?;
        let breakdown = self.breakdown_for(ctx, &catalog, window.end).await?;

        info!(
            "Stats for bracket {} from {} to {}: {} days, {} breakdown rows",
            ctx.bracket.id,
            window.start,
            window.end,
            chart.labels.len(),
            breakdown.len()
        );

        Ok(StatsReport {
            region_label: ctx.region_label(),
            window,
            chart,
            breakdown,
        })
    }
}
