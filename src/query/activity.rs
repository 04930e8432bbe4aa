//! Rating activity feed.

use serde::Serialize;
use tracing::debug;

use super::{load_players, FilterContext, LeaderboardResolver, PlayerDetail, QueryError};
use crate::models::{Catalog, Group, Leaderboard, LeaderboardId, PlayerId, Role, Snapshot, Spec};
use crate::store::{JoinedSnapshot, Page, PageRequest, SnapshotOrder, SnapshotQuery, Store};

/// A snapshot with its group, leaderboard, spec, role and player loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub group: Group,
    pub leaderboard: Leaderboard,
    pub spec: Option<Spec>,
    pub role: Option<Role>,
    pub player: Option<PlayerDetail>,
}

/// Attach spec, role and player to a page of joined snapshots.
pub async fn snapshot_rows(
    store: &dyn Store,
    catalog: &Catalog,
    page: Page<JoinedSnapshot>,
) -> Result<Page<SnapshotRow>, QueryError> {
    let mut player_ids: Vec<PlayerId> = page.items.iter().map(|j| j.snapshot.player_id).collect();
    player_ids.sort();
    player_ids.dedup();
    let players = load_players(store, catalog, &player_ids).await?;

    Ok(page.map(|joined| {
        let spec = joined.snapshot.spec_id.and_then(|id| catalog.spec(id)).cloned();
        let role = spec
            .as_ref()
            .and_then(|s| catalog.role(s.role_id))
            .cloned();
        // A player can appear on several rows of one page
        let player = players.get(&joined.snapshot.player_id).cloned();

        SnapshotRow {
            snapshot: joined.snapshot,
            group: joined.group,
            leaderboard: joined.leaderboard,
            spec,
            role,
            player,
        }
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityFeed {
    /// Set when the feed is restricted to one leaderboard.
    pub leaderboard: Option<Leaderboard>,
    pub rows: Page<SnapshotRow>,
}

impl ActivityFeed {
    /// Snapshots from published leaderboards of the context's bracket.
    ///
    /// With a leaderboard the feed is that leaderboard only, highest rating
    /// first, and the leaderboard must satisfy the context. Without one the
    /// most recently completed leaderboards come first.
    pub async fn load(
        store: &dyn Store,
        ctx: &FilterContext,
        leaderboard_id: Option<LeaderboardId>,
        page: Option<u32>,
        page_size: u32,
    ) -> Result<Self, QueryError> {
        let leaderboard = match leaderboard_id {
            Some(id) => Some(LeaderboardResolver::new(store).resolve_specific(id, ctx).await?),
            None => None,
        };

        let query = SnapshotQuery {
            bracket_id: ctx.bracket.id,
            region: ctx.region_filter(),
            term: ctx.term_filter(),
            leaderboard_id: leaderboard.as_ref().map(|l| l.id),
            player_id: None,
            published_only: true,
            order: if leaderboard.is_some() {
                SnapshotOrder::RatingDesc
            } else {
                SnapshotOrder::CompletedDesc
            },
        };

        let joined = store
            .select_snapshots(&query, PageRequest::simple(page, page_size))
            .await?;
        debug!(
            "Activity page {}: {} rows, more={}",
            joined.current_page,
            joined.items.len(),
            joined.has_more
        );

        let catalog = store.catalog().await?;
        let rows = snapshot_rows(store, &catalog, joined).await?;
        Ok(Self { leaderboard, rows })
    }
}
