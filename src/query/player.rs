//! Player detail loading and the player profile.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::{snapshot_rows, team_rows, FilterContext, QueryError, SnapshotRow, TeamRow};
use crate::models::{
    Catalog, Faction, Gender, Player, PlayerId, Race, Realm, Region, Role, Spec, Stat,
};
use crate::store::{Page, PageRequest, Scope, SnapshotOrder, SnapshotQuery, StatQuery, Store};

/// A player with every reference it points at resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: Player,
    pub realm: Option<Realm>,
    pub region: Option<Region>,
    pub role: Option<Role>,
    pub spec: Option<Spec>,
    pub race: Option<Race>,
    pub gender: Option<Gender>,
    pub faction: Option<Faction>,
}

impl PlayerDetail {
    pub fn resolve(player: Player, catalog: &Catalog) -> Self {
        let realm = catalog.realm(player.realm_id).cloned();
        let region = realm
            .as_ref()
            .and_then(|r| catalog.region(r.region_id))
            .cloned();

        Self {
            realm,
            region,
            role: player.role_id.and_then(|id| catalog.role(id)).cloned(),
            spec: player.spec_id.and_then(|id| catalog.spec(id)).cloned(),
            race: player.race_id.and_then(|id| catalog.race(id)).cloned(),
            gender: player.gender_id.and_then(|id| catalog.gender(id)).cloned(),
            faction: player.faction_id.and_then(|id| catalog.faction(id)).cloned(),
            player,
        }
    }
}

/// Load and resolve a batch of players in one store call.
pub async fn load_players(
    store: &dyn Store,
    catalog: &Catalog,
    ids: &[PlayerId],
) -> Result<HashMap<PlayerId, PlayerDetail>, QueryError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let players = store.players(ids).await?;
    Ok(players
        .into_iter()
        .map(|p| (p.id, PlayerDetail::resolve(p, catalog)))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player: PlayerDetail,

    /// Highest-rated standing in the bracket, region-scoped when one is
    /// selected.
    pub stat: Option<Stat>,

    /// Rating history, most recent leaderboard first.
    pub snapshots: Page<SnapshotRow>,

    pub teams: Vec<TeamRow>,
}

impl PlayerProfile {
    pub async fn load(
        store: &dyn Store,
        ctx: &FilterContext,
        id: PlayerId,
        page: Option<u32>,
        page_size: u32,
    ) -> Result<Self, QueryError> {
        let catalog = store.catalog().await?;
        let player = load_players(store, &catalog, &[id])
            .await?
            .remove(&id)
            .ok_or_else(|| QueryError::NotFound(format!("player {}", id)))?;

        let stat_query = StatQuery {
            bracket_id: Some(ctx.bracket.id),
            leaderboards: Scope::Any,
            player_id: Some(id),
            role_id: None,
            region: ctx.region_filter(),
        };
        let stat = store
            .select_stats(&stat_query, PageRequest::first())
            .await?
            .items
            .into_iter()
            .next();

        let snapshot_query = SnapshotQuery {
            bracket_id: ctx.bracket.id,
            region: ctx.region_filter(),
            term: ctx.term_filter(),
            leaderboard_id: None,
            player_id: Some(id),
            published_only: false,
            order: SnapshotOrder::CompletedDesc,
        };
        let joined = store
            .select_snapshots(&snapshot_query, PageRequest::standard(page, page_size))
            .await?;
        let snapshots = snapshot_rows(store, &catalog, joined).await?;

        let teams = store.player_teams(id, ctx.bracket.id).await?;
        let teams = team_rows(store, &catalog, ctx, teams).await?;

        debug!(
            "Profile for player {}: {} snapshots, {} teams",
            id,
            snapshots.items.len(),
            teams.len()
        );

        Ok(Self {
            player,
            stat,
            snapshots,
            teams,
        })
    }
}
