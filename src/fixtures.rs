//! Shared test fixtures: a small ladder with two brackets, two regions and
//! two seasons.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::*;
use crate::query::FilterContext;
use crate::storage::LadderData;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn catalog() -> Catalog {
    let role = |id: u32, name: &str| Role {
        id: RoleId(id),
        name: name.to_string(),
    };
    let spec = |id: u32, role: u32, name: &str| Spec {
        id: SpecId(id),
        role_id: RoleId(role),
        name: name.to_string(),
    };

    Catalog {
        brackets: vec![
            Bracket {
                id: BracketId(1),
                name: "2v2".to_string(),
                size: 2,
            },
            Bracket {
                id: BracketId(2),
                name: "3v3".to_string(),
                size: 3,
            },
        ],
        regions: vec![
            Region {
                id: RegionId(1),
                name: "US".to_string(),
            },
            Region {
                id: RegionId(2),
                name: "EU".to_string(),
            },
        ],
        seasons: vec![
            Season {
                id: SeasonId(1),
                name: "Season 1".to_string(),
                start_date: Some(date(2024, 1, 1)),
                end_date: Some(date(2024, 6, 30)),
            },
            Season {
                id: SeasonId(2),
                name: "Season 2".to_string(),
                start_date: Some(date(2024, 7, 1)),
                end_date: None,
            },
        ],
        terms: vec![
            Term {
                id: TermId(1),
                season_id: SeasonId(2),
                name: "Opening".to_string(),
                start_date: Some(date(2024, 7, 1)),
                end_date: Some(date(2024, 8, 31)),
            },
            Term {
                id: TermId(2),
                season_id: SeasonId(1),
                name: "March Cup".to_string(),
                start_date: Some(date(2024, 3, 1)),
                end_date: Some(date(2024, 3, 31)),
            },
        ],
        roles: vec![
            role(1, "Warrior"),
            role(2, "Priest"),
            role(3, "Mage"),
            role(4, "Monk"),
        ],
        specs: vec![
            spec(1, 1, "Arms"),
            spec(2, 1, "Fury"),
            spec(3, 2, "Holy"),
            spec(4, 2, "Shadow"),
            spec(5, 3, "Frost"),
            spec(6, 3, "Fire"),
        ],
        races: vec![
            Race {
                id: RaceId(1),
                name: "Human".to_string(),
            },
            Race {
                id: RaceId(2),
                name: "Orc".to_string(),
            },
        ],
        realms: vec![
            Realm {
                id: RealmId(1),
                region_id: RegionId(1),
                name: "Stormrage".to_string(),
            },
            Realm {
                id: RealmId(2),
                region_id: RegionId(2),
                name: "Draenor".to_string(),
            },
        ],
        genders: vec![Gender {
            id: GenderId(1),
            name: "Female".to_string(),
        }],
        factions: vec![Faction {
            id: FactionId(1),
            name: "Horde".to_string(),
        }],
    }
}

/// The reference tables with every other table empty.
pub fn ladder() -> LadderData {
    LadderData {
        catalog: catalog(),
        ..Default::default()
    }
}

/// 3v3, season 1, no region, no term.
pub fn context() -> FilterContext {
    let catalog = catalog();
    FilterContext {
        bracket: catalog.brackets[1].clone(),
        region: None,
        season: catalog.seasons[0].clone(),
        term: None,
        regions: catalog.regions.clone(),
    }
}

pub fn comp(id: u32, specs: [Option<u32>; 3]) -> Comp {
    Comp {
        id: CompId(id),
        bracket_id: BracketId(2),
        spec_id1: specs[0].map(SpecId),
        spec_id2: specs[1].map(SpecId),
        spec_id3: specs[2].map(SpecId),
    }
}

/// Comp-level row for 3v3 season 1, all regions, whole season.
pub fn performance(id: u32, comp: u32, wins: u32, losses: u32) -> Performance {
    Performance {
        id: PerformanceId(id),
        bracket_id: BracketId(2),
        season_id: SeasonId(1),
        region_id: None,
        term_id: None,
        comp_id: Some(CompId(comp)),
        team_id: None,
        wins,
        losses,
        num_teams: 1,
    }
}

pub fn team_performance(id: u32, comp: u32, team: u32, wins: u32, losses: u32) -> Performance {
    Performance {
        team_id: Some(TeamId(team)),
        ..performance(id, comp, wins, losses)
    }
}

pub fn team(id: u32, comp: u32, players: &[u32]) -> Team {
    Team {
        id: TeamId(id),
        bracket_id: BracketId(2),
        comp_id: Some(CompId(comp)),
        player_ids: players.iter().copied().map(PlayerId).collect(),
    }
}

/// 3v3 season 1 leaderboard without a term.
pub fn leaderboard(
    id: u32,
    region: u32,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> Leaderboard {
    Leaderboard {
        id: LeaderboardId(id),
        bracket_id: BracketId(2),
        season_id: SeasonId(1),
        region_id: RegionId(region),
        term_id: None,
        created_at,
        completed_at,
    }
}

pub fn group(id: u32, leaderboard: u32) -> Group {
    Group {
        id: GroupId(id),
        leaderboard_id: LeaderboardId(leaderboard),
        wins: 1,
        losses: 0,
    }
}

pub fn snapshot(id: u32, group: u32, player: u32, rating: u32) -> Snapshot {
    Snapshot {
        id: SnapshotId(id),
        group_id: GroupId(group),
        player_id: PlayerId(player),
        spec_id: Some(SpecId(1)),
        rating,
        ranking: id,
    }
}

pub fn player(id: u32, role: Option<u32>) -> Player {
    Player {
        id: PlayerId(id),
        name: format!("player-{}", id),
        realm_id: RealmId(1),
        faction_id: Some(FactionId(1)),
        race_id: Some(RaceId(2)),
        role_id: role.map(RoleId),
        spec_id: None,
        gender_id: Some(GenderId(1)),
    }
}

pub fn stat(id: u32, leaderboard: u32, player: u32, rating: u32) -> Stat {
    Stat {
        id: StatId(id),
        leaderboard_id: LeaderboardId(leaderboard),
        bracket_id: BracketId(2),
        player_id: PlayerId(player),
        ranking: id,
        rating,
        season_wins: 10,
        season_losses: 5,
    }
}

/// 3v3 rep without a region.
pub fn rep(
    id: u32,
    for_date: NaiveDate,
    role: Option<u32>,
    spec: Option<u32>,
    race: Option<u32>,
    num: u32,
) -> Rep {
    Rep {
        id: RepId(id),
        for_date,
        bracket_id: BracketId(2),
        region_id: None,
        role_id: role.map(RoleId),
        spec_id: spec.map(SpecId),
        race_id: race.map(RaceId),
        num,
    }
}
