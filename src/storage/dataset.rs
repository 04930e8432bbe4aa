//! The full set of ladder tables, loaded from JSONL.

use serde::de::DeserializeOwned;
use tracing::info;

use super::{EntityType, JsonlReader, StorageConfig, StorageError};
use crate::models::{
    Bracket, Catalog, Comp, Faction, Gender, Group, Leaderboard, Performance, Player, Race, Realm,
    Region, Rep, Role, Season, Snapshot, Spec, Stat, Team, Term,
};

/// Every ladder table as exported by ingestion.
#[derive(Debug, Clone, Default)]
pub struct LadderData {
    pub catalog: Catalog,
    pub leaderboards: Vec<Leaderboard>,
    pub groups: Vec<Group>,
    pub snapshots: Vec<Snapshot>,
    pub stats: Vec<Stat>,
    pub players: Vec<Player>,
    pub comps: Vec<Comp>,
    pub teams: Vec<Team>,
    pub performances: Vec<Performance>,
    pub reps: Vec<Rep>,
}

fn read<T: DeserializeOwned>(
    config: &StorageConfig,
    entity: EntityType,
) -> Result<Vec<T>, StorageError> {
    JsonlReader::new(config.entity_path(entity)).read_all()
}

#[cfg(test)]
fn write<T: serde::Serialize>(
    config: &StorageConfig,
    entity: EntityType,
    records: &[T],
) -> Result<usize, StorageError> {
    super::JsonlWriter::new(config.entity_path(entity)).write_all(records)
}

impl LadderData {
    /// Load every table. Brackets and seasons must exist; any other missing
    /// table loads empty.
    pub fn load(config: &StorageConfig) -> Result<Self, StorageError> {
        let brackets: Vec<Bracket> =
            JsonlReader::new(config.entity_path(EntityType::Bracket)).read_required()?;
        let seasons: Vec<Season> =
            JsonlReader::new(config.entity_path(EntityType::Season)).read_required()?;

        let catalog = Catalog {
            brackets,
            seasons,
            regions: read::<Region>(config, EntityType::Region)?,
            terms: read::<Term>(config, EntityType::Term)?,
            roles: read::<Role>(config, EntityType::Role)?,
            specs: read::<Spec>(config, EntityType::Spec)?,
            races: read::<Race>(config, EntityType::Race)?,
            realms: read::<Realm>(config, EntityType::Realm)?,
            genders: read::<Gender>(config, EntityType::Gender)?,
            factions: read::<Faction>(config, EntityType::Faction)?,
        }
        .normalized();

        let data = Self {
            catalog,
            leaderboards: read(config, EntityType::Leaderboard)?,
            groups: read(config, EntityType::Group)?,
            snapshots: read(config, EntityType::Snapshot)?,
            stats: read(config, EntityType::Stat)?,
            players: read(config, EntityType::Player)?,
            comps: read(config, EntityType::Comp)?,
            teams: read(config, EntityType::Team)?,
            performances: read(config, EntityType::Performance)?,
            reps: read(config, EntityType::Rep)?,
        };

        info!(
            "Loaded ladder data from {:?}: {} leaderboards, {} performances, {} reps",
            config.ladder_dir(),
            data.leaderboards.len(),
            data.performances.len(),
            data.reps.len()
        );

        Ok(data)
    }

    /// Write every table, replacing existing files.
    #[cfg(test)]
    pub fn write(&self, config: &StorageConfig) -> Result<usize, StorageError> {
        let c = &self.catalog;
        let mut total = 0;
        total += write(config, EntityType::Bracket, &c.brackets)?;
        total += write(config, EntityType::Region, &c.regions)?;
        total += write(config, EntityType::Season, &c.seasons)?;
        total += write(config, EntityType::Term, &c.terms)?;
        total += write(config, EntityType::Role, &c.roles)?;
        total += write(config, EntityType::Spec, &c.specs)?;
        total += write(config, EntityType::Race, &c.races)?;
        total += write(config, EntityType::Realm, &c.realms)?;
        total += write(config, EntityType::Gender, &c.genders)?;
        total += write(config, EntityType::Faction, &c.factions)?;
        total += write(config, EntityType::Leaderboard, &self.leaderboards)?;
        total += write(config, EntityType::Group, &self.groups)?;
        total += write(config, EntityType::Snapshot, &self.snapshots)?;
        total += write(config, EntityType::Stat, &self.stats)?;
        total += write(config, EntityType::Player, &self.players)?;
        total += write(config, EntityType::Comp, &self.comps)?;
        total += write(config, EntityType::Team, &self.teams)?;
        total += write(config, EntityType::Performance, &self.performances)?;
        total += write(config, EntityType::Rep, &self.reps)?;
        Ok(total)
    }

    /// Record count per table, in `EntityType::ALL` order.
    pub fn counts(&self) -> Vec<(EntityType, usize)> {
        let c = &self.catalog;
        EntityType::ALL
            .iter()
            .map(|&entity| {
                let n = match entity {
                    EntityType::Bracket => c.brackets.len(),
                    EntityType::Region => c.regions.len(),
                    EntityType::Season => c.seasons.len(),
                    EntityType::Term => c.terms.len(),
                    EntityType::Role => c.roles.len(),
                    EntityType::Spec => c.specs.len(),
                    EntityType::Race => c.races.len(),
                    EntityType::Realm => c.realms.len(),
                    EntityType::Gender => c.genders.len(),
                    EntityType::Faction => c.factions.len(),
                    EntityType::Leaderboard => self.leaderboards.len(),
                    EntityType::Group => self.groups.len(),
                    EntityType::Snapshot => self.snapshots.len(),
                    EntityType::Stat => self.stats.len(),
                    EntityType::Player => self.players.len(),
                    EntityType::Comp => self.comps.len(),
                    EntityType::Team => self.teams.len(),
                    EntityType::Performance => self.performances.len(),
                    EntityType::Rep => self.reps.len(),
                };
                (entity, n)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BracketId, RoleId, SeasonId};
    use tempfile::TempDir;

    fn minimal() -> LadderData {
        LadderData {
            catalog: Catalog {
                brackets: vec![Bracket {
                    id: BracketId(1),
                    name: "2v2".to_string(),
                    size: 2,
                }],
                seasons: vec![Season {
                    id: SeasonId(1),
                    name: "Season 1".to_string(),
                    start_date: None,
                    end_date: None,
                }],
                roles: vec![
                    Role {
                        id: RoleId(2),
                        name: "Priest".to_string(),
                    },
                    Role {
                        id: RoleId(1),
                        name: "Warrior".to_string(),
                    },
                ],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_write_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        let written = minimal().write(&config).unwrap();
        assert_eq!(written, 4);

        let loaded = LadderData::load(&config).unwrap();
        assert_eq!(loaded.catalog.brackets.len(), 1);
        // Load sorts reference tables by id
        assert_eq!(loaded.catalog.roles[0].id, RoleId(1));
        assert!(loaded.performances.is_empty());
    }

    #[test]
    fn test_load_requires_brackets() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        let err = LadderData::load(&config).unwrap_err();
        assert!(matches!(err, StorageError::PathNotFound(_)));
    }

    #[test]
    fn test_counts_cover_every_table() {
        let counts = minimal().counts();
        assert_eq!(counts.len(), EntityType::ALL.len());
        assert!(counts.contains(&(EntityType::Role, 2)));
        assert!(counts.contains(&(EntityType::Rep, 0)));
    }
}
