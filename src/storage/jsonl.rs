//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one record.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::StorageError;

/// Ladder tables exported as JSONL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Bracket,
    Region,
    Season,
    Term,
    Role,
    Spec,
    Race,
    Realm,
    Gender,
    Faction,
    Leaderboard,
    Group,
    Snapshot,
    Stat,
    Player,
    Comp,
    Team,
    Performance,
    Rep,
}

impl EntityType {
    pub const ALL: [EntityType; 19] = [
        EntityType::Bracket,
        EntityType::Region,
        EntityType::Season,
        EntityType::Term,
        EntityType::Role,
        EntityType::Spec,
        EntityType::Race,
        EntityType::Realm,
        EntityType::Gender,
        EntityType::Faction,
        EntityType::Leaderboard,
        EntityType::Group,
        EntityType::Snapshot,
        EntityType::Stat,
        EntityType::Player,
        EntityType::Comp,
        EntityType::Team,
        EntityType::Performance,
        EntityType::Rep,
    ];

    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Bracket => "brackets.jsonl",
            EntityType::Region => "regions.jsonl",
            EntityType::Season => "seasons.jsonl",
            EntityType::Term => "terms.jsonl",
            EntityType::Role => "roles.jsonl",
            EntityType::Spec => "specs.jsonl",
            EntityType::Race => "races.jsonl",
            EntityType::Realm => "realms.jsonl",
            EntityType::Gender => "genders.jsonl",
            EntityType::Faction => "factions.jsonl",
            EntityType::Leaderboard => "leaderboards.jsonl",
            EntityType::Group => "groups.jsonl",
            EntityType::Snapshot => "snapshots.jsonl",
            EntityType::Stat => "stats.jsonl",
            EntityType::Player => "players.jsonl",
            EntityType::Comp => "comps.jsonl",
            EntityType::Team => "teams.jsonl",
            EntityType::Performance => "performances.jsonl",
            EntityType::Rep => "reps.jsonl",
        }
    }
}

/// JSONL file writer, for building ladder directories in tests.
#[cfg(test)]
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

#[cfg(test)]
impl<T: serde::Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write records, replacing the entire file.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StorageError> {
        use std::io::Write;

        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = std::io::BufWriter::new(file);
        let mut count = 0;

        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        debug!("Wrote {} records to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all records from the file. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        let mut line_num = 0;

        for line in reader.lines() {
            line_num += 1;
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        line_num, self.path, e
                    );
                }
            }
        }

        info!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Read a file that must be present.
    pub fn read_required(&self) -> Result<Vec<T>, StorageError> {
        if !self.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }
        self.read_all()
    }
}
