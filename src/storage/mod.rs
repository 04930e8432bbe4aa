//! Filesystem data operations.
//!
//! The ingestion pipeline exports every ladder table as a JSONL file under
//! `<data_dir>/ladder/`. This module reads (and, for fixtures, writes) them.

mod dataset;
mod jsonl;

pub use dataset::*;
pub use jsonl::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Directory holding one JSONL file per ladder table.
    pub fn ladder_dir(&self) -> PathBuf {
        self.data_dir.join("ladder")
    }

    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.ladder_dir().join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
