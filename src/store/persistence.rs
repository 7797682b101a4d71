//! Durable storage for the roster and match history
//!
//! Persistence is a side effect the league performs after a successful
//! mutation. A failed save is reported to the caller but never rolls back
//! the in-memory state.

use crate::error::Result;
use crate::types::{MatchRecord, Participant};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File holding the roster
pub const USERS_FILE: &str = "users.json";

/// File holding the match history
pub const MATCHES_FILE: &str = "matches.json";

/// Load/save of roster and history
#[cfg_attr(test, mockall::automock)]
pub trait Persistence: Send + Sync {
    fn load_participants(&self) -> Result<Vec<Participant>>;

    fn save_participants(&self, participants: &[Participant]) -> Result<()>;

    fn load_matches(&self) -> Result<Vec<MatchRecord>>;

    fn save_matches(&self, matches: &[MatchRecord]) -> Result<()>;
}

/// Pretty-printed JSON files in a data directory
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    data_dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(MATCHES_FILE)
    }

    fn load<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
        if !path.exists() {
            debug!("No {} file at {}, starting empty", what, path.display());
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {} from {}", what, path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {} from {}", what, path.display()))
    }

    /// Write through a temporary file so a crash never leaves a truncated file
    fn save<T: Serialize>(path: &Path, items: &[T], what: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(items)
            .with_context(|| format!("Failed to serialize {}", what))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {} to {}", what, tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Saved {} {} to {}", items.len(), what, path.display());
        Ok(())
    }
}

impl Persistence for JsonFilePersistence {
    fn load_participants(&self) -> Result<Vec<Participant>> {
        Self::load(&self.users_path(), "participants")
    }

    fn save_participants(&self, participants: &[Participant]) -> Result<()> {
        Self::save(&self.users_path(), participants, "participants")
    }

    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        Self::load(&self.matches_path(), "matches")
    }

    fn save_matches(&self, matches: &[MatchRecord]) -> Result<()> {
        Self::save(&self.matches_path(), matches, "matches")
    }
}
