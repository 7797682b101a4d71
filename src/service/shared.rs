//! Thread-safe handle to a league
//!
//! All mutations go through a single write lock, so concurrent callers see
//! each edit and its recompute as one step.

use crate::error::{LeagueError, StoreError};
use crate::service::league::League;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle sharing one league between threads
#[derive(Debug, Clone)]
pub struct SharedLeague {
    inner: Arc<RwLock<League>>,
}

impl SharedLeague {
    pub fn new(league: League) -> Self {
        Self {
            inner: Arc::new(RwLock::new(league)),
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, League>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::LockPoisoned { what: "league read" })
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, League>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::LockPoisoned { what: "league write" })
    }

    /// Run a read-only query under the read lock
    pub fn with_read<T>(&self, f: impl FnOnce(&League) -> T) -> Result<T, LeagueError> {
        let league = self.read()?;
        Ok(f(&league))
    }

    /// Run a mutation under the write lock and save on success
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut League) -> Result<T, LeagueError>,
    ) -> Result<T, LeagueError> {
        let mut league = self.write()?;
        let value = f(&mut league)?;
        league.save()?;
        Ok(value)
    }
}
