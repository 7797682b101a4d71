//! Team Balancer - skill-balanced team formation and rating tracking
//!
//! This crate splits a selection of participants into teams whose rating
//! totals are as close as possible, records the matches they play, and
//! keeps every participant's rating current with a pairwise Elo update that
//! can be replayed from scratch whenever history changes.

pub mod config;
pub mod error;
pub mod partition;
pub mod rating;
pub mod service;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LeagueError, PartitionError, RatingError, Result, StoreError};
pub use types::*;

// Re-export key components
pub use partition::TeamPartitioner;
pub use rating::RatingEngine;
pub use service::{League, SharedLeague};
pub use store::{InMemoryHistory, InMemoryRoster, JsonFilePersistence, MatchHistory, RosterStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
