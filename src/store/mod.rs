//! Roster and match history stores
//!
//! The stores are the collaborators the rating engine and the league service
//! mutate. In-memory implementations back the service; the persistence
//! adapter moves their contents to and from durable storage.

pub mod history;
pub mod persistence;
pub mod roster;

// Re-export commonly used types
pub use history::{chronological_order, InMemoryHistory, MatchHistory};
pub use persistence::{JsonFilePersistence, Persistence};
pub use roster::{InMemoryRoster, RosterStore};
