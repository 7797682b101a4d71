//! Service layer for the team balancer
//!
//! The league coordinates the stores, the partitioner and the rating engine;
//! the shared handle serializes access to it across threads.

pub mod league;
pub mod shared;

pub use league::{League, LeagueStats};
pub use shared::SharedLeague;
