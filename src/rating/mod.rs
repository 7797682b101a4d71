//! Rating engine using pairwise Elo between teams
//!
//! This module turns a match outcome into rating changes: team strengths
//! play virtual Elo games pairwise, and each team's net delta is spread over
//! its members with rating-dependent weights.

pub mod distribution;
pub mod elo;
pub mod engine;

// Re-export commonly used types
pub use elo::{expected_score, team_deltas};
pub use engine::RatingEngine;
