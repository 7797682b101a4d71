//! Error types for the team balancer
//!
//! The core components (partitioner and rating engine) return typed errors so
//! callers can map each failure to a user-facing message. Configuration,
//! persistence and the binaries use anyhow for plumbing.

use crate::types::ParticipantId;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Failures of the team partitioner
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PartitionError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Cannot form teams from an empty roster")]
    EmptyRoster,

    #[error("Not enough participants: {participants} for {team_count} teams")]
    InsufficientParticipants {
        participants: usize,
        team_count: usize,
    },
}

/// Failures of the rating engine
///
/// Any of these leaves the roster exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("A match needs at least one team")]
    EmptyTeams,

    #[error("Invalid winner index {index} for a match with {team_count} teams")]
    InvalidWinnerIndex { index: usize, team_count: usize },

    #[error("Participant {id} appears in more than one team slot")]
    DuplicateMember { id: ParticipantId },

    #[error("Numerical instability: {reason}")]
    NumericInstability { reason: String },
}

/// Failures of the roster and history stores
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Participant not found: {id}")]
    ParticipantNotFound { id: ParticipantId },

    #[error("Match index {index} out of range (history holds {len} matches)")]
    MatchNotFound { index: usize, len: usize },

    #[error("Rating must be a finite value >= 0, got {rating}")]
    InvalidRating { rating: f64 },

    #[error("Invalid winning team index {index} for a match with {team_count} teams")]
    InvalidWinnerIndex { index: usize, team_count: usize },

    #[error("Participant {id} appears more than once in the match")]
    DuplicateMember { id: ParticipantId },

    #[error("Team {index} has no members")]
    EmptyTeam { index: usize },

    #[error("Stored participant {id} is corrupt: {reason}")]
    CorruptParticipant { id: ParticipantId, reason: String },

    #[error("Stored match {index} is corrupt: {reason}")]
    CorruptMatch { index: usize, reason: String },

    #[error("Failed to acquire {what} lock")]
    LockPoisoned { what: &'static str },
}

/// Errors surfaced by the league service
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Selected {selected} participants, at most {limit} are allowed")]
    SelectionTooLarge { selected: usize, limit: usize },

    #[error("Match {index} is older than the {editable} most recent matches and can no longer be edited")]
    MatchNotEditable { index: usize, editable: usize },

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PartitionError::InsufficientParticipants {
            participants: 1,
            team_count: 2,
        };
        assert_eq!(err.to_string(), "Not enough participants: 1 for 2 teams");

        let err = RatingError::InvalidWinnerIndex {
            index: 3,
            team_count: 2,
        };
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_league_error_wraps_core_errors() {
        let err: LeagueError = RatingError::EmptyTeams.into();
        assert!(matches!(err, LeagueError::Rating(RatingError::EmptyTeams)));

        let err: LeagueError = StoreError::ParticipantNotFound { id: 7 }.into();
        assert_eq!(err.to_string(), "Participant not found: 7");
    }
}
