//! Common types used throughout the team balancer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier for participants
pub type ParticipantId = u64;

/// Point in time a match was formed or committed
pub type Timestamp = DateTime<Utc>;

/// A rated individual eligible for team assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredParticipant")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Current skill estimate, never negative
    pub rating: f64,
    /// Anchor the rating is reset to before a full history replay
    pub baseline_rating: f64,
    pub wins: u32,
    pub games: u32,
}

impl Participant {
    /// Create a participant whose rating and baseline start at `rating`
    pub fn new(id: ParticipantId, name: impl Into<String>, rating: f64) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            baseline_rating: rating,
            wins: 0,
            games: 0,
        }
    }

    /// Id-only stand-in for a member no longer present in the roster
    pub fn placeholder(id: ParticipantId) -> Self {
        Self::new(id, String::new(), 0.0)
    }

    pub fn win_rate(&self) -> f64 {
        if self.games > 0 {
            self.wins as f64 / self.games as f64
        } else {
            0.0
        }
    }

    /// Drop rating progress and counters back to the baseline
    pub fn reset_to_baseline(&mut self) {
        self.rating = self.baseline_rating;
        self.wins = 0;
        self.games = 0;
    }
}

/// On-disk participant shape; older files carry no baseline or counters
#[derive(Deserialize)]
struct StoredParticipant {
    id: ParticipantId,
    #[serde(default)]
    name: String,
    rating: f64,
    #[serde(default)]
    baseline_rating: Option<f64>,
    #[serde(default)]
    wins: u32,
    #[serde(default)]
    games: u32,
}

impl From<StoredParticipant> for Participant {
    fn from(stored: StoredParticipant) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            rating: stored.rating,
            baseline_rating: stored.baseline_rating.unwrap_or(stored.rating),
            wins: stored.wins,
            games: stored.games,
        }
    }
}

/// A group of participants assigned together for one match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub members: Vec<Participant>,
}

impl Team {
    pub fn new(members: Vec<Participant>) -> Self {
        Self { members }
    }

    pub fn add_member(&mut self, participant: Participant) {
        self.members.push(participant);
    }

    /// Sum of member ratings
    pub fn total_rating(&self) -> f64 {
        self.members.iter().map(|m| m.rating).sum()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.members.iter().map(|m| m.id)
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }
}

/// Max minus min of the team totals
pub fn spread(teams: &[Team]) -> f64 {
    let totals: Vec<f64> = teams.iter().map(Team::total_rating).collect();
    crate::utils::spread_of(&totals)
}

/// One match in the history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredMatch", into = "StoredMatch")]
pub struct MatchRecord {
    pub timestamp: Timestamp,
    /// Membership snapshot; only the ids are authoritative
    pub teams: Vec<Team>,
    /// Indices into `teams`; empty while the match is undecided
    pub winning_teams: BTreeSet<usize>,
}

impl MatchRecord {
    /// Create an undecided match
    pub fn new(teams: Vec<Team>, timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            teams,
            winning_teams: BTreeSet::new(),
        }
    }

    pub fn is_winner(&self, team_index: usize) -> bool {
        self.winning_teams.contains(&team_index)
    }

    pub fn is_decided(&self) -> bool {
        !self.winning_teams.is_empty()
    }

    /// Index of the team `id` played on, if any
    pub fn team_of(&self, id: ParticipantId) -> Option<usize> {
        self.teams.iter().position(|team| team.contains(id))
    }
}

#[derive(Serialize, Deserialize)]
struct StoredMember {
    id: ParticipantId,
}

#[derive(Serialize, Deserialize)]
struct StoredTeam {
    #[serde(default)]
    members: Vec<StoredMember>,
}

#[derive(Serialize, Deserialize)]
struct StoredMatch {
    #[serde(with = "chrono::serde::ts_seconds")]
    timestamp: Timestamp,
    teams: Vec<StoredTeam>,
    #[serde(default)]
    winning_teams: Vec<usize>,
}

impl From<StoredMatch> for MatchRecord {
    fn from(stored: StoredMatch) -> Self {
        Self {
            timestamp: stored.timestamp,
            teams: stored
                .teams
                .into_iter()
                .map(|team| {
                    Team::new(
                        team.members
                            .into_iter()
                            .map(|m| Participant::placeholder(m.id))
                            .collect(),
                    )
                })
                .collect(),
            winning_teams: stored.winning_teams.into_iter().collect(),
        }
    }
}

impl From<MatchRecord> for StoredMatch {
    fn from(record: MatchRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            teams: record
                .teams
                .iter()
                .map(|team| StoredTeam {
                    members: team.member_ids().map(|id| StoredMember { id }).collect(),
                })
                .collect(),
            winning_teams: record.winning_teams.into_iter().collect(),
        }
    }
}

/// Rating change applied to one participant by one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub participant_id: ParticipantId,
    pub old_rating: f64,
    pub new_rating: f64,
    pub won: bool,
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

/// Everything one applied match did to the roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Net pairwise Elo delta per team, summing to zero
    pub team_deltas: Vec<f64>,
    pub changes: Vec<RatingChange>,
}

/// Sort order for roster listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticipantOrder {
    /// Highest rating first
    #[default]
    ByRating,
    /// Alphabetical by name
    ByName,
}
