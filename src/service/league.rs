//! League service
//!
//! The league owns one roster and one match history, and coordinates the
//! partitioner, the rating engine and the persistence adapter on their
//! behalf. Every mutation that touches history is followed by a full
//! recompute; if the recompute fails the history edit is rolled back.

use crate::config::{AppConfig, HistorySettings};
use crate::error::{LeagueError, RatingError, StoreError};
use crate::partition::TeamPartitioner;
use crate::rating::RatingEngine;
use crate::store::{
    InMemoryHistory, InMemoryRoster, JsonFilePersistence, MatchHistory, Persistence, RosterStore,
};
use crate::types::{MatchRecord, Participant, ParticipantId, ParticipantOrder, Team, Timestamp};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Summary counts for status displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeagueStats {
    pub participants: usize,
    pub matches: usize,
    pub undecided_matches: usize,
}

/// One roster, one history, and the components that act on them
pub struct League {
    roster: InMemoryRoster,
    history: InMemoryHistory,
    persistence: Arc<dyn Persistence>,
    partitioner: TeamPartitioner,
    engine: RatingEngine,
    history_settings: HistorySettings,
}

impl League {
    /// Create an empty league
    pub fn new(config: &AppConfig, persistence: Arc<dyn Persistence>) -> Self {
        Self {
            roster: InMemoryRoster::new(),
            history: InMemoryHistory::new(),
            persistence,
            partitioner: TeamPartitioner::new(config.partition.clone()),
            engine: RatingEngine::new(config.rating.clone()),
            history_settings: config.history.clone(),
        }
    }

    /// Create an empty league persisting to JSON files in the configured data directory
    pub fn with_json_storage(config: &AppConfig) -> Self {
        let persistence = Arc::new(JsonFilePersistence::new(&config.service.data_dir));
        Self::new(config, persistence)
    }

    /// Replace in-memory state with what the persistence adapter holds
    ///
    /// Both collections are checked before anything is replaced, so a corrupt
    /// file leaves the current state untouched.
    pub fn load(&mut self) -> Result<(), LeagueError> {
        let participants = self.persistence.load_participants()?;
        let matches = self.persistence.load_matches()?;
        check_loaded_participants(&participants)?;
        check_loaded_matches(&matches)?;

        info!(
            "Loaded {} participants and {} matches",
            participants.len(),
            matches.len()
        );
        self.roster = participants.into_iter().collect();
        self.history = InMemoryHistory::from(matches);
        Ok(())
    }

    /// Write roster and history to durable storage
    pub fn save(&self) -> Result<(), LeagueError> {
        let result = self
            .persistence
            .save_participants(&self.roster.iterate())
            .and_then(|_| self.persistence.save_matches(self.history.records()));

        if let Err(e) = &result {
            warn!("Failed to save league state: {:#}", e);
        }
        Ok(result?)
    }

    pub fn roster(&self) -> &InMemoryRoster {
        &self.roster
    }

    pub fn history(&self) -> &InMemoryHistory {
        &self.history
    }

    pub fn partitioner(&self) -> &TeamPartitioner {
        &self.partitioner
    }

    pub fn engine(&self) -> &RatingEngine {
        &self.engine
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.roster.get(id)
    }

    /// Add a participant or overwrite the rating of an existing one
    ///
    /// The rating also becomes the baseline used by future recomputes.
    /// Win and game counters are kept.
    pub fn upsert_participant(
        &mut self,
        id: ParticipantId,
        name: impl Into<String>,
        rating: f64,
    ) -> Result<Participant, LeagueError> {
        if !rating.is_finite() || rating < 0.0 {
            return Err(StoreError::InvalidRating { rating }.into());
        }

        let mut participant = self
            .roster
            .find(id)
            .unwrap_or_else(|| Participant::new(id, "", rating));
        participant.name = name.into();
        participant.rating = rating;
        participant.baseline_rating = rating;

        info!("Upserted participant {} ({}) at {}", id, participant.name, rating);
        self.roster.upsert(participant.clone());
        Ok(participant)
    }

    /// Remove a participant; their past matches stay in the history
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant, LeagueError> {
        let removed = self
            .roster
            .remove(id)
            .ok_or(StoreError::ParticipantNotFound { id })?;
        info!("Removed participant {} ({})", id, removed.name);
        Ok(removed)
    }

    pub fn list_participants(&self, order: ParticipantOrder) -> Vec<Participant> {
        let mut participants = self.roster.iterate();
        match order {
            ParticipantOrder::ByRating => {
                participants.sort_by(|a, b| b.rating.total_cmp(&a.rating))
            }
            ParticipantOrder::ByName => participants.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        participants
    }

    /// Split the selected participants into balanced teams
    pub fn form_teams(
        &self,
        ids: &[ParticipantId],
        team_count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<Team>, LeagueError> {
        let limit = self.partitioner.config().max_participants;
        if ids.len() > limit {
            return Err(LeagueError::SelectionTooLarge {
                selected: ids.len(),
                limit,
            });
        }

        let mut seen = HashSet::new();
        let mut participants = Vec::with_capacity(ids.len());
        for &id in ids {
            if !seen.insert(id) {
                return Err(StoreError::DuplicateMember { id }.into());
            }
            let participant = self
                .roster
                .find(id)
                .ok_or(StoreError::ParticipantNotFound { id })?;
            participants.push(participant);
        }

        let teams = self.partitioner.partition(&participants, team_count, seed)?;
        debug!(
            "Formed {} teams from {} participants",
            teams.len(),
            participants.len()
        );
        Ok(teams)
    }

    /// Record formed teams as an undecided match, returning its index
    pub fn commit_match(&mut self, teams: Vec<Team>, when: Timestamp) -> Result<usize, LeagueError> {
        if teams.is_empty() {
            return Err(RatingError::EmptyTeams.into());
        }

        let mut seen = HashSet::new();
        for (index, team) in teams.iter().enumerate() {
            if team.is_empty() {
                return Err(StoreError::EmptyTeam { index }.into());
            }
            for id in team.member_ids() {
                if !seen.insert(id) {
                    return Err(StoreError::DuplicateMember { id }.into());
                }
            }
        }

        let index = self.history.append(MatchRecord::new(teams, when));
        info!("Committed match {} with {} participants", index, seen.len());
        Ok(index)
    }

    /// Set the winning teams of a match and recompute every rating
    pub fn set_match_winner(
        &mut self,
        index: usize,
        winners: BTreeSet<usize>,
    ) -> Result<(), LeagueError> {
        self.check_editable(index)?;
        let previous = self.history.set_winner(index, winners.clone())?;

        if let Err(e) = self.recompute() {
            warn!("Rolling back winner change on match {}: {}", index, e);
            self.history.set_winner(index, previous)?;
            return Err(e);
        }

        info!("Match {} winners set to {:?}", index, winners);
        Ok(())
    }

    /// Delete a match and recompute every rating
    pub fn delete_match(&mut self, index: usize) -> Result<MatchRecord, LeagueError> {
        self.check_editable(index)?;
        let removed = self.history.delete(index)?;

        if let Err(e) = self.recompute() {
            warn!("Rolling back deletion of match {}: {}", index, e);
            self.history.insert(index, removed)?;
            return Err(e);
        }

        info!("Deleted match {}", index);
        Ok(removed)
    }

    /// Replay the whole history from every participant's baseline
    pub fn recompute(&mut self) -> Result<usize, LeagueError> {
        Ok(self
            .engine
            .recompute_all_from_history(&mut self.roster, self.history.records())?)
    }

    /// The last `count` matches, newest first, with their indices
    pub fn recent_matches(&self, count: usize) -> Vec<(usize, MatchRecord)> {
        self.history
            .records()
            .iter()
            .enumerate()
            .rev()
            .take(count)
            .map(|(index, record)| (index, self.hydrate(record)))
            .collect()
    }

    /// The default-sized window of recent matches
    pub fn default_recent_matches(&self) -> Vec<(usize, MatchRecord)> {
        self.recent_matches(self.history_settings.default_count)
    }

    pub fn match_by_index(&self, index: usize) -> Option<MatchRecord> {
        self.history.get(index).map(|record| self.hydrate(record))
    }

    pub fn stats(&self) -> LeagueStats {
        LeagueStats {
            participants: self.roster.len(),
            matches: self.history.len(),
            undecided_matches: self
                .history
                .records()
                .iter()
                .filter(|r| !r.is_decided())
                .count(),
        }
    }

    fn check_editable(&self, index: usize) -> Result<(), LeagueError> {
        let editable = self.history_settings.editable_recent;
        let len = self.history.len();
        if index >= len {
            return Err(StoreError::MatchNotFound { index, len }.into());
        }
        if editable > 0 && index + editable < len {
            return Err(LeagueError::MatchNotEditable { index, editable });
        }
        Ok(())
    }

    /// Refresh member snapshots from the current roster
    fn hydrate(&self, record: &MatchRecord) -> MatchRecord {
        let mut hydrated = record.clone();
        for team in &mut hydrated.teams {
            for member in &mut team.members {
                *member = self
                    .roster
                    .get(member.id)
                    .cloned()
                    .unwrap_or_else(|| Participant::placeholder(member.id));
            }
        }
        hydrated
    }
}

impl std::fmt::Debug for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("League")
            .field("roster", &self.roster)
            .field("history", &self.history)
            .field("partitioner", &self.partitioner)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

fn check_loaded_participants(participants: &[Participant]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for p in participants {
        let corrupt = |reason: String| StoreError::CorruptParticipant { id: p.id, reason };
        if !seen.insert(p.id) {
            return Err(corrupt("id appears more than once".to_string()));
        }
        if !p.rating.is_finite() || p.rating < 0.0 {
            return Err(corrupt(format!("rating {} is not a finite value >= 0", p.rating)));
        }
        if !p.baseline_rating.is_finite() || p.baseline_rating < 0.0 {
            return Err(corrupt(format!(
                "baseline rating {} is not a finite value >= 0",
                p.baseline_rating
            )));
        }
        if p.wins > p.games {
            return Err(corrupt(format!("{} wins out of {} games", p.wins, p.games)));
        }
    }
    Ok(())
}

fn check_loaded_matches(matches: &[MatchRecord]) -> Result<(), StoreError> {
    for (index, record) in matches.iter().enumerate() {
        let corrupt = |reason: String| StoreError::CorruptMatch { index, reason };
        if record.teams.is_empty() {
            return Err(corrupt("no teams".to_string()));
        }
        if let Some(team) = record.teams.iter().position(Team::is_empty) {
            return Err(corrupt(format!("team {} has no members", team)));
        }
        let mut seen = HashSet::new();
        if let Some(id) = record
            .teams
            .iter()
            .flat_map(Team::member_ids)
            .find(|&id| !seen.insert(id))
        {
            return Err(corrupt(format!("participant {} appears more than once", id)));
        }
        if let Some(&winner) = record.winning_teams.iter().find(|&&w| w >= record.teams.len()) {
            return Err(corrupt(format!(
                "winning team {} but only {} teams",
                winner,
                record.teams.len()
            )));
        }
    }
    Ok(())
}
