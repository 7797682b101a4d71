//! Rating engine: applies match outcomes to the roster and replays history
//!
//! Both operations are atomic. All arithmetic runs on a staged copy of the
//! affected participants and the roster is only written once every new
//! rating is known to be finite.

use crate::config::RatingConfig;
use crate::error::RatingError;
use crate::rating::{distribution, elo};
use crate::store::{chronological_order, InMemoryRoster, RosterStore};
use crate::types::{MatchOutcome, MatchRecord, Participant, ParticipantId, RatingChange, Team};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Pairwise-Elo rating engine
#[derive(Debug, Clone, Default)]
pub struct RatingEngine {
    config: RatingConfig,
}

impl RatingEngine {
    pub fn new(config: RatingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Update ratings, games and wins of everyone in `teams`
    ///
    /// Members missing from the roster are skipped. On error the roster is
    /// left untouched.
    pub fn apply_match_effect<R>(
        &self,
        roster: &mut R,
        teams: &[Team],
        winners: &BTreeSet<usize>,
    ) -> Result<MatchOutcome, RatingError>
    where
        R: RosterStore + ?Sized,
    {
        validate(teams, winners)?;

        let mut staged: HashMap<ParticipantId, Participant> = HashMap::new();
        for id in teams.iter().flat_map(Team::member_ids) {
            if staged.contains_key(&id) {
                continue;
            }
            if let Some(participant) = roster.find(id) {
                staged.insert(id, participant);
            }
        }

        let outcome = self.apply_staged(&mut staged, teams, winners)?;

        for participant in staged.into_values() {
            roster.upsert(participant);
        }
        Ok(outcome)
    }

    fn apply_staged(
        &self,
        staged: &mut HashMap<ParticipantId, Participant>,
        teams: &[Team],
        winners: &BTreeSet<usize>,
    ) -> Result<MatchOutcome, RatingError> {
        // Members present in the roster, per team
        let present: Vec<Vec<ParticipantId>> = teams
            .iter()
            .map(|team| {
                team.member_ids()
                    .filter(|id| staged.contains_key(id))
                    .collect()
            })
            .collect();

        let before: HashMap<ParticipantId, f64> =
            staged.iter().map(|(&id, p)| (id, p.rating)).collect();

        // Team strength is the sum of member ratings
        let strengths: Vec<f64> = present
            .iter()
            .map(|ids| ids.iter().map(|id| before[id]).sum())
            .collect();

        let team_deltas = elo::team_deltas(&strengths, winners, &self.config);
        debug!(?strengths, ?team_deltas, ?winners, "Computed team deltas");

        for (team_index, ids) in present.iter().enumerate() {
            let team_delta = team_deltas[team_index];
            if team_delta == 0.0 || ids.is_empty() {
                continue;
            }

            let ratings: Vec<f64> = ids.iter().map(|id| staged[id].rating).collect();
            let shares = distribution::member_deltas(
                &ratings,
                team_delta,
                strengths[team_index],
                &self.config,
            )?;

            for ((id, rating), share) in ids.iter().zip(ratings).zip(shares) {
                let updated = rating + share;
                if !updated.is_finite() {
                    return Err(RatingError::NumericInstability {
                        reason: format!("rating of participant {} became {}", id, updated),
                    });
                }
                if let Some(participant) = staged.get_mut(id) {
                    participant.rating = updated.max(self.config.min_rating);
                }
            }
        }

        let mut changes = Vec::new();
        for (team_index, ids) in present.iter().enumerate() {
            let won = winners.contains(&team_index);
            for id in ids {
                if let Some(participant) = staged.get_mut(id) {
                    participant.games += 1;
                    if won {
                        participant.wins += 1;
                    }
                    changes.push(RatingChange {
                        participant_id: *id,
                        old_rating: before[id],
                        new_rating: participant.rating,
                        won,
                    });
                }
            }
        }

        Ok(MatchOutcome {
            team_deltas,
            changes,
        })
    }

    /// Rebuild every rating and counter from the baselines and the history
    ///
    /// Matches are replayed oldest first. If any replayed match fails the
    /// roster keeps its previous state and the error is returned. Returns the
    /// number of matches replayed.
    pub fn recompute_all_from_history<R>(
        &self,
        roster: &mut R,
        history: &[MatchRecord],
    ) -> Result<usize, RatingError>
    where
        R: RosterStore + ?Sized,
    {
        let mut replay: InMemoryRoster = roster
            .iterate()
            .into_iter()
            .map(|mut participant| {
                participant.reset_to_baseline();
                participant
            })
            .collect();

        for index in chronological_order(history) {
            let record = &history[index];
            if let Err(e) = self.apply_match_effect(&mut replay, &record.teams, &record.winning_teams)
            {
                warn!("Replay of match {} failed: {}", index, e);
                return Err(e);
            }
        }

        let participants = replay.len();
        for participant in replay.iterate() {
            roster.upsert(participant);
        }

        info!(
            "Recomputed ratings for {} participants from {} matches",
            participants,
            history.len()
        );
        Ok(history.len())
    }
}

fn validate(teams: &[Team], winners: &BTreeSet<usize>) -> Result<(), RatingError> {
    if teams.is_empty() {
        return Err(RatingError::EmptyTeams);
    }
    if let Some(&index) = winners.iter().find(|&&w| w >= teams.len()) {
        return Err(RatingError::InvalidWinnerIndex {
            index,
            team_count: teams.len(),
        });
    }

    let mut seen = HashSet::new();
    if let Some(id) = teams
        .iter()
        .flat_map(Team::member_ids)
        .find(|&id| !seen.insert(id))
    {
        return Err(RatingError::DuplicateMember { id });
    }
    Ok(())
}
