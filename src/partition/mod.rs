//! Team partitioner
//!
//! Splits a participant snapshot into a fixed number of non-empty teams so
//! that the gap between the strongest and weakest team total is provably
//! minimal. Ties between equally good splits are broken by a seeded random
//! source, so a fixed seed always reproduces the same teams.

pub mod seed;
pub mod solver;

pub use solver::{SearchStats, Solution, Solver};

use crate::config::PartitionConfig;
use crate::error::PartitionError;
use crate::types::{Participant, Team};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

/// Branch-and-bound team partitioner
#[derive(Debug, Clone, Default)]
pub struct TeamPartitioner {
    config: PartitionConfig,
}

impl TeamPartitioner {
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Split `participants` into `team_count` teams with minimal spread
    ///
    /// With `seed` the result is reproducible; without it the seed mixes the
    /// participant id set with the clock, so repeated calls may differ among
    /// equally optimal splits.
    pub fn partition(
        &self,
        participants: &[Participant],
        team_count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<Team>, PartitionError> {
        let seed = seed.unwrap_or_else(|| {
            seed::time_mixed_seed(participants.iter().map(|p| p.id), chrono::Utc::now())
        });
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.partition_with_rng(participants, team_count, &mut rng)
    }

    /// Same as [`partition`](Self::partition) with a caller-supplied random source
    pub fn partition_with_rng<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        team_count: usize,
        rng: &mut R,
    ) -> Result<Vec<Team>, PartitionError> {
        validate(participants, team_count)?;

        // Shuffle first so the stable sort orders equal ratings randomly
        let mut players = participants.to_vec();
        players.shuffle(&mut *rng);
        players.sort_by(|a, b| b.rating.total_cmp(&a.rating));

        let ratings: Vec<f64> = players.iter().map(|p| p.rating).collect();
        let solution = Solver::new(&ratings, team_count, self.config.tie_epsilon, rng)
            .with_node_limit(self.config.max_search_nodes)
            .solve();

        debug!(
            participants = players.len(),
            team_count,
            spread = solution.spread,
            greedy_spread = solution.greedy_spread,
            nodes = solution.stats.nodes,
            pruned = solution.stats.pruned,
            leaves = solution.stats.leaves,
            "Partition search finished"
        );
        if !solution.complete {
            warn!(
                participants = players.len(),
                team_count,
                spread = solution.spread,
                node_limit = self.config.max_search_nodes,
                "Partition search hit its node limit; returning the best split found"
            );
        }

        let mut teams = vec![Team::default(); team_count];
        for (player, team) in players.into_iter().zip(solution.assignment) {
            teams[team].add_member(player);
        }
        Ok(teams)
    }
}

/// Partition with default settings
pub fn partition(
    participants: &[Participant],
    team_count: usize,
    seed: Option<u64>,
) -> Result<Vec<Team>, PartitionError> {
    TeamPartitioner::default().partition(participants, team_count, seed)
}

fn validate(participants: &[Participant], team_count: usize) -> Result<(), PartitionError> {
    if team_count < 1 {
        return Err(PartitionError::InvalidArgument {
            reason: "team count must be at least 1".to_string(),
        });
    }
    if participants.is_empty() {
        return Err(PartitionError::EmptyRoster);
    }
    if participants.len() < team_count {
        return Err(PartitionError::InsufficientParticipants {
            participants: participants.len(),
            team_count,
        });
    }
    if let Some(p) = participants
        .iter()
        .find(|p| !p.rating.is_finite() || p.rating < 0.0)
    {
        return Err(PartitionError::InvalidArgument {
            reason: format!("participant {} has invalid rating {}", p.id, p.rating),
        });
    }
    Ok(())
}
