//! Property tests for partitioning and rating updates

mod fixtures;

use proptest::prelude::*;
use std::collections::BTreeSet;
use team_balancer::partition::TeamPartitioner;
use team_balancer::rating::RatingEngine;
use team_balancer::store::{InMemoryRoster, RosterStore};
use team_balancer::types::{spread, MatchRecord, Team};

use fixtures::{at, brute_force_spread, participants};

fn winners_from_code(code: u8) -> BTreeSet<usize> {
    match code {
        0 => BTreeSet::new(),
        1 => BTreeSet::from([0]),
        2 => BTreeSet::from([1]),
        _ => BTreeSet::from([0, 1]),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_partition_places_everyone_once(
        ratings in prop::collection::vec(0.0f64..2000.0, 1..12),
        team_count in 1usize..5,
        seed in any::<u64>(),
    ) {
        prop_assume!(team_count <= ratings.len());
        let roster = participants(&ratings);
        let teams = TeamPartitioner::default()
            .partition(&roster, team_count, Some(seed))
            .unwrap();

        prop_assert_eq!(teams.len(), team_count);
        prop_assert!(teams.iter().all(|t| !t.is_empty()));

        let mut placed: Vec<u64> = teams.iter().flat_map(|t| t.member_ids()).collect();
        placed.sort_unstable();
        let expected: Vec<u64> = (1..=ratings.len() as u64).collect();
        prop_assert_eq!(placed, expected);
    }

    #[test]
    fn prop_partition_matches_exhaustive_search(
        ratings in prop::collection::vec(0u32..100, 1..=8),
        team_count in 1usize..4,
        seed in any::<u64>(),
    ) {
        prop_assume!(team_count <= ratings.len());
        let ratings: Vec<f64> = ratings.into_iter().map(f64::from).collect();
        let teams = TeamPartitioner::default()
            .partition(&participants(&ratings), team_count, Some(seed))
            .unwrap();

        let optimum = brute_force_spread(&ratings, team_count);
        prop_assert!((spread(&teams) - optimum).abs() < 1e-9,
            "spread {} but optimum {}", spread(&teams), optimum);
    }

    #[test]
    fn prop_same_seed_same_partition(
        ratings in prop::collection::vec(0.0f64..500.0, 2..10),
        seed in any::<u64>(),
    ) {
        let roster = participants(&ratings);
        let partitioner = TeamPartitioner::default();
        let a = partitioner.partition(&roster, 2, Some(seed)).unwrap();
        let b = partitioner.partition(&roster, 2, Some(seed)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_match_effect_is_zero_sum(
        ratings in prop::collection::vec(500.0f64..1500.0, 2..10),
        team_count in 2usize..5,
        winners in prop::collection::btree_set(0usize..4, 0..4),
    ) {
        prop_assume!(team_count <= ratings.len());
        let winners: BTreeSet<usize> = winners.into_iter().filter(|&w| w < team_count).collect();

        let players = participants(&ratings);
        let mut teams = vec![Team::default(); team_count];
        for (i, p) in players.iter().enumerate() {
            teams[i % team_count].add_member(p.clone());
        }
        let mut roster: InMemoryRoster = players.into_iter().collect();

        let outcome = RatingEngine::default()
            .apply_match_effect(&mut roster, &teams, &winners)
            .unwrap();

        let team_sum: f64 = outcome.team_deltas.iter().sum();
        prop_assert!(team_sum.abs() < 1e-9);
        let member_sum: f64 = outcome.changes.iter().map(|c| c.delta()).sum();
        prop_assert!(member_sum.abs() < 1e-6);
        prop_assert_eq!(outcome.changes.len(), ratings.len());
    }

    #[test]
    fn prop_recompute_is_idempotent_and_counts_games(
        rounds in prop::collection::vec((any::<u64>(), 0u8..4, 0i64..1000), 0..12),
    ) {
        let players = participants(&[1300.0, 1150.0, 1000.0, 980.0, 870.0, 760.0]);
        let partitioner = TeamPartitioner::default();

        let history: Vec<MatchRecord> = rounds
            .iter()
            .map(|&(seed, code, secs)| {
                let teams = partitioner.partition(&players, 2, Some(seed)).unwrap();
                let mut record = MatchRecord::new(teams, at(secs));
                record.winning_teams = winners_from_code(code);
                record
            })
            .collect();

        let engine = RatingEngine::default();
        let mut roster: InMemoryRoster = players.iter().cloned().collect();
        engine.recompute_all_from_history(&mut roster, &history).unwrap();
        let first = roster.clone();
        engine.recompute_all_from_history(&mut roster, &history).unwrap();
        prop_assert_eq!(&roster, &first);

        for p in roster.iterate() {
            let games = history.iter().filter(|r| r.team_of(p.id).is_some()).count();
            let wins = history
                .iter()
                .filter(|r| r.team_of(p.id).map_or(false, |t| r.is_winner(t)))
                .count();
            prop_assert_eq!(p.games as usize, games);
            prop_assert_eq!(p.wins as usize, wins);
        }
    }
}
