//! Test fixtures shared by the integration and property tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use std::path::Path;
use std::sync::Arc;
use team_balancer::config::AppConfig;
use team_balancer::service::League;
use team_balancer::store::JsonFilePersistence;
use team_balancer::types::{Participant, Team, Timestamp};

/// Participants with ids 1..=n carrying the given ratings
pub fn participants(ratings: &[f64]) -> Vec<Participant> {
    ratings
        .iter()
        .enumerate()
        .map(|(i, &rating)| Participant::new(i as u64 + 1, format!("player{}", i + 1), rating))
        .collect()
}

/// A team built from roster snapshots
pub fn team(members: &[&Participant]) -> Team {
    Team::new(members.iter().map(|&p| p.clone()).collect())
}

/// A whole-second UTC timestamp
pub fn at(secs: i64) -> Timestamp {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// A league persisting to JSON files under `dir`
pub fn json_league(dir: &Path) -> League {
    let mut config = AppConfig::default();
    config.service.data_dir = dir.to_path_buf();
    League::new(&config, Arc::new(JsonFilePersistence::new(dir)))
}

/// A league seeded with the given (id, name, rating) rows
pub fn seeded_league(dir: &Path, rows: &[(u64, &str, f64)]) -> League {
    let mut league = json_league(dir);
    for &(id, name, rating) in rows {
        league.upsert_participant(id, name, rating).unwrap();
    }
    league
}

/// Smallest achievable spread by exhaustive search over every assignment
pub fn brute_force_spread(ratings: &[f64], team_count: usize) -> f64 {
    let n = ratings.len();
    let mut best = f64::INFINITY;
    let mut assignment = vec![0usize; n];

    loop {
        let mut totals = vec![0.0; team_count];
        let mut counts = vec![0usize; team_count];
        for (i, &team) in assignment.iter().enumerate() {
            totals[team] += ratings[i];
            counts[team] += 1;
        }
        if counts.iter().all(|&c| c > 0) {
            let max = totals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let min = totals.iter().cloned().fold(f64::INFINITY, f64::min);
            best = best.min(max - min);
        }

        // Next assignment in base `team_count`
        let mut pos = 0;
        loop {
            if pos == n {
                return best;
            }
            assignment[pos] += 1;
            if assignment[pos] < team_count {
                break;
            }
            assignment[pos] = 0;
            pos += 1;
        }
    }
}
