//! Performance benchmarks for team partitioning and rating replay

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeSet;
use team_balancer::partition::TeamPartitioner;
use team_balancer::rating::RatingEngine;
use team_balancer::store::InMemoryRoster;
use team_balancer::types::{MatchRecord, Participant};

fn create_bench_roster(size: usize) -> Vec<Participant> {
    // Deterministic spread of ratings with plenty of near-ties
    (0..size)
        .map(|i| {
            let rating = 800.0 + ((i * 7919) % 400) as f64 + (i % 3) as f64 * 0.5;
            Participant::new(i as u64 + 1, format!("player{}", i + 1), rating)
        })
        .collect()
}

fn bench_partition_sizes(c: &mut Criterion) {
    let partitioner = TeamPartitioner::default();
    let mut group = c.benchmark_group("partition");

    for size in [8usize, 12, 16, 20, 25] {
        let roster = create_bench_roster(size);
        group.bench_with_input(BenchmarkId::new("two_teams", size), &roster, |b, roster| {
            b.iter(|| {
                let teams = partitioner
                    .partition(black_box(roster), black_box(2), Some(42))
                    .unwrap();
                black_box(teams);
            })
        });
    }

    for teams in [3usize, 4, 5] {
        let roster = create_bench_roster(15);
        group.bench_with_input(BenchmarkId::new("fifteen_players", teams), &teams, |b, &teams| {
            b.iter(|| {
                let result = partitioner
                    .partition(black_box(&roster), black_box(teams), Some(7))
                    .unwrap();
                black_box(result);
            })
        });
    }

    group.finish();
}

fn bench_recompute_history(c: &mut Criterion) {
    let partitioner = TeamPartitioner::default();
    let engine = RatingEngine::default();
    let players = create_bench_roster(10);

    let history: Vec<MatchRecord> = (0..200u64)
        .map(|round| {
            let teams = partitioner.partition(&players, 2, Some(round)).unwrap();
            let mut record = MatchRecord::new(
                teams,
                Utc.timestamp_opt(1_700_000_000 + round as i64, 0).unwrap(),
            );
            record.winning_teams = BTreeSet::from([(round % 2) as usize]);
            record
        })
        .collect();

    c.bench_function("recompute_200_matches", |b| {
        b.iter(|| {
            let mut roster: InMemoryRoster = players.iter().cloned().collect();
            let replayed = engine
                .recompute_all_from_history(&mut roster, black_box(&history))
                .unwrap();
            black_box(replayed);
        })
    });
}

criterion_group!(benches, bench_partition_sizes, bench_recompute_history);
criterion_main!(benches);
