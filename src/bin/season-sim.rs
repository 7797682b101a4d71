//! Season Simulator CLI Tool
//!
//! Plays a synthetic season against an in-memory league: participants get a
//! hidden skill, every round a random selection is split into balanced teams,
//! and the winner is drawn from the hidden skills. Useful for eyeballing how
//! quickly ratings converge for a given configuration.
//!
//! Usage:
//!   cargo run --bin season-sim -- --help
//!   cargo run --bin season-sim -- --participants 16 --rounds 200 --seed 7
//!   cargo run --bin season-sim -- --config balancer.toml --save --data-dir ./sim

use anyhow::Result;
use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use team_balancer::config::AppConfig;
use team_balancer::rating::expected_score;
use team_balancer::service::League;
use team_balancer::types::{spread, ParticipantId, ParticipantOrder};
use team_balancer::utils::current_timestamp;

#[derive(Parser)]
#[command(name = "season-sim")]
#[command(about = "Simulate a season of balanced matches and report rating convergence")]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of participants in the roster
    #[arg(short, long, default_value = "12")]
    participants: usize,

    /// Participants selected per match
    #[arg(long, default_value = "8")]
    per_match: usize,

    /// Teams per match
    #[arg(short, long, default_value = "2")]
    teams: usize,

    /// Matches to play
    #[arg(short, long, default_value = "100")]
    rounds: usize,

    /// Starting rating for everyone
    #[arg(long, default_value = "1000.0")]
    start_rating: f64,

    /// Spread of the hidden skills around the starting rating
    #[arg(long, default_value = "200.0")]
    skill_spread: f64,

    /// Seed for the whole simulation
    #[arg(short, long, default_value = "1")]
    seed: u64,

    /// Save the resulting league to the data directory
    #[arg(long)]
    save: bool,

    /// Data directory used with --save
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Kendall-style agreement between hidden skill order and final rating order
fn rank_agreement(
    skills: &BTreeMap<ParticipantId, f64>,
    ratings: &HashMap<ParticipantId, f64>,
) -> f64 {
    let ids: Vec<ParticipantId> = skills.keys().copied().collect();
    let mut concordant = 0usize;
    let mut pairs = 0usize;
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let skill = skills[a] - skills[b];
            let rating = ratings[a] - ratings[b];
            if skill == 0.0 {
                continue;
            }
            pairs += 1;
            if skill * rating > 0.0 {
                concordant += 1;
            }
        }
    }
    if pairs == 0 {
        1.0
    } else {
        concordant as f64 / pairs as f64
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    if cli.per_match > cli.participants {
        return Err(anyhow::anyhow!(
            "Cannot select {} participants from a roster of {}",
            cli.per_match,
            cli.participants
        ));
    }

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.service.data_dir = dir.clone();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let mut league = League::with_json_storage(&config);
    let mut skills = BTreeMap::new();

    for id in 1..=cli.participants as ParticipantId {
        let skill = cli.start_rating + rng.gen_range(-cli.skill_spread..=cli.skill_spread);
        skills.insert(id, skill);
        league.upsert_participant(id, format!("sim-{:02}", id), cli.start_rating)?;
    }

    println!("🎲 Simulating {} rounds", cli.rounds);
    println!(
        "   {} participants, {} per match, {} teams",
        cli.participants, cli.per_match, cli.teams
    );

    let ids: Vec<ParticipantId> = skills.keys().copied().collect();
    let mut total_spread = 0.0;
    let start = current_timestamp();

    for round in 0..cli.rounds {
        let selection: Vec<ParticipantId> = ids
            .choose_multiple(&mut rng, cli.per_match)
            .copied()
            .collect();
        let teams = league.form_teams(&selection, cli.teams, Some(rng.gen()))?;
        total_spread += spread(&teams);

        // Winner drawn against the strongest other team by hidden skill
        let hidden: Vec<f64> = teams
            .iter()
            .map(|t| t.member_ids().map(|id| skills[&id]).sum())
            .collect();
        let mut order: Vec<usize> = (0..teams.len()).collect();
        order.sort_by(|&a, &b| hidden[b].total_cmp(&hidden[a]));
        let favourite = order[0];
        let winner = match order.get(1) {
            Some(&runner_up) => {
                let p = expected_score(
                    hidden[favourite],
                    hidden[runner_up],
                    config.rating.elo_scale,
                );
                if rng.gen_bool(p.clamp(0.0, 1.0)) {
                    favourite
                } else {
                    runner_up
                }
            }
            None => favourite,
        };

        let when = start + chrono::Duration::seconds(round as i64);
        let index = league.commit_match(teams, when)?;
        league.set_match_winner(index, BTreeSet::from([winner]))?;
    }

    let standings = league.list_participants(ParticipantOrder::ByRating);
    let ratings: HashMap<ParticipantId, f64> =
        standings.iter().map(|p| (p.id, p.rating)).collect();

    println!("\n📊 Final standings");
    for p in &standings {
        println!(
            "   {:<8} rating {:>8.1}  hidden {:>8.1}  {:>3}W/{:<3}G",
            p.name, p.rating, skills[&p.id], p.wins, p.games
        );
    }
    println!(
        "\n   Mean team spread: {:.2}",
        total_spread / cli.rounds.max(1) as f64
    );
    println!(
        "   Rank agreement with hidden skill: {:.1}%",
        rank_agreement(&skills, &ratings) * 100.0
    );

    if cli.save {
        league.save()?;
        println!("   Saved to {}", config.service.data_dir.display());
    }

    Ok(())
}
