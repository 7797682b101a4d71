//! Main entry point for the team balancer CLI
//!
//! Loads configuration, opens the league stored in the data directory and
//! runs one command against it. Mutating commands save the league after a
//! successful change.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use team_balancer::config::AppConfig;
use team_balancer::service::{League, SharedLeague};
use team_balancer::types::{MatchRecord, ParticipantId, ParticipantOrder, Team};
use team_balancer::utils::{current_timestamp, format_timestamp};
use tracing::{error, info};

/// Team Balancer - skill-balanced teams and Elo rating tracking
#[derive(Parser)]
#[command(
    name = "team-balancer",
    version,
    about = "Form skill-balanced teams and track ratings across matches",
    long_about = "Team Balancer splits a selection of participants into teams whose rating \
                 totals are as close as possible, records the matches they play, and keeps \
                 ratings current with a pairwise Elo update replayed over the whole history."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, value_name = "DIR", help = "Directory holding users.json and matches.json")]
    data_dir: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a participant or reset an existing participant's rating
    AddUser {
        id: ParticipantId,
        name: String,
        rating: f64,
    },
    /// Remove a participant from the roster
    RemoveUser { id: ParticipantId },
    /// List participants
    ListUsers {
        /// Sort by name instead of rating
        #[arg(long)]
        by_name: bool,
    },
    /// Split the selected participants into balanced teams
    FormTeams {
        #[arg(required = true)]
        ids: Vec<ParticipantId>,
        /// Number of teams (defaults to the configured team count)
        #[arg(short, long)]
        teams: Option<usize>,
        /// Seed for a reproducible split
        #[arg(short, long)]
        seed: Option<u64>,
        /// Record the formed teams as a new match
        #[arg(long)]
        commit: bool,
    },
    /// Set the winning teams of a match and recompute ratings
    SetWinner {
        index: usize,
        /// Winning team indices; none records a full tie
        teams: Vec<usize>,
    },
    /// Delete a match and recompute ratings
    DeleteMatch { index: usize },
    /// Show recent matches, newest first
    History {
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Replay the whole history from baseline ratings
    Recompute,
    /// Show roster and history counts
    Status,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(data_dir) = &args.data_dir {
        config.service.data_dir = data_dir.clone();
    }

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    team_balancer::config::validate_config(&config)?;
    Ok(config)
}

fn print_teams(teams: &[Team]) {
    for (index, team) in teams.iter().enumerate() {
        println!("Team {} (total {:.1})", index, team.total_rating());
        for member in &team.members {
            let name = if member.name.is_empty() {
                "(removed)"
            } else {
                member.name.as_str()
            };
            println!("  {:>8}  {:<20} {:>8.1}", member.id, name, member.rating);
        }
    }
}

fn print_match(index: usize, record: &MatchRecord) {
    let outcome = if record.is_decided() {
        let winners: Vec<String> = record.winning_teams.iter().map(|w| w.to_string()).collect();
        format!("winners: {}", winners.join(", "))
    } else {
        "undecided".to_string()
    };
    println!(
        "Match #{} at {} ({})",
        index,
        format_timestamp(record.timestamp),
        outcome
    );
    print_teams(&record.teams);
}

fn run(command: Command, config: &AppConfig, league: SharedLeague) -> Result<()> {
    match command {
        Command::AddUser { id, name, rating } => {
            let participant = league.mutate(|l| l.upsert_participant(id, name, rating))?;
            println!(
                "Saved {} ({}) at rating {:.1}",
                participant.name, participant.id, participant.rating
            );
        }
        Command::RemoveUser { id } => {
            let removed = league.mutate(|l| l.remove_participant(id))?;
            println!("Removed {} ({})", removed.name, removed.id);
        }
        Command::ListUsers { by_name } => {
            let order = if by_name {
                ParticipantOrder::ByName
            } else {
                ParticipantOrder::ByRating
            };
            let participants = league.with_read(|l| l.list_participants(order))?;
            for p in participants {
                println!(
                    "{:>8}  {:<20} {:>8.1}  {:>3}W/{:<3}G  {:>5.1}%",
                    p.id,
                    p.name,
                    p.rating,
                    p.wins,
                    p.games,
                    p.win_rate() * 100.0
                );
            }
        }
        Command::FormTeams {
            ids,
            teams,
            seed,
            commit,
        } => {
            let team_count = teams.unwrap_or(config.partition.default_team_count);
            let formed = league.read()?.form_teams(&ids, team_count, seed)?;
            print_teams(&formed);
            println!("Spread: {:.1}", team_balancer::types::spread(&formed));

            if commit {
                let index = league.mutate(|l| l.commit_match(formed, current_timestamp()))?;
                println!("Recorded as match #{}", index);
            }
        }
        Command::SetWinner { index, teams } => {
            let winners: BTreeSet<usize> = teams.into_iter().collect();
            league.mutate(|l| l.set_match_winner(index, winners))?;
            if let Some(record) = league.with_read(|l| l.match_by_index(index))? {
                print_match(index, &record);
            }
        }
        Command::DeleteMatch { index } => {
            league.mutate(|l| l.delete_match(index))?;
            println!("Deleted match #{}", index);
        }
        Command::History { count } => {
            let count = count.unwrap_or(config.history.default_count);
            let matches = league.with_read(|l| l.recent_matches(count))?;
            if matches.is_empty() {
                println!("No matches recorded");
            }
            for (index, record) in matches {
                print_match(index, &record);
            }
        }
        Command::Recompute => {
            let replayed = league.mutate(|l| l.recompute())?;
            println!("Replayed {} matches", replayed);
        }
        Command::Status => {
            let stats = league.with_read(|l| l.stats())?;
            println!("Data directory: {}", config.service.data_dir.display());
            println!("  Participants: {}", stats.participants);
            println!("  Matches: {}", stats.matches);
            println!("  Undecided: {}", stats.undecided_matches);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} using data directory {}",
        config.service.name,
        config.service.data_dir.display()
    );

    let mut league = League::with_json_storage(&config);
    if let Err(e) = league.load() {
        error!("Failed to load league: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args.command, &config, SharedLeague::new(league)) {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
