use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use oddscheck::board::LeagueBoard;
use oddscheck::data::{save_board_json, save_matches_to_csv, write_matches_csv};
use oddscheck::{load_league_board, Config, LeagueDescriptor, NormalizedMatch};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oddscheck", about = "Football fixtures, live status and best odds per league")]
struct Cli {
    /// Directory with league snapshots (overrides CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// League catalog JSON file (overrides LEAGUES_FILE)
    #[arg(long, global = true)]
    leagues: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the configured leagues
    Leagues,
    /// Show every relevant match of a league, live first
    Board {
        league: String,
        /// Reference time, RFC 3339 (defaults to now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Write the output to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the current round of a league
    Round {
        league: String,
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Loads .env as well
    let mut config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt::init();

    if let Some(cache_dir) = cli.cache_dir {
        config.cache_dir = cache_dir;
    }
    if let Some(leagues) = cli.leagues {
        config.leagues_file = Some(leagues);
    }
    let catalog = config.league_catalog()?;

    match cli.command {
        Command::Leagues => {
            println!("Configured leagues:\n");
            for (i, descriptor) in catalog.iter().enumerate() {
                println!("{}. {}", i + 1, format_league(descriptor));
            }
        }
        Command::Board {
            league,
            now,
            format,
            out,
        } => {
            let descriptor = catalog
                .get(&league)
                .with_context(|| format!("Unknown league {}", league))?;
            let now = now.unwrap_or_else(Utc::now);

            let Some(board) = load_league_board(&config, descriptor, now).await? else {
                println!("No data available for {}", descriptor.league.name);
                return Ok(());
            };

            match (format, out) {
                (OutputFormat::Table, _) => print_board(&board),
                (OutputFormat::Json, Some(path)) => {
                    save_board_json(&board, &path).await?;
                    println!("Saved board to {}", path.display());
                }
                (OutputFormat::Json, None) => {
                    let json = serde_json::to_string_pretty(&board)
                        .context("Failed to serialize board")?;
                    println!("{}", json);
                }
                (OutputFormat::Csv, Some(path)) => {
                    save_matches_to_csv(&board.relevant, &path)?;
                    println!("Saved {} matches to {}", board.relevant.len(), path.display());
                }
                (OutputFormat::Csv, None) => {
                    write_matches_csv(&board.relevant, std::io::stdout().lock())?;
                }
            }
        }
        Command::Round { league, now } => {
            let descriptor = catalog
                .get(&league)
                .with_context(|| format!("Unknown league {}", league))?;
            let now = now.unwrap_or_else(Utc::now);

            let Some(board) = load_league_board(&config, descriptor, now).await? else {
                println!("No data available for {}", descriptor.league.name);
                return Ok(());
            };

            match board.current_round {
                Some(round) => {
                    println!("{} - {}\n", board.league.name, round.label);
                    if round.matches.is_empty() {
                        println!("No matches left to show in this round.");
                    }
                    for (i, m) in round.matches.iter().enumerate() {
                        println!("{}. {}", i + 1, format_match(m));
                    }
                }
                None => println!("No rounds found for {}", board.league.name),
            }
        }
    }

    Ok(())
}

fn format_league(descriptor: &LeagueDescriptor) -> String {
    format!(
        "{} [{}] ({}) | {} matches per round{}",
        descriptor.league.name,
        descriptor.league.id,
        descriptor.league.country,
        descriptor.matches_per_round,
        descriptor
            .season
            .as_ref()
            .map(|s| format!(" | season {}", s))
            .unwrap_or_default()
    )
}

fn print_board(board: &LeagueBoard) {
    println!(
        "{} | {}\n",
        board.league.name,
        board.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    if let Some(round) = &board.current_round {
        println!("Current round: {}\n", round.label);
    }

    if board.relevant.is_empty() {
        println!("No relevant matches.");
    }
    for (i, m) in board.relevant.iter().enumerate() {
        println!("{}. {}", i + 1, format_match(m));
    }

    if !board.skipped.is_empty() {
        println!("\n{} upstream records skipped (see log)", board.skipped.len());
    }
}

fn format_match(m: &NormalizedMatch) -> String {
    let score = match (m.home_team.score, m.away_team.score) {
        (Some(home), Some(away)) => format!("{}-{}", home, away),
        _ => "vs".to_string(),
    };
    let mut line = format!(
        "{} | {:<9} | {} {} {}",
        m.kickoff_time.format("%a %d.%m. %H:%M"),
        m.status.as_str(),
        m.home_team.name,
        score,
        m.away_team.name
    );

    if let Some(round) = &m.round {
        line.push_str(&format!(" | {}", round));
    }
    if let Some(odds) = &m.best_odds {
        line.push_str(&format!(
            " | 1: {:.2} ({}) X: {:.2} ({}) 2: {:.2} ({}) | margin {:.1}%",
            odds.home.odd,
            odds.home.bookmaker,
            odds.draw.odd,
            odds.draw.bookmaker,
            odds.away.odd,
            odds.away.bookmaker,
            (odds.overround() - 1.0) * 100.0
        ));
        if let Some(profit) = odds.arbitrage_profit() {
            line.push_str(&format!(" | ARB {:.2}%", profit));
        }
    }
    line
}
