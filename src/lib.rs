pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use api::*;
pub use config::{Config, LeagueCatalog};
pub use error::*;
pub use models::*;
pub use utils::*;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use utils::board::{build_board, LeagueBoard};
use utils::data::{load_quotes, load_snapshot, quotes_path, snapshot_path};
use utils::odds::{OddsBoard, OddsProvider};

/// Build the board for one league from the cached snapshot and bookmaker quotes.
///
/// `Ok(None)` when no snapshot exists for the league; nothing is made up in its place.
pub async fn load_league_board(
    config: &Config,
    descriptor: &LeagueDescriptor,
    now: DateTime<Utc>,
) -> Result<Option<LeagueBoard>> {
    let league_id = descriptor.league.id.as_str();

    let path = snapshot_path(&config.cache_dir, league_id);
    let Some(snapshot) = load_snapshot(&path).await? else {
        warn!(league = league_id, path = %path.display(), "No snapshot available");
        return Ok(None);
    };
    let shape = snapshot
        .shape_tag()
        .with_context(|| format!("Snapshot {} cannot be normalized", path.display()))?;

    let odds = load_quotes(&quotes_path(&config.cache_dir, league_id))
        .await?
        .map(|quotes| OddsBoard::from_quotes(&quotes));

    info!(
        league = league_id,
        shape = %shape,
        records = snapshot.matches.len(),
        quoted = odds.as_ref().map_or(0, OddsBoard::len),
        taken_at = snapshot.timestamp.as_deref().unwrap_or("unknown"),
        "Building league board"
    );

    let board = build_board(
        &snapshot.matches,
        shape,
        descriptor,
        now,
        odds.as_ref().map(|board| board as &dyn OddsProvider),
    );

    for skipped in &board.skipped {
        warn!(league = league_id, "Skipped {}", skipped);
    }

    Ok(Some(board))
}
