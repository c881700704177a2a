use crate::api::ShapeTag;
use crate::error::NormalizeError;
use crate::models::NormalizedMatch;
use crate::utils::board::LeagueBoard;
use crate::utils::odds::BookmakerQuote;
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A cached batch of upstream records for one league
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Shape tag, e.g. "live-feed" or "odds-feed"
    pub shape: String,
    #[serde(alias = "events", alias = "weekendMatches")]
    pub matches: Vec<Value>,
}

impl Snapshot {
    pub fn shape_tag(&self) -> Result<ShapeTag, NormalizeError> {
        self.shape.parse()
    }
}

pub fn snapshot_path(cache_dir: &Path, league_id: &str) -> PathBuf {
    cache_dir.join(format!("{}.json", league_id))
}

pub fn quotes_path(cache_dir: &Path, league_id: &str) -> PathBuf {
    cache_dir.join(format!("{}_odds.json", league_id))
}

/// Read and deserialize a JSON file. A missing file is `Ok(None)`.
async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No cache file");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to deserialize {}", path.display()))?;
    Ok(Some(value))
}

/// Load a league snapshot; `None` means no data is available
pub async fn load_snapshot(path: &Path) -> Result<Option<Snapshot>> {
    load_json(path).await
}

/// Load bookmaker quotes saved next to a snapshot
pub async fn load_quotes(path: &Path) -> Result<Option<Vec<BookmakerQuote>>> {
    load_json(path).await
}

/// Save a board to a pretty-printed JSON file
pub async fn save_board_json(board: &LeagueBoard, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(board).context("Failed to serialize board")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Flat CSV row for one match
#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    id: &'a str,
    league: &'a str,
    round: Option<&'a str>,
    kickoff: String,
    status: &'static str,
    home_team: &'a str,
    away_team: &'a str,
    home_score: Option<u32>,
    away_score: Option<u32>,
    home_odd: Option<f64>,
    home_bookmaker: Option<&'a str>,
    draw_odd: Option<f64>,
    draw_bookmaker: Option<&'a str>,
    away_odd: Option<f64>,
    away_bookmaker: Option<&'a str>,
    overround: Option<f64>,
}

impl<'a> From<&'a NormalizedMatch> for MatchRow<'a> {
    fn from(m: &'a NormalizedMatch) -> Self {
        let odds = m.best_odds.as_ref();
        Self {
            id: &m.id,
            league: &m.league.id,
            round: m.round.as_deref(),
            kickoff: m.kickoff_time.format("%Y-%m-%d %H:%M").to_string(),
            status: m.status.as_str(),
            home_team: &m.home_team.name,
            away_team: &m.away_team.name,
            home_score: m.home_team.score,
            away_score: m.away_team.score,
            home_odd: odds.map(|o| o.home.odd),
            home_bookmaker: odds.map(|o| o.home.bookmaker.as_str()),
            draw_odd: odds.map(|o| o.draw.odd),
            draw_bookmaker: odds.map(|o| o.draw.bookmaker.as_str()),
            away_odd: odds.map(|o| o.away.odd),
            away_bookmaker: odds.map(|o| o.away.bookmaker.as_str()),
            overround: odds.map(|o| (o.overround() * 10_000.0).round() / 10_000.0),
        }
    }
}

/// Write matches as CSV, one row per match with a header line
pub fn write_matches_csv<W: Write>(matches: &[NormalizedMatch], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for m in matches {
        wtr.serialize(MatchRow::from(m))
            .with_context(|| format!("Failed to write CSV row for {}", m.id))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Save matches to a CSV file
pub fn save_matches_to_csv(matches: &[NormalizedMatch], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    write_matches_csv(matches, file)
}
