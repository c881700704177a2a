use crate::models::LeagueDescriptor;
use anyhow::{ensure, Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

const BUILTIN_LEAGUES: &str = include_str!("../leagues.json");

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `<league>.json` snapshots and `<league>_odds.json` quotes
    pub cache_dir: PathBuf,
    /// Optional league catalog replacing the built-in one
    pub leagues_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            leagues_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env file
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Self {
            cache_dir: std::env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            leagues_file: std::env::var("LEAGUES_FILE").ok().map(PathBuf::from),
        }
    }

    /// League catalog from `leagues_file`, or the built-in one
    pub fn league_catalog(&self) -> Result<LeagueCatalog> {
        match &self.leagues_file {
            Some(path) => LeagueCatalog::from_file(path),
            None => LeagueCatalog::builtin(),
        }
    }
}

/// The leagues the application knows how to show
#[derive(Debug, Clone)]
pub struct LeagueCatalog {
    descriptors: Vec<LeagueDescriptor>,
}

impl LeagueCatalog {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_LEAGUES).context("Built-in league catalog is invalid")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read league file {}", path.display()))?;
        let catalog = Self::from_json(&json)
            .with_context(|| format!("Invalid league file {}", path.display()))?;
        info!(path = %path.display(), leagues = catalog.descriptors.len(), "Loaded league catalog");
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let descriptors: Vec<LeagueDescriptor> =
            serde_json::from_str(json).context("Failed to deserialize league descriptors")?;
        Self::new(descriptors)
    }

    pub fn new(descriptors: Vec<LeagueDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            let id = &descriptor.league.id;
            ensure!(!id.trim().is_empty(), "League with empty id");
            ensure!(seen.insert(id.clone()), "Duplicate league id {}", id);
            ensure!(
                descriptor.matches_per_round > 0,
                "League {} has no matches per round",
                id
            );
        }
        Ok(Self { descriptors })
    }

    pub fn get(&self, league_id: &str) -> Option<&LeagueDescriptor> {
        self.descriptors.iter().find(|d| d.league.id == league_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeagueDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
