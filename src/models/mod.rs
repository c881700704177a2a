use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A supported league, as shown to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// One side of a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// `None` until the match has started
    #[serde(default)]
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Live => "LIVE",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the score line is meaningful for this status
    pub fn has_started(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::Finished)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best available decimal price for a single outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsPick {
    pub odd: f64, // Decimal odds, always > 1.0
    pub bookmaker: String,
}

/// Best 1X2 prices across all bookmakers that quoted a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestOdds {
    pub home: OddsPick,
    pub draw: OddsPick,
    pub away: OddsPick,
}

/// The canonical match record every upstream shape converges on.
///
/// Values are never mutated after construction; enrichment goes through the
/// `with_*` methods, which return a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMatch {
    pub id: String,
    pub league: League,
    pub home_team: Team,
    pub away_team: Team,
    pub kickoff_time: DateTime<Utc>,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_odds: Option<BestOdds>,
}

impl NormalizedMatch {
    pub fn with_round(&self, round: Option<String>) -> Self {
        Self {
            round,
            ..self.clone()
        }
    }

    pub fn with_best_odds(&self, best_odds: Option<BestOdds>) -> Self {
        Self {
            best_odds,
            ..self.clone()
        }
    }

    /// "Home vs Away" for log lines and table output
    pub fn fixture(&self) -> String {
        format!("{} vs {}", self.home_team.name, self.away_team.name)
    }
}

/// League configuration handed to the core by the config layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueDescriptor {
    pub league: League,
    /// Date of the first matchday of the season
    pub season_start: NaiveDate,
    pub matches_per_round: usize,
    #[serde(default)]
    pub total_rounds: Option<u32>,
    #[serde(default)]
    pub season: Option<String>,
    /// Label template, `{n}` is replaced by the round number
    #[serde(default = "default_round_label")]
    pub round_label: String,
}

fn default_round_label() -> String {
    "Round {n}".to_string()
}

impl LeagueDescriptor {
    pub fn format_round(&self, number: u32) -> String {
        self.round_label.replace("{n}", &number.to_string())
    }
}
