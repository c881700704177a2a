pub mod league_table;
pub mod live_feed;
pub mod odds_feed;

pub use league_table::{LeagueTableMatch, LeagueTableStatus};
pub use live_feed::{LiveFeedMatch, LiveFeedStatus};
pub use odds_feed::{MoneyLine, OddsFeedEvent, OddsFeedPeriod};

use crate::error::{NormalizeError, SkipReason};
use crate::models::NormalizedMatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// The known upstream shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeTag {
    /// Weekend/live feed: `homeTeam`/`awayTeam`, `utcTime`, boolean status block
    LiveFeed,
    /// League table feed: `home`/`away`, `status.utcTime`, status booleans incl. `ongoing`
    LeagueTable,
    /// Sportsbook odds feed: plain team strings, naive `starts`, embedded money line
    OddsFeed,
    /// Records that are already in `NormalizedMatch` form
    Normalized,
}

impl ShapeTag {
    pub const ALL: [ShapeTag; 4] = [
        ShapeTag::LiveFeed,
        ShapeTag::LeagueTable,
        ShapeTag::OddsFeed,
        ShapeTag::Normalized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeTag::LiveFeed => "live-feed",
            ShapeTag::LeagueTable => "league-table",
            ShapeTag::OddsFeed => "odds-feed",
            ShapeTag::Normalized => "normalized",
        }
    }
}

impl std::fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeTag {
    type Err = NormalizeError;

    /// Accepts the kebab-case names and the single-letter shorthands A-D
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "live-feed" | "weekend" => Ok(ShapeTag::LiveFeed),
            "b" | "league-table" => Ok(ShapeTag::LeagueTable),
            "c" | "odds-feed" => Ok(ShapeTag::OddsFeed),
            "d" | "normalized" => Ok(ShapeTag::Normalized),
            _ => Err(NormalizeError::UnsupportedShape(s.to_string())),
        }
    }
}

/// A raw record tagged with the shape it was decoded as
#[derive(Debug, Clone)]
pub enum RawMatch {
    LiveFeed(LiveFeedMatch),
    LeagueTable(LeagueTableMatch),
    OddsFeed(OddsFeedEvent),
    Normalized(NormalizedMatch),
}

impl RawMatch {
    /// Decode one JSON record as the given shape
    pub fn from_value(shape: ShapeTag, value: &Value) -> Result<Self, SkipReason> {
        let malformed = |e: serde_json::Error| SkipReason::Malformed {
            shape,
            message: e.to_string(),
        };

        match shape {
            ShapeTag::LiveFeed => LiveFeedMatch::deserialize(value)
                .map(RawMatch::LiveFeed)
                .map_err(malformed),
            ShapeTag::LeagueTable => LeagueTableMatch::deserialize(value)
                .map(RawMatch::LeagueTable)
                .map_err(malformed),
            ShapeTag::OddsFeed => OddsFeedEvent::deserialize(value)
                .map(RawMatch::OddsFeed)
                .map_err(malformed),
            ShapeTag::Normalized => NormalizedMatch::deserialize(value)
                .map(RawMatch::Normalized)
                .map_err(malformed),
        }
    }

    pub fn shape(&self) -> ShapeTag {
        match self {
            RawMatch::LiveFeed(_) => ShapeTag::LiveFeed,
            RawMatch::LeagueTable(_) => ShapeTag::LeagueTable,
            RawMatch::OddsFeed(_) => ShapeTag::OddsFeed,
            RawMatch::Normalized(_) => ShapeTag::Normalized,
        }
    }
}

/// Upstream ids come as numbers from some feeds and strings from others
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UpstreamId {
    Number(i64),
    Text(String),
}

impl UpstreamId {
    /// `None` for blank string ids
    pub fn to_id_string(&self) -> Option<String> {
        match self {
            UpstreamId::Number(n) => Some(n.to_string()),
            UpstreamId::Text(s) if s.trim().is_empty() => None,
            UpstreamId::Text(s) => Some(s.trim().to_string()),
        }
    }
}

/// Kickoff as either an ISO-8601 string or Unix seconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Epoch(i64),
    Text(String),
}

/// Team block shared by the live and league-table feeds
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedTeam {
    pub id: Option<UpstreamId>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    #[serde(alias = "logo")]
    pub logo_url: Option<String>,
    pub score: Option<u32>,
}

impl FeedTeam {
    /// No id and no usable name
    pub fn is_empty(&self) -> bool {
        self.id.as_ref().and_then(UpstreamId::to_id_string).is_none()
            && self.name.as_deref().map_or(true, |n| n.trim().is_empty())
    }
}

/// Best-effort id lookup on an undecoded record, for skip reports
pub fn peek_upstream_id(value: &Value) -> Option<String> {
    ["id", "event_id", "eventId"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| match v {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_tag_from_str() {
        assert_eq!("A".parse::<ShapeTag>().unwrap(), ShapeTag::LiveFeed);
        assert_eq!("league-table".parse::<ShapeTag>().unwrap(), ShapeTag::LeagueTable);
        assert_eq!(" Odds-Feed ".parse::<ShapeTag>().unwrap(), ShapeTag::OddsFeed);
        assert_eq!("d".parse::<ShapeTag>().unwrap(), ShapeTag::Normalized);

        for shape in ShapeTag::ALL {
            assert_eq!(shape.as_str().parse::<ShapeTag>().unwrap(), shape);
        }
    }

    #[test]
    fn test_unknown_shape_fails_loudly() {
        let err = "sofascore-v2".parse::<ShapeTag>().unwrap_err();
        assert_eq!(err, NormalizeError::UnsupportedShape("sofascore-v2".to_string()));
    }

    #[test]
    fn test_upstream_id_variants() {
        let id: UpstreamId = serde_json::from_value(json!(4711)).unwrap();
        assert_eq!(id.to_id_string().as_deref(), Some("4711"));
        let id: UpstreamId = serde_json::from_value(json!("  ")).unwrap();
        assert_eq!(id.to_id_string(), None);
    }

    #[test]
    fn test_feed_team_is_empty() {
        let team: FeedTeam = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(team.is_empty());
        let team: FeedTeam = serde_json::from_value(json!({ "id": 12 })).unwrap();
        assert!(!team.is_empty());
    }

    #[test]
    fn test_malformed_record_is_a_skip() {
        let value = json!({ "homeTeam": "not an object" });
        let err = RawMatch::from_value(ShapeTag::LiveFeed, &value).unwrap_err();
        assert!(matches!(
            err,
            SkipReason::Malformed {
                shape: ShapeTag::LiveFeed,
                ..
            }
        ));
    }

    #[test]
    fn test_peek_upstream_id() {
        assert_eq!(peek_upstream_id(&json!({ "event_id": 99 })).as_deref(), Some("99"));
        assert_eq!(peek_upstream_id(&json!({ "id": "m-1" })).as_deref(), Some("m-1"));
        assert_eq!(peek_upstream_id(&json!({})), None);
    }
}
