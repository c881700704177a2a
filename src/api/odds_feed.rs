use super::UpstreamId;
use serde::Deserialize;
use std::collections::HashMap;

/// Period key holding full-match markets
const FULL_MATCH_PERIOD: &str = "num_0";

/// An event from the sportsbook odds feed (Pinnacle kit `/markets` endpoint)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OddsFeedEvent {
    pub event_id: Option<UpstreamId>,
    pub home: Option<String>,
    pub away: Option<String>,
    /// Kickoff without a timezone marker, e.g. "2025-08-22T18:30:00"
    pub starts: Option<String>,
    pub event_type: Option<String>, // "prematch" or "live"
    pub live_status_id: Option<i64>,
    #[serde(default)]
    pub periods: HashMap<String, OddsFeedPeriod>,
}

/// Markets for one period of the match; only the money line is read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OddsFeedPeriod {
    pub money_line: Option<MoneyLine>,
}

/// 1X2 prices in decimal format
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoneyLine {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

impl OddsFeedEvent {
    pub fn is_live(&self) -> bool {
        self.event_type.as_deref() == Some("live") || self.live_status_id == Some(1)
    }

    /// Full-match money line, if the feed carried one
    pub fn full_match_money_line(&self) -> Option<&MoneyLine> {
        self.periods.get(FULL_MATCH_PERIOD)?.money_line.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_odds_feed_event() {
        let raw: OddsFeedEvent = serde_json::from_value(json!({
            "event_id": 1610721937,
            "league_id": 1773,
            "league_name": "Austria - 2. Liga",
            "home": "SKN St. Polten",
            "away": "Admira Wacker",
            "starts": "2025-08-22T18:30:00",
            "event_type": "prematch",
            "live_status_id": 0,
            "is_actual": true,
            "is_have_odds": true,
            "periods": {
                "num_0": {
                    "money_line": { "home": 2.15, "draw": 3.4, "away": 3.1 },
                    "totals": { "2.5": { "over": 1.8, "under": 2.0 } }
                },
                "num_1": { "money_line": { "home": 2.9, "draw": 2.1, "away": 3.6 } }
            }
        }))
        .unwrap();

        assert!(!raw.is_live());
        let money_line = raw.full_match_money_line().unwrap();
        assert_eq!(money_line.home, Some(2.15));
        assert_eq!(money_line.draw, Some(3.4));
        assert_eq!(raw.periods.len(), 2);
    }

    #[test]
    fn test_live_detection() {
        let live = OddsFeedEvent {
            event_type: Some("live".to_string()),
            ..Default::default()
        };
        assert!(live.is_live());

        let live_status = OddsFeedEvent {
            live_status_id: Some(1),
            ..Default::default()
        };
        assert!(live_status.is_live());
        assert!(live_status.full_match_money_line().is_none());
    }
}
