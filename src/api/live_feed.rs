use super::{FeedTeam, RawTimestamp, UpstreamId};
use serde::Deserialize;

/// A match from the weekend/live feed (RapidAPI live football, SofaScore conversions)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedMatch {
    pub id: Option<UpstreamId>,
    pub home_team: Option<FeedTeam>,
    pub away_team: Option<FeedTeam>,
    pub utc_time: Option<RawTimestamp>,
    pub status: Option<LiveFeedStatus>,
}

/// Status block of the live feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveFeedStatus {
    pub finished: Option<bool>,
    pub started: Option<bool>,
    pub cancelled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_live_feed_match() {
        let raw: LiveFeedMatch = serde_json::from_value(json!({
            "id": "12871",
            "homeTeam": { "name": "RB Salzburg", "id": "2045", "score": 0 },
            "awayTeam": { "name": "Rapid Wien", "id": "1986", "score": 0 },
            "utcTime": "2025-08-22T18:30:00Z",
            "status": { "finished": false, "started": false, "cancelled": false }
        }))
        .unwrap();

        assert_eq!(raw.id, Some(UpstreamId::Text("12871".to_string())));
        assert_eq!(raw.home_team.unwrap().name.as_deref(), Some("RB Salzburg"));
        assert_eq!(
            raw.utc_time,
            Some(RawTimestamp::Text("2025-08-22T18:30:00Z".to_string()))
        );
        assert_eq!(raw.status.unwrap().started, Some(false));
    }

    #[test]
    fn test_epoch_kickoff() {
        let raw: LiveFeedMatch =
            serde_json::from_value(json!({ "utcTime": 1755887400 })).unwrap();
        assert_eq!(raw.utc_time, Some(RawTimestamp::Epoch(1755887400)));
        assert!(raw.home_team.is_none());
    }
}
