use super::{FeedTeam, RawTimestamp, UpstreamId};
use serde::Deserialize;

/// A fixture from a league-table feed (`/league/{id}/matches` style endpoints)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueTableMatch {
    pub id: Option<UpstreamId>,
    pub home: Option<FeedTeam>,
    pub away: Option<FeedTeam>,
    pub status: Option<LeagueTableStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueTableStatus {
    pub utc_time: Option<RawTimestamp>,
    pub finished: Option<bool>,
    pub started: Option<bool>,
    pub cancelled: Option<bool>,
    pub ongoing: Option<bool>,
    pub reason: Option<StatusReason>,
    pub score_str: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusReason {
    pub short: Option<String>,
}

impl LeagueTableStatus {
    /// Parse "2 - 1" into (home, away)
    pub fn parsed_score(&self) -> Option<(u32, u32)> {
        let (home, away) = self.score_str.as_deref()?.split_once('-')?;
        Some((home.trim().parse().ok()?, away.trim().parse().ok()?))
    }

    pub fn short_code(&self) -> Option<&str> {
        self.reason.as_ref()?.short.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_league_table_match() {
        let raw: LeagueTableMatch = serde_json::from_value(json!({
            "id": 4419231,
            "home": { "id": 2045, "name": "RB Salzburg", "shortName": "RBS", "score": 2 },
            "away": { "id": 1986, "name": "Rapid Wien", "shortName": "RAP", "score": 1 },
            "status": {
                "utcTime": "2025-08-22T18:30:00.000Z",
                "finished": true,
                "started": true,
                "cancelled": false,
                "ongoing": false,
                "reason": { "short": "FT", "long": "Full-Time" },
                "scoreStr": "2 - 1"
            },
            "pageUrl": "/matches/salzburg-vs-rapid/abc"
        }))
        .unwrap();

        assert_eq!(raw.id, Some(UpstreamId::Number(4419231)));
        let status = raw.status.unwrap();
        assert_eq!(status.short_code(), Some("FT"));
        assert_eq!(status.parsed_score(), Some((2, 1)));
        assert_eq!(raw.home.unwrap().short_name.as_deref(), Some("RBS"));
    }

    #[test]
    fn test_unparseable_score_string() {
        let status = LeagueTableStatus {
            score_str: Some("vs".to_string()),
            ..Default::default()
        };
        assert_eq!(status.parsed_score(), None);
        assert_eq!(LeagueTableStatus::default().short_code(), None);
    }
}
