use crate::models::{BestOdds, NormalizedMatch, OddsPick};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strsim::normalized_levenshtein;

/// Source of best-odds enrichment for normalized matches.
///
/// Implementations may be backed by anything (a bookmaker comparison, a cached odds
/// file, nothing at all). `None` means "no odds available", which is a valid state.
pub trait OddsProvider {
    fn best_odds_for(&self, m: &NormalizedMatch) -> Option<BestOdds>;
}

/// Provider used when no odds source is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOdds;

impl OddsProvider for NoOdds {
    fn best_odds_for(&self, _m: &NormalizedMatch) -> Option<BestOdds> {
        None
    }
}

/// Return a copy of `m` with the provider's odds folded into whatever it already carries.
/// Never fails: an absent provider or an absent quote leaves the odds as they were.
pub fn attach_odds(m: &NormalizedMatch, provider: Option<&dyn OddsProvider>) -> NormalizedMatch {
    let quoted = provider.and_then(|p| p.best_odds_for(m));
    let best_odds = match (m.best_odds.clone(), quoted) {
        (Some(existing), Some(quoted)) => Some(merge_best(existing, quoted)),
        (existing, quoted) => quoted.or(existing),
    };
    m.with_best_odds(best_odds)
}

/// Name similarity a quote needs on both sides to count as the same fixture
pub const NAME_MATCH_THRESHOLD: f64 = 0.8;

/// Club-form tokens that bookmakers add or leave out at will
const CLUB_TOKENS: [&str; 12] = [
    "fc", "cf", "sc", "sk", "sv", "ac", "afc", "fk", "tsv", "vfb", "vfl", "1",
];

/// A 1X2 price quote from one bookmaker for one match.
///
/// Bookmakers rarely know the upstream match id, so a quote can instead name the two
/// teams as the bookmaker spells them, optionally with its kickoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmakerQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    pub bookmaker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kickoff: Option<DateTime<Utc>>,
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

/// Prices quoted under team names, merged per fixture
#[derive(Debug, Clone)]
struct NamedFixture {
    home: String,
    away: String,
    date: Option<NaiveDate>,
    odds: BestOdds,
}

impl NamedFixture {
    /// Odds oriented to `m`'s home and away sides, if the fixture is `m`
    fn odds_for(&self, m: &NormalizedMatch) -> Option<BestOdds> {
        if let Some(date) = self.date {
            // Late kickoffs can fall on the next day in the bookmaker's timezone
            if (date - m.kickoff_time.date_naive()).num_days().abs() > 1 {
                return None;
            }
        }

        let home = normalize_team_name(&m.home_team.name);
        let away = normalize_team_name(&m.away_team.name);
        let direct = team_similarity(&self.home, &home).min(team_similarity(&self.away, &away));
        let swapped = team_similarity(&self.home, &away).min(team_similarity(&self.away, &home));

        if direct >= NAME_MATCH_THRESHOLD && direct >= swapped {
            Some(self.odds.clone())
        } else if swapped >= NAME_MATCH_THRESHOLD {
            // Listed the other way round: the bookmaker's home price is our away price
            Some(BestOdds {
                home: self.odds.away.clone(),
                draw: self.odds.draw.clone(),
                away: self.odds.home.clone(),
            })
        } else {
            None
        }
    }
}

/// Best price per outcome across every bookmaker that quoted a match
#[derive(Debug, Clone, Default)]
pub struct OddsBoard {
    by_id: HashMap<String, BestOdds>,
    by_teams: Vec<NamedFixture>,
}

impl OddsBoard {
    pub fn from_quotes(quotes: &[BookmakerQuote]) -> Self {
        let mut board = Self::default();

        for quote in quotes {
            let Some(odds) =
                best_odds_from_prices(quote.home, quote.draw, quote.away, &quote.bookmaker)
            else {
                continue; // Ignore quotes with impossible prices
            };

            let match_id = quote.match_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
            if let Some(match_id) = match_id {
                let merged = match board.by_id.remove(match_id) {
                    Some(current) => merge_best(current, odds),
                    None => odds,
                };
                board.by_id.insert(match_id.to_string(), merged);
                continue;
            }

            let (Some(home), Some(away)) = (quote.home_team.as_deref(), quote.away_team.as_deref())
            else {
                continue; // Nothing to link the quote to
            };
            let fixture = NamedFixture {
                home: normalize_team_name(home),
                away: normalize_team_name(away),
                date: quote.kickoff.map(|k| k.date_naive()),
                odds,
            };
            if fixture.home.is_empty() || fixture.away.is_empty() {
                continue;
            }

            let existing = board.by_teams.iter_mut().find(|f| {
                f.home == fixture.home && f.away == fixture.away && f.date == fixture.date
            });
            match existing {
                Some(existing) => {
                    existing.odds = merge_best(existing.odds.clone(), fixture.odds);
                }
                None => board.by_teams.push(fixture),
            }
        }

        board
    }

    /// Number of distinct fixtures quoted
    pub fn len(&self) -> usize {
        self.by_id.len() + self.by_teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty() && self.by_teams.is_empty()
    }
}

impl OddsProvider for OddsBoard {
    fn best_odds_for(&self, m: &NormalizedMatch) -> Option<BestOdds> {
        let by_id = self.by_id.get(&m.id).cloned();
        let by_name = self
            .by_teams
            .iter()
            .filter_map(|fixture| fixture.odds_for(m))
            .reduce(merge_best);

        match (by_id, by_name) {
            (Some(by_id), Some(by_name)) => Some(merge_best(by_id, by_name)),
            (by_id, by_name) => by_id.or(by_name),
        }
    }
}

/// Comparable form of a team name: lowercase words without punctuation or club-form
/// tokens ("FC Admira Wacker" and "Admira-Wacker" both become "admira wacker")
pub fn normalize_team_name(name: &str) -> String {
    let lower = name.to_lowercase().replace('&', " and ");
    let cleaned: String = lower
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| !CLUB_TOKENS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity of two normalized names in `[0, 1]`.
///
/// Multi-word names contained word for word in the other name count as equal; anything
/// else is scored by normalized edit distance.
pub fn team_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_words: Vec<&str> = a.split_whitespace().collect();
    let b_words: Vec<&str> = b.split_whitespace().collect();
    let (shorter, longer) = if a_words.len() <= b_words.len() {
        (&a_words, &b_words)
    } else {
        (&b_words, &a_words)
    };
    if shorter.len() >= 2 && shorter.iter().all(|word| longer.contains(word)) {
        return 1.0;
    }

    normalized_levenshtein(a, b)
}

/// Build a `BestOdds` from one bookmaker's prices; `None` unless all three are valid
pub fn best_odds_from_prices(home: f64, draw: f64, away: f64, bookmaker: &str) -> Option<BestOdds> {
    let pick = |odd: f64| {
        is_valid_price(odd).then(|| OddsPick {
            odd,
            bookmaker: bookmaker.to_string(),
        })
    };
    Some(BestOdds {
        home: pick(home)?,
        draw: pick(draw)?,
        away: pick(away)?,
    })
}

pub fn is_valid_price(odd: f64) -> bool {
    odd.is_finite() && odd > 1.0
}

/// Take the higher price for each outcome; ties keep the existing bookmaker
pub fn merge_best(current: BestOdds, other: BestOdds) -> BestOdds {
    fn better(a: OddsPick, b: OddsPick) -> OddsPick {
        if b.odd > a.odd {
            b
        } else {
            a
        }
    }

    BestOdds {
        home: better(current.home, other.home),
        draw: better(current.draw, other.draw),
        away: better(current.away, other.away),
    }
}

impl BestOdds {
    /// Sum of implied probabilities. Below 1.0 the best prices form an arbitrage.
    pub fn overround(&self) -> f64 {
        1.0 / self.home.odd + 1.0 / self.draw.odd + 1.0 / self.away.odd
    }

    /// Guaranteed profit percentage from staking across the three best prices
    pub fn arbitrage_profit(&self) -> Option<f64> {
        let total_prob = self.overround();
        (total_prob < 1.0).then(|| (1.0 / total_prob - 1.0) * 100.0)
    }

    /// Optimal stake split (home, draw, away) in percent of the total stake
    pub fn stake_split(&self) -> (f64, f64, f64) {
        let total_prob = self.overround();
        (
            (1.0 / self.home.odd) / total_prob * 100.0,
            (1.0 / self.draw.odd) / total_prob * 100.0,
            (1.0 / self.away.odd) / total_prob * 100.0,
        )
    }

    pub fn all_valid(&self) -> bool {
        [&self.home, &self.draw, &self.away]
            .iter()
            .all(|pick| is_valid_price(pick.odd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{League, MatchStatus, Team};
    use chrono::TimeZone;

    fn team(name: &str) -> Team {
        Team {
            id: name.to_lowercase(),
            name: name.to_string(),
            short_name: name[..3].to_uppercase(),
            logo_url: None,
            score: None,
        }
    }

    fn sample_match(id: &str) -> NormalizedMatch {
        NormalizedMatch {
            id: id.to_string(),
            league: League {
                id: "at-2-liga".to_string(),
                name: "2. Liga".to_string(),
                country: "Austria".to_string(),
                logo_url: None,
            },
            home_team: team("Admira"),
            away_team: team("Austria Lustenau"),
            kickoff_time: Utc.with_ymd_and_hms(2025, 8, 22, 18, 30, 0).unwrap(),
            status: MatchStatus::Scheduled,
            round: None,
            season: None,
            best_odds: None,
        }
    }

    fn quote(match_id: &str, bookmaker: &str, home: f64, draw: f64, away: f64) -> BookmakerQuote {
        BookmakerQuote {
            match_id: Some(match_id.to_string()),
            bookmaker: bookmaker.to_string(),
            home_team: None,
            away_team: None,
            kickoff: None,
            home,
            draw,
            away,
        }
    }

    fn named_quote(bookmaker: &str, home_team: &str, away_team: &str, prices: [f64; 3]) -> BookmakerQuote {
        BookmakerQuote {
            match_id: None,
            bookmaker: bookmaker.to_string(),
            home_team: Some(home_team.to_string()),
            away_team: Some(away_team.to_string()),
            kickoff: None,
            home: prices[0],
            draw: prices[1],
            away: prices[2],
        }
    }

    #[test]
    fn test_board_picks_best_price_per_outcome() {
        let board = OddsBoard::from_quotes(&[
            quote("m1", "tipp3", 2.10, 3.30, 3.40),
            quote("m1", "win2day", 2.25, 3.10, 3.20),
            quote("m1", "lottoland", 2.00, 3.50, 3.35),
            quote("m2", "tipp3", 1.50, 4.00, 6.00),
        ]);
        assert_eq!(board.len(), 2);

        let odds = board.best_odds_for(&sample_match("m1")).unwrap();
        assert_eq!(odds.home.bookmaker, "win2day");
        assert_eq!(odds.draw.bookmaker, "lottoland");
        assert_eq!(odds.away.bookmaker, "tipp3");
        assert!((odds.away.odd - 3.40).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_quotes_are_ignored() {
        let board = OddsBoard::from_quotes(&[quote("m1", "tipp3", 1.0, 3.3, 3.4)]);
        assert!(board.is_empty());
        assert!(board.best_odds_for(&sample_match("m1")).is_none());
    }

    #[test]
    fn test_attach_without_provider_keeps_match() {
        let m = sample_match("m1");
        let attached = attach_odds(&m, None);
        assert_eq!(attached, m);

        let attached = attach_odds(&m, Some(&NoOdds));
        assert!(attached.best_odds.is_none());
    }

    #[test]
    fn test_attach_merges_with_embedded_odds() {
        let embedded = best_odds_from_prices(2.0, 3.6, 3.0, "Pinnacle").unwrap();
        let m = sample_match("m1").with_best_odds(Some(embedded));
        let board = OddsBoard::from_quotes(&[quote("m1", "tipp3", 2.2, 3.2, 3.1)]);

        let attached = attach_odds(&m, Some(&board));
        let odds = attached.best_odds.unwrap();
        assert_eq!(odds.home.bookmaker, "tipp3");
        assert_eq!(odds.draw.bookmaker, "Pinnacle");
        assert_eq!(odds.away.bookmaker, "tipp3");
        // Input value is untouched
        assert_eq!(m.best_odds.unwrap().home.bookmaker, "Pinnacle");
    }

    #[test]
    fn test_overround_and_arbitrage() {
        let fair = best_odds_from_prices(3.0, 3.0, 3.0, "x").unwrap();
        assert!((fair.overround() - 1.0).abs() < 1e-9);
        assert!(fair.arbitrage_profit().is_none());

        let arb = best_odds_from_prices(3.3, 3.3, 3.3, "x").unwrap();
        let profit = arb.arbitrage_profit().unwrap();
        assert!((profit - 10.0).abs() < 1e-6);

        let (home, draw, away) = arb.stake_split();
        assert!((home + draw + away - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_team_name() {
        assert_eq!(normalize_team_name("FC Admira Wacker"), "admira wacker");
        assert_eq!(normalize_team_name("Admira-Wacker"), "admira wacker");
        assert_eq!(normalize_team_name("SKN St. Pölten"), "skn st pölten");
        assert_eq!(normalize_team_name("SV Ried"), "ried");
        assert_eq!(normalize_team_name("Brighton & Hove Albion"), "brighton and hove albion");
    }

    #[test]
    fn test_quote_matched_by_exact_names() {
        let board = OddsBoard::from_quotes(&[named_quote(
            "tipp3",
            "Admira",
            "Austria Lustenau",
            [2.4, 3.3, 2.8],
        )]);
        assert_eq!(board.len(), 1);

        let odds = board.best_odds_for(&sample_match("fixture-without-quote-id")).unwrap();
        assert_eq!(odds.home.bookmaker, "tipp3");
        assert!((odds.home.odd - 2.4).abs() < 1e-9);
        assert!((odds.away.odd - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_quote_matched_by_near_names() {
        let mut m = sample_match("m9");
        m.home_team = team("SKN St. Polten");
        m.away_team = team("Admira Wacker");

        let board = OddsBoard::from_quotes(&[
            named_quote("win2day", "SKN St. Pölten", "FC Admira Wacker", [2.0, 3.4, 3.5]),
            named_quote("lottoland", "St. Pölten", "Admira", [2.1, 3.3, 3.6]),
        ]);

        let odds = board.best_odds_for(&m).unwrap();
        assert_eq!(odds.home.bookmaker, "win2day");
        assert!((odds.draw.odd - 3.4).abs() < 1e-9);
        assert!((odds.away.odd - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_quote_with_swapped_sides() {
        let board = OddsBoard::from_quotes(&[named_quote(
            "lottoland",
            "Austria Lustenau",
            "Admira",
            [3.1, 3.3, 2.2],
        )]);

        let odds = board.best_odds_for(&sample_match("m1")).unwrap();
        assert!((odds.home.odd - 2.2).abs() < 1e-9);
        assert!((odds.away.odd - 3.1).abs() < 1e-9);
        assert_eq!(odds.home.bookmaker, "lottoland");
    }

    #[test]
    fn test_name_matching_rejects_other_fixtures() {
        let mut other_day = named_quote("tipp3", "Admira", "Austria Lustenau", [2.4, 3.3, 2.8]);
        other_day.kickoff = Some(Utc.with_ymd_and_hms(2025, 9, 13, 16, 0, 0).unwrap());

        let board = OddsBoard::from_quotes(&[
            other_day,
            named_quote("tipp3", "Admira", "Austria Wien", [2.4, 3.3, 2.8]),
            named_quote("tipp3", "Austria Lustenau", "", [2.4, 3.3, 2.8]),
        ]);
        assert!(board.best_odds_for(&sample_match("m1")).is_none());

        let mut same_day = named_quote("tipp3", "Admira", "Austria Lustenau", [2.4, 3.3, 2.8]);
        same_day.kickoff = Some(Utc.with_ymd_and_hms(2025, 8, 22, 18, 30, 0).unwrap());
        let board = OddsBoard::from_quotes(&[same_day]);
        assert!(board.best_odds_for(&sample_match("m1")).is_some());
    }

    #[test]
    fn test_id_and_name_quotes_are_merged() {
        let board = OddsBoard::from_quotes(&[
            quote("m1", "Pinnacle", 2.3, 3.5, 3.0),
            named_quote("tipp3", "Admira", "Austria Lustenau", [2.5, 3.2, 2.9]),
        ]);
        let odds = board.best_odds_for(&sample_match("m1")).unwrap();
        assert_eq!(odds.home.bookmaker, "tipp3");
        assert_eq!(odds.draw.bookmaker, "Pinnacle");
        assert_eq!(odds.away.bookmaker, "Pinnacle");
    }

    #[test]
    fn test_quote_file_without_match_id() {
        let quote: BookmakerQuote = serde_json::from_value(serde_json::json!({
            "bookmaker": "win2day",
            "homeTeam": "Sturm Graz",
            "awayTeam": "LASK",
            "kickoff": "2025-08-23T15:00:00Z",
            "home": 1.85, "draw": 3.6, "away": 4.2
        }))
        .unwrap();
        assert_eq!(quote.match_id, None);
        assert_eq!(quote.home_team.as_deref(), Some("Sturm Graz"));
    }
}
