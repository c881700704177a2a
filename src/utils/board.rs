use crate::api::ShapeTag;
use crate::error::SkippedRecord;
use crate::models::{League, LeagueDescriptor, NormalizedMatch};
use crate::utils::normalize::{normalize_all, NormalizeContext};
use crate::utils::odds::{attach_odds, OddsProvider};
use crate::utils::relevance::filter_and_sort;
use crate::utils::rounds::{round_label, select_current_round};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// The round a league is currently in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub index: usize,
    pub label: String,
    pub matches: Vec<NormalizedMatch>,
}

/// Everything the presentation layer needs for one league
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueBoard {
    pub league: League,
    pub generated_at: DateTime<Utc>,
    pub current_round: Option<RoundView>,
    pub relevant: Vec<NormalizedMatch>,
    #[serde(skip)]
    pub skipped: Vec<SkippedRecord>,
}

/// Run raw upstream records through normalization, round labelling, round selection,
/// relevance filtering and odds attachment.
pub fn build_board(
    raw: &[Value],
    shape: ShapeTag,
    descriptor: &LeagueDescriptor,
    now: DateTime<Utc>,
    odds: Option<&dyn OddsProvider>,
) -> LeagueBoard {
    let ctx = NormalizeContext {
        season: descriptor.season.as_deref(),
        ..NormalizeContext::new(&descriptor.league, now)
    };
    let outcome = normalize_all(raw, shape, &ctx);

    // Upstream round labels win over the calendar estimate
    let mut season: Vec<NormalizedMatch> = outcome
        .matches
        .iter()
        .map(|m| {
            let round = m
                .round
                .clone()
                .or_else(|| round_label(m.kickoff_time, descriptor));
            m.with_round(round)
        })
        .collect();
    season.sort_by_key(|m| m.kickoff_time);

    let current_round = select_current_round(&season, descriptor.matches_per_round, now).map(
        |selection| {
            let label = selection
                .round_matches
                .iter()
                .find_map(|m| m.round.clone())
                .unwrap_or_else(|| descriptor.format_round(selection.round_number()));

            RoundView {
                index: selection.round_index,
                label,
                matches: finish(selection.round_matches, now, odds),
            }
        },
    );

    LeagueBoard {
        league: descriptor.league.clone(),
        generated_at: now,
        current_round,
        relevant: finish(&season, now, odds),
        skipped: outcome.skipped,
    }
}

fn finish(
    matches: &[NormalizedMatch],
    now: DateTime<Utc>,
    odds: Option<&dyn OddsProvider>,
) -> Vec<NormalizedMatch> {
    filter_and_sort(matches, now)
        .iter()
        .map(|m| attach_odds(m, odds))
        .collect()
}
