use crate::models::{MatchStatus, NormalizedMatch};
use crate::utils::status::grace_window;
use chrono::{DateTime, Utc};

/// Whether a match is still worth showing at `now`.
/// Everything but a finished match stays; a finished one stays inside the grace window.
pub fn is_relevant(m: &NormalizedMatch, now: DateTime<Utc>) -> bool {
    m.status != MatchStatus::Finished || now - m.kickoff_time < grace_window()
}

/// Live matches first, then everything else
fn status_rank(status: MatchStatus) -> u8 {
    match status {
        MatchStatus::Live => 0,
        _ => 1,
    }
}

/// Drop matches that finished outside the grace window and order the rest live-first,
/// then by kickoff. Stable, deterministic and idempotent.
pub fn filter_and_sort(matches: &[NormalizedMatch], now: DateTime<Utc>) -> Vec<NormalizedMatch> {
    let mut relevant: Vec<NormalizedMatch> = matches
        .iter()
        .filter(|m| is_relevant(m, now))
        .cloned()
        .collect();

    relevant.sort_by_key(|m| (status_rank(m.status), m.kickoff_time));
    relevant
}
