use crate::models::{LeagueDescriptor, NormalizedMatch};
use crate::utils::status::grace_window;
use chrono::{DateTime, NaiveDate, Utc};

/// Anything with a kickoff instant can be grouped into rounds
pub trait Kickoff {
    fn kickoff(&self) -> DateTime<Utc>;
}

impl Kickoff for NormalizedMatch {
    fn kickoff(&self) -> DateTime<Utc> {
        self.kickoff_time
    }
}

impl Kickoff for DateTime<Utc> {
    fn kickoff(&self) -> DateTime<Utc> {
        *self
    }
}

/// The round considered current and its zero-based position in the season
#[derive(Debug)]
pub struct RoundSelection<'a, T> {
    pub round_matches: &'a [T],
    pub round_index: usize,
}

impl<T> Clone for RoundSelection<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RoundSelection<'_, T> {}

impl<T> RoundSelection<'_, T> {
    /// One-based round number for display
    pub fn round_number(&self) -> u32 {
        self.round_index as u32 + 1
    }
}

/// Pick the current round from matches sorted by kickoff, cut into consecutive groups of
/// `matches_per_round` (the last group may be short).
///
/// A round stays current until its latest kickoff plus the grace window has passed, so
/// it does not advance while any of its fixtures can still be running. Once every round
/// is over, the last one is returned. `None` for an empty list or a zero round size.
pub fn select_current_round<T: Kickoff>(
    matches: &[T],
    matches_per_round: usize,
    now: DateTime<Utc>,
) -> Option<RoundSelection<'_, T>> {
    if matches_per_round == 0 {
        return None;
    }
    select_from_groups(matches.chunks(matches_per_round), now)
}

/// Same rule over rounds that are already grouped (e.g. by an upstream round label).
/// Rounds without matches are skipped over, never returned as current.
pub fn select_current_round_grouped<T: Kickoff>(
    rounds: &[Vec<T>],
    now: DateTime<Utc>,
) -> Option<RoundSelection<'_, T>> {
    select_from_groups(rounds.iter().map(Vec::as_slice), now)
}

fn select_from_groups<'a, T: Kickoff>(
    groups: impl IntoIterator<Item = &'a [T]>,
    now: DateTime<Utc>,
) -> Option<RoundSelection<'a, T>> {
    let mut last = None;

    for (round_index, group) in groups.into_iter().enumerate() {
        let Some(closing) = group.iter().map(Kickoff::kickoff).max() else {
            continue;
        };

        let selection = RoundSelection {
            round_matches: group,
            round_index,
        };
        if now < closing + grace_window() {
            return Some(selection);
        }
        last = Some(selection);
    }

    last
}

/// Round number from the season calendar: whole weeks since the first matchday, plus one.
///
/// Kickoffs before the season start or past `total_rounds` have no round; a value out of
/// range points at a wrong descriptor, not at something to estimate.
pub fn round_number(
    kickoff: DateTime<Utc>,
    season_start: NaiveDate,
    total_rounds: Option<u32>,
) -> Option<u32> {
    let days = (kickoff.date_naive() - season_start).num_days();
    if days < 0 {
        return None;
    }
    let number = u32::try_from(days / 7).ok()? + 1;
    match total_rounds {
        Some(total) if number > total => None,
        _ => Some(number),
    }
}

/// Display label ("9. Spieltag") for a kickoff under a league's calendar
pub fn round_label(kickoff: DateTime<Utc>, descriptor: &LeagueDescriptor) -> Option<String> {
    round_number(kickoff, descriptor.season_start, descriptor.total_rounds)
        .map(|n| descriptor.format_round(n))
}
