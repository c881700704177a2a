use crate::api::{
    peek_upstream_id, FeedTeam, LeagueTableMatch, LiveFeedMatch, OddsFeedEvent, RawMatch,
    ShapeTag, UpstreamId,
};
use crate::error::{NormalizeError, Side, SkipReason, SkippedRecord};
use crate::models::{League, MatchStatus, NormalizedMatch, Team};
use crate::utils::kickoff::{describe_raw_timestamp, parse_kickoff, parse_raw_timestamp};
use crate::utils::odds::best_odds_from_prices;
use crate::utils::status::{classify, UpstreamFlags};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Bookmaker credited for prices embedded in the odds feed
pub const ODDS_FEED_BOOKMAKER: &str = "Pinnacle";

/// Everything a normalizer needs besides the record itself
#[derive(Debug, Clone)]
pub struct NormalizeContext<'a> {
    pub league: &'a League,
    pub round: Option<&'a str>,
    pub season: Option<&'a str>,
    pub now: DateTime<Utc>,
}

impl<'a> NormalizeContext<'a> {
    pub fn new(league: &'a League, now: DateTime<Utc>) -> Self {
        Self {
            league,
            round: None,
            season: None,
            now,
        }
    }
}

/// Result of normalizing a batch
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub matches: Vec<NormalizedMatch>,
    pub skipped: Vec<SkippedRecord>,
}

/// Deterministic team id from a display name: lowercase, whitespace runs become hyphens
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub fn derive_team_id(name: &str) -> String {
    slugify(name)
}

/// Up to three uppercase initials. Acronym words ("RB", "FC") contribute every letter.
///
/// "Red Bull Salzburg" -> "RBS", "RB Salzburg" -> "RBS", "Rapid Wien" -> "RW"
pub fn derive_short_name(name: &str) -> String {
    name.split_whitespace()
        .flat_map(|word| {
            let chars: Vec<char> = word.chars().filter(|c| c.is_alphanumeric()).collect();
            let mut letters = chars.iter().filter(|c| c.is_alphabetic()).peekable();
            let is_acronym = letters.peek().is_some() && letters.all(|c| c.is_uppercase());
            if is_acronym {
                chars
            } else {
                chars.into_iter().take(1).collect()
            }
        })
        .flat_map(char::to_uppercase)
        .take(3)
        .collect()
}

/// Weekend/live feed records
pub fn normalize_live_feed(
    raw: &LiveFeedMatch,
    ctx: &NormalizeContext,
) -> Result<NormalizedMatch, SkipReason> {
    let kickoff = match &raw.utc_time {
        Some(ts) => parse_raw_timestamp(ts)
            .ok_or_else(|| SkipReason::InvalidKickoff(Some(describe_raw_timestamp(ts))))?,
        None => return Err(SkipReason::InvalidKickoff(None)),
    };
    let home = team_from_feed(raw.home_team.as_ref(), Side::Home)?;
    let away = team_from_feed(raw.away_team.as_ref(), Side::Away)?;

    let flags = raw.status.as_ref().map(|status| UpstreamFlags {
        finished: status.finished,
        started: status.started,
        cancelled: status.cancelled,
        ..Default::default()
    });

    Ok(assemble(raw.id.as_ref(), home, away, kickoff, flags.as_ref(), ctx))
}

/// League-table feed records; `scoreStr` fills in missing team scores
pub fn normalize_league_table(
    raw: &LeagueTableMatch,
    ctx: &NormalizeContext,
) -> Result<NormalizedMatch, SkipReason> {
    let status = raw.status.clone().unwrap_or_default();
    let kickoff = match &status.utc_time {
        Some(ts) => parse_raw_timestamp(ts)
            .ok_or_else(|| SkipReason::InvalidKickoff(Some(describe_raw_timestamp(ts))))?,
        None => return Err(SkipReason::InvalidKickoff(None)),
    };
    let mut home = team_from_feed(raw.home.as_ref(), Side::Home)?;
    let mut away = team_from_feed(raw.away.as_ref(), Side::Away)?;

    if let Some((home_score, away_score)) = status.parsed_score() {
        home.score = home.score.or(Some(home_score));
        away.score = away.score.or(Some(away_score));
    }

    let flags = UpstreamFlags {
        finished: status.finished,
        started: status.started,
        cancelled: status.cancelled,
        ongoing: status.ongoing,
        short_code: status.short_code().map(str::to_string),
    };

    Ok(assemble(raw.id.as_ref(), home, away, kickoff, Some(&flags), ctx))
}

/// Sportsbook odds feed events. Team names are plain strings, kickoffs are naive UTC,
/// and the full-match money line becomes `best_odds`.
pub fn normalize_odds_feed(
    raw: &OddsFeedEvent,
    ctx: &NormalizeContext,
) -> Result<NormalizedMatch, SkipReason> {
    let kickoff = match raw.starts.as_deref() {
        Some(starts) => parse_kickoff(starts)
            .ok_or_else(|| SkipReason::InvalidKickoff(Some(starts.to_string())))?,
        None => return Err(SkipReason::InvalidKickoff(None)),
    };
    let home = team_from_name(raw.home.as_deref(), Side::Home)?;
    let away = team_from_name(raw.away.as_deref(), Side::Away)?;

    // The odds feed has no reliable finished flag, only whether the event is in play
    let flags = UpstreamFlags {
        started: raw.is_live().then_some(true),
        ..Default::default()
    };

    let best_odds = raw.full_match_money_line().and_then(|line| {
        best_odds_from_prices(line.home?, line.draw?, line.away?, ODDS_FEED_BOOKMAKER)
    });

    let normalized = assemble(raw.event_id.as_ref(), home, away, kickoff, Some(&flags), ctx);
    Ok(normalized.with_best_odds(best_odds))
}

/// Records that were normalized earlier (e.g. a cached board). Validates them, derives
/// the status again for `ctx.now` and applies the round/season overrides.
pub fn validate_normalized(
    raw: &NormalizedMatch,
    ctx: &NormalizeContext,
) -> Result<NormalizedMatch, SkipReason> {
    if raw.id.trim().is_empty() {
        return Err(SkipReason::MissingId);
    }
    for (side, team) in [(Side::Home, &raw.home_team), (Side::Away, &raw.away_team)] {
        if team.id.trim().is_empty() && team.name.trim().is_empty() {
            return Err(SkipReason::EmptyTeam(side));
        }
    }

    // A stored status is only a hint, like any upstream flag
    let flags = UpstreamFlags {
        cancelled: (raw.status == MatchStatus::Cancelled).then_some(true),
        finished: (raw.status == MatchStatus::Finished).then_some(true),
        started: (raw.status == MatchStatus::Live).then_some(true),
        ..Default::default()
    };

    let mut validated = raw.clone();
    validated.status = classify(raw.kickoff_time, ctx.now, Some(&flags));
    if !validated.status.has_started() {
        validated.home_team.score = None;
        validated.away_team.score = None;
    }
    if validated.best_odds.as_ref().is_some_and(|odds| !odds.all_valid()) {
        validated.best_odds = None;
    }
    if let Some(round) = ctx.round {
        validated.round = Some(round.to_string());
    }
    if let Some(season) = ctx.season {
        validated.season = Some(season.to_string());
    }
    Ok(validated)
}

/// Normalize one decoded record
pub fn normalize(raw: &RawMatch, ctx: &NormalizeContext) -> Result<NormalizedMatch, SkipReason> {
    match raw {
        RawMatch::LiveFeed(m) => normalize_live_feed(m, ctx),
        RawMatch::LeagueTable(m) => normalize_league_table(m, ctx),
        RawMatch::OddsFeed(m) => normalize_odds_feed(m, ctx),
        RawMatch::Normalized(m) => validate_normalized(m, ctx),
    }
}

/// Normalize a batch of records that all share one shape
pub fn normalize_all(raw_list: &[Value], shape: ShapeTag, ctx: &NormalizeContext) -> NormalizeOutcome {
    normalize_tagged(raw_list.iter().map(|value| (shape, value)), ctx)
}

/// Like `normalize_all`, but with the shape given as an upstream tag string.
/// Unknown tags fail the whole call.
pub fn normalize_batch(
    raw_list: &[Value],
    shape_tag: &str,
    ctx: &NormalizeContext,
) -> Result<NormalizeOutcome, NormalizeError> {
    let shape: ShapeTag = shape_tag.parse()?;
    Ok(normalize_all(raw_list, shape, ctx))
}

/// Normalize records that each carry their own shape
pub fn normalize_tagged<'v>(
    records: impl IntoIterator<Item = (ShapeTag, &'v Value)>,
    ctx: &NormalizeContext,
) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    for (index, (shape, value)) in records.into_iter().enumerate() {
        match RawMatch::from_value(shape, value).and_then(|raw| normalize(&raw, ctx)) {
            Ok(normalized) => outcome.matches.push(normalized),
            Err(reason) => outcome.skipped.push(SkippedRecord {
                index,
                upstream_id: peek_upstream_id(value),
                reason,
            }),
        }
    }

    outcome
}

fn team_from_feed(team: Option<&FeedTeam>, side: Side) -> Result<Team, SkipReason> {
    let team = team
        .filter(|t| !t.is_empty())
        .ok_or(SkipReason::EmptyTeam(side))?;

    let name = team.name.as_deref().unwrap_or_default().trim().to_string();
    let id = team
        .id
        .as_ref()
        .and_then(UpstreamId::to_id_string)
        .unwrap_or_else(|| derive_team_id(&name));
    let short_name = non_blank(team.short_name.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| derive_short_name(&name));

    Ok(Team {
        id,
        name,
        short_name,
        logo_url: non_blank(team.logo_url.as_deref()).map(str::to_string),
        score: team.score,
    })
}

fn team_from_name(name: Option<&str>, side: Side) -> Result<Team, SkipReason> {
    let name = non_blank(name).ok_or(SkipReason::EmptyTeam(side))?;
    Ok(Team {
        id: derive_team_id(name),
        name: name.to_string(),
        short_name: derive_short_name(name),
        logo_url: None,
        score: None,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Shared tail of every shape: status, score clearing, id fallback, overrides
fn assemble(
    upstream_id: Option<&UpstreamId>,
    mut home: Team,
    mut away: Team,
    kickoff: DateTime<Utc>,
    flags: Option<&UpstreamFlags>,
    ctx: &NormalizeContext,
) -> NormalizedMatch {
    let status = classify(kickoff, ctx.now, flags);
    if !status.has_started() {
        home.score = None;
        away.score = None;
    }

    let id = upstream_id
        .and_then(UpstreamId::to_id_string)
        .unwrap_or_else(|| format!("{}-{}-{}", home.id, away.id, kickoff.format("%Y%m%d%H%M")));

    NormalizedMatch {
        id,
        league: ctx.league.clone(),
        home_team: home,
        away_team: away,
        kickoff_time: kickoff,
        status,
        round: ctx.round.map(str::to_string),
        season: ctx.season.map(str::to_string),
        best_odds: None,
    }
}
