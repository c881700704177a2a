use crate::api::RawTimestamp;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Layouts accepted for kickoffs without a zone, after RFC 3339 fails
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Same with a numeric offset, which may lack the colon ("+0200")
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M%z",
];

/// Parse an upstream kickoff string into a UTC instant.
///
/// Strings without a `Z` marker or numeric offset are naive and read as UTC, never local
/// time. A space between date and time is accepted in place of `T`, and seconds may be
/// left out.
pub fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let iso = trimmed.replacen(' ', "T", 1);
    if let Ok(dt) = DateTime::parse_from_rfc3339(&iso) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(naive) = iso.strip_suffix(&['Z', 'z'][..]) {
        return parse_naive(naive);
    }
    if has_zone_marker(&iso) {
        return OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(&iso, format).ok())
            .map(|dt| dt.with_timezone(&Utc));
    }
    parse_naive(&iso)
}

fn parse_naive(iso: &str) -> Option<DateTime<Utc>> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(iso, format).ok())
        .map(|naive| naive.and_utc())
}

/// Kickoff from either wire form the feeds use
pub fn parse_raw_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Epoch(seconds) if *seconds > 0 => DateTime::from_timestamp(*seconds, 0),
        RawTimestamp::Epoch(_) => None,
        RawTimestamp::Text(text) => parse_kickoff(text),
    }
}

/// Printable form of a raw timestamp for skip reports
pub fn describe_raw_timestamp(raw: &RawTimestamp) -> String {
    match raw {
        RawTimestamp::Epoch(seconds) => seconds.to_string(),
        RawTimestamp::Text(text) => text.clone(),
    }
}

fn has_zone_marker(iso: &str) -> bool {
    let Some((_, time)) = iso.split_once(&['T', 't'][..]) else {
        return false;
    };
    time.ends_with(&['Z', 'z'][..]) || time.contains(&['+', '-'][..])
}
