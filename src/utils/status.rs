use crate::models::MatchStatus;
use chrono::{DateTime, Duration, Utc};

/// Minutes after kickoff a match is assumed to be in play (90 + stoppage/half-time)
pub const LIVE_WINDOW_MINUTES: i64 = 105;
/// Minutes after kickoff a finished match stays relevant
pub const GRACE_WINDOW_MINUTES: i64 = 120;

pub fn live_window() -> Duration {
    Duration::minutes(LIVE_WINDOW_MINUTES)
}

pub fn grace_window() -> Duration {
    Duration::minutes(GRACE_WINDOW_MINUTES)
}

/// Status hints reported by an upstream feed.
///
/// Only set `finished` for feeds that report it reliably; feeds without a trustworthy
/// finished flag leave it `None` and get time-based classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamFlags {
    pub finished: Option<bool>,
    pub started: Option<bool>,
    pub cancelled: Option<bool>,
    pub ongoing: Option<bool>,
    pub short_code: Option<String>,
}

impl UpstreamFlags {
    fn is_cancelled(&self) -> bool {
        self.cancelled == Some(true)
            || self.short_code.as_deref().is_some_and(|code| {
                matches!(
                    code.trim().to_ascii_uppercase().as_str(),
                    "CANC" | "PPD" | "POSTP" | "ABD" | "ABAN"
                )
            })
    }

    fn is_finished(&self) -> bool {
        self.finished == Some(true)
            || self.short_code.as_deref().is_some_and(|code| {
                matches!(code.trim().to_ascii_uppercase().as_str(), "FT" | "AET" | "PEN")
            })
    }

    fn is_in_play(&self) -> bool {
        self.started == Some(true) || self.ongoing == Some(true)
    }
}

/// Classify a match from its kickoff, the current instant and optional upstream flags.
///
/// Total: every input maps to exactly one status. Upstream flags win for cancellation and
/// completion; otherwise elapsed time decides, so a stale feed corrects itself within the
/// grace window without a fresh fetch.
pub fn classify(
    kickoff: DateTime<Utc>,
    now: DateTime<Utc>,
    flags: Option<&UpstreamFlags>,
) -> MatchStatus {
    if let Some(flags) = flags {
        if flags.is_cancelled() {
            return MatchStatus::Cancelled;
        }
        if flags.is_finished() {
            return MatchStatus::Finished;
        }
    }

    if now < kickoff {
        return MatchStatus::Scheduled;
    }

    let elapsed = now - kickoff;

    // A feed that says the match is under way keeps it live until the grace window closes
    if flags.is_some_and(UpstreamFlags::is_in_play) && elapsed < grace_window() {
        return MatchStatus::Live;
    }

    if elapsed < live_window() {
        MatchStatus::Live
    } else {
        MatchStatus::Finished
    }
}
