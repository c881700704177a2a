use crate::api::ShapeTag;
use thiserror::Error;

/// Failures that abort a whole normalization batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// No normalizer exists for this shape tag. A programming error, never data quality.
    #[error("unsupported upstream shape: {0:?}")]
    UnsupportedShape(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}

/// Why a single record was dropped from a batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("not a valid {shape} record: {message}")]
    Malformed { shape: ShapeTag, message: String },

    #[error("missing or unparseable kickoff time {0:?}")]
    InvalidKickoff(Option<String>),

    #[error("{0} team block is empty")]
    EmptyTeam(Side),

    #[error("record has no match id")]
    MissingId,
}

/// A dropped record and where it sat in the batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub upstream_id: Option<String>,
    pub reason: SkipReason,
}

impl std::fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.upstream_id {
            Some(id) => write!(f, "record #{} (id {}): {}", self.index, id, self.reason),
            None => write!(f, "record #{}: {}", self.index, self.reason),
        }
    }
}
