//! Error handling for the talent matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, MatcherError>;

/// Recoverable problem detected while scoring.
///
/// The public scoring entry points collapse any warning into a score of `0.0`;
/// the `try_*` variants hand it back so callers can tell a failed computation
/// apart from a genuine zero overlap.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreWarning {
    #[error("requirement #{index} has no skill")]
    MalformedRequirement { index: usize },

    #[error("malformed candidate profile: {0}")]
    MalformedCandidate(String),

    #[error("malformed job descriptor: {0}")]
    MalformedJob(String),

    #[error("non-finite {0} score")]
    NonFinite(&'static str),
}
