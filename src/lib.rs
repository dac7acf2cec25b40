//! Talent matcher library: candidate/job similarity, screening rubric and ranking

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{MatcherError, Result, ScoreWarning};
pub use processing::{CandidateProfile, JobDescriptor, Lexicon, MatchEngine, MatchResult};
