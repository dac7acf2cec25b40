//! Matching core: lexical primitives, requirement classification, scoring
//! and ranking

pub mod batch;
pub mod engine;
pub mod experience;
pub mod interactions;
pub mod lexical;
pub mod lexicon;
pub mod ranking;
pub mod requirements;
pub mod screening;
pub mod similarity;
pub mod skill_match;

pub use engine::{JobRecommendation, MatchEngine, MatchResult};
pub use lexicon::Lexicon;
pub use similarity::{CandidateProfile, JobDescriptor, SimilarityBreakdown};
