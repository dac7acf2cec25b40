//! Combined similarity of one candidate against one job

use crate::config::ScoringConfig;
use crate::error::ScoreWarning;
use crate::processing::experience::{experience_score, resolve_required_years};
use crate::processing::lexical::lexical_similarity;
use crate::processing::lexicon::Lexicon;
use crate::processing::requirements::JobRequirement;
use crate::processing::skill_match::skill_set_similarity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Candidate attributes as seen by the scorer. Built fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub title: String,
    pub location: String,
    pub experience_years: f64,
}

impl CandidateProfile {
    /// Trims skills, drops blank entries and removes duplicates.
    pub fn new<I, S>(skills: I, title: impl Into<String>, location: impl Into<String>, experience_years: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let skills: BTreeSet<String> = skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            skills: skills.into_iter().collect(),
            title: title.into().trim().to_string(),
            location: location.into().trim().to_string(),
            experience_years,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct JobDescriptor {
    pub title: String,
    pub skills: Vec<JobRequirement>,
    pub location: String,
    /// Years required; `0` means "infer from the title".
    pub experience_level: f64,
}

/// Sub-scores behind one similarity value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    pub skill_score: f64,
    pub experience_score: f64,
    pub required_years: f64,
    pub location_score: f64,
    pub title_score: f64,
    pub similarity: f64,
}

fn finite(value: f64, what: &'static str) -> Result<f64, ScoreWarning> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoreWarning::NonFinite(what))
    }
}

/// Full similarity computation with its warning channel intact.
pub fn try_score_match(
    lexicon: &Lexicon,
    weights: &ScoringConfig,
    candidate: &CandidateProfile,
    job: &JobDescriptor,
) -> Result<SimilarityBreakdown, ScoreWarning> {
    if !candidate.experience_years.is_finite() || candidate.experience_years < 0.0 {
        return Err(ScoreWarning::MalformedCandidate(format!(
            "experience years must be a non-negative number, got {}",
            candidate.experience_years
        )));
    }
    if !job.experience_level.is_finite() || job.experience_level < 0.0 {
        return Err(ScoreWarning::MalformedJob(format!(
            "experience level must be a non-negative number, got {}",
            job.experience_level
        )));
    }

    let skill_score = finite(skill_set_similarity(&candidate.skills, &job.skills), "skill")?;

    let required_years = resolve_required_years(lexicon, job.experience_level, &job.title);
    let experience = finite(experience_score(candidate.experience_years, required_years), "experience")?;

    let location_score = finite(lexical_similarity(&candidate.location, &job.location), "location")?;
    let title_score = finite(lexical_similarity(&candidate.title, &job.title), "title")?;

    let raw = weights.skill_weight * skill_score
        + weights.experience_weight * experience
        + weights.location_weight * location_score
        + weights.title_weight * title_score;
    let similarity = finite(raw, "similarity")?.clamp(0.0, 1.0);

    log::debug!(
        "Similarity {:.4} (skills {:.4}, experience {:.2} vs {} yrs, location {:.4}, title {:.4})",
        similarity,
        skill_score,
        experience,
        required_years,
        location_score,
        title_score
    );

    Ok(SimilarityBreakdown {
        skill_score,
        experience_score: experience,
        required_years,
        location_score,
        title_score,
        similarity,
    })
}

/// Similarity in `[0, 1]`; any warning is logged and collapses to `0.0`.
pub fn score_match(
    lexicon: &Lexicon,
    weights: &ScoringConfig,
    candidate: &CandidateProfile,
    job: &JobDescriptor,
) -> f64 {
    match try_score_match(lexicon, weights, candidate, job) {
        Ok(breakdown) => breakdown.similarity,
        Err(warning) => {
            log::warn!("Scoring failed, using 0: {}", warning);
            0.0
        }
    }
}
