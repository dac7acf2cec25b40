//! Report structures produced by the CLI commands

use crate::input::records::{ApplicationRecord, JobRecord};
use crate::processing::engine::{JobRecommendation, MatchResult};
use crate::processing::requirements::JobRequirement;
use crate::processing::screening::ScreeningOutcome;
use crate::processing::similarity::SimilarityBreakdown;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Any report the formatters can render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Match(MatchReport),
    Classification(ClassificationReport),
    Screening(ScreeningReport),
    ApplicantRanking(ApplicantRankingReport),
    Recommendations(RecommendationReport),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One candidate against one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub candidate_id: String,
    pub job_id: String,
    pub job_title: String,
    /// Sub-scores; absent when scoring fell back to 0
    pub breakdown: Option<SimilarityBreakdown>,
    pub warning: Option<String>,
    pub result: MatchResult,
    pub screening: Option<ScreeningOutcome>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub phrases: Vec<String>,
    pub requirements: Vec<JobRequirement>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub job_id: String,
    pub outcome: ScreeningOutcome,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedApplicant {
    pub rank: usize,
    pub application_id: String,
    pub candidate_id: String,
    pub similarity: f64,
    pub screening_score: Option<f64>,
    pub combined_rank: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantRankingReport {
    pub job_id: String,
    pub job_title: String,
    pub has_screening: bool,
    pub applicants: Vec<RankedApplicant>,
    pub metadata: ReportMetadata,
}

impl ApplicantRankingReport {
    /// Build from applications that are already in ranked order.
    pub fn from_ranked<F>(job: &JobRecord, ranked: &[ApplicationRecord], combined_rank: F, metadata: ReportMetadata) -> Self
    where
        F: Fn(&ApplicationRecord) -> f64,
    {
        let applicants = ranked
            .iter()
            .enumerate()
            .map(|(position, application)| RankedApplicant {
                rank: position + 1,
                application_id: application.id.clone(),
                candidate_id: application.candidate.id.clone(),
                similarity: application.similarity,
                screening_score: application.screening_score,
                combined_rank: combined_rank(application),
            })
            .collect();

        Self {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            has_screening: job.has_screening(),
            applicants,
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub candidate_id: String,
    pub recommendations: Vec<JobRecommendation>,
    pub metadata: ReportMetadata,
}

impl Report {
    pub fn metadata(&self) -> &ReportMetadata {
        match self {
            Report::Match(r) => &r.metadata,
            Report::Classification(r) => &r.metadata,
            Report::Screening(r) => &r.metadata,
            Report::ApplicantRanking(r) => &r.metadata,
            Report::Recommendations(r) => &r.metadata,
        }
    }

    /// Short name used in suggested file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Report::Match(_) => "match",
            Report::Classification(_) => "requirements",
            Report::Screening(_) => "screening",
            Report::ApplicantRanking(_) => "applicants",
            Report::Recommendations(_) => "recommendations",
        }
    }
}

/// Similarity in `[0, 1]` as a whole percentage.
pub fn as_percentage(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}
