//! Matching engine tying the lexicon and configuration to every scoring entry point

use crate::config::Config;
use crate::error::{Result, ScoreWarning};
use crate::input::records::{CandidateRecord, JobRecord};
use crate::processing::lexicon::Lexicon;
use crate::processing::ranking::{self, ApplicantScore, JobScore};
use crate::processing::requirements::{self, JobRequirement};
use crate::processing::screening::{self, ScreeningAnswer, ScreeningOutcome, ScreeningQuestion};
use crate::processing::similarity::{self, CandidateProfile, JobDescriptor, SimilarityBreakdown};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Scoring facade. Cheap to clone; the lexicon is shared.
#[derive(Clone)]
pub struct MatchEngine {
    lexicon: Arc<Lexicon>,
    config: Config,
}

/// Outcome of scoring one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Combined similarity in `[0, 1]`
    pub similarity: f64,
    /// Screening aggregate in `[0, 100]`, absent without answers
    pub screening_score: Option<f64>,
    pub combined_rank: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub index: usize,
    pub job_id: String,
    pub title: String,
    pub similarity: f64,
    pub adjusted_score: f64,
}

impl MatchEngine {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_lexicon(Arc::new(Lexicon::new()?), config))
    }

    pub fn with_lexicon(lexicon: Arc<Lexicon>, config: Config) -> Self {
        Self { lexicon, config }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classify_requirement(&self, phrase: &str) -> JobRequirement {
        requirements::classify_requirement(&self.lexicon, phrase)
    }

    /// Validate, classify and de-duplicate the requirement phrases of a new job.
    pub fn extract_requirements<S: AsRef<str>>(&self, phrases: &[S]) -> Vec<JobRequirement> {
        requirements::extract_structured_requirements(
            &self.lexicon,
            phrases,
            self.config.classifier.merge_threshold,
        )
    }

    pub fn try_score_match(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescriptor,
    ) -> std::result::Result<SimilarityBreakdown, ScoreWarning> {
        similarity::try_score_match(&self.lexicon, &self.config.scoring, candidate, job)
    }

    pub fn score_match(&self, candidate: &CandidateProfile, job: &JobDescriptor) -> f64 {
        similarity::score_match(&self.lexicon, &self.config.scoring, candidate, job)
    }

    pub fn score_screening(&self, answers: &[ScreeningAnswer], questions: &[ScreeningQuestion]) -> ScreeningOutcome {
        screening::score_responses(&self.lexicon, answers, questions)
    }

    pub fn candidate_profile(&self, record: &CandidateRecord) -> CandidateProfile {
        record.to_profile()
    }

    pub fn job_descriptor(&self, record: &JobRecord) -> JobDescriptor {
        record.to_descriptor(&self.lexicon)
    }

    /// Score one application: similarity, screening and the rank they blend into.
    pub fn evaluate(&self, candidate: &CandidateRecord, job: &JobRecord, answers: &[ScreeningAnswer]) -> MatchResult {
        let similarity = self.score_match(&self.candidate_profile(candidate), &self.job_descriptor(job));

        let screening_score = if answers.is_empty() {
            None
        } else {
            Some(self.score_screening(answers, &job.screening_questions).aggregate)
        };

        let combined_rank = ranking::combined_rank(
            &ApplicantScore {
                similarity,
                screening_score,
            },
            job.has_screening(),
            &self.config.ranking,
        );

        MatchResult {
            similarity,
            screening_score,
            combined_rank,
        }
    }

    pub fn rank_candidates(&self, applicants: &[ApplicantScore], has_screening: bool) -> Vec<usize> {
        ranking::rank_candidates(applicants, has_screening, &self.config.ranking)
    }

    /// Jobs worth showing to a candidate, best first. Jobs with no similarity
    /// at all are left out.
    pub fn recommend_jobs(
        &self,
        candidate: &CandidateProfile,
        jobs: &[JobRecord],
        now: DateTime<Utc>,
    ) -> Vec<JobRecommendation> {
        let scored: Vec<(usize, f64)> = jobs
            .iter()
            .enumerate()
            .map(|(index, job)| (index, self.score_match(candidate, &self.job_descriptor(job))))
            .filter(|(_, similarity)| *similarity > 0.0)
            .collect();

        let job_scores: Vec<JobScore> = scored
            .iter()
            .map(|&(index, similarity)| JobScore {
                similarity,
                created_at: jobs[index].posted_at(),
            })
            .collect();

        ranking::rank_jobs_for_candidate_detailed(&job_scores, now)
            .into_iter()
            .map(|entry| {
                let (index, similarity) = scored[entry.index];
                JobRecommendation {
                    index,
                    job_id: jobs[index].id.clone(),
                    title: jobs[index].title.clone(),
                    similarity,
                    adjusted_score: entry.score,
                }
            })
            .collect()
    }
}
