//! Ranking of applicants for a job and of jobs for a candidate

use crate::config::RankingConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Scores of one application as stored by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ApplicantScore {
    pub similarity: f64,
    /// Screening aggregate in `[0, 100]`, absent when nothing was answered.
    pub screening_score: Option<f64>,
}

/// A job as seen by the candidate-side ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobScore {
    pub similarity: f64,
    pub created_at: DateTime<Utc>,
}

/// Position in the input list together with the score it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub index: usize,
    pub score: f64,
}

fn sanitize(score: f64) -> f64 {
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Stable descending sort; equal scores keep their input order.
fn rank_by<F>(len: usize, score_of: F) -> Vec<RankedEntry>
where
    F: Fn(usize) -> f64,
{
    let mut entries: Vec<RankedEntry> = (0..len)
        .map(|index| RankedEntry {
            index,
            score: sanitize(score_of(index)),
        })
        .collect();

    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    entries
}

/// `similarity` alone, or the configured blend with the screening score when
/// the job asks screening questions. A missing screening score counts as 0.
pub fn combined_rank(applicant: &ApplicantScore, has_screening: bool, config: &RankingConfig) -> f64 {
    let similarity = sanitize(applicant.similarity);
    if !has_screening {
        return similarity;
    }

    let screening = sanitize(applicant.screening_score.unwrap_or(0.0));
    config.similarity_weight * similarity + config.screening_weight * (screening / 100.0)
}

pub fn rank_candidates_detailed(
    applicants: &[ApplicantScore],
    has_screening: bool,
    config: &RankingConfig,
) -> Vec<RankedEntry> {
    rank_by(applicants.len(), |i| combined_rank(&applicants[i], has_screening, config))
}

/// Applicant indices, best first.
pub fn rank_candidates(applicants: &[ApplicantScore], has_screening: bool, config: &RankingConfig) -> Vec<usize> {
    rank_candidates_detailed(applicants, has_screening, config)
        .into_iter()
        .map(|entry| entry.index)
        .collect()
}

/// Fractional age in days; postings dated in the future count as brand new.
pub fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - created_at).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).max(0.0)
}

/// `similarity x (1 + 1 / (age_days + 1))`
pub fn recency_boost(similarity: f64, age_days: f64) -> f64 {
    sanitize(similarity) * (1.0 + 1.0 / (age_days + 1.0))
}

pub fn rank_jobs_for_candidate_detailed(jobs: &[JobScore], now: DateTime<Utc>) -> Vec<RankedEntry> {
    rank_by(jobs.len(), |i| {
        recency_boost(jobs[i].similarity, age_in_days(jobs[i].created_at, now))
    })
}

/// Job indices, best first, newer postings favoured among near-equal matches.
pub fn rank_jobs_for_candidate(jobs: &[JobScore], now: DateTime<Utc>) -> Vec<usize> {
    rank_jobs_for_candidate_detailed(jobs, now)
        .into_iter()
        .map(|entry| entry.index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn applicant(similarity: f64, screening_score: Option<f64>) -> ApplicantScore {
        ApplicantScore {
            similarity,
            screening_score,
        }
    }

    #[test]
    fn test_similarity_only_without_screening() {
        let applicants = vec![applicant(0.4, Some(100.0)), applicant(0.9, None), applicant(0.6, Some(0.0))];
        let order = rank_candidates(&applicants, false, &RankingConfig::default());
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_screening_blend() {
        let config = RankingConfig::default();
        let strong_screening = applicant(0.5, Some(100.0));
        let rank = combined_rank(&strong_screening, true, &config);
        assert!((rank - (0.6 * 0.5 + 0.4)).abs() < 1e-12);

        let applicants = vec![applicant(0.7, Some(0.0)), strong_screening];
        assert_eq!(rank_candidates(&applicants, true, &config), vec![1, 0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let applicants = vec![
            applicant(0.5, Some(50.0)),
            applicant(0.8, Some(50.0)),
            applicant(0.5, Some(50.0)),
            applicant(0.5, Some(50.0)),
        ];
        let order = rank_candidates(&applicants, true, &RankingConfig::default());
        assert_eq!(order, vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_non_finite_scores_sink() {
        let applicants = vec![applicant(f64::NAN, None), applicant(0.1, None)];
        let ranked = rank_candidates_detailed(&applicants, false, &RankingConfig::default());
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_recency_boost() {
        assert_eq!(recency_boost(0.5, 0.0), 1.0);
        assert_eq!(recency_boost(0.5, 1.0), 0.75);
    }

    #[test]
    fn test_age_in_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(age_in_days(now - Duration::hours(36), now), 1.5);
        assert_eq!(age_in_days(now + Duration::days(2), now), 0.0);
    }

    #[test]
    fn test_newer_job_wins_near_tie() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let jobs = vec![
            JobScore {
                similarity: 0.62,
                created_at: now - Duration::days(30),
            },
            JobScore {
                similarity: 0.60,
                created_at: now - Duration::days(1),
            },
            JobScore {
                similarity: 0.20,
                created_at: now,
            },
        ];

        assert_eq!(rank_jobs_for_candidate(&jobs, now), vec![1, 0, 2]);
    }

    #[test]
    fn test_job_ranking_is_repeatable() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let jobs: Vec<JobScore> = (0..6)
            .map(|i| JobScore {
                similarity: 0.5,
                created_at: now - Duration::days(i % 3),
            })
            .collect();

        let first = rank_jobs_for_candidate_detailed(&jobs, now);
        let second = rank_jobs_for_candidate_detailed(&jobs, now);
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|e| e.index).collect::<Vec<_>>(),
            vec![0, 3, 1, 4, 2, 5]
        );
    }
}
