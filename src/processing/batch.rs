//! Batch recalculation of every application to a job

use crate::input::records::{ApplicationRecord, JobRecord};
use crate::processing::engine::MatchEngine;
use crate::processing::ranking::ApplicantScore;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Re-score one application in place: similarity, per-answer screening scores
/// and the screening aggregate.
pub fn recalculate_application(engine: &MatchEngine, job: &JobRecord, mut application: ApplicationRecord) -> ApplicationRecord {
    let profile = engine.candidate_profile(&application.candidate);
    application.similarity = engine.score_match(&profile, &engine.job_descriptor(job));

    application.screening_score = if application.responses.is_empty() {
        None
    } else {
        let outcome = engine.score_screening(&application.responses, &job.screening_questions);
        for (answer, response) in application.responses.iter_mut().zip(outcome.responses) {
            answer.score = Some(response.score);
        }
        Some(outcome.aggregate)
    };

    application
}

/// Recalculate all applications in parallel and return them best first.
///
/// Completion order of the workers has no influence on the result; running
/// it twice on unchanged inputs yields the same scores and order. An
/// application whose worker fails is kept with a similarity of 0.
pub async fn recalculate_applications(
    engine: Arc<MatchEngine>,
    job: &JobRecord,
    applications: Vec<ApplicationRecord>,
) -> Vec<ApplicationRecord> {
    let start = Instant::now();
    let job = Arc::new(job.clone());

    let mut tasks = JoinSet::new();
    for (index, application) in applications.iter().cloned().enumerate() {
        let engine = Arc::clone(&engine);
        let job = Arc::clone(&job);
        tasks.spawn_blocking(move || (index, recalculate_application(&engine, &job, application)));
    }

    let mut slots: Vec<Option<ApplicationRecord>> = vec![None; applications.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, application)) => slots[index] = Some(application),
            Err(e) => warn!("Recalculation task failed for job '{}': {}", job.title, e),
        }
    }

    let recalculated = fill_failed(slots, applications);

    let scores: Vec<ApplicantScore> = recalculated
        .iter()
        .map(|application| ApplicantScore {
            similarity: application.similarity,
            screening_score: application.screening_score,
        })
        .collect();
    let order = engine.rank_candidates(&scores, job.has_screening());

    let mut slots: Vec<Option<ApplicationRecord>> = recalculated.into_iter().map(Some).collect();
    let ranked: Vec<ApplicationRecord> = order.into_iter().filter_map(|i| slots[i].take()).collect();

    info!(
        "Recalculated {} applications for '{}' in {}ms",
        ranked.len(),
        job.title,
        start.elapsed().as_millis()
    );
    ranked
}

/// Pair every slot with its original application; an empty slot keeps the
/// original with its similarity zeroed.
fn fill_failed(slots: Vec<Option<ApplicationRecord>>, originals: Vec<ApplicationRecord>) -> Vec<ApplicationRecord> {
    slots
        .into_iter()
        .zip(originals)
        .map(|(slot, original)| {
            slot.unwrap_or_else(|| {
                warn!("Application '{}' kept with similarity 0", original.id);
                ApplicationRecord {
                    similarity: 0.0,
                    ..original
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::input::records::{CandidateRecord, RequirementEntry};
    use crate::processing::screening::{QuestionType, ScreeningAnswer, ScreeningQuestion};

    fn job() -> JobRecord {
        JobRecord {
            id: "j1".to_string(),
            title: "Backend Engineer".to_string(),
            requirements: vec![
                RequirementEntry::Plain("Rust".to_string()),
                RequirementEntry::Plain("PostgreSQL".to_string()),
            ],
            location: "Berlin".to_string(),
            experience_level: Some(3.0),
            screening_questions: vec![ScreeningQuestion {
                id: "q1".to_string(),
                question: "Preferred database?".to_string(),
                question_type: QuestionType::MultipleChoice,
                options: vec!["PostgreSQL".to_string(), "MySQL".to_string()],
                required: false,
                weight: 1.0,
            }],
            ..Default::default()
        }
    }

    fn application(id: &str, skills: &[&str], answer: &str) -> ApplicationRecord {
        ApplicationRecord {
            id: id.to_string(),
            candidate: CandidateRecord {
                id: format!("c-{}", id),
                skills: skills.iter().map(|s| s.to_string()).collect(),
                title: Some("Backend Engineer".to_string()),
                location: Some("Berlin".to_string()),
                experience_years: Some(4.0),
                ..Default::default()
            },
            responses: vec![ScreeningAnswer {
                question_id: Some("q1".to_string()),
                answer: answer.to_string(),
                score: Some(5.0),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_recalculation_ranks_and_overwrites_scores() {
        let engine = Arc::new(MatchEngine::new(Config::default()).unwrap());
        let applications = vec![
            application("a", &["Java"], "MySQL"),
            application("b", &["Rust", "PostgreSQL"], "PostgreSQL"),
            application("c", &["Rust"], "PostgreSQL"),
        ];

        let ranked = recalculate_applications(engine, &job(), applications).await;

        let ids: Vec<&str> = ranked.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(ranked[0].responses[0].score, Some(100.0));
        assert_eq!(ranked[0].screening_score, Some(100.0));
        assert_eq!(ranked[2].responses[0].score, Some(80.0));
    }

    #[tokio::test]
    async fn test_recalculation_is_idempotent() {
        let engine = Arc::new(MatchEngine::new(Config::default()).unwrap());
        let applications: Vec<ApplicationRecord> = (0..12)
            .map(|i| {
                let skills: &[&str] = if i % 2 == 0 { &["Rust"] } else { &["Go", "SQL"] };
                application(&i.to_string(), skills, "MySQL")
            })
            .collect();

        let first = recalculate_applications(Arc::clone(&engine), &job(), applications).await;
        let second = recalculate_applications(engine, &job(), first.clone()).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let engine = Arc::new(MatchEngine::new(Config::default()).unwrap());
        let ranked = recalculate_applications(engine, &job(), Vec::new()).await;
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_failed_worker_keeps_application_at_zero() {
        let engine = MatchEngine::new(Config::default()).unwrap();
        let mut stale = application("b", &["Rust"], "PostgreSQL");
        stale.similarity = 0.9;
        let originals = vec![application("a", &["Rust"], "MySQL"), stale];
        let done = recalculate_application(&engine, &job(), originals[0].clone());

        let filled = fill_failed(vec![Some(done.clone()), None], originals);

        assert_eq!(filled.len(), 2);
        assert_eq!(filled[0], done);
        assert_eq!(filled[1].id, "b");
        assert_eq!(filled[1].similarity, 0.0);
    }
}
