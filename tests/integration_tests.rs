//! Integration tests for the talent matcher

use chrono::{TimeZone, Utc};
use std::path::Path;
use std::sync::Arc;
use talent_matcher::config::Config;
use talent_matcher::input::{ApplicationRecord, CandidateRecord, InputManager, JobRecord};
use talent_matcher::output::formatter::ReportGenerator;
use talent_matcher::output::report::{ClassificationReport, Report, ReportMetadata};
use talent_matcher::processing::batch::recalculate_applications;
use talent_matcher::processing::requirements::{Importance, SkillCategory};
use talent_matcher::processing::screening::ScreeningAnswer;
use talent_matcher::{MatchEngine, MatcherError};

async fn load_candidate(manager: &mut InputManager) -> CandidateRecord {
    manager.load(Path::new("tests/fixtures/candidate.json")).await.unwrap()
}

async fn load_job(manager: &mut InputManager) -> JobRecord {
    manager.load(Path::new("tests/fixtures/job.json")).await.unwrap()
}

fn engine() -> MatchEngine {
    MatchEngine::new(Config::default()).unwrap()
}

#[tokio::test]
async fn test_candidate_record_merges_resume() {
    let mut manager = InputManager::new();
    let candidate = load_candidate(&mut manager).await;

    let profile = candidate.to_profile();
    assert_eq!(profile.skills, vec!["Airflow", "Docker", "Python", "SQL"]);
    assert_eq!(profile.title, "Data Engineer");
    assert_eq!(profile.location, "Berlin");
    assert_eq!(profile.experience_years, 4.0);
}

#[tokio::test]
async fn test_score_candidate_against_job() {
    let mut manager = InputManager::new();
    let candidate = load_candidate(&mut manager).await;
    let job = load_job(&mut manager).await;
    let engine = engine();

    let descriptor = engine.job_descriptor(&job);
    assert_eq!(descriptor.skills.len(), 3);
    assert_eq!(descriptor.experience_level, 3.0);

    let profile = engine.candidate_profile(&candidate);
    let breakdown = engine.try_score_match(&profile, &descriptor).unwrap();

    let expected_skill = (1.0 + 1.0 + 0.7 * 0.7 * 0.49) / 3.0;
    assert!((breakdown.skill_score - expected_skill).abs() < 1e-9);
    assert_eq!(breakdown.experience_score, 1.0);
    assert_eq!(breakdown.location_score, 1.0);
    assert_eq!(breakdown.title_score, 1.0);

    let expected = 0.5 * expected_skill + 0.23 + 0.15 + 0.15;
    assert!((breakdown.similarity - expected).abs() < 1e-9);
    assert_eq!(engine.score_match(&profile, &descriptor), breakdown.similarity);
}

#[tokio::test]
async fn test_screening_fixture_aggregate() {
    let mut manager = InputManager::new();
    let job = load_job(&mut manager).await;
    let answers: Vec<ScreeningAnswer> = manager
        .load_list(Path::new("tests/fixtures/answers.json"), "answers")
        .await
        .unwrap();

    let outcome = engine().score_screening(&answers, &job.screening_questions);

    let scores: Vec<f64> = outcome.responses.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![100.0, 100.0, 90.0]);
    assert!(outcome.responses.iter().all(|r| r.matched));
    // (100 * 2 + 100 + 90) / 4 = 97.5
    assert_eq!(outcome.aggregate, 98.0);
}

#[tokio::test]
async fn test_evaluate_blends_screening() {
    let mut manager = InputManager::new();
    let candidate = load_candidate(&mut manager).await;
    let job = load_job(&mut manager).await;
    let answers: Vec<ScreeningAnswer> = manager
        .load_list(Path::new("tests/fixtures/answers.json"), "answers")
        .await
        .unwrap();

    let result = engine().evaluate(&candidate, &job, &answers);
    assert_eq!(result.screening_score, Some(98.0));
    let expected = 0.6 * result.similarity + 0.4 * 0.98;
    assert!((result.combined_rank - expected).abs() < 1e-12);
}

#[tokio::test]
async fn test_rank_applicants_from_fixture() {
    let mut manager = InputManager::new();
    let job = load_job(&mut manager).await;
    let applications: Vec<ApplicationRecord> = manager
        .load_list(Path::new("tests/fixtures/applications.json"), "applications")
        .await
        .unwrap();
    let engine = Arc::new(engine());

    let ranked = recalculate_applications(Arc::clone(&engine), &job, applications).await;

    let ids: Vec<&str> = ranked.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["app-2", "app-3", "app-1"]);

    assert_eq!(ranked[0].screening_score, Some(100.0));
    assert_eq!(ranked[1].screening_score, None);
    // Stored scores are overwritten by the recalculation
    assert_eq!(ranked[2].responses[0].score, Some(0.0));
    assert_eq!(ranked[2].screening_score, Some(0.0));

    let again = recalculate_applications(engine, &job, ranked.clone()).await;
    assert_eq!(again, ranked);
}

#[tokio::test]
async fn test_recommend_jobs_from_toml() {
    let mut manager = InputManager::new();
    let candidate = load_candidate(&mut manager).await;
    let jobs: Vec<JobRecord> = manager
        .load_list(Path::new("tests/fixtures/jobs.toml"), "jobs")
        .await
        .unwrap();
    assert_eq!(jobs.len(), 4);

    let engine = engine();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let recommendations = engine.recommend_jobs(&engine.candidate_profile(&candidate), &jobs, now);

    let ids: Vec<&str> = recommendations.iter().map(|r| r.job_id.as_str()).collect();
    // job-d has an invalid experience level and scores 0
    assert_eq!(ids, vec!["job-b", "job-a", "job-c"]);
    assert_eq!(recommendations[0].similarity, recommendations[1].similarity);
    assert!(recommendations[0].adjusted_score > recommendations[1].adjusted_score);
}

#[tokio::test]
async fn test_classify_requirements_file() {
    let mut manager = InputManager::new();
    let phrases: Vec<String> = manager
        .load_list(Path::new("tests/fixtures/requirements.toml"), "requirements")
        .await
        .unwrap();

    let requirements = engine().extract_requirements(&phrases);
    assert_eq!(requirements.len(), 3);

    assert_eq!(requirements[0].category, SkillCategory::Technical);
    assert_eq!(requirements[0].importance, Importance::MustHave);
    assert_eq!(requirements[0].weight, 1.0);

    assert_eq!(requirements[1].category, SkillCategory::SoftSkills);
    assert_eq!(requirements[1].importance, Importance::Preferred);

    assert_eq!(requirements[2].category, SkillCategory::Tools);
    assert_eq!(requirements[2].importance, Importance::NiceToHave);
    assert!((requirements[2].weight - 0.21).abs() < 1e-12);

    let report = Report::Classification(ClassificationReport {
        phrases,
        requirements,
        metadata: ReportMetadata::new(Utc::now()),
    });
    let markdown = ReportGenerator::with_options(false, false, true, false)
        .generate_report(&report, &talent_matcher::config::OutputFormat::Markdown)
        .unwrap();
    assert!(markdown.contains("| Excellent communication preferred | soft_skills |"));
}

#[tokio::test]
async fn test_missing_fixture_is_an_error() {
    let mut manager = InputManager::new();
    let result = manager
        .load::<JobRecord>(Path::new("tests/fixtures/nonexistent.json"))
        .await;
    assert!(matches!(result, Err(MatcherError::InvalidInput(_))));
}
