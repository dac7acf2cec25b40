//! Talent matcher: candidate/job matching and ranking CLI

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use talent_matcher::cli::{self, Cli, Commands, ConfigAction, OutputArgs, RECORD_EXTENSIONS};
use talent_matcher::config::{Config, OutputFormat};
use talent_matcher::input::{ApplicationRecord, CandidateRecord, InputManager, JobRecord};
use talent_matcher::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use talent_matcher::output::report::{
    ApplicantRankingReport, ClassificationReport, MatchReport, RecommendationReport, Report,
    ReportMetadata, ScreeningReport,
};
use talent_matcher::processing::batch::recalculate_applications;
use talent_matcher::processing::interactions::{InteractionKind, InteractionTracker, LoggingTracker};
use talent_matcher::processing::ranking::{combined_rank, ApplicantScore};
use talent_matcher::processing::screening::ScreeningAnswer;
use talent_matcher::processing::MatchEngine;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display())),
        None => Ok(Config::load()?),
    }
}

fn check_record_file(path: &Path, what: &str) -> Result<()> {
    cli::validate_file_extension(path, RECORD_EXTENSIONS)
        .map_err(|e| anyhow::anyhow!("{} file {}: {}", what, path.display(), e))
}

async fn load_answers(manager: &mut InputManager, path: &Path) -> Result<Vec<ScreeningAnswer>> {
    check_record_file(path, "Answers")?;
    manager
        .load_list(path, "answers")
        .await
        .with_context(|| format!("Failed to load answers from {}", path.display()))
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    let engine = Arc::new(MatchEngine::new(config.clone()).context("Failed to build lexicon")?);
    let mut manager = InputManager::new();
    let now = Utc::now();

    match command {
        Commands::Score {
            candidate,
            job,
            answers,
            output,
        } => {
            check_record_file(&candidate, "Candidate")?;
            check_record_file(&job, "Job")?;

            let candidate_record: CandidateRecord = manager
                .load(&candidate)
                .await
                .with_context(|| format!("Failed to load candidate from {}", candidate.display()))?;
            let job_record: JobRecord = manager
                .load(&job)
                .await
                .with_context(|| format!("Failed to load job from {}", job.display()))?;
            let answers = match answers {
                Some(path) => load_answers(&mut manager, &path).await?,
                None => Vec::new(),
            };

            info!("Scoring candidate '{}' against '{}'", candidate_record.id, job_record.title);

            let profile = engine.candidate_profile(&candidate_record);
            let descriptor = engine.job_descriptor(&job_record);
            let (breakdown, warning) = match engine.try_score_match(&profile, &descriptor) {
                Ok(breakdown) => (Some(breakdown), None),
                Err(w) => {
                    warn!("Scoring fell back to 0: {}", w);
                    (None, Some(w.to_string()))
                }
            };

            let result = engine.evaluate(&candidate_record, &job_record, &answers);
            let screening = (!answers.is_empty())
                .then(|| engine.score_screening(&answers, &job_record.screening_questions));

            let report = Report::Match(MatchReport {
                candidate_id: candidate_record.id.clone(),
                job_id: job_record.id.clone(),
                job_title: job_record.title.clone(),
                breakdown,
                warning,
                result,
                screening,
                metadata: ReportMetadata::new(now),
            });
            emit(&config, &output, &report)?;
        }

        Commands::Classify { phrases, file, output } => {
            let mut all_phrases = phrases;
            if let Some(path) = file {
                check_record_file(&path, "Requirements")?;
                let from_file: Vec<String> = manager
                    .load_list(&path, "requirements")
                    .await
                    .with_context(|| format!("Failed to load requirements from {}", path.display()))?;
                all_phrases.extend(from_file);
            }
            if all_phrases.is_empty() {
                anyhow::bail!("No requirement phrases given");
            }

            let requirements = engine.extract_requirements(&all_phrases);
            info!("Classified {} phrases into {} requirements", all_phrases.len(), requirements.len());

            let report = Report::Classification(ClassificationReport {
                phrases: all_phrases,
                requirements,
                metadata: ReportMetadata::new(now),
            });
            emit(&config, &output, &report)?;
        }

        Commands::Screen { job, answers, output } => {
            check_record_file(&job, "Job")?;
            let job_record: JobRecord = manager
                .load(&job)
                .await
                .with_context(|| format!("Failed to load job from {}", job.display()))?;
            let answers = load_answers(&mut manager, &answers).await?;

            if !job_record.has_screening() {
                warn!("Job '{}' has no screening questions", job_record.title);
            }

            let report = Report::Screening(ScreeningReport {
                job_id: job_record.id.clone(),
                outcome: engine.score_screening(&answers, &job_record.screening_questions),
                metadata: ReportMetadata::new(now),
            });
            emit(&config, &output, &report)?;
        }

        Commands::RankApplicants {
            job,
            applications,
            output,
        } => {
            check_record_file(&job, "Job")?;
            check_record_file(&applications, "Applications")?;

            let job_record: JobRecord = manager
                .load(&job)
                .await
                .with_context(|| format!("Failed to load job from {}", job.display()))?;
            let application_records: Vec<ApplicationRecord> = manager
                .load_list(&applications, "applications")
                .await
                .with_context(|| format!("Failed to load applications from {}", applications.display()))?;

            let ranked = recalculate_applications(Arc::clone(&engine), &job_record, application_records).await;

            let has_screening = job_record.has_screening();
            let report = Report::ApplicantRanking(ApplicantRankingReport::from_ranked(
                &job_record,
                &ranked,
                |application| {
                    combined_rank(
                        &ApplicantScore {
                            similarity: application.similarity,
                            screening_score: application.screening_score,
                        },
                        has_screening,
                        &config.ranking,
                    )
                },
                ReportMetadata::new(now),
            ));
            emit(&config, &output, &report)?;
        }

        Commands::Recommend {
            candidate,
            jobs,
            limit,
            output,
        } => {
            check_record_file(&candidate, "Candidate")?;
            check_record_file(&jobs, "Jobs")?;

            let candidate_record: CandidateRecord = manager
                .load(&candidate)
                .await
                .with_context(|| format!("Failed to load candidate from {}", candidate.display()))?;
            let job_records: Vec<JobRecord> = manager
                .load_list(&jobs, "jobs")
                .await
                .with_context(|| format!("Failed to load jobs from {}", jobs.display()))?;

            let profile = engine.candidate_profile(&candidate_record);
            let mut recommendations = engine.recommend_jobs(&profile, &job_records, now);
            if let Some(limit) = limit {
                recommendations.truncate(limit);
            }

            let tracker = LoggingTracker;
            for recommendation in &recommendations {
                tracker.track(&candidate_record.id, &recommendation.job_id, InteractionKind::View);
            }

            let report = Report::Recommendations(RecommendationReport {
                candidate_id: candidate_record.id.clone(),
                recommendations,
                metadata: ReportMetadata::new(now),
            });
            emit(&config, &output, &report)?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
                println!("{}", rendered);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save().context("Failed to reset configuration")?;
                println!("Configuration reset to defaults at {}", Config::config_path().display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

/// Render a report in the requested (or configured) format and print or save it.
fn emit(config: &Config, args: &OutputArgs, report: &Report) -> Result<()> {
    let format: OutputFormat = match &args.output {
        Some(format) => cli::parse_output_format(format).map_err(anyhow::Error::msg)?,
        None => config.output.format,
    };

    let generator = ReportGenerator::with_options(
        config.output.color_output && args.save.is_none(),
        args.detailed || config.output.detailed,
        true,
        true,
    );
    let content = generator.generate_report(report, &format)?;

    match &args.save {
        Some(path) => {
            let target: PathBuf = if path.is_dir() {
                path.join(suggest_filename(&format, report))
            } else {
                path.clone()
            };
            save_report_to_file(&content, &target)
                .with_context(|| format!("Failed to save report to {}", target.display()))?;
            info!("Report saved to {}", target.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}
