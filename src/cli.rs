//! CLI interface for the talent matcher

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Record file extensions accepted by every command
pub const RECORD_EXTENSIONS: &[&str] = &["json", "toml"];

#[derive(Parser)]
#[command(name = "talent-matcher")]
#[command(about = "Candidate and job matching with screening-aware ranking")]
#[command(long_about = "Score candidates against job postings, classify requirement phrases, \
score screening answers and rank applicants or jobs from JSON/TOML records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Output options shared by the reporting commands
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format: console, json, markdown (defaults to the configured format)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output detailed breakdowns
    #[arg(short, long)]
    pub detailed: bool,

    /// Save output to file
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one candidate against one job
    Score {
        /// Candidate record (JSON, TOML)
        #[arg(long)]
        candidate: PathBuf,

        /// Job record (JSON, TOML)
        #[arg(short, long)]
        job: PathBuf,

        /// Screening answers submitted with the application
        #[arg(short, long)]
        answers: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Turn raw requirement phrases into structured requirements
    Classify {
        /// Requirement phrases
        phrases: Vec<String>,

        /// File with a `requirements` list of phrases
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Score screening answers against a job's questions
    Screen {
        /// Job record holding the screening questions
        #[arg(short, long)]
        job: PathBuf,

        /// Screening answers
        #[arg(short, long)]
        answers: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Recalculate and rank every application to a job
    RankApplicants {
        /// Job record
        #[arg(short, long)]
        job: PathBuf,

        /// Application records
        #[arg(long)]
        applications: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Recommend jobs to a candidate
    Recommend {
        /// Candidate record
        #[arg(long)]
        candidate: PathBuf,

        /// Job records
        #[arg(long)]
        jobs: PathBuf,

        /// Maximum number of jobs to show
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
