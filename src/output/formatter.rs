//! Output formatters for console, JSON and markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::*;
use crate::processing::screening::ScreeningOutcome;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering reports
pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the configured formatter
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, percentage: u8) -> String {
        let (badge, color) = match percentage {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_screening(&self, output: &mut String, outcome: &ScreeningOutcome) {
        output.push_str(&format!("Screening aggregate: {:.0}/100\n", outcome.aggregate));
        if !self.detailed {
            return;
        }
        for response in &outcome.responses {
            let marker = if response.matched {
                self.colorize("●", Color::Green)
            } else {
                self.colorize("○", Color::BrightBlack)
            };
            output.push_str(&format!(
                "  {} {:>5.1} x{:<4} {} -> {}\n",
                marker, response.score, response.weight, response.question_text, response.answer_text
            ));
        }
    }

    fn format_match(&self, output: &mut String, report: &MatchReport) {
        output.push_str(&self.format_header("MATCH REPORT", 1));
        output.push_str(&format!(
            "Candidate {} vs job {} ({})\n",
            report.candidate_id, report.job_id, report.job_title
        ));

        let percentage = as_percentage(report.result.similarity);
        output.push_str(&format!(
            "Similarity: {}% {}\n",
            percentage,
            self.format_score_badge(percentage)
        ));
        output.push_str(&format!("Combined rank: {:.4}\n", report.result.combined_rank));

        if let Some(warning) = &report.warning {
            output.push_str(&self.colorize(&format!("Warning: {}\n", warning), Color::Red));
        }

        if let Some(breakdown) = &report.breakdown {
            output.push_str(&self.format_header("Score Breakdown", 2));
            output.push_str(&format!("  Skills:     {:.4}\n", breakdown.skill_score));
            output.push_str(&format!(
                "  Experience: {:.2} (requires {} yrs)\n",
                breakdown.experience_score, breakdown.required_years
            ));
            output.push_str(&format!("  Location:   {:.4}\n", breakdown.location_score));
            output.push_str(&format!("  Title:      {:.4}\n", breakdown.title_score));
        }

        if let Some(outcome) = &report.screening {
            output.push_str(&self.format_header("Screening", 2));
            self.format_screening(output, outcome);
        }
    }

    fn format_classification(&self, output: &mut String, report: &ClassificationReport) {
        output.push_str(&self.format_header("STRUCTURED REQUIREMENTS", 1));
        for requirement in &report.requirements {
            output.push_str(&format!(
                "  {} {} | {} | {} | weight {:.2}\n",
                self.colorize("•", Color::Cyan),
                requirement.skill,
                requirement.category,
                requirement.level,
                requirement.weight
            ));
            if self.detailed {
                output.push_str(&format!("      importance: {}\n", requirement.importance));
            }
        }
        let merged = report.phrases.len().saturating_sub(report.requirements.len());
        if merged > 0 {
            output.push_str(&format!("{} phrase(s) dropped or merged\n", merged));
        }
    }

    fn format_applicants(&self, output: &mut String, report: &ApplicantRankingReport) {
        output.push_str(&self.format_header(&format!("APPLICANTS FOR {}", report.job_title), 1));
        for applicant in &report.applicants {
            let screening = applicant
                .screening_score
                .map(|s| format!("{:.0}", s))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:>3}. {:<16} rank {:.4}  similarity {:.4}  screening {}\n",
                applicant.rank,
                applicant.application_id,
                applicant.combined_rank,
                applicant.similarity,
                screening
            ));
        }
        if report.applicants.is_empty() {
            output.push_str("No applications\n");
        }
    }

    fn format_recommendations(&self, output: &mut String, report: &RecommendationReport) {
        output.push_str(&self.format_header(&format!("JOBS FOR {}", report.candidate_id), 1));
        for (position, recommendation) in report.recommendations.iter().enumerate() {
            let percentage = as_percentage(recommendation.similarity);
            output.push_str(&format!(
                "{:>3}. {} ({}) {}% {}\n",
                position + 1,
                recommendation.title,
                recommendation.job_id,
                percentage,
                self.format_score_badge(percentage)
            ));
            if self.detailed {
                output.push_str(&format!("     boosted score {:.4}\n", recommendation.adjusted_score));
            }
        }
        if report.recommendations.is_empty() {
            output.push_str("No matching jobs\n");
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        match report {
            Report::Match(r) => self.format_match(&mut output, r),
            Report::Classification(r) => self.format_classification(&mut output, r),
            Report::Screening(r) => {
                output.push_str(&self.format_header(&format!("SCREENING FOR {}", r.job_id), 1));
                self.format_screening(&mut output, &r.outcome);
            }
            Report::ApplicantRanking(r) => self.format_applicants(&mut output, r),
            Report::Recommendations(r) => self.format_recommendations(&mut output, r),
        }

        if self.detailed {
            let metadata = report.metadata();
            output.push_str(&self.colorize(
                &format!(
                    "\nGenerated {} by talent-matcher {}\n",
                    metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    metadata.tool_version
                ),
                Color::BrightBlack,
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(percentage: u8) -> &'static str {
        match percentage {
            90..=100 => "🟢 Excellent",
            70..=89 => "🔵 Good",
            50..=69 => "🟡 Fair",
            _ => "🔴 Poor",
        }
    }

    fn screening_table(output: &mut String, outcome: &ScreeningOutcome) {
        output.push_str(&format!("**Screening aggregate:** {:.0}/100\n\n", outcome.aggregate));
        if outcome.responses.is_empty() {
            return;
        }
        output.push_str("| Question | Answer | Score | Weight |\n");
        output.push_str("|----------|--------|-------|--------|\n");
        for response in &outcome.responses {
            output.push_str(&format!(
                "| {} | {} | {:.0} | {} |\n",
                response.question_text, response.answer_text, response.score, response.weight
            ));
        }
        output.push('\n');
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        match report {
            Report::Match(r) => {
                let percentage = as_percentage(r.result.similarity);
                output.push_str(&format!("# Match: {} × {}\n\n", r.candidate_id, r.job_title));
                output.push_str(&format!(
                    "**Similarity:** {}% {}\n\n",
                    percentage,
                    Self::markdown_score_badge(percentage)
                ));
                output.push_str(&format!("**Combined rank:** {:.4}\n\n", r.result.combined_rank));
                if let Some(warning) = &r.warning {
                    output.push_str(&format!("> ⚠️ {}\n\n", warning));
                }
                if let Some(b) = &r.breakdown {
                    output.push_str("| Component | Score |\n");
                    output.push_str("|-----------|-------|\n");
                    output.push_str(&format!("| Skills | {:.4} |\n", b.skill_score));
                    output.push_str(&format!(
                        "| Experience ({} yrs required) | {:.2} |\n",
                        b.required_years, b.experience_score
                    ));
                    output.push_str(&format!("| Location | {:.4} |\n", b.location_score));
                    output.push_str(&format!("| Title | {:.4} |\n\n", b.title_score));
                }
                if let Some(outcome) = &r.screening {
                    output.push_str("## Screening\n\n");
                    Self::screening_table(&mut output, outcome);
                }
            }
            Report::Classification(r) => {
                output.push_str("# Structured Requirements\n\n");
                output.push_str("| Skill | Category | Level | Importance | Weight |\n");
                output.push_str("|-------|----------|-------|------------|--------|\n");
                for req in &r.requirements {
                    output.push_str(&format!(
                        "| {} | {} | {} | {} | {:.2} |\n",
                        req.skill, req.category, req.level, req.importance, req.weight
                    ));
                }
                output.push('\n');
            }
            Report::Screening(r) => {
                output.push_str(&format!("# Screening: {}\n\n", r.job_id));
                Self::screening_table(&mut output, &r.outcome);
            }
            Report::ApplicantRanking(r) => {
                output.push_str(&format!("# Applicants: {}\n\n", r.job_title));
                output.push_str("| # | Application | Candidate | Rank | Similarity | Screening |\n");
                output.push_str("|---|-------------|-----------|------|------------|-----------|\n");
                for a in &r.applicants {
                    output.push_str(&format!(
                        "| {} | {} | {} | {:.4} | {:.4} | {} |\n",
                        a.rank,
                        a.application_id,
                        a.candidate_id,
                        a.combined_rank,
                        a.similarity,
                        a.screening_score.map(|s| format!("{:.0}", s)).unwrap_or_else(|| "-".to_string())
                    ));
                }
                output.push('\n');
            }
            Report::Recommendations(r) => {
                output.push_str(&format!("# Recommended Jobs: {}\n\n", r.candidate_id));
                for (position, rec) in r.recommendations.iter().enumerate() {
                    let percentage = as_percentage(rec.similarity);
                    output.push_str(&format!(
                        "{}. **{}** (`{}`) {}% {}\n",
                        position + 1,
                        rec.title,
                        rec.job_id,
                        percentage,
                        Self::markdown_score_badge(percentage)
                    ));
                }
                output.push('\n');
            }
        }

        if self.include_metadata {
            let metadata = report.metadata();
            output.push_str(&format!(
                "---\n*Generated {} by talent-matcher {}*\n",
                metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                metadata.tool_version
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &Report, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, report: &Report) -> String {
    let stamp = report.metadata().generated_at.format("%Y%m%d_%H%M%S");
    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_{}.{}", report.slug(), stamp, extension)
}
