//! Records supplied by the surrounding application and their conversion
//! into scoring inputs

use crate::processing::lexicon::Lexicon;
use crate::processing::requirements::JobRequirement;
use crate::processing::screening::{ScreeningAnswer, ScreeningQuestion};
use crate::processing::similarity::{CandidateProfile, JobDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attributes pulled out of an uploaded resume by the extraction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParsedResume {
    pub skills: Vec<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "experienceYears")]
    pub experience_years: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CandidateRecord {
    pub id: String,
    pub name: Option<String>,
    pub skills: Vec<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "experienceYears")]
    pub experience_years: Option<f64>,
    #[serde(alias = "parsedResume")]
    pub parsed_resume: Option<ParsedResume>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl CandidateRecord {
    /// Merge manual entries with the parsed resume. Skills are unioned; title,
    /// location and experience prefer the manual value.
    pub fn to_profile(&self) -> CandidateProfile {
        let parsed = self.parsed_resume.as_ref();

        let skills = self
            .skills
            .iter()
            .chain(parsed.into_iter().flat_map(|p| p.skills.iter()));

        let title = non_blank(self.title.as_ref())
            .or_else(|| parsed.and_then(|p| non_blank(p.title.as_ref())))
            .unwrap_or_default();
        let location = non_blank(self.location.as_ref())
            .or_else(|| parsed.and_then(|p| non_blank(p.location.as_ref())))
            .unwrap_or_default();
        let experience_years = self
            .experience_years
            .or_else(|| parsed.and_then(|p| p.experience_years))
            .unwrap_or(0.0);

        CandidateProfile::new(skills, title, location, experience_years)
    }
}

/// A requirement as stored on a job: structured, or a bare skill name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementEntry {
    Plain(String),
    Structured(JobRequirement),
}

impl RequirementEntry {
    pub fn to_requirement(&self) -> JobRequirement {
        match self {
            RequirementEntry::Plain(skill) => JobRequirement::plain(skill.as_str()),
            RequirementEntry::Structured(requirement) => requirement.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<RequirementEntry>,
    pub location: String,
    /// Free-text hint such as "2 years" or "3-5 yrs".
    pub experience: Option<String>,
    #[serde(alias = "experienceLevel")]
    pub experience_level: Option<f64>,
    #[serde(alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(alias = "screeningQuestions")]
    pub screening_questions: Vec<ScreeningQuestion>,
}

impl JobRecord {
    pub fn has_screening(&self) -> bool {
        !self.screening_questions.is_empty()
    }

    /// Years required before title inference: the explicit level, else the
    /// first number of the free-text hint, else 0. An explicit level of 0
    /// counts as absent; invalid levels are passed on for the scorer to reject.
    pub fn experience_level(&self, lexicon: &Lexicon) -> f64 {
        self.experience_level
            .filter(|level| *level != 0.0)
            .or_else(|| self.experience.as_deref().and_then(|text| lexicon.years_hint(text)))
            .unwrap_or(0.0)
    }

    /// Requirements to score against. Entries without a skill are dropped,
    /// whether plain or structured; a job left with none falls back to the
    /// known skills mentioned in the description.
    pub fn requirements(&self, lexicon: &Lexicon) -> Vec<JobRequirement> {
        let requirements: Vec<JobRequirement> = self
            .requirements
            .iter()
            .map(RequirementEntry::to_requirement)
            .filter(|requirement| !requirement.is_malformed())
            .collect();

        if !requirements.is_empty() {
            return requirements;
        }

        let extracted = lexicon.extract_skills(&self.description);
        log::debug!(
            "Job '{}' has no requirements, using {} skills from the description",
            self.title,
            extracted.len()
        );
        extracted.into_iter().map(|skill| JobRequirement::plain(skill)).collect()
    }

    pub fn to_descriptor(&self, lexicon: &Lexicon) -> JobDescriptor {
        JobDescriptor {
            title: self.title.trim().to_string(),
            skills: self.requirements(lexicon),
            location: self.location.trim().to_string(),
            experience_level: self.experience_level(lexicon),
        }
    }

    /// Posting date used for the recency boost; undated jobs count as oldest.
    pub fn posted_at(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or_default()
    }
}

/// One application to a job, with the scores last computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationRecord {
    pub id: String,
    pub candidate: CandidateRecord,
    pub similarity: f64,
    #[serde(alias = "screeningScore")]
    pub screening_score: Option<f64>,
    #[serde(alias = "screeningResponses")]
    pub responses: Vec<ScreeningAnswer>,
}
