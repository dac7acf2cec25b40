//! Requirement classification: free-text requirement phrase -> structured, weighted requirement

use crate::processing::lexical::{token_set_similarity, tokenize};
use crate::processing::lexicon::{KeywordRule, Lexicon};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound of a requirement weight.
pub const MAX_REQUIREMENT_WEIGHT: f64 = 5.0;

/// Default token similarity above which two requirements are merged.
pub const DEFAULT_MERGE_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    #[default]
    Technical,
    SoftSkills,
    Tools,
    Certifications,
    Education,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    #[default]
    MustHave,
    Preferred,
    NiceToHave,
}

impl SkillCategory {
    pub fn weight(self) -> f64 {
        match self {
            SkillCategory::Technical => 1.0,
            SkillCategory::SoftSkills => 0.8,
            SkillCategory::Tools => 0.7,
            SkillCategory::Certifications => 0.6,
            SkillCategory::Education => 0.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Technical => "technical",
            SkillCategory::SoftSkills => "soft_skills",
            SkillCategory::Tools => "tools",
            SkillCategory::Certifications => "certifications",
            SkillCategory::Education => "education",
        }
    }
}

impl SkillLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }
}

impl Importance {
    pub fn weight(self) -> f64 {
        match self {
            Importance::MustHave => 1.0,
            Importance::Preferred => 0.7,
            Importance::NiceToHave => 0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::MustHave => "must_have",
            Importance::Preferred => "preferred",
            Importance::NiceToHave => "nice_to_have",
        }
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(SkillCategory::Technical),
            "soft_skills" | "soft skills" => Ok(SkillCategory::SoftSkills),
            "tools" => Ok(SkillCategory::Tools),
            "certifications" => Ok(SkillCategory::Certifications),
            "education" => Ok(SkillCategory::Education),
            other => Err(format!("unknown skill category: {}", other)),
        }
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "expert" => Ok(SkillLevel::Expert),
            other => Err(format!("unknown skill level: {}", other)),
        }
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "must_have" | "must have" => Ok(Importance::MustHave),
            "preferred" => Ok(Importance::Preferred),
            "nice_to_have" | "nice to have" => Ok(Importance::NiceToHave),
            other => Err(format!("unknown importance: {}", other)),
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AxisValue {
    Text(String),
    Other(IgnoredAny),
}

/// Deserialize an axis value, falling back to the axis default for unknown,
/// mistyped or missing values instead of rejecting the whole job record.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let parsed = match Option::<AxisValue>::deserialize(deserializer)? {
        Some(AxisValue::Text(raw)) => raw.parse().ok(),
        Some(AxisValue::Other(_)) | None => None,
    };
    Ok(parsed.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberValue {
    Number(f64),
    Other(IgnoredAny),
}

/// A numeric field that is `None` when null or not a number.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberValue>::deserialize(deserializer)? {
        Some(NumberValue::Number(value)) if value.is_finite() => Some(value),
        _ => None,
    })
}

/// A text field that is empty when null or not a string.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<AxisValue>::deserialize(deserializer)? {
        Some(AxisValue::Text(text)) => text,
        _ => String::new(),
    })
}

fn default_weight() -> f64 {
    1.0
}

fn lenient_weight<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or_else(default_weight))
}

/// Structured job requirement, produced once when the job is authored.
///
/// A requirement with a blank `skill` is malformed; it still deserializes but
/// contributes nothing when scored. A null or non-numeric `weight` reads as 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default, deserialize_with = "lenient_text")]
    pub skill: String,
    #[serde(default, deserialize_with = "lenient")]
    pub category: SkillCategory,
    #[serde(default, deserialize_with = "lenient")]
    pub level: SkillLevel,
    #[serde(default, deserialize_with = "lenient")]
    pub importance: Importance,
    #[serde(default = "default_weight", deserialize_with = "lenient_weight")]
    pub weight: f64,
}

impl JobRequirement {
    /// Requirement with default axes and weight 1.0, used for plain skill names.
    pub fn plain(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into().trim().to_string(),
            category: SkillCategory::default(),
            level: SkillLevel::default(),
            importance: Importance::default(),
            weight: default_weight(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.skill.trim().is_empty()
    }
}

/// `min(5, importance weight x category weight)`
pub fn requirement_weight(importance: Importance, category: SkillCategory) -> f64 {
    (importance.weight() * category.weight()).min(MAX_REQUIREMENT_WEIGHT)
}

/// Pick the axis value for a phrase: direct keyword containment first, then
/// the rule with the highest token similarity, else `default`.
fn classify_axis<T: Copy>(rules: &[KeywordRule<T>], phrase: &str, default: T) -> T {
    if let Some(rule) = rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| phrase.contains(k)))
    {
        return rule.value;
    }

    let mut best = default;
    let mut highest = 0.0;
    for rule in rules {
        let similarity = token_set_similarity(&[phrase], rule.keywords);
        if similarity > highest {
            highest = similarity;
            best = rule.value;
        }
    }
    best
}

pub fn classify_category(lexicon: &Lexicon, phrase: &str) -> SkillCategory {
    classify_axis(lexicon.categories(), &phrase.trim().to_lowercase(), SkillCategory::default())
}

pub fn classify_level(lexicon: &Lexicon, phrase: &str) -> SkillLevel {
    classify_axis(lexicon.levels(), &phrase.trim().to_lowercase(), SkillLevel::default())
}

pub fn classify_importance(lexicon: &Lexicon, phrase: &str) -> Importance {
    classify_axis(lexicon.importances(), &phrase.trim().to_lowercase(), Importance::default())
}

/// Turn one raw requirement phrase into a [`JobRequirement`].
pub fn classify_requirement(lexicon: &Lexicon, phrase: &str) -> JobRequirement {
    let cleaned = phrase.trim();
    let category = classify_category(lexicon, cleaned);
    let level = classify_level(lexicon, cleaned);
    let importance = classify_importance(lexicon, cleaned);

    JobRequirement {
        skill: cleaned.to_string(),
        category,
        level,
        importance,
        weight: requirement_weight(importance, category),
    }
}

/// Trimmed, non-blank requirement phrases.
pub fn validate_requirements<S: AsRef<str>>(phrases: &[S]) -> Vec<String> {
    phrases
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapse near-duplicate requirements, keeping the first occurrence with the
/// highest weight seen among its duplicates.
pub fn merge_similar_requirements(
    requirements: Vec<JobRequirement>,
    threshold: f64,
) -> Vec<JobRequirement> {
    let mut merged: Vec<(JobRequirement, Vec<String>)> = Vec::with_capacity(requirements.len());

    for requirement in requirements {
        let tokens = tokenize(&requirement.skill);

        let duplicate = merged
            .iter_mut()
            .find(|(_, existing)| token_set_similarity(&tokens, existing) > threshold);

        match duplicate {
            Some((existing, _)) => {
                log::debug!(
                    "Merging requirement '{}' into '{}'",
                    requirement.skill,
                    existing.skill
                );
                existing.weight = existing.weight.max(requirement.weight);
            }
            None => merged.push((requirement, tokens)),
        }
    }

    merged.into_iter().map(|(requirement, _)| requirement).collect()
}

/// Job-authoring pipeline: validate, classify and merge raw requirement phrases.
pub fn extract_structured_requirements<S: AsRef<str>>(
    lexicon: &Lexicon,
    phrases: &[S],
    merge_threshold: f64,
) -> Vec<JobRequirement> {
    let classified = validate_requirements(phrases)
        .iter()
        .map(|phrase| classify_requirement(lexicon, phrase))
        .collect();

    merge_similar_requirements(classified, merge_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        Lexicon::new().unwrap()
    }

    #[test]
    fn test_direct_keyword_classification() {
        let lexicon = lexicon();
        let req = classify_requirement(&lexicon, "  Strong Python programming skills required ");

        assert_eq!(req.skill, "Strong Python programming skills required");
        assert_eq!(req.category, SkillCategory::Technical);
        assert_eq!(req.importance, Importance::MustHave);
        assert_eq!(req.weight, 1.0);
    }

    #[test]
    fn test_classification_of_soft_skill_bonus() {
        let lexicon = lexicon();
        let req = classify_requirement(&lexicon, "Leadership experience is a bonus");

        assert_eq!(req.category, SkillCategory::SoftSkills);
        assert_eq!(req.importance, Importance::NiceToHave);
        assert!((req.weight - 0.3 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_level_table_order() {
        let lexicon = lexicon();
        // "expert" is listed under advanced before expert
        assert_eq!(classify_level(&lexicon, "expert in Go"), SkillLevel::Advanced);
        assert_eq!(classify_level(&lexicon, "Kubernetes guru"), SkillLevel::Expert);
        assert_eq!(classify_level(&lexicon, "basic SQL"), SkillLevel::Beginner);
    }

    #[test]
    fn test_blank_phrase_uses_defaults() {
        let lexicon = lexicon();
        let req = classify_requirement(&lexicon, "   ");

        assert!(req.is_malformed());
        assert_eq!(req.category, SkillCategory::Technical);
        assert_eq!(req.level, SkillLevel::Intermediate);
        assert_eq!(req.importance, Importance::MustHave);
    }

    #[test]
    fn test_weight_table() {
        assert_eq!(requirement_weight(Importance::MustHave, SkillCategory::Technical), 1.0);
        assert!((requirement_weight(Importance::Preferred, SkillCategory::Tools) - 0.49).abs() < 1e-12);
        assert!(requirement_weight(Importance::MustHave, SkillCategory::Education) <= MAX_REQUIREMENT_WEIGHT);
    }

    #[test]
    fn test_validate_requirements() {
        let phrases = vec!["  React ", "", "   ", "Docker"];
        assert_eq!(validate_requirements(&phrases), vec!["React", "Docker"]);
    }

    #[test]
    fn test_merge_keeps_higher_weight() {
        let mut first = JobRequirement::plain("Python programming");
        first.weight = 0.3;
        let mut second = JobRequirement::plain("python programming");
        second.weight = 0.7;
        let other = JobRequirement::plain("Figma");

        let merged = merge_similar_requirements(vec![first, second, other], DEFAULT_MERGE_THRESHOLD);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].skill, "Python programming");
        assert_eq!(merged[0].weight, 0.7);
        assert_eq!(merged[1].skill, "Figma");
    }

    #[test]
    fn test_extract_structured_requirements() {
        let lexicon = lexicon();
        let phrases = vec!["Excellent communication preferred", "Docker", "", "docker"];
        let requirements = extract_structured_requirements(&lexicon, &phrases, DEFAULT_MERGE_THRESHOLD);

        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].category, SkillCategory::SoftSkills);
        assert_eq!(requirements[0].importance, Importance::Preferred);
        assert_eq!(requirements[1].skill, "Docker");
        assert_eq!(requirements[1].category, SkillCategory::Tools);
    }

    #[test]
    fn test_lenient_deserialization() {
        let json = r#"{"skill": "Rust", "category": "other", "level": 3, "importance": "preferred"}"#;
        let req: JobRequirement = serde_json::from_str(json).unwrap();

        assert_eq!(req.category, SkillCategory::Technical);
        assert_eq!(req.importance, Importance::Preferred);
        assert_eq!(req.level, SkillLevel::Intermediate);
        assert_eq!(req.weight, 1.0);

        let missing: JobRequirement = serde_json::from_str(r#"{"weight": 2.0}"#).unwrap();
        assert!(missing.is_malformed());
    }

    #[test]
    fn test_mistyped_weight_reads_as_default() {
        for json in [
            r#"{"skill": "Rust", "weight": null}"#,
            r#"{"skill": "Rust", "weight": "high"}"#,
            r#"{"skill": "Rust", "weight": [2]}"#,
        ] {
            let req: JobRequirement = serde_json::from_str(json).unwrap();
            assert_eq!(req.skill, "Rust");
            assert_eq!(req.weight, 1.0);
        }

        let integer: JobRequirement = serde_json::from_str(r#"{"skill": "Rust", "weight": 2}"#).unwrap();
        assert_eq!(integer.weight, 2.0);

        let null_skill: JobRequirement = serde_json::from_str(r#"{"skill": null, "weight": 0.5}"#).unwrap();
        assert!(null_skill.is_malformed());
        assert_eq!(null_skill.weight, 0.5);
    }
}
