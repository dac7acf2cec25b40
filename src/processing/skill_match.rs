//! Skill-set similarity between a candidate's skills and a job's weighted requirements

use crate::error::ScoreWarning;
use crate::processing::lexical::lexical_similarity;
use crate::processing::requirements::{JobRequirement, MAX_REQUIREMENT_WEIGHT};
use serde::{Deserialize, Serialize};

/// How one requirement was matched against the candidate's skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementMatch {
    pub requirement: String,
    pub best_skill: Option<String>,
    pub similarity: f64,
    pub contribution: f64,
}

/// Weighted match contribution of a single requirement.
///
/// `max similarity x importance weight x category weight x requirement weight`.
/// A requirement without a skill yields [`ScoreWarning::MalformedRequirement`].
pub fn requirement_contribution<S: AsRef<str>>(
    candidate_skills: &[S],
    requirement: &JobRequirement,
    index: usize,
) -> Result<RequirementMatch, ScoreWarning> {
    if requirement.is_malformed() {
        return Err(ScoreWarning::MalformedRequirement { index });
    }

    let mut best_skill = None;
    let mut similarity = 0.0;
    for skill in candidate_skills {
        let score = lexical_similarity(skill.as_ref(), &requirement.skill);
        if score > similarity {
            similarity = score;
            best_skill = Some(skill.as_ref().to_string());
        }
    }

    let weight = if requirement.weight.is_finite() {
        requirement.weight.clamp(0.0, MAX_REQUIREMENT_WEIGHT)
    } else {
        0.0
    };

    let contribution = similarity
        * requirement.importance.weight()
        * requirement.category.weight()
        * weight;

    Ok(RequirementMatch {
        requirement: requirement.skill.clone(),
        best_skill,
        similarity,
        contribution,
    })
}

/// Per-requirement outcomes, in requirement order.
pub fn skill_set_breakdown<S: AsRef<str>>(
    candidate_skills: &[S],
    requirements: &[JobRequirement],
) -> Vec<Result<RequirementMatch, ScoreWarning>> {
    requirements
        .iter()
        .enumerate()
        .map(|(index, requirement)| requirement_contribution(candidate_skills, requirement, index))
        .collect()
}

/// Mean requirement contribution; malformed requirements count as 0 and an
/// empty requirement list scores 0.
pub fn skill_set_similarity<S: AsRef<str>>(
    candidate_skills: &[S],
    requirements: &[JobRequirement],
) -> f64 {
    if requirements.is_empty() {
        return 0.0;
    }

    let mut contributions: Vec<f64> = skill_set_breakdown(candidate_skills, requirements)
        .into_iter()
        .map(|outcome| match outcome {
            Ok(matched) => matched.contribution,
            Err(warning) => {
                log::warn!("Skipping requirement: {}", warning);
                0.0
            }
        })
        .collect();

    // Summation order must not depend on requirement order
    contributions.sort_by(f64::total_cmp);
    contributions.iter().sum::<f64>() / requirements.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::requirements::{Importance, SkillCategory};

    fn requirement(skill: &str, importance: Importance, category: SkillCategory, weight: f64) -> JobRequirement {
        JobRequirement {
            skill: skill.to_string(),
            category,
            importance,
            weight,
            ..JobRequirement::plain(skill)
        }
    }

    #[test]
    fn test_exact_match_full_contribution() {
        let skills = vec!["python".to_string()];
        let reqs = vec![requirement("Python", Importance::MustHave, SkillCategory::Technical, 1.0)];

        assert_eq!(skill_set_similarity(&skills, &reqs), 1.0);
    }

    #[test]
    fn test_weights_scale_contribution() {
        let skills = vec!["docker"];
        let reqs = vec![requirement("Docker", Importance::Preferred, SkillCategory::Tools, 1.0)];

        let score = skill_set_similarity(&skills, &reqs);
        assert!((score - 0.7 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_mean_over_requirements() {
        let skills = vec!["rust"];
        let reqs = vec![
            requirement("Rust", Importance::MustHave, SkillCategory::Technical, 1.0),
            requirement("", Importance::MustHave, SkillCategory::Technical, 1.0),
        ];

        assert_eq!(skill_set_similarity(&skills, &reqs), 0.5);
    }

    #[test]
    fn test_malformed_requirement_warning() {
        let skills = vec!["rust"];
        let reqs = vec![
            requirement("Rust", Importance::MustHave, SkillCategory::Technical, 1.0),
            requirement("  ", Importance::MustHave, SkillCategory::Technical, 1.0),
        ];

        let breakdown = skill_set_breakdown(&skills, &reqs);
        assert!(breakdown[0].is_ok());
        assert_eq!(breakdown[1], Err(ScoreWarning::MalformedRequirement { index: 1 }));
    }

    #[test]
    fn test_empty_inputs() {
        let skills: Vec<String> = vec![];
        let reqs = vec![requirement("Go", Importance::MustHave, SkillCategory::Technical, 1.0)];

        assert_eq!(skill_set_similarity(&skills, &reqs), 0.0);
        assert_eq!(skill_set_similarity(&["go"], &[]), 0.0);
    }

    #[test]
    fn test_order_independence() {
        let skills = vec!["python", "sql", "react", "kubernets"];
        let reqs = vec![
            requirement("Python", Importance::MustHave, SkillCategory::Technical, 1.0),
            requirement("Kubernetes", Importance::Preferred, SkillCategory::Tools, 0.49),
            requirement("Communication", Importance::NiceToHave, SkillCategory::SoftSkills, 0.24),
            requirement("PostgreSQL", Importance::MustHave, SkillCategory::Technical, 1.0),
        ];

        let forward = skill_set_similarity(&skills, &reqs);

        let mut reversed_reqs = reqs.clone();
        reversed_reqs.reverse();
        let mut reversed_skills = skills.clone();
        reversed_skills.reverse();

        assert_eq!(forward.to_bits(), skill_set_similarity(&reversed_skills, &reversed_reqs).to_bits());
    }

    #[test]
    fn test_best_skill_reported() {
        let skills = vec!["java", "javascript"];
        let req = requirement("JavaScript", Importance::MustHave, SkillCategory::Technical, 1.0);

        let matched = requirement_contribution(&skills, &req, 0).unwrap();
        assert_eq!(matched.best_skill.as_deref(), Some("javascript"));
        assert_eq!(matched.similarity, 1.0);
    }
}
