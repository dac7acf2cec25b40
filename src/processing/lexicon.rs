//! Keyword tables shared by the classifier, the experience heuristic and the
//! screening rubric.
//!
//! A [`Lexicon`] is built once at start-up and handed to every scoring call by
//! reference (usually behind an `Arc` inside the engine). All tables are
//! ordered: rules are evaluated top to bottom and the first hit wins.

use crate::error::{MatcherError, Result};
use crate::processing::requirements::{Importance, SkillCategory, SkillLevel};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;

/// One axis value together with the phrases that indicate it.
#[derive(Debug, Clone)]
pub struct KeywordRule<T> {
    pub value: T,
    pub keywords: &'static [&'static str],
}

/// Job-title phrase that implies a minimum number of years.
#[derive(Debug, Clone)]
pub struct TitleRule {
    pub patterns: &'static [&'static str],
    pub years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionTopic {
    Experience,
    Education,
    Project,
}

/// Screening question topic: triggers are looked up in the question text,
/// keywords in the candidate's answer.
#[derive(Debug, Clone)]
pub struct QuestionTopicRule {
    pub topic: QuestionTopic,
    pub triggers: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

const CATEGORY_RULES: &[KeywordRule<SkillCategory>] = &[
    KeywordRule {
        value: SkillCategory::Technical,
        keywords: &[
            "programming", "development", "coding", "software", "engineering",
            "javascript", "python", "java", "c++", "react", "node", "database",
            "api", "backend", "frontend", "fullstack", "cloud", "devops",
        ],
    },
    KeywordRule {
        value: SkillCategory::SoftSkills,
        keywords: &[
            "communication", "teamwork", "leadership", "problem solving",
            "analytical", "time management", "organization", "collaboration",
            "adaptability", "creativity", "critical thinking",
        ],
    },
    KeywordRule {
        value: SkillCategory::Tools,
        keywords: &[
            "git", "docker", "kubernetes", "aws", "azure", "jenkins",
            "jira", "confluence", "slack", "vscode", "intellij",
        ],
    },
    KeywordRule {
        value: SkillCategory::Certifications,
        keywords: &[
            "certification", "certified", "aws certified", "microsoft certified",
            "pmp", "scrum", "cissp", "ceh", "comptia",
        ],
    },
    KeywordRule {
        value: SkillCategory::Education,
        keywords: &[
            "degree", "bachelor", "master", "phd", "diploma",
            "computer science", "engineering", "information technology",
        ],
    },
];

const LEVEL_RULES: &[KeywordRule<SkillLevel>] = &[
    KeywordRule {
        value: SkillLevel::Beginner,
        keywords: &["basic", "fundamental", "entry level", "junior"],
    },
    KeywordRule {
        value: SkillLevel::Intermediate,
        keywords: &["moderate", "intermediate", "mid level"],
    },
    KeywordRule {
        value: SkillLevel::Advanced,
        keywords: &["advanced", "senior", "expert", "proficient"],
    },
    KeywordRule {
        value: SkillLevel::Expert,
        keywords: &["expert", "master", "specialist", "guru"],
    },
];

const IMPORTANCE_RULES: &[KeywordRule<Importance>] = &[
    KeywordRule {
        value: Importance::MustHave,
        keywords: &["required", "must have", "essential", "mandatory"],
    },
    KeywordRule {
        value: Importance::Preferred,
        keywords: &["preferred", "desired", "important"],
    },
    KeywordRule {
        value: Importance::NiceToHave,
        keywords: &["nice to have", "plus", "bonus", "optional"],
    },
];

const TITLE_RULES: &[TitleRule] = &[
    TitleRule { patterns: &["senior", "lead"], years: 3.0 },
    TitleRule { patterns: &["mid-level", "mid level"], years: 2.0 },
    TitleRule { patterns: &["junior"], years: 1.0 },
    TitleRule { patterns: &["intern", "trainee"], years: 0.0 },
];

const QUESTION_TOPICS: &[QuestionTopicRule] = &[
    QuestionTopicRule {
        topic: QuestionTopic::Experience,
        triggers: &["experience", "worked with"],
        keywords: &[
            "years", "experience", "worked", "developed", "built", "created", "managed",
            "aws", "azure", "gcp", "cloud", "docker", "kubernetes", "react", "angular", "vue",
            "node", "python", "java", "javascript", "typescript", "c#", "go", "rust",
            "sql", "nosql", "mongodb", "postgresql", "mysql", "oracle", "database",
            "frontend", "backend", "fullstack", "devops", "ci/cd", "agile", "scrum",
        ],
    },
    QuestionTopicRule {
        topic: QuestionTopic::Education,
        triggers: &["education", "degree"],
        keywords: &[
            "degree", "bachelor", "master", "phd", "diploma", "certificate",
            "computer science", "engineering", "information technology", "bootcamp",
        ],
    },
    QuestionTopicRule {
        topic: QuestionTopic::Project,
        triggers: &["project", "achievement"],
        keywords: &[
            "project", "developed", "created", "built", "designed", "implemented",
            "team", "led", "managed", "achievement", "award", "recognition",
        ],
    },
];

const KNOWN_SKILLS: &[&str] = &[
    "JavaScript", "Python", "Java", "C++", "SQL", "ExpressJS",
    "React", "Node.js", "MongoDB", "HTML", "CSS",
    "Machine Learning", "AI", "Data Science", "Cloud Computing",
    "AWS", "Azure", "DevOps", "Docker", "Kubernetes",
    "Git", "REST API", "GraphQL", "TypeScript", "Angular",
    "Vue.js", "PHP", "Ruby", "Swift", "Kotlin",
    "Android", "iOS", "React Native", "Flutter", "Blockchain",
    "Cybersecurity", "Network Security", "Database Management",
    "Agile", "Scrum", "Project Management", "Team Leadership",
    "Problem Solving", "Communication", "Analytical Skills",
];

/// Immutable keyword tables plus the compiled matchers built from them.
pub struct Lexicon {
    years_pattern: Regex,
    number_pattern: Regex,
    skill_matcher: AhoCorasick,
}

impl Lexicon {
    pub fn new() -> Result<Self> {
        let years_pattern = Regex::new(
            r"(?i)\b(\d+)\+?\s*(?:year|yr|yrs)s?(?:\s+(?:of\s+)?(?:experience|exp))?\b",
        )
        .map_err(|e| MatcherError::Processing(format!("Failed to compile years pattern: {}", e)))?;

        let number_pattern = Regex::new(r"\d+")
            .map_err(|e| MatcherError::Processing(format!("Failed to compile number pattern: {}", e)))?;

        // Longest skills win so "React Native" is preferred over "React"
        let skill_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(KNOWN_SKILLS)
            .map_err(|e| MatcherError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        log::debug!(
            "Lexicon ready: {} categories, {} levels, {} importances, {} known skills",
            CATEGORY_RULES.len(),
            LEVEL_RULES.len(),
            IMPORTANCE_RULES.len(),
            KNOWN_SKILLS.len()
        );

        Ok(Self {
            years_pattern,
            number_pattern,
            skill_matcher,
        })
    }

    pub fn categories(&self) -> &[KeywordRule<SkillCategory>] {
        CATEGORY_RULES
    }

    pub fn levels(&self) -> &[KeywordRule<SkillLevel>] {
        LEVEL_RULES
    }

    pub fn importances(&self) -> &[KeywordRule<Importance>] {
        IMPORTANCE_RULES
    }

    pub fn title_rules(&self) -> &[TitleRule] {
        TITLE_RULES
    }

    /// Years of experience implied by a job title.
    ///
    /// An explicit "N years" / "N+ yrs" mention wins, then the seniority
    /// keywords of [`TITLE_RULES`] in order; anything else means no requirement.
    pub fn years_from_title(&self, title: &str) -> f64 {
        let normalized = title.to_lowercase();

        if let Some(years) = self
            .years_pattern
            .captures(&normalized)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            return years;
        }

        TITLE_RULES
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| normalized.contains(p)))
            .map(|rule| rule.years)
            .unwrap_or(0.0)
    }

    /// First integer in a free-text experience field such as "2 years" or "3-5 yrs".
    pub fn years_hint(&self, text: &str) -> Option<f64> {
        self.number_pattern
            .find(text)
            .and_then(|m| m.as_str().parse::<f64>().ok())
    }

    /// Topic rule whose trigger appears in the question text, if any.
    pub fn question_topic(&self, question: &str) -> Option<&QuestionTopicRule> {
        let normalized = question.to_lowercase();
        QUESTION_TOPICS
            .iter()
            .find(|rule| rule.triggers.iter().any(|t| normalized.contains(t)))
    }

    /// Known skills mentioned in free text, in order of first appearance.
    ///
    /// Matches must sit on word boundaries, so "AI" is not found inside "maintain".
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let bytes = text.as_bytes();
        let is_word = |idx: usize| bytes.get(idx).map_or(false, |b| b.is_ascii_alphanumeric());

        let mut skills: Vec<String> = Vec::new();
        for mat in self.skill_matcher.find_iter(text) {
            let before_ok = mat.start() == 0 || !is_word(mat.start() - 1);
            let after_ok = !is_word(mat.end());
            if !(before_ok && after_ok) {
                continue;
            }
            let skill = KNOWN_SKILLS[mat.pattern().as_usize()];
            if !skills.iter().any(|s| s == skill) {
                skills.push(skill.to_string());
            }
        }
        skills
    }

    pub fn known_skill_count(&self) -> usize {
        KNOWN_SKILLS.len()
    }
}
