//! Screening rubric: scores candidate answers to a job's screening questions

use crate::processing::lexicon::Lexicon;
use crate::processing::requirements::{lenient_number, lenient_text};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

const MAX_QUESTION_SCORE: f64 = 100.0;
const MAX_KEYWORD_SCORE: f64 = 60.0;
/// Keyword score for topic-less questions with more than [`GENERIC_MIN_WORDS`] words.
const GENERIC_KEYWORD_SCORE: f64 = 30.0;
const GENERIC_MIN_WORDS: usize = 5;
/// At most this many keywords are expected in a full-marks answer.
const EXPECTED_KEYWORDS: usize = 5;
const OPTION_STEP: f64 = 20.0;
const OPTION_FLOOR: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    Text,
    MultipleChoice,
    Boolean,
    /// Any type this rubric does not know; always scores 0.
    #[serde(other)]
    Other,
}

fn default_question_weight() -> f64 {
    1.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypeValue {
    Known(QuestionType),
    Other(IgnoredAny),
}

/// A present but null or non-string type scores like an unknown one.
fn lenient_question_type<'de, D>(deserializer: D) -> std::result::Result<QuestionType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TypeValue>::deserialize(deserializer)? {
        Some(TypeValue::Known(question_type)) => question_type,
        _ => QuestionType::Other,
    })
}

fn lenient_question_weight<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or_else(default_question_weight))
}

/// A question attached to a job. Missing or mistyped fields fall back to
/// defaults so one bad question never rejects the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningQuestion {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub question: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_question_type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_question_weight", deserialize_with = "lenient_question_weight")]
    pub weight: f64,
}

impl ScreeningQuestion {
    /// Aggregation weight; zero, negative or non-finite weights count as 1.
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            default_question_weight()
        }
    }
}

/// A submitted answer. `score` is only consulted when no question matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScreeningAnswer {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Scored answer, ready to be stored with the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResponse {
    pub question_id: Option<String>,
    pub question_text: String,
    pub answer_text: String,
    /// Unweighted score in `[0, 100]`.
    pub score: f64,
    pub weight: f64,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub responses: Vec<ScreeningResponse>,
    /// Weighted, rounded aggregate in `[0, 100]`.
    pub aggregate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextScore {
    pub keyword_score: f64,
    pub length_score: f64,
    pub total: f64,
}

fn length_score(words: usize) -> f64 {
    match words {
        0..=2 => 10.0,
        3..=5 => 20.0,
        6..=15 => 30.0,
        _ => 40.0,
    }
}

/// Keyword plus length score of a free-text answer.
pub fn score_text_answer(lexicon: &Lexicon, question: &str, answer: &str) -> TextScore {
    let words = answer.split_whitespace().count();
    if words == 0 {
        return TextScore {
            keyword_score: 0.0,
            length_score: 0.0,
            total: 0.0,
        };
    }

    let answer_lower = answer.to_lowercase();
    let keyword_score = match lexicon.question_topic(question) {
        Some(rule) if !rule.keywords.is_empty() => {
            let matched = rule
                .keywords
                .iter()
                .filter(|keyword| answer_lower.contains(*keyword))
                .count();
            let expected = rule.keywords.len().min(EXPECTED_KEYWORDS);
            (MAX_KEYWORD_SCORE * matched as f64 / expected as f64)
                .round()
                .min(MAX_KEYWORD_SCORE)
        }
        _ if words > GENERIC_MIN_WORDS => GENERIC_KEYWORD_SCORE,
        _ => 0.0,
    };

    let length_score = length_score(words);
    TextScore {
        keyword_score,
        length_score,
        total: (keyword_score + length_score).min(MAX_QUESTION_SCORE),
    }
}

/// Unweighted score of one answer against its question.
pub fn score_answer(lexicon: &Lexicon, question: &ScreeningQuestion, answer: &str) -> f64 {
    match question.question_type {
        QuestionType::Text => score_text_answer(lexicon, &question.question, answer).total,
        QuestionType::MultipleChoice => question
            .options
            .iter()
            .position(|option| option == answer)
            .map(|index| (MAX_QUESTION_SCORE - OPTION_STEP * index as f64).max(OPTION_FLOOR))
            .unwrap_or(0.0),
        QuestionType::Boolean => {
            let expected = question.options.first().map(String::as_str).unwrap_or("true");
            if answer == expected {
                MAX_QUESTION_SCORE
            } else {
                0.0
            }
        }
        QuestionType::Other => 0.0,
    }
}

fn find_question<'a>(questions: &'a [ScreeningQuestion], answer: &ScreeningAnswer) -> Option<&'a ScreeningQuestion> {
    answer
        .question_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .and_then(|id| questions.iter().find(|q| q.id == id))
        .or_else(|| {
            answer
                .question
                .as_deref()
                .filter(|text| !text.is_empty())
                .and_then(|text| questions.iter().find(|q| q.question == text))
        })
}

fn supplied_score(score: Option<f64>) -> f64 {
    score
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, MAX_QUESTION_SCORE))
        .unwrap_or(0.0)
}

/// Scores every answer and folds them into the weighted aggregate
/// `round(sum(score x weight) / sum(weight))`.
pub fn score_responses(
    lexicon: &Lexicon,
    answers: &[ScreeningAnswer],
    questions: &[ScreeningQuestion],
) -> ScreeningOutcome {
    let responses: Vec<ScreeningResponse> = answers
        .iter()
        .map(|answer| match find_question(questions, answer) {
            Some(question) => ScreeningResponse {
                question_id: Some(question.id.clone()).filter(|id| !id.is_empty()),
                question_text: question.question.clone(),
                answer_text: answer.answer.clone(),
                score: score_answer(lexicon, question, &answer.answer),
                weight: question.effective_weight(),
                matched: true,
            },
            None => {
                log::debug!(
                    "No screening question for answer {:?}, keeping supplied score",
                    answer.question_id.as_deref().or(answer.question.as_deref())
                );
                ScreeningResponse {
                    question_id: answer.question_id.clone(),
                    question_text: answer.question.clone().unwrap_or_default(),
                    answer_text: answer.answer.clone(),
                    score: supplied_score(answer.score),
                    weight: 1.0,
                    matched: false,
                }
            }
        })
        .collect();

    let aggregate = aggregate_score(&responses);
    ScreeningOutcome { responses, aggregate }
}

/// Weighted mean of already scored responses, rounded to a whole number.
pub fn aggregate_score(responses: &[ScreeningResponse]) -> f64 {
    let total_weight: f64 = responses.iter().map(|r| r.weight).sum();
    if responses.is_empty() || total_weight <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = responses.iter().map(|r| r.score * r.weight).sum();
    (weighted / total_weight).round().clamp(0.0, MAX_QUESTION_SCORE)
}
