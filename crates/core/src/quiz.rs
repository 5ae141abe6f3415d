//! Quiz definitions, validation, and attempt scoring.
//!
//! A quiz is an ordered list of multiple-choice questions. The answer key is
//! the `correct_option` index of each question, and an attempt is one chosen
//! option index per question, in the same order.

use serde::{Deserialize, Serialize};

/// Default passing threshold (percent) when a quiz is created without one.
pub const DEFAULT_PASSING_SCORE: i32 = 70;

/// Minimum number of options a question must offer.
pub const MIN_OPTIONS_PER_QUESTION: usize = 2;

/// One multiple-choice question, including its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_option: i32,
}

/// A question as shown to learners (answer removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<&QuizQuestion> for PublicQuestion {
    fn from(q: &QuizQuestion) -> Self {
        PublicQuestion {
            prompt: q.prompt.clone(),
            options: q.options.clone(),
        }
    }
}

/// Validate a passing threshold expressed as a percentage.
pub fn validate_passing_score(score: i32) -> Result<(), String> {
    if (0..=100).contains(&score) {
        Ok(())
    } else {
        Err(format!("Passing score must be between 0 and 100, got {score}"))
    }
}

/// Validate the question list of a quiz.
pub fn validate_questions(questions: &[QuizQuestion]) -> Result<(), String> {
    if questions.is_empty() {
        return Err("A quiz must have at least one question".to_string());
    }
    for (i, q) in questions.iter().enumerate() {
        let n = i + 1;
        if q.prompt.trim().is_empty() {
            return Err(format!("Question {n} has an empty prompt"));
        }
        if q.options.len() < MIN_OPTIONS_PER_QUESTION {
            return Err(format!(
                "Question {n} must have at least {MIN_OPTIONS_PER_QUESTION} options"
            ));
        }
        if q.options.iter().any(|o| o.trim().is_empty()) {
            return Err(format!("Question {n} has an empty option"));
        }
        if q.correct_option < 0 || q.correct_option as usize >= q.options.len() {
            return Err(format!(
                "Question {n} has correct option {} outside 0..{}",
                q.correct_option,
                q.options.len()
            ));
        }
    }
    Ok(())
}

/// The correct option index of each question, in order.
pub fn answer_key(questions: &[QuizQuestion]) -> Vec<i32> {
    questions.iter().map(|q| q.correct_option).collect()
}

/// Outcome of grading one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub correct_count: i32,
    pub question_count: i32,
    /// Rounded percentage of correct answers, 0..=100.
    pub score: i32,
    pub passed: bool,
}

/// Grade `answers` against the quiz's answer key.
///
/// Answers are compared positionally. The answer list must have exactly one
/// entry per question and every entry must name an existing option.
pub fn score_attempt(
    questions: &[QuizQuestion],
    passing_score: i32,
    answers: &[i32],
) -> Result<QuizScore, String> {
    if answers.len() != questions.len() {
        return Err(format!(
            "Expected {} answers, got {}",
            questions.len(),
            answers.len()
        ));
    }
    for (i, (answer, q)) in answers.iter().zip(questions).enumerate() {
        if *answer < 0 || *answer as usize >= q.options.len() {
            return Err(format!(
                "Answer {} selects option {answer}, which does not exist",
                i + 1
            ));
        }
    }

    let question_count = questions.len() as i32;
    let correct_count = answers
        .iter()
        .zip(answer_key(questions))
        .filter(|(given, expected)| **given == *expected)
        .count() as i32;
    let score = if question_count == 0 {
        0
    } else {
        (correct_count * 100 + question_count / 2) / question_count
    };

    Ok(QuizScore {
        correct_count,
        question_count,
        score,
        passed: score >= passing_score,
    })
}
