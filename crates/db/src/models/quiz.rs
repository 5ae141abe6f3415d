//! Quiz and quiz-attempt models and DTOs.

use lms_core::quiz::{PublicQuestion, QuizQuestion, QuizScore};
use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A quiz row from the `quizzes` table, answer key included.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub passing_score: i32,
    pub questions: Json<Vec<QuizQuestion>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Learner-facing quiz view without the answer key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub passing_score: i32,
    pub questions: Vec<PublicQuestion>,
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        PublicQuiz {
            id: quiz.id,
            course_id: quiz.course_id,
            title: quiz.title.clone(),
            passing_score: quiz.passing_score,
            questions: quiz.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

/// DTO for creating a new quiz.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuiz {
    pub course_id: DbId,
    pub title: String,
    pub passing_score: i32,
    pub questions: Vec<QuizQuestion>,
}

/// DTO for updating a quiz. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuiz {
    pub title: Option<String>,
    pub passing_score: Option<i32>,
    pub questions: Option<Vec<QuizQuestion>>,
}

/// A row from the append-only `quiz_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: DbId,
    pub quiz_id: DbId,
    pub user_id: DbId,
    pub answers: Vec<i32>,
    pub correct_count: i32,
    pub question_count: i32,
    pub score: i32,
    pub passed: bool,
    pub attempted_at: Timestamp,
}

/// DTO for appending an attempt. The score is computed before insert.
#[derive(Debug, Clone)]
pub struct CreateQuizAttempt {
    pub quiz_id: DbId,
    pub user_id: DbId,
    pub answers: Vec<i32>,
    pub result: QuizScore,
}
