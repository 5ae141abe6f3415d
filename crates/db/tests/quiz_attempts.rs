//! Integration tests for quizzes and the append-only attempt log.

use lms_core::quiz::{score_attempt, QuizQuestion};
use lms_db::models::course::CreateCourse;
use lms_db::models::quiz::{CreateQuiz, CreateQuizAttempt};
use lms_db::models::user::CreateUser;
use lms_db::repositories::{CourseRepo, QuizAttemptRepo, QuizRepo, UserRepo};
use sqlx::PgPool;

fn questions() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion {
            prompt: "2 + 2".to_string(),
            options: vec!["3".into(), "4".into()],
            correct_option: 1,
        },
        QuizQuestion {
            prompt: "Ownership moves on".to_string(),
            options: vec!["assignment".into(), "borrow".into()],
            correct_option: 0,
        },
    ]
}

#[sqlx::test(migrations = "./migrations")]
async fn test_quiz_round_trips_questions(pool: PgPool) {
    let trainer = UserRepo::create(
        &pool,
        &CreateUser {
            name: "T".into(),
            email: "t@test.com".into(),
            password_hash: "x".into(),
            role: "trainer".into(),
        },
    )
    .await
    .unwrap();
    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            title: "C".into(),
            description: None,
            category: None,
            is_published: None,
            trainer_id: trainer.id,
        },
    )
    .await
    .unwrap();

    let quiz = QuizRepo::create(
        &pool,
        &CreateQuiz {
            course_id: course.id,
            title: "Basics".into(),
            passing_score: 50,
            questions: questions(),
        },
    )
    .await
    .unwrap();

    let loaded = QuizRepo::find_by_id(&pool, quiz.id).await.unwrap().unwrap();
    assert_eq!(loaded.questions.0, questions());
    assert_eq!(QuizRepo::list_by_course(&pool, course.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_attempts_are_appended_not_replaced(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            name: "L".into(),
            email: "l@test.com".into(),
            password_hash: "x".into(),
            role: "trainer".into(),
        },
    )
    .await
    .unwrap();
    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            title: "C".into(),
            description: None,
            category: None,
            is_published: None,
            trainer_id: user.id,
        },
    )
    .await
    .unwrap();
    let quiz = QuizRepo::create(
        &pool,
        &CreateQuiz {
            course_id: course.id,
            title: "Basics".into(),
            passing_score: 100,
            questions: questions(),
        },
    )
    .await
    .unwrap();

    for answers in [vec![0, 0], vec![1, 0]] {
        let result = score_attempt(&quiz.questions, quiz.passing_score, &answers).unwrap();
        QuizAttemptRepo::append(
            &pool,
            &CreateQuizAttempt {
                quiz_id: quiz.id,
                user_id: user.id,
                answers,
                result,
            },
        )
        .await
        .unwrap();
    }

    let history = QuizAttemptRepo::list_for_user(&pool, quiz.id, user.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].score, 50);
    assert!(!history[0].passed);
    assert_eq!(history[1].score, 100);
    assert!(history[1].passed);
    assert_eq!(history[1].answers, vec![1, 0]);
}
