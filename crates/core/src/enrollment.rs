//! Enrollment status and lesson-progress evaluation.
//!
//! The repository layer loads an enrollment's progress entries and its
//! course's lesson sequence, then defers to these functions to decide what
//! to write. Keeping the rules here means they are unit-testable without a
//! database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_COMPLETED: &str = "completed";

/// All valid enrollment status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_IN_PROGRESS, STATUS_COMPLETED];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrollmentStatus {
    InProgress,
    Completed,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::InProgress => STATUS_IN_PROGRESS,
            EnrollmentStatus::Completed => STATUS_COMPLETED,
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_IN_PROGRESS => Ok(EnrollmentStatus::InProgress),
            STATUS_COMPLETED => Ok(EnrollmentStatus::Completed),
            other => Err(format!(
                "Invalid enrollment status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }
}

/// Completion state of one lesson within an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub lesson_id: DbId,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
}

/// Result of [`mark_lesson`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonMark {
    /// The lesson was not completed before and now is.
    Recorded,
    /// The lesson was already completed; nothing changed.
    AlreadyCompleted,
}

/// Upsert a completed entry for `lesson_id`.
///
/// Re-marking a completed lesson leaves the entry (and its timestamp) as is.
pub fn mark_lesson(
    progress: &mut Vec<LessonProgress>,
    lesson_id: DbId,
    now: Timestamp,
) -> LessonMark {
    match progress.iter_mut().find(|p| p.lesson_id == lesson_id) {
        Some(entry) if entry.completed => LessonMark::AlreadyCompleted,
        Some(entry) => {
            entry.completed = true;
            entry.completed_at = Some(now);
            LessonMark::Recorded
        }
        None => {
            progress.push(LessonProgress {
                lesson_id,
                completed: true,
                completed_at: Some(now),
            });
            LessonMark::Recorded
        }
    }
}

/// True when every lesson in `lesson_ids` has a completed progress entry.
///
/// A course without lessons is never complete.
pub fn all_lessons_completed(lesson_ids: &[DbId], progress: &[LessonProgress]) -> bool {
    !lesson_ids.is_empty()
        && lesson_ids.iter().all(|id| {
            progress
                .iter()
                .any(|p| p.lesson_id == *id && p.completed)
        })
}

/// What the enrollment status should become after a progress change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    Unchanged,
    Completed { at: Timestamp },
}

/// Decide whether an enrollment flips to completed.
///
/// An already-completed enrollment never transitions again, so `completedAt`
/// is only ever set once.
pub fn evaluate_status(
    current: EnrollmentStatus,
    lesson_ids: &[DbId],
    progress: &[LessonProgress],
    now: Timestamp,
) -> StatusTransition {
    if current == EnrollmentStatus::InProgress && all_lessons_completed(lesson_ids, progress) {
        StatusTransition::Completed { at: now }
    } else {
        StatusTransition::Unchanged
    }
}

/// Aggregate progress numbers shown alongside an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed_lessons: usize,
    pub total_lessons: usize,
    /// Whole-number percentage, 0..=100.
    pub percent: u8,
}

/// Count completed lessons that still belong to the course.
///
/// Entries for lessons removed from the course after completion are ignored.
pub fn summarize(lesson_ids: &[DbId], progress: &[LessonProgress]) -> ProgressSummary {
    let total_lessons = lesson_ids.len();
    let completed_lessons = lesson_ids
        .iter()
        .filter(|id| progress.iter().any(|p| p.lesson_id == **id && p.completed))
        .count();
    let percent = if total_lessons == 0 {
        0
    } else {
        (completed_lessons * 100 / total_lessons) as u8
    };
    ProgressSummary {
        completed_lessons,
        total_lessons,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(EnrollmentStatus::InProgress.as_str(), "in-progress");
        assert_eq!(EnrollmentStatus::Completed.as_str(), "completed");
        assert_eq!(
            "in-progress".parse::<EnrollmentStatus>(),
            Ok(EnrollmentStatus::InProgress)
        );
        assert!("done".parse::<EnrollmentStatus>().is_err());
    }

    #[test]
    fn test_mark_new_lesson_records_entry() {
        let now = Utc::now();
        let mut progress = Vec::new();

        assert_eq!(mark_lesson(&mut progress, 10, now), LessonMark::Recorded);
        assert_eq!(
            progress,
            vec![LessonProgress {
                lesson_id: 10,
                completed: true,
                completed_at: Some(now),
            }]
        );
    }

    #[test]
    fn test_mark_lesson_is_idempotent() {
        let first = Utc::now();
        let later = first + Duration::minutes(5);
        let mut progress = Vec::new();

        mark_lesson(&mut progress, 10, first);
        let snapshot = progress.clone();

        assert_eq!(
            mark_lesson(&mut progress, 10, later),
            LessonMark::AlreadyCompleted
        );
        assert_eq!(progress, snapshot, "second mark must not change state");
    }

    #[test]
    fn test_mark_upgrades_incomplete_entry() {
        let now = Utc::now();
        let mut progress = vec![LessonProgress {
            lesson_id: 3,
            completed: false,
            completed_at: None,
        }];

        assert_eq!(mark_lesson(&mut progress, 3, now), LessonMark::Recorded);
        assert_eq!(progress.len(), 1);
        assert!(progress[0].completed);
        assert_eq!(progress[0].completed_at, Some(now));
    }

    #[test]
    fn test_all_lessons_completed_requires_every_lesson() {
        let now = Utc::now();
        let mut progress = Vec::new();
        mark_lesson(&mut progress, 1, now);

        assert!(!all_lessons_completed(&[1, 2], &progress));
        mark_lesson(&mut progress, 2, now);
        assert!(all_lessons_completed(&[1, 2], &progress));
    }

    #[test]
    fn test_empty_course_never_completes() {
        assert!(!all_lessons_completed(&[], &[]));
    }

    #[test]
    fn test_extra_progress_does_not_complete_course() {
        let now = Utc::now();
        let mut progress = Vec::new();
        mark_lesson(&mut progress, 99, now);
        assert!(!all_lessons_completed(&[1], &progress));
    }

    #[test]
    fn test_evaluate_flips_to_completed_once() {
        let now = Utc::now();
        let mut progress = Vec::new();
        mark_lesson(&mut progress, 1, now);

        assert_matches!(
            evaluate_status(EnrollmentStatus::InProgress, &[1], &progress, now),
            StatusTransition::Completed { at } if at == now
        );
        assert_eq!(
            evaluate_status(EnrollmentStatus::Completed, &[1], &progress, now),
            StatusTransition::Unchanged
        );
    }

    #[test]
    fn test_evaluate_unchanged_while_lessons_remain() {
        let now = Utc::now();
        let mut progress = Vec::new();
        mark_lesson(&mut progress, 1, now);

        assert_eq!(
            evaluate_status(EnrollmentStatus::InProgress, &[1, 2, 3], &progress, now),
            StatusTransition::Unchanged
        );
    }

    #[test]
    fn test_summarize_counts_only_course_lessons() {
        let now = Utc::now();
        let mut progress = Vec::new();
        mark_lesson(&mut progress, 1, now);
        mark_lesson(&mut progress, 42, now);

        let summary = summarize(&[1, 2, 3], &progress);
        assert_eq!(summary.completed_lessons, 1);
        assert_eq!(summary.total_lessons, 3);
        assert_eq!(summary.percent, 33);
    }

    #[test]
    fn test_summarize_empty_course() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.percent, 0);
        assert_eq!(summary.total_lessons, 0);
    }
}
