use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The (user, course) pair already has an enrollment.
    #[error("User {user_id} is already enrolled in course {course_id}")]
    DuplicateEnrollment { user_id: DbId, course_id: DbId },

    /// A certificate was requested for an enrollment that is still in progress.
    #[error("Enrollment {enrollment_id} is not completed")]
    NotCompleted { enrollment_id: DbId },

    /// The enrollment already earned its certificate.
    #[error("A certificate was already issued for enrollment {enrollment_id}")]
    AlreadyIssued { enrollment_id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
