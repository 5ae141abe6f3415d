//! Certificate entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `certificates` table. Immutable once inserted.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub enrollment_id: DbId,
    pub certificate_number: String,
    pub issued_at: Timestamp,
}

/// DTO for issuing a certificate. The number is generated by the repository.
#[derive(Debug, Clone)]
pub struct CreateCertificate {
    pub user_id: DbId,
    pub course_id: DbId,
    pub enrollment_id: DbId,
}
