//! Repository for the `certificates` table.
//!
//! Certificates are insert-only. The certificate number is generated here,
//! immediately before the insert, and regenerated when the insert collides
//! with an existing number.

use chrono::Utc;
use lms_core::certificate::{generate_certificate_number, MAX_ISSUE_ATTEMPTS};
use lms_core::types::DbId;
use sqlx::PgPool;

use crate::is_unique_violation;
use crate::models::certificate::{Certificate, CreateCertificate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, course_id, enrollment_id, certificate_number, issued_at";

/// Unique constraint: one certificate per enrollment.
pub const UQ_ENROLLMENT: &str = "uq_certificates_enrollment";

/// Unique constraint: certificate numbers are globally unique.
pub const UQ_NUMBER: &str = "uq_certificates_number";

/// Provides issuance and lookup of certificates.
pub struct CertificateRepo;

impl CertificateRepo {
    /// Insert a certificate with a freshly generated number.
    ///
    /// Retries with a new number on a [`UQ_NUMBER`] collision, up to
    /// [`MAX_ISSUE_ATTEMPTS`] times; the last collision error is returned if
    /// every attempt collides. A [`UQ_ENROLLMENT`] violation is returned
    /// immediately.
    pub async fn issue(
        pool: &PgPool,
        input: &CreateCertificate,
    ) -> Result<Certificate, sqlx::Error> {
        Self::issue_with(pool, input, || {
            generate_certificate_number(Utc::now(), &mut rand::rng())
        })
        .await
    }

    /// [`issue`](Self::issue) with a caller-supplied number generator.
    pub async fn issue_with<F>(
        pool: &PgPool,
        input: &CreateCertificate,
        mut next_number: F,
    ) -> Result<Certificate, sqlx::Error>
    where
        F: FnMut() -> String,
    {
        let query = format!(
            "INSERT INTO certificates (user_id, course_id, enrollment_id, certificate_number)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );

        let mut attempt = 1;
        loop {
            let number = next_number();
            let result = sqlx::query_as::<_, Certificate>(&query)
                .bind(input.user_id)
                .bind(input.course_id)
                .bind(input.enrollment_id)
                .bind(&number)
                .fetch_one(pool)
                .await;

            match result {
                Err(err) if is_unique_violation(&err, UQ_NUMBER) && attempt < MAX_ISSUE_ATTEMPTS => {
                    tracing::warn!(
                        enrollment_id = input.enrollment_id,
                        attempt,
                        certificate_number = %number,
                        "Certificate number collision, regenerating"
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Find a certificate by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Certificate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM certificates WHERE id = $1");
        sqlx::query_as::<_, Certificate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the certificate earned by an enrollment, if any.
    pub async fn find_by_enrollment(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<Option<Certificate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM certificates WHERE enrollment_id = $1");
        sqlx::query_as::<_, Certificate>(&query)
            .bind(enrollment_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a certificate by its public number.
    pub async fn find_by_number(
        pool: &PgPool,
        number: &str,
    ) -> Result<Option<Certificate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM certificates WHERE certificate_number = $1");
        sqlx::query_as::<_, Certificate>(&query)
            .bind(number)
            .fetch_optional(pool)
            .await
    }

    /// A user's certificates, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Certificate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certificates WHERE user_id = $1 ORDER BY issued_at DESC, id DESC"
        );
        sqlx::query_as::<_, Certificate>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
