//! Handlers for certificate issuance, listing and verification.
//!
//! Issuance checks run in order: the enrollment exists, belongs to the
//! caller, its course has not been deleted, the enrollment is completed, and
//! it has no certificate yet. The enrollment
//! uniqueness constraint backs the last check when two requests race.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::certificate::is_valid_certificate_number;
use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::certificate::{Certificate, CreateCertificate};
use lms_db::repositories::certificate_repo::{UQ_ENROLLMENT, UQ_NUMBER};
use lms_db::repositories::CertificateRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::course::find_course;
use crate::handlers::enrollment::{ensure_owner, find_enrollment};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/enrollments/{id}/certificate
///
/// Issue the certificate for a completed enrollment. Returns 201 Created.
pub async fn issue(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(enrollment_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Certificate>>)> {
    let enrollment = find_enrollment(&state, enrollment_id).await?;
    ensure_owner(&user, &enrollment)?;
    find_course(&state, enrollment.course_id).await?;

    if !enrollment.is_completed() {
        return Err(AppError::Core(CoreError::NotCompleted { enrollment_id }));
    }
    if CertificateRepo::find_by_enrollment(&state.pool, enrollment_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::AlreadyIssued { enrollment_id }));
    }

    let input = CreateCertificate {
        user_id: enrollment.user_id,
        course_id: enrollment.course_id,
        enrollment_id,
    };
    let certificate = CertificateRepo::issue(&state.pool, &input)
        .await
        .map_err(|err| {
            if lms_db::is_unique_violation(&err, UQ_ENROLLMENT) {
                AppError::Core(CoreError::AlreadyIssued { enrollment_id })
            } else if lms_db::is_unique_violation(&err, UQ_NUMBER) {
                AppError::Core(CoreError::Internal(
                    "Could not generate a unique certificate number".into(),
                ))
            } else {
                AppError::Database(err)
            }
        })?;

    tracing::info!(
        certificate_id = certificate.id,
        enrollment_id,
        certificate_number = %certificate.certificate_number,
        "Certificate issued"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: certificate })))
}

/// GET /api/v1/certificates
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Certificate>>>> {
    let certificates = CertificateRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: certificates }))
}

/// GET /api/v1/certificates/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Certificate>>> {
    let certificate = CertificateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Certificate",
            id,
        }))?;

    if certificate.user_id != user.user_id && !user.role.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may not view this certificate".into(),
        )));
    }
    Ok(Json(DataResponse { data: certificate }))
}

/// GET /api/v1/certificates/verify/{number}
///
/// Public lookup by certificate number. No authentication required.
pub async fn verify(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> AppResult<Json<DataResponse<Certificate>>> {
    let number = number.trim().to_uppercase();
    if !is_valid_certificate_number(&number) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{number}' is not a certificate number"
        ))));
    }

    let certificate = CertificateRepo::find_by_number(&state.pool, &number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No certificate with number {number}")))?;
    Ok(Json(DataResponse { data: certificate }))
}
