//! Check-in and attendance history handlers
//!
//! Check-in runs the submitted selfie through face verification against the
//! employee's stored descriptor and records the outcome. Verification
//! failures and engine failures are kept apart: a low score becomes a
//! `failed` attendance row, while an undecodable selfie or a corrupt stored
//! descriptor surfaces as an error and records nothing.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use rollcall_core::FaceHasher;

use crate::db::{AttendanceListParams, AttendanceRecord, AttendanceStatus, CreateAttendance};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::multipart::MultipartFields;
use crate::storage;

/// Response for a processed check-in
#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    /// The recorded attendance row
    pub attendance: AttendanceRecord,
    /// Whether the face matched the stored reference
    pub verification: bool,
    /// Raw similarity score in [0, 1]
    #[schema(example = 0.9844)]
    pub similarity_score: f64,
    /// Threshold the score was compared against
    #[schema(example = 0.6)]
    pub threshold: f64,
    /// Human-readable outcome message
    pub message: String,
}

/// Check in with a selfie
///
/// Accepts multipart/form-data with:
/// - **user_id** (required): Employee id from registration
/// - **selfie_image** (required): Selfie photo, JPG or PNG
///
/// The selfie is verified against the employee's enrolled descriptor using
/// the configured similarity threshold. The attendance row is written for
/// both outcomes, carrying the raw score, so failed attempts stay auditable.
#[utoipa::path(
    post,
    path = "/api/attendance/checkin",
    tag = "Attendance",
    request_body(
        content_type = "multipart/form-data",
        description = "Employee id and selfie photo"
    ),
    responses(
        (status = 201, description = "Check-in processed (matched or not)", body = CheckInResponse),
        (status = 400, description = "Missing fields, bad file type, or undecodable selfie"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Stored descriptor corrupt or storage failure"),
        (status = 503, description = "Database not configured")
    )
)]
pub async fn check_in_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CheckInResponse>), ApiError> {
    let fields = MultipartFields::parse(&mut multipart, "selfie_image", state.max_file_size).await?;

    let user_id: Uuid = fields
        .require_text("user_id", "User ID")?
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid user ID"))?;

    let file = fields.require_file()?;
    let file_name = file.file_name.as_deref().unwrap_or("");
    storage::validate_extension(file_name)?;

    if !FaceHasher::is_supported_format(&file.data) {
        return Err(ApiError::bad_request(
            "Uploaded file is not a supported image format",
        ));
    }

    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;
    let attendance_repo = state
        .attendance_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    let saved_path = storage::save_upload(&file.data, file_name, &state.upload_dir).await?;

    // Hashing is CPU-bound; keep it off the async worker threads. Engine
    // errors propagate: "could not evaluate" must never be recorded as a
    // failed check-in
    let verifier = state.verifier.clone();
    let selfie = file.data.clone();
    let reference = user.face_descriptor.clone();
    let outcome = tokio::task::spawn_blocking(move || verifier.verify_bytes(&selfie, &reference))
        .await
        .map_err(|e| ApiError::internal(format!("Verification task failed: {}", e)))??;

    let status = if outcome.is_match {
        AttendanceStatus::Success
    } else {
        AttendanceStatus::Failed
    };

    let attendance = attendance_repo
        .create(CreateAttendance {
            user_id: user.id,
            check_in_time: Utc::now(),
            face_image_path: saved_path.display().to_string(),
            similarity_score: outcome.score,
            status,
        })
        .await
        .map_err(|e| ApiError::internal(format!("Failed to record attendance: {}", e)))?;

    tracing::info!(
        employee = %user.name,
        id = %user.id,
        score = outcome.score,
        status = status.as_str(),
        "Check-in processed"
    );

    let message = if outcome.is_match {
        "Face verified successfully. Check-in recorded.".to_string()
    } else {
        "Face verification failed. Similarity score below threshold.".to_string()
    };

    Ok((
        StatusCode::CREATED,
        Json(CheckInResponse {
            attendance: attendance.into_record(user.name),
            verification: outcome.is_match,
            similarity_score: outcome.score,
            threshold: state.verifier.threshold(),
            message,
        }),
    ))
}

/// Attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/attendance",
    tag = "Attendance",
    params(AttendanceListParams),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord]),
        (status = 503, description = "Database not configured")
    )
)]
pub async fn list_attendance_handler(
    State(state): State<AppState>,
    Query(params): Query<AttendanceListParams>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError> {
    let attendance_repo = state
        .attendance_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let records = attendance_repo
        .list(&params)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch attendance records: {}", e)))?;

    Ok(Json(records))
}

/// Today's successful check-in for an employee
#[utoipa::path(
    get,
    path = "/api/attendance/today/{user_id}",
    tag = "Attendance",
    params(
        ("user_id" = String, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Today's attendance", body = AttendanceRecord),
        (status = 404, description = "No successful check-in today"),
        (status = 503, description = "Database not configured")
    )
)]
pub async fn today_attendance_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AttendanceRecord>, ApiError> {
    let attendance_repo = state
        .attendance_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let record = attendance_repo
        .find_today_success(user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("No attendance record found for today"))?;

    Ok(Json(record))
}
