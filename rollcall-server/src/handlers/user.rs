//! Employee registration and lookup handlers
//!
//! Registration accepts a reference photo, enrolls its face descriptor
//! through the fingerprint engine, and persists both alongside the employee
//! record.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use rollcall_core::FaceHasher;

use crate::db::{CreateUser, UserResponse};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::multipart::MultipartFields;
use crate::storage;

/// Register a new employee with a reference face photo
///
/// Accepts multipart/form-data with:
/// - **name** (required): Employee full name
/// - **email** (required): Employee email, unique
/// - **phone** (optional): Employee phone number
/// - **face_image** (required): Reference photo, JPG or PNG
///
/// The photo is stored under the upload directory and its face descriptor
/// is extracted and persisted with the record. If extraction or persistence
/// fails the stored file is removed again.
#[utoipa::path(
    post,
    path = "/api/employees/register",
    tag = "Employees",
    request_body(
        content_type = "multipart/form-data",
        description = "Employee details and reference photo"
    ),
    responses(
        (status = 201, description = "Employee registered", body = UserResponse),
        (status = 400, description = "Missing fields, bad file type, or undecodable image"),
        (status = 503, description = "Database not configured")
    )
)]
pub async fn register_employee_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let fields = MultipartFields::parse(&mut multipart, "face_image", state.max_file_size).await?;

    let name = fields.require_text("name", "Name")?.trim().to_string();
    let email = fields.require_text("email", "Email")?.trim().to_string();
    let phone = fields
        .get_text("phone")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from);

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

    let existing = user_repo
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Email is already registered"));
    }

    let saved_path = storage::save_upload(&file.data, file_name, &state.upload_dir).await?;

    // Hashing is CPU-bound; keep it off the async worker threads
    let verifier = state.verifier.clone();
    let photo = file.data.clone();
    let enrolled = tokio::task::spawn_blocking(move || verifier.enroll_bytes(&photo))
        .await
        .map_err(|e| ApiError::internal(format!("Extraction task failed: {}", e)))?;

    // From here on, a failure must not leave the stored photo behind
    let face_descriptor = match enrolled {
        Ok(descriptor) => descriptor,
        Err(e) => {
            storage::delete_upload(&saved_path).await;
            return Err(e.into());
        }
    };

    let created = user_repo
        .create(CreateUser {
            name,
            email,
            phone,
            face_image_path: saved_path.display().to_string(),
            face_descriptor,
        })
        .await;

    let user = match created {
        Ok(user) => user,
        Err(e) => {
            storage::delete_upload(&saved_path).await;
            return Err(ApiError::internal(format!(
                "Failed to register employee: {}",
                e
            )));
        }
    };

    tracing::info!(employee = %user.name, id = %user.id, "Employee registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List all registered employees
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    responses(
        (status = 200, description = "All employees", body = [UserResponse]),
        (status = 503, description = "Database not configured")
    )
)]
pub async fn list_employees_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let users = user_repo
        .list()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch employees: {}", e)))?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch a single employee by id
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(
        ("id" = String, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "The employee", body = UserResponse),
        (status = 404, description = "Employee not found"),
        (status = 503, description = "Database not configured")
    )
)]
pub async fn get_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = user_repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok(Json(UserResponse::from(user)))
}
