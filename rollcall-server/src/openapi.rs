//! OpenAPI documentation configuration
//!
//! Generates OpenAPI 3.0 specification for the Rollcall attendance API.

use utoipa::OpenApi;

use crate::db::{AttendanceRecord, AttendanceStatus, UserResponse};
use crate::handlers::{CheckInResponse, HealthResponse, ReadyResponse};

/// Rollcall Attendance API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rollcall - Attendance API",
        version = "0.1.0",
        description = r#"
## Face-verified employee check-in

Rollcall records attendance by comparing a submitted selfie against each
employee's enrolled reference photo using perceptual image fingerprints
(perceptual, average, and difference hashes).

### How it works

1. **Register** an employee with a reference photo via `POST /api/employees/register`
2. The photo's three-hash descriptor is stored with the record
3. **Check in** with a selfie via `POST /api/attendance/checkin`
4. The selfie is scored against the stored descriptor; the check-in is
   recorded with its raw similarity score either way

### Honest scope

The matcher is whole-image perceptual hashing, not biometric face
recognition: there is no face detection, landmark alignment, or liveness
check. Treat it as a demo-grade stand-in for a production face-recognition
service.
"#,
        license(
            name = "MIT OR Apache-2.0",
            url = "https://github.com/rollcall-hq/rollcall/blob/main/LICENSE"
        ),
        contact(
            name = "Rollcall Team",
            url = "https://github.com/rollcall-hq/rollcall"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "Employees", description = "Employee registration and lookup"),
        (name = "Attendance", description = "Face-verified check-in and attendance history"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::user::register_employee_handler,
        crate::handlers::user::list_employees_handler,
        crate::handlers::user::get_employee_handler,
        crate::handlers::attendance::check_in_handler,
        crate::handlers::attendance::list_attendance_handler,
        crate::handlers::attendance::today_attendance_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            UserResponse,
            CheckInResponse,
            AttendanceRecord,
            AttendanceStatus,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_generates() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("OpenAPI document serializes");

        assert!(json.contains("/api/employees/register"));
        assert!(json.contains("/api/attendance/checkin"));
        assert!(json.contains("/api/health"));
    }
}
