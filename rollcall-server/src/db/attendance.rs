//! Attendance entity and repository
//!
//! Check-in records linked to users. Every verification attempt is recorded
//! with its raw similarity score, successful or not, so the attendance
//! history doubles as an audit trail of the decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Outcome of the face verification behind a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Similarity score met the configured threshold
    Success,
    /// Score evaluated below the threshold
    Failed,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl From<String> for AttendanceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => Self::Success,
            _ => Self::Failed,
        }
    }
}

/// Attendance entity from database
#[derive(Debug, Clone, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub check_in_time: DateTime<Utc>,
    pub face_image_path: String,
    pub similarity_score: f64,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
}

impl Attendance {
    /// Attach the user's display name for API responses
    pub fn into_record(self, user_name: String) -> AttendanceRecord {
        AttendanceRecord {
            id: self.id,
            user_id: self.user_id,
            user_name,
            check_in_time: self.check_in_time,
            face_image_path: self.face_image_path,
            similarity_score: self.similarity_score,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a new attendance record
#[derive(Debug, Clone)]
pub struct CreateAttendance {
    pub user_id: Uuid,
    pub check_in_time: DateTime<Utc>,
    pub face_image_path: String,
    pub similarity_score: f64,
    pub status: AttendanceStatus,
}

/// Attendance response DTO with the user's name joined in
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    /// Attendance record identifier
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Employee identifier
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    /// Employee display name
    #[schema(example = "Ada Lovelace")]
    pub user_name: String,
    /// When the check-in happened
    #[schema(value_type = String, example = "2026-03-10T09:15:00Z")]
    pub check_in_time: DateTime<Utc>,
    /// Path of the stored check-in selfie, served under /uploads
    #[schema(example = "./uploads/20260310_091500_1a2b3c4d.jpg")]
    pub face_image_path: String,
    /// Raw similarity score of the verification, in [0, 1]
    #[schema(example = 0.9844)]
    pub similarity_score: f64,
    /// Verification outcome
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
    /// Record creation timestamp
    #[schema(value_type = String, example = "2026-03-10T09:15:00Z")]
    pub created_at: DateTime<Utc>,
}

/// Query parameters for the attendance history listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceListParams {
    /// Only return records for this employee
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub user_id: Option<Uuid>,

    /// Maximum number of records (default 50, capped at 200)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Repository for attendance database operations
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Create a new attendance repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new attendance record
    pub async fn create(&self, input: CreateAttendance) -> Result<Attendance, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendances (user_id, check_in_time, face_image_path, similarity_score, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, check_in_time, face_image_path, similarity_score, status, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.check_in_time)
        .bind(&input.face_image_path)
        .bind(input.similarity_score)
        .bind(input.status.as_str())
        .fetch_one(&self.pool)
        .await
    }

    /// List attendance history, newest first, optionally for one employee
    pub async fn list(
        &self,
        params: &AttendanceListParams,
    ) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        let limit = params.limit.clamp(1, 200);

        if let Some(user_id) = params.user_id {
            sqlx::query_as::<_, AttendanceRecord>(
                r#"
                SELECT a.id, a.user_id, u.name AS user_name, a.check_in_time,
                       a.face_image_path, a.similarity_score, a.status, a.created_at
                FROM attendances a
                JOIN users u ON u.id = a.user_id
                WHERE a.user_id = $1
                ORDER BY a.check_in_time DESC
                LIMIT $2
                "#,
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, AttendanceRecord>(
                r#"
                SELECT a.id, a.user_id, u.name AS user_name, a.check_in_time,
                       a.face_image_path, a.similarity_score, a.status, a.created_at
                FROM attendances a
                JOIN users u ON u.id = a.user_id
                ORDER BY a.check_in_time DESC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        }
    }

    /// The most recent successful check-in of the day for an employee
    pub async fn find_today_success(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT a.id, a.user_id, u.name AS user_name, a.check_in_time,
                   a.face_image_path, a.similarity_score, a.status, a.created_at
            FROM attendances a
            JOIN users u ON u.id = a.user_id
            WHERE a.user_id = $1
              AND a.status = 'success'
              AND a.check_in_time >= date_trunc('day', now())
            ORDER BY a.check_in_time DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_status_conversion() {
        assert_eq!(AttendanceStatus::from("success".to_string()), AttendanceStatus::Success);
        assert_eq!(AttendanceStatus::from("failed".to_string()), AttendanceStatus::Failed);
        // Unknown values degrade to Failed, never to Success
        assert_eq!(AttendanceStatus::from("garbage".to_string()), AttendanceStatus::Failed);

        assert_eq!(AttendanceStatus::Success.as_str(), "success");
        assert_eq!(AttendanceStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Success).unwrap(),
            r#""success""#
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Failed).unwrap(),
            r#""failed""#
        );
    }

    #[test]
    fn test_into_record_carries_score_and_status() {
        let attendance = Attendance {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            check_in_time: Utc::now(),
            face_image_path: "./uploads/x.jpg".into(),
            similarity_score: 0.42,
            status: AttendanceStatus::Failed,
            created_at: Utc::now(),
        };

        let record = attendance.into_record("Ada".into());
        assert_eq!(record.user_name, "Ada");
        assert_eq!(record.similarity_score, 0.42);
        assert_eq!(record.status, AttendanceStatus::Failed);
    }
}
