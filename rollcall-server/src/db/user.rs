//! User entity and repository
//!
//! An employee record with the enrolled reference photo and its face
//! descriptor. The descriptor column is opaque encoded text owned by the
//! fingerprint engine; this module stores and returns it without
//! interpreting it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// User entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub face_image_path: String,
    pub face_descriptor: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub face_image_path: String,
    pub face_descriptor: String,
}

/// User response DTO
///
/// Excludes the face descriptor: it is internal engine data and useless to
/// clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Employee unique identifier
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Employee full name
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Employee email address
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Employee phone number
    #[schema(example = "+44 20 7946 0958")]
    pub phone: Option<String>,
    /// Path of the stored reference photo, served under /uploads
    #[schema(example = "./uploads/20260310_091500_1a2b3c4d.jpg")]
    pub face_image_path: String,
    /// Record creation timestamp
    #[schema(value_type = String, example = "2026-03-10T09:15:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            face_image_path: user.face_image_path,
            created_at: user.created_at,
        }
    }
}

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user record
    pub async fn create(&self, input: CreateUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, phone, face_image_path, face_descriptor)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, face_image_path, face_descriptor, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.face_image_path)
        .bind(&input.face_descriptor)
        .fetch_one(&self.pool)
        .await
    }

    /// Find user by internal ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, face_image_path, face_descriptor, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, face_image_path, face_descriptor, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// List all users, newest first
    pub async fn list(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, face_image_path, face_descriptor, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_excludes_descriptor() {
        let user = User {
            id: Uuid::nil(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            face_image_path: "./uploads/x.jpg".into(),
            face_descriptor: r#"{"v":1,"phash":1,"ahash":2,"dhash":3}"#.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = UserResponse::from(user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("descriptor"));
        assert!(!json.contains("phash"));
        assert!(json.contains("ada@example.com"));
    }
}
