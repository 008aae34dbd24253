//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use rollcall_core::FaceVerifier;

use crate::config::Config;
use crate::db::{AttendanceRepository, UserRepository};

/// Application state containing shared resources.
///
/// Repositories are `None` when no database is configured; the handlers
/// that need them answer 503 in that case.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, kept for health checks
    pub pool: Option<PgPool>,
    /// User repository for employee records
    pub user_repo: Option<Arc<UserRepository>>,
    /// Attendance repository for check-in records
    pub attendance_repo: Option<Arc<AttendanceRepository>>,
    /// Face verifier configured with the deployment threshold
    pub verifier: Arc<FaceVerifier>,
    /// Directory where uploaded photos are stored
    pub upload_dir: PathBuf,
    /// Maximum upload size in bytes
    pub max_file_size: usize,
}

impl AppState {
    /// Build state from configuration and an optional database pool.
    pub fn new(config: &Config, pool: Option<PgPool>) -> Self {
        let (user_repo, attendance_repo) = match &pool {
            Some(pool) => (
                Some(Arc::new(UserRepository::new(pool.clone()))),
                Some(Arc::new(AttendanceRepository::new(pool.clone()))),
            ),
            None => (None, None),
        };

        Self {
            pool,
            user_repo,
            attendance_repo,
            verifier: Arc::new(FaceVerifier::new(config.similarity_threshold)),
            upload_dir: config.upload_path.clone(),
            max_file_size: config.max_file_size_bytes(),
        }
    }
}
