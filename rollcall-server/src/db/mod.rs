//! Database module for Rollcall Server
//!
//! Contains entities, repositories, and database utilities.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::config::Config;

pub mod attendance;
pub mod user;

pub use attendance::{
    Attendance, AttendanceListParams, AttendanceRecord, AttendanceRepository, AttendanceStatus,
    CreateAttendance,
};
pub use user::{CreateUser, User, UserRepository, UserResponse};

/// Errors from pool setup and schema migration
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to Postgres and run pending migrations.
pub async fn connect(database_url: &str, config: &Config) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database connected and migrations applied");

    Ok(pool)
}
