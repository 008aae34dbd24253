//! Rollcall Server Library - REST API components for face-verified check-in
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod multipart;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use db::{
    Attendance, AttendanceListParams, AttendanceRecord, AttendanceRepository, AttendanceStatus,
    CreateAttendance, CreateUser, User, UserRepository, UserResponse,
};
pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
