//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod attendance;
pub mod health;
pub mod user;

pub use crate::state::AppState;
pub use attendance::{
    check_in_handler, list_attendance_handler, today_attendance_handler, CheckInResponse,
};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use user::{get_employee_handler, list_employees_handler, register_employee_handler};
