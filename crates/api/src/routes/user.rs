use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

/// Member app endpoints. Every route acts on the member named by the token.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/user/profile",
            get(handlers::user::get_profile).put(handlers::user::update_profile),
        )
        // Attendance
        .route(
            "/api/user/attendance",
            get(handlers::user::attendance_history),
        )
        .route(
            "/api/user/attendance/scan",
            post(handlers::user::scan_attendance),
        )
        // Workouts
        .route("/api/user/workouts", get(handlers::user::list_workouts))
        .route(
            "/api/user/workouts/status",
            get(handlers::user::workout_status),
        )
        .route("/api/user/workouts/stats", get(handlers::user::workout_stats))
        .route("/api/user/workouts/:id", get(handlers::user::get_workout))
        .route(
            "/api/user/workouts/:id/complete",
            post(handlers::user::complete_workout),
        )
        // Diet and hydration
        .route("/api/user/diet-plan", get(handlers::user::get_diet_plan))
        .route(
            "/api/user/water-intake",
            get(handlers::user::get_water_intake).post(handlers::user::add_water_intake),
        )
}
