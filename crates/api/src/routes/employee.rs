use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/employees",
            get(handlers::employee::list_employees).post(handlers::employee::create_employee),
        )
        .route(
            "/api/admin/employees/role/:role",
            get(handlers::employee::list_employees_by_role),
        )
        // Attendance
        .route(
            "/api/admin/employees/attendance",
            get(handlers::employee::list_employee_attendance)
                .post(handlers::employee::punch_attendance),
        )
        .route(
            "/api/admin/employees/attendance/manual",
            post(handlers::employee::manual_attendance),
        )
        .route(
            "/api/admin/employees/:id",
            get(handlers::employee::get_employee).put(handlers::employee::update_employee),
        )
}
