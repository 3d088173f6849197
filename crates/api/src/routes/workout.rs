use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/workouts",
            get(handlers::workout::list_workouts).post(handlers::workout::create_workout),
        )
        .route(
            "/api/admin/workouts/:id",
            delete(handlers::workout::delete_workout),
        )
}
