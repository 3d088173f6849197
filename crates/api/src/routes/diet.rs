use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/admin/diet-plans",
        get(handlers::diet::list_diet_plans).post(handlers::diet::create_diet_plan),
    )
}
