use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/members",
            get(handlers::member::list_members).post(handlers::member::create_member),
        )
        .route(
            "/api/admin/members/attendance",
            get(handlers::member::list_member_attendance),
        )
        .route(
            "/api/admin/members/:id",
            get(handlers::member::get_member)
                .put(handlers::member::update_member)
                .delete(handlers::member::delete_member),
        )
        .route(
            "/api/admin/members/:id/subscriptions",
            get(handlers::member::list_subscriptions).post(handlers::member::create_subscription),
        )
}
