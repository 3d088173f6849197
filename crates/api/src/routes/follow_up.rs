use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/follow-ups",
            get(handlers::follow_up::list_follow_ups).post(handlers::follow_up::create_follow_up),
        )
        .route(
            "/api/admin/follow-ups/bulk-delete",
            post(handlers::follow_up::bulk_delete_follow_ups),
        )
        .route(
            "/api/admin/follow-ups/:id",
            get(handlers::follow_up::get_follow_up)
                .put(handlers::follow_up::update_follow_up)
                .delete(handlers::follow_up::delete_follow_up),
        )
        .route(
            "/api/admin/follow-ups/:id/done",
            put(handlers::follow_up::mark_follow_up_done),
        )
}
