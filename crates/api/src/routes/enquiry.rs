use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/enquiries",
            get(handlers::enquiry::list_enquiries).post(handlers::enquiry::create_enquiry),
        )
        .route(
            "/api/admin/enquiries/stats",
            get(handlers::enquiry::enquiry_stats),
        )
        .route(
            "/api/admin/enquiries/:id",
            get(handlers::enquiry::get_enquiry)
                .put(handlers::enquiry::update_enquiry)
                .delete(handlers::enquiry::delete_enquiry),
        )
        .route(
            "/api/admin/enquiries/:id/follow-ups",
            post(handlers::enquiry::create_enquiry_follow_up),
        )
}
