use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers, services::image_store::MAX_IMAGE_SIZE};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/gym-details",
            get(handlers::gym::get_gym_details).put(handlers::gym::update_gym_details),
        )
        .route(
            "/api/admin/gym-details/logo",
            // Room for the multipart envelope around a maximum-size image
            post(handlers::gym::upload_logo).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 64 * 1024)),
        )
        .route(
            "/api/admin/gym-details/qr-code",
            get(handlers::gym::get_qr_code),
        )
        .route(
            "/api/admin/gym-details/qr-code/regenerate",
            post(handlers::gym::regenerate_qr_code),
        )
}
