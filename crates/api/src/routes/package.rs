use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/packages",
            get(handlers::package::list_packages).post(handlers::package::create_package),
        )
        .route(
            "/api/admin/packages/:id",
            put(handlers::package::update_package).delete(handlers::package::delete_package),
        )
}
