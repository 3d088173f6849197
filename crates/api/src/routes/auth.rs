use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

/// Login endpoints; no token required.
pub fn public_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/auth/login", post(handlers::auth::admin_login))
        .route("/api/user/auth/login", post(handlers::auth::member_login))
}

pub fn admin_routes() -> Router<Arc<ApiState>> {
    Router::new().route("/api/admin/auth/me", get(handlers::auth::admin_me))
}
