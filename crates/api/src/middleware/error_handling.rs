//! # Error Handling Middleware
//!
//! Maps `GymError` to HTTP status codes and the JSON error body both
//! clients expect:
//!
//! ```json
//! { "success": false, "message": "Enquiry not found" }
//! ```
//!
//! Database and internal errors are logged in full and answered with a
//! generic message so driver details never reach the browser.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gymdesk_core::errors::GymError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use gymdesk_api::middleware::error_handling::AppError;
/// use gymdesk_core::errors::GymError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(GymError::NotFound("Member not found".to_string()).into());
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub GymError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GymError::NotFound(_) => StatusCode::NOT_FOUND,
            GymError::Validation(_) => StatusCode::BAD_REQUEST,
            GymError::Authentication(_) => StatusCode::UNAUTHORIZED,
            GymError::Authorization(_) => StatusCode::FORBIDDEN,
            GymError::Conflict(_) => StatusCode::CONFLICT,
            GymError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GymError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self.0);
        }

        let body = Json(json!({
            "success": false,
            "message": self.0.public_message(),
        }));

        (status, body).into_response()
    }
}

/// Allows `?` on `GymResult` inside handlers.
impl From<GymError> for AppError {
    fn from(err: GymError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(GymError::Database(err))
    }
}

/// Maps a GymError to an HTTP response
pub fn map_error(err: GymError) -> Response {
    AppError(err).into_response()
}
