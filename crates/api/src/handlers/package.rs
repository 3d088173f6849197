use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    errors::GymError,
    models::package::{CreatePackageRequest, Package, UpdatePackageRequest},
};

use crate::{ApiState, middleware::error_handling::AppError};

async fn save_package(state: &ApiState, package: &Package) -> Result<Package, AppError> {
    let updated = state
        .repos
        .packages
        .update_package(package)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Package with ID {} not found", package.id)))?;
    Ok(updated)
}

async fn load_package(state: &ApiState, id: Uuid) -> Result<Package, AppError> {
    let package = state
        .repos
        .packages
        .get_package(id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Package with ID {} not found", id)))?;
    Ok(package)
}

/// Active packages only; deactivated ones stay linked to old subscriptions.
#[axum::debug_handler]
pub async fn list_packages(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Package>>, AppError> {
    let packages = state
        .repos
        .packages
        .list_packages(false)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(packages))
}

#[axum::debug_handler]
pub async fn create_package(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreatePackageRequest>,
) -> Result<(StatusCode, Json<Package>), AppError> {
    payload.validate()?;

    let package = Package {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        duration_months: payload.duration_months,
        price: payload.price,
        description: payload.description,
        is_active: true,
        created_at: state.now(),
    };

    let created = state
        .repos
        .packages
        .create_package(&package)
        .await
        .map_err(GymError::Database)?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update_package(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePackageRequest>,
) -> Result<Json<Package>, AppError> {
    let mut package = load_package(&state, id).await?;
    package.apply(&payload)?;

    Ok(Json(save_package(&state, &package).await?))
}

#[axum::debug_handler]
pub async fn delete_package(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Package>, AppError> {
    let mut package = load_package(&state, id).await?;
    package.is_active = false;

    let deactivated = save_package(&state, &package).await?;
    tracing::info!("Package {} deactivated", id);

    Ok(Json(deactivated))
}
