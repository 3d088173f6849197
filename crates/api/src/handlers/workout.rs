use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    errors::GymError,
    models::workout::{CreateWorkoutRequest, Workout},
};

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_workouts(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Workout>>, AppError> {
    let workouts = state
        .repos
        .workouts
        .list_workouts()
        .await
        .map_err(GymError::Database)?;

    Ok(Json(workouts))
}

#[axum::debug_handler]
pub async fn create_workout(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<Workout>), AppError> {
    payload.validate()?;

    let workout = Workout {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        category: payload.category,
        description: payload.description,
        duration_minutes: payload.duration_minutes,
        exercises: payload.exercises,
        created_at: state.now(),
    };

    let created = state
        .repos
        .workouts
        .create_workout(&workout)
        .await
        .map_err(GymError::Database)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Deleting a workout also drops its completion history.
#[axum::debug_handler]
pub async fn delete_workout(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = state
        .repos
        .workouts
        .delete_workout(id)
        .await
        .map_err(GymError::Database)?;
    if !deleted {
        return Err(GymError::NotFound(format!("Workout with ID {} not found", id)).into());
    }

    Ok(Json(json!({ "success": true, "message": "Workout deleted" })))
}
