use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    errors::GymError,
    models::diet::{CreateDietPlanRequest, DietPlan, DietPlanResponse},
};

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_diet_plans(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<DietPlanResponse>>, AppError> {
    let plans = state
        .repos
        .diet_plans
        .list_diet_plans()
        .await
        .map_err(GymError::Database)?;

    Ok(Json(plans.into_iter().map(DietPlanResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn create_diet_plan(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateDietPlanRequest>,
) -> Result<(StatusCode, Json<DietPlanResponse>), AppError> {
    payload.validate()?;

    let plan = DietPlan {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        description: payload.description,
        meals: payload.meals,
        created_at: state.now(),
    };

    let created = state
        .repos
        .diet_plans
        .create_diet_plan(&plan)
        .await
        .map_err(GymError::Database)?;

    Ok((StatusCode::CREATED, Json(created.into())))
}
