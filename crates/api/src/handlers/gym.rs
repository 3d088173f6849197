use axum::{
    Json,
    extract::{Multipart, State},
};
use rand::{Rng, distributions::Alphanumeric};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    errors::GymError,
    models::gym::{GymDetails, QrCodeResponse, UpdateGymDetailsRequest},
};

use crate::{
    ApiState, middleware::error_handling::AppError, services::image_store::ImageUpload,
};

const GYM_CODE_LEN: usize = 16;
const LOGO_FIELD: &str = "logo";

/// Random code printed into the attendance QR code.
pub fn generate_gym_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GYM_CODE_LEN)
        .map(char::from)
        .collect()
}

async fn load_gym(state: &ApiState) -> Result<GymDetails, AppError> {
    let gym = state
        .repos
        .gym
        .get_gym_details()
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound("Gym details have not been set up".to_string()))?;
    Ok(gym)
}

async fn save_gym(state: &ApiState, gym: &GymDetails) -> Result<GymDetails, AppError> {
    let saved = state
        .repos
        .gym
        .save_gym_details(gym)
        .await
        .map_err(GymError::Database)?;
    Ok(saved)
}

#[axum::debug_handler]
pub async fn get_gym_details(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<GymDetails>, AppError> {
    Ok(Json(load_gym(&state).await?))
}

/// Updates the gym details, creating the record with a fresh code on first
/// save.
#[axum::debug_handler]
pub async fn update_gym_details(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpdateGymDetailsRequest>,
) -> Result<Json<GymDetails>, AppError> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(GymError::Validation("Gym name cannot be empty".to_string()).into());
    }

    let now = state.now();
    let existing = state
        .repos
        .gym
        .get_gym_details()
        .await
        .map_err(GymError::Database)?;

    let mut gym = match existing {
        Some(gym) => gym,
        None => {
            let name = payload
                .name
                .as_deref()
                .map(str::trim)
                .map(str::to_string)
                .ok_or_else(|| GymError::Validation("Gym name is required".to_string()))?;
            tracing::info!("Creating gym details for {}", name);
            GymDetails {
                id: Uuid::new_v4(),
                name,
                mobile: None,
                email: None,
                address: None,
                logo_url: None,
                gym_code: generate_gym_code(),
                updated_at: now,
            }
        }
    };
    gym.apply(&payload, now);

    Ok(Json(save_gym(&state, &gym).await?))
}

#[axum::debug_handler]
pub async fn upload_logo(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<GymDetails>, AppError> {
    let mut gym = load_gym(&state).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GymError::Validation(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some(LOGO_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| GymError::Validation(format!("Invalid upload: {}", e)))?;
        upload = Some(ImageUpload::new(file_name.as_deref(), bytes.to_vec())?);
        break;
    }
    let upload = upload
        .ok_or_else(|| GymError::Validation("No logo file was uploaded".to_string()))?;

    let url = state.images.upload("gym", upload).await?;
    gym.logo_url = Some(url);
    gym.updated_at = state.now();

    Ok(Json(save_gym(&state, &gym).await?))
}

#[axum::debug_handler]
pub async fn get_qr_code(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<QrCodeResponse>, AppError> {
    let gym = load_gym(&state).await?;
    Ok(Json(QrCodeResponse::from(&gym)))
}

/// Rotates the gym code; every printed QR code stops working.
#[axum::debug_handler]
pub async fn regenerate_qr_code(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<QrCodeResponse>, AppError> {
    let mut gym = load_gym(&state).await?;
    gym.gym_code = generate_gym_code();
    gym.updated_at = state.now();

    let saved = save_gym(&state, &gym).await?;
    tracing::info!("Gym QR code regenerated");

    Ok(Json(QrCodeResponse::from(&saved)))
}
