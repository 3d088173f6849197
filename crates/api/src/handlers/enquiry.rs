use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    errors::GymError,
    models::{
        enquiry::{
            CreateEnquiryRequest, Enquiry, EnquiryFilter, EnquiryListQuery, EnquiryStats,
            UpdateEnquiryRequest,
        },
        follow_up::{CreateFollowUpRequest, EnquiryFollowUpRequest, FollowUp, FollowUpType},
        pagination::{PageQuery, Paginated},
    },
};

use crate::{ApiState, middleware::error_handling::AppError};

fn require_text(value: &str, field: &str) -> Result<(), GymError> {
    if value.trim().is_empty() {
        return Err(GymError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

async fn load_enquiry(state: &ApiState, id: Uuid) -> Result<Enquiry, AppError> {
    let enquiry = state
        .repos
        .enquiries
        .get_enquiry(id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Enquiry with ID {} not found", id)))?;
    Ok(enquiry)
}

#[axum::debug_handler]
pub async fn list_enquiries(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<EnquiryListQuery>,
) -> Result<Json<Paginated<Enquiry>>, AppError> {
    let filter = EnquiryFilter::from_query(&query)?;
    let page = PageQuery::new(query.page, query.limit);

    let (enquiries, total) = state
        .repos
        .enquiries
        .list_enquiries(&filter, page)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(Paginated::new(enquiries, total, page)))
}

#[axum::debug_handler]
pub async fn create_enquiry(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateEnquiryRequest>,
) -> Result<(StatusCode, Json<Enquiry>), AppError> {
    require_text(&payload.name, "Name")?;
    require_text(&payload.mobile, "Mobile number")?;

    let now = state.now();
    let enquiry = Enquiry {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        mobile: payload.mobile.trim().to_string(),
        email: payload.email,
        gender: payload.gender,
        address: payload.address,
        source: payload.source,
        interested_in: payload.interested_in,
        lead_type: payload.lead_type,
        status: payload.status,
        assigned_to: payload.assigned_to,
        comment: payload.comment,
        created_at: now,
        updated_at: now,
    };

    let created = state
        .repos
        .enquiries
        .create_enquiry(&enquiry)
        .await
        .map_err(GymError::Database)?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn get_enquiry(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Enquiry>, AppError> {
    Ok(Json(load_enquiry(&state, id).await?))
}

#[axum::debug_handler]
pub async fn update_enquiry(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEnquiryRequest>,
) -> Result<Json<Enquiry>, AppError> {
    if let Some(name) = &payload.name {
        require_text(name, "Name")?;
    }
    if let Some(mobile) = &payload.mobile {
        require_text(mobile, "Mobile number")?;
    }

    let mut enquiry = load_enquiry(&state, id).await?;
    enquiry.apply(&payload, state.now());

    let updated = state
        .repos
        .enquiries
        .update_enquiry(&enquiry)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Enquiry with ID {} not found", id)))?;

    if payload.status.is_some() {
        tracing::info!("Enquiry {} moved to status {}", id, updated.status);
    }

    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_enquiry(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = state
        .repos
        .enquiries
        .delete_enquiry(id)
        .await
        .map_err(GymError::Database)?;
    if !deleted {
        return Err(GymError::NotFound(format!("Enquiry with ID {} not found", id)).into());
    }

    tracing::info!("Enquiry {} deleted", id);
    Ok(Json(json!({ "success": true, "message": "Enquiry deleted" })))
}

#[axum::debug_handler]
pub async fn enquiry_stats(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<EnquiryStats>, AppError> {
    let counts = state
        .repos
        .enquiries
        .count_by_status()
        .await
        .map_err(GymError::Database)?;

    Ok(Json(EnquiryStats::from_counts(&counts)))
}

/// Schedules a follow-up call for an enquiry, copying its contact details
/// and lead temperature.
#[axum::debug_handler]
pub async fn create_enquiry_follow_up(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EnquiryFollowUpRequest>,
) -> Result<(StatusCode, Json<FollowUp>), AppError> {
    let enquiry = load_enquiry(&state, id).await?;

    let request = CreateFollowUpRequest {
        enquiry_id: Some(enquiry.id),
        member_id: None,
        name: None,
        mobile: None,
        follow_up_type: payload.follow_up_type.unwrap_or(FollowUpType::Enquiry),
        convertibility: Some(enquiry.lead_type),
        due_at: payload.due_at,
        comment: payload.comment,
        is_done: None,
    };
    let follow_up = FollowUp::new(&request, enquiry.name, enquiry.mobile, state.now());

    let created = state
        .repos
        .follow_ups
        .create_follow_up(&follow_up)
        .await
        .map_err(GymError::Database)?;

    Ok((StatusCode::CREATED, Json(created)))
}
