use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    date_range::DateRange,
    errors::GymError,
    models::{
        follow_up::{
            BulkDeleteRequest, BulkDeleteResponse, CreateFollowUpRequest, FollowUp,
            FollowUpFilter, FollowUpListQuery, UpdateFollowUpRequest,
        },
        normalize_keyword,
        pagination::{PageQuery, Paginated},
        parse_optional,
    },
};

use crate::{ApiState, middleware::error_handling::AppError};

async fn load_follow_up(state: &ApiState, id: Uuid) -> Result<FollowUp, AppError> {
    let follow_up = state
        .repos
        .follow_ups
        .get_follow_up(id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Follow-up with ID {} not found", id)))?;
    Ok(follow_up)
}

async fn store_follow_up(state: &ApiState, follow_up: &FollowUp) -> Result<FollowUp, AppError> {
    let updated = state
        .repos
        .follow_ups
        .update_follow_up(follow_up)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| {
            GymError::NotFound(format!("Follow-up with ID {} not found", follow_up.id))
        })?;
    Ok(updated)
}

/// Fills in name and mobile from the linked enquiry or member when the
/// request leaves them out.
async fn resolve_contact(
    state: &ApiState,
    request: &CreateFollowUpRequest,
) -> Result<(String, String), AppError> {
    let given = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let (mut name, mut mobile) = (given(&request.name), given(&request.mobile));

    if name.is_none() || mobile.is_none() {
        if let Some(enquiry_id) = request.enquiry_id {
            let enquiry = state
                .repos
                .enquiries
                .get_enquiry(enquiry_id)
                .await
                .map_err(GymError::Database)?
                .ok_or_else(|| {
                    GymError::NotFound(format!("Enquiry with ID {} not found", enquiry_id))
                })?;
            name = name.or(Some(enquiry.name));
            mobile = mobile.or(Some(enquiry.mobile));
        } else if let Some(member_id) = request.member_id {
            let member = state
                .repos
                .members
                .get_member(member_id)
                .await
                .map_err(GymError::Database)?
                .ok_or_else(|| {
                    GymError::NotFound(format!("Member with ID {} not found", member_id))
                })?;
            name = name.or(Some(member.name));
            mobile = mobile.or(Some(member.mobile));
        }
    }

    match (name, mobile) {
        (Some(name), Some(mobile)) => Ok((name, mobile)),
        _ => Err(GymError::Validation(
            "Name and mobile are required unless an enquiry or member is linked".to_string(),
        )
        .into()),
    }
}

#[axum::debug_handler]
pub async fn list_follow_ups(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<FollowUpListQuery>,
) -> Result<Json<Paginated<FollowUp>>, AppError> {
    let range = DateRange::from_query(
        query.date_filter.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
        state.today(),
        None,
    )?;

    let filter = FollowUpFilter {
        status: parse_optional(query.status.as_deref())?,
        follow_up_type: parse_optional(query.follow_up_type.as_deref())?,
        convertibility: parse_optional(query.convertibility.as_deref())?,
        keyword: normalize_keyword(query.keyword.as_deref()),
        due_between: range.map(|r| r.utc_bounds(state.timezone)),
        ..FollowUpFilter::new(state.now())
    };
    let page = PageQuery::new(query.page, query.limit);

    let (follow_ups, total) = state
        .repos
        .follow_ups
        .list_follow_ups(&filter, page)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(Paginated::new(follow_ups, total, page)))
}

#[axum::debug_handler]
pub async fn create_follow_up(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateFollowUpRequest>,
) -> Result<(StatusCode, Json<FollowUp>), AppError> {
    let (name, mobile) = resolve_contact(&state, &payload).await?;
    let follow_up = FollowUp::new(&payload, name, mobile, state.now());

    let created = state
        .repos
        .follow_ups
        .create_follow_up(&follow_up)
        .await
        .map_err(GymError::Database)?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn get_follow_up(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FollowUp>, AppError> {
    Ok(Json(load_follow_up(&state, id).await?))
}

#[axum::debug_handler]
pub async fn update_follow_up(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFollowUpRequest>,
) -> Result<Json<FollowUp>, AppError> {
    let mut follow_up = load_follow_up(&state, id).await?;
    follow_up.apply(&payload, state.now());

    Ok(Json(store_follow_up(&state, &follow_up).await?))
}

#[axum::debug_handler]
pub async fn delete_follow_up(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = state
        .repos
        .follow_ups
        .delete_follow_up(id)
        .await
        .map_err(GymError::Database)?;
    if !deleted {
        return Err(GymError::NotFound(format!("Follow-up with ID {} not found", id)).into());
    }

    Ok(Json(json!({ "success": true, "message": "Follow-up deleted" })))
}

/// Marks a follow-up as done. Repeating the call leaves `doneAt` untouched.
#[axum::debug_handler]
pub async fn mark_follow_up_done(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FollowUp>, AppError> {
    let mut follow_up = load_follow_up(&state, id).await?;
    if follow_up.is_done {
        return Ok(Json(follow_up));
    }

    let now = state.now();
    follow_up.set_done(true, now);
    follow_up.updated_at = now;

    Ok(Json(store_follow_up(&state, &follow_up).await?))
}

/// Deletes every id independently. Ids that are unknown or fail to delete
/// are reported in `failed`; the others stay deleted.
#[axum::debug_handler]
pub async fn bulk_delete_follow_ups(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    payload.validate()?;

    let mut response = BulkDeleteResponse::default();
    for id in payload.ids {
        match state.repos.follow_ups.delete_follow_up(id).await {
            Ok(true) => response.record_deleted(id),
            Ok(false) => response.record_failed(id, "Follow-up not found"),
            Err(e) => {
                tracing::error!("Failed to delete follow-up {}: {}", id, e);
                response.record_failed(id, "Could not delete follow-up");
            }
        }
    }

    tracing::info!(
        "Bulk delete removed {} follow-ups, {} failed",
        response.deleted_count,
        response.failed.len()
    );
    Ok(Json(response))
}
