use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    date_range::{DatePreset, DateRange},
    errors::GymError,
    models::{
        attendance::{AttendanceFilter, AttendanceListQuery, AttendanceLog, SubjectKind},
        member::{CreateMemberRequest, Member, MemberFilter, MemberListQuery, UpdateMemberRequest},
        normalize_keyword,
        package::{CreateSubscriptionRequest, Package, Subscription, subscription_end_date},
        pagination::{PageQuery, Paginated},
    },
};

use crate::{
    ApiState,
    middleware::{auth::hash_password, error_handling::AppError},
};

const MIN_PASSWORD_LEN: usize = 6;

pub(crate) async fn load_member(state: &ApiState, id: Uuid) -> Result<Member, AppError> {
    let member = state
        .repos
        .members
        .get_member(id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Member with ID {} not found", id)))?;
    Ok(member)
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

/// Non-blank password hashed for storage. Surrounding whitespace does not
/// count towards the minimum length.
fn hash_new_password(password: Option<&str>) -> Result<Option<String>, AppError> {
    match password.filter(|p| !p.trim().is_empty()) {
        Some(password) if password.trim().chars().count() < MIN_PASSWORD_LEN => {
            Err(GymError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ))
            .into())
        }
        Some(password) => Ok(Some(hash_password(password)?)),
        None => Ok(None),
    }
}

pub(crate) async fn save_member(state: &ApiState, member: &Member) -> Result<Member, AppError> {
    let updated = state
        .repos
        .members
        .update_member(member)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Member with ID {} not found", member.id)))?;
    Ok(updated)
}

#[axum::debug_handler]
pub async fn list_members(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<MemberListQuery>,
) -> Result<Json<Paginated<Member>>, AppError> {
    let filter = MemberFilter {
        keyword: normalize_keyword(query.keyword.as_deref()),
    };
    let page = PageQuery::new(query.page, query.limit);

    let (members, total) = state
        .repos
        .members
        .list_members(&filter, page)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(Paginated::new(members, total, page)))
}

#[axum::debug_handler]
pub async fn create_member(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    if payload.name.trim().is_empty() || payload.mobile.trim().is_empty() {
        return Err(GymError::Validation("Name and mobile number are required".to_string()).into());
    }

    let package_name = match payload.package_id {
        Some(id) => Some(load_package(&state, id).await?.name),
        None => None,
    };
    let password_hash = hash_new_password(payload.password.as_deref())?;

    let now = state.now();
    let member = Member {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        mobile: payload.mobile.trim().to_string(),
        email: payload.email,
        gender: payload.gender,
        address: payload.address,
        photo_url: payload.photo_url,
        date_of_birth: payload.date_of_birth,
        package_id: payload.package_id,
        package_name,
        diet_plan_id: payload.diet_plan_id,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    let created = state
        .repos
        .members
        .create_member(&member, password_hash)
        .await
        .map_err(GymError::Database)?;

    tracing::info!("Member {} registered", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn get_member(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>, AppError> {
    Ok(Json(load_member(&state, id).await?))
}

#[axum::debug_handler]
pub async fn update_member(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<Member>, AppError> {
    payload.validate()?;
    let mut member = load_member(&state, id).await?;
    let password_hash = hash_new_password(payload.password.as_deref())?;

    if let Some(package_id) = payload.package_id {
        if member.package_id != Some(package_id) {
            member.package_name = Some(load_package(&state, package_id).await?.name);
        }
    }
    member.apply(&payload, state.now());

    let updated = save_member(&state, &member).await?;

    if let Some(password_hash) = password_hash {
        state
            .repos
            .members
            .set_member_password(id, password_hash)
            .await
            .map_err(GymError::Database)?;
        tracing::info!("Password changed for member {}", id);
    }

    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_member(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = state
        .repos
        .members
        .delete_member(id)
        .await
        .map_err(GymError::Database)?;
    if !deleted {
        return Err(GymError::NotFound(format!("Member with ID {} not found", id)).into());
    }

    tracing::info!("Member {} deleted", id);
    Ok(Json(json!({ "success": true, "message": "Member deleted" })))
}

#[axum::debug_handler]
pub async fn list_subscriptions(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Subscription>>, AppError> {
    let member = load_member(&state, id).await?;

    let subscriptions = state
        .repos
        .subscriptions
        .list_member_subscriptions(member.id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(subscriptions))
}

/// Enrolls the member in a package and makes it their current plan.
#[axum::debug_handler]
pub async fn create_subscription(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>), AppError> {
    let mut member = load_member(&state, id).await?;
    let package = load_package(&state, payload.package_id).await?;
    if !package.is_active {
        return Err(GymError::Validation(format!("Package {} is no longer offered", package.name)).into());
    }

    let amount_paid = payload.amount_paid.unwrap_or(package.price);
    if !amount_paid.is_finite() || amount_paid < 0.0 {
        return Err(GymError::Validation("Amount paid must be zero or more".to_string()).into());
    }

    let start_date = payload.start_date.unwrap_or_else(|| state.today());
    let subscription = Subscription {
        id: Uuid::new_v4(),
        member_id: member.id,
        package_id: Some(package.id),
        package_name: package.name.clone(),
        start_date,
        end_date: subscription_end_date(start_date, package.duration_months)?,
        amount_paid,
        created_at: state.now(),
    };

    let created = state
        .repos
        .subscriptions
        .create_subscription(&subscription)
        .await
        .map_err(GymError::Database)?;

    member.package_id = Some(package.id);
    member.package_name = Some(package.name);
    member.updated_at = state.now();
    save_member(&state, &member).await?;

    tracing::info!(
        "Member {} subscribed until {}",
        member.id,
        created.end_date
    );
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn list_member_attendance(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AttendanceListQuery>,
) -> Result<Json<Vec<AttendanceLog>>, AppError> {
    let today = state.today();
    let range = DateRange::from_query(
        query.date_filter.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
        today,
        Some(DatePreset::Today),
    )?
    .unwrap_or_else(|| DateRange::single(today));

    let filter = AttendanceFilter {
        kind: SubjectKind::Member,
        subject_id: None,
        from: range.start,
        to: range.end,
    };

    let logs = state
        .repos
        .attendance
        .list_attendance(&filter)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(logs))
}
