use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use gymdesk_core::{
    errors::GymError,
    models::auth::{
        Admin, AdminLoginRequest, AdminLoginResponse, MemberLoginRequest, MemberLoginResponse, Role,
    },
};

use crate::{
    ApiState,
    middleware::{
        auth::{self, AuthUser},
        error_handling::AppError,
    },
};

fn invalid_credentials(what: &str) -> AppError {
    GymError::Authentication(format!("Invalid {} or password", what)).into()
}

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let credentials = state
        .repos
        .admins
        .find_admin_by_email(&payload.email)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| invalid_credentials("email"))?;

    if !auth::verify_password(&payload.password, &credentials.password_hash)? {
        tracing::warn!("Failed admin login for {}", payload.email.trim());
        return Err(invalid_credentials("email"));
    }

    let admin = credentials.admin;
    let token = auth::create_token(admin.id, Role::Admin, &state.jwt_secret, state.jwt_expiry_hours)?;
    tracing::info!("Admin {} logged in", admin.id);

    Ok(Json(AdminLoginResponse { token, admin }))
}

#[axum::debug_handler]
pub async fn admin_me(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Admin>, AppError> {
    let admin = state
        .repos
        .admins
        .get_admin(user.id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::Authentication("Admin account no longer exists".to_string()))?;

    Ok(Json(admin))
}

/// Members sharing a phone are told apart by password; the oldest member
/// whose password matches is signed in.
#[axum::debug_handler]
pub async fn member_login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<MemberLoginRequest>,
) -> Result<Json<MemberLoginResponse>, AppError> {
    let candidates = state
        .repos
        .members
        .find_member_credentials(&payload.mobile)
        .await
        .map_err(GymError::Database)?;
    if candidates.is_empty() {
        return Err(invalid_credentials("mobile number"));
    }
    if candidates.iter().all(|c| c.password_hash.is_none()) {
        return Err(GymError::Authorization(
            "App login is not enabled for this member".to_string(),
        )
        .into());
    }

    let mut signed_in = None;
    for credentials in candidates {
        let Some(password_hash) = &credentials.password_hash else {
            continue;
        };
        if auth::verify_password(&payload.password, password_hash)? {
            signed_in = Some(credentials.member);
            break;
        }
    }
    let Some(member) = signed_in else {
        tracing::warn!("Failed member login for {}", payload.mobile.trim());
        return Err(invalid_credentials("mobile number"));
    };

    let token = auth::create_token(
        member.id,
        Role::Member,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;
    tracing::info!("Member {} logged in", member.id);

    Ok(Json(MemberLoginResponse { token, member }))
}
