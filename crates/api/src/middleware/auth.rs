//! # Authentication Module
//!
//! Password hashing for admins and members, bearer-token issue and
//! verification, and the middleware guarding `/api/admin/**` and
//! `/api/user/**`.
//!
//! Passwords are stored as Argon2 PHC strings. Tokens are HS256 JWTs whose
//! `sub` is the admin or member id and whose `role` says which client the
//! token was issued to. A valid token with the wrong role is rejected with
//! 403 rather than 401.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use eyre::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gymdesk_core::errors::GymError;
use gymdesk_core::models::auth::Role;

use crate::ApiState;
use crate::middleware::error_handling::AppError;

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call; the result is a PHC
/// string carrying algorithm, parameters, salt and hash.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC string. A malformed hash is an
/// error, a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is invalid: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// JWT claims shared by admin and member tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin or member id
    pub sub: String,
    pub role: Role,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Identity of the caller, inserted into request extensions by the guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

pub fn create_token(id: Uuid, role: Role, secret: &str, expiry_hours: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: id.to_string(),
        role,
        exp: (now + Duration::hours(expiry_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verifies signature and expiry and returns the caller.
pub fn decode_token(token: &str, secret: &str) -> Result<AuthUser, GymError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        GymError::Authentication("Invalid or expired token".to_string())
    })?;

    let id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| GymError::Authentication("Invalid or expired token".to_string()))?;

    Ok(AuthUser {
        id,
        role: token_data.claims.role,
    })
}

fn bearer_token(request: &Request) -> Result<&str, GymError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| GymError::Authentication("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GymError::Authentication("Invalid Authorization format".to_string()))
}

async fn require_role(
    state: &ApiState,
    role: Role,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = decode_token(bearer_token(&request)?, &state.jwt_secret)?;
    if user.role != role {
        return Err(GymError::Authorization(format!("This endpoint requires the {} role", role)).into());
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Guard for the admin dashboard API.
pub async fn require_admin(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, Role::Admin, request, next).await
}

/// Guard for the member app API.
pub async fn require_member(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, Role::Member, request, next).await
}
