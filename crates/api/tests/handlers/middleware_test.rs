use axum::http::StatusCode;
use gymdesk_api::middleware::{auth, error_handling::map_error};
use gymdesk_core::{errors::GymError, models::auth::Role};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::JWT_SECRET;

#[rstest]
#[case::not_found(GymError::NotFound("Member not found".to_string()), StatusCode::NOT_FOUND)]
#[case::validation(GymError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case::authentication(
    GymError::Authentication("Invalid password".to_string()),
    StatusCode::UNAUTHORIZED
)]
#[case::authorization(GymError::Authorization("Not allowed".to_string()), StatusCode::FORBIDDEN)]
#[case::conflict(GymError::Conflict("Already punched out".to_string()), StatusCode::CONFLICT)]
#[case::database(
    GymError::Database(eyre::eyre!("connection refused")),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: GymError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_hides_database_details() {
    let response = map_error(GymError::Database(eyre::eyre!("password authentication failed")));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body,
        serde_json::json!({ "success": false, "message": "Internal server error" })
    );
}

#[tokio::test]
async fn test_hash_password() {
    let password = "test_password";
    let hashed = auth::hash_password(password).unwrap();

    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));
    assert!(auth::verify_password(password, &hashed).unwrap());
    assert!(!auth::verify_password("wrong_password", &hashed).unwrap());
}

#[tokio::test]
async fn test_hashes_are_salted() {
    let first = auth::hash_password("same").unwrap();
    let second = auth::hash_password("same").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_token_carries_identity_and_role() {
    let id = Uuid::new_v4();
    let token = auth::create_token(id, Role::Member, JWT_SECRET, 1).unwrap();

    let user = auth::decode_token(&token, JWT_SECRET).unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.role, Role::Member);
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let token = auth::create_token(Uuid::new_v4(), Role::Admin, "other-secret", 1).unwrap();
    let err = auth::decode_token(&token, JWT_SECRET).unwrap_err();
    assert!(matches!(err, GymError::Authentication(_)));
}

#[test]
fn test_expired_token_is_rejected() {
    let token = auth::create_token(Uuid::new_v4(), Role::Admin, JWT_SECRET, -2).unwrap();
    assert!(auth::decode_token(&token, JWT_SECRET).is_err());
}
