use axum::http::StatusCode;
use gymdesk_api::missing_setup;
use gymdesk_core::{
    date_range::format_dmy,
    models::auth::{AdminLoginResponse, MemberLoginResponse, Role},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{
    ADMIN_EMAIL, ADMIN_PASSWORD, MEMBER_MOBILE, MEMBER_PASSWORD, TestContext, bearer,
    create_member, token_for,
};

#[tokio::test]
async fn test_admin_login_returns_usable_token() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/admin/auth/login")
        .json(&json!({ "email": ADMIN_EMAIL.to_uppercase(), "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();
    let login: AdminLoginResponse = response.json();
    assert_eq!(login.admin.id, ctx.admin.id);

    let (name, value) = bearer(&login.token);
    let me = ctx.server.get("/api/admin/auth/me").add_header(name, value).await;
    me.assert_status_ok();
    assert_eq!(me.json::<Value>()["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn test_admin_login_with_wrong_password_is_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/admin/auth/login")
        .json(&json!({ "email": ADMIN_EMAIL, "password": "nope" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_member_login() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/user/auth/login")
        .json(&json!({ "mobile": MEMBER_MOBILE, "password": MEMBER_PASSWORD }))
        .await;

    response.assert_status_ok();
    let login: MemberLoginResponse = response.json();
    assert_eq!(login.member.id, ctx.member.id);
}

#[tokio::test]
async fn test_members_sharing_a_phone_log_in_by_password() {
    let ctx = TestContext::new().await;

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/members"))
        .json(&json!({ "name": "Sibling", "mobile": MEMBER_MOBILE, "password": "sibling-pass" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let sibling_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let sibling = ctx
        .server
        .post("/api/user/auth/login")
        .json(&json!({ "mobile": MEMBER_MOBILE, "password": "sibling-pass" }))
        .await;
    sibling.assert_status_ok();
    assert_eq!(sibling.json::<MemberLoginResponse>().member.id.to_string(), sibling_id);

    let original = ctx
        .server
        .post("/api/user/auth/login")
        .json(&json!({ "mobile": MEMBER_MOBILE, "password": MEMBER_PASSWORD }))
        .await;
    original.assert_status_ok();
    assert_eq!(original.json::<MemberLoginResponse>().member.id, ctx.member.id);

    ctx.server
        .post("/api/user/auth/login")
        .json(&json!({ "mobile": MEMBER_MOBILE, "password": "neither" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shared_phone_with_one_app_login_still_authenticates() {
    let ctx = TestContext::new().await;
    create_member(&ctx.state, "Walk-in Parent", MEMBER_MOBILE, None).await;

    ctx.server
        .post("/api/user/auth/login")
        .json(&json!({ "mobile": MEMBER_MOBILE, "password": MEMBER_PASSWORD }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_member_without_app_password_cannot_log_in() {
    let ctx = TestContext::new().await;
    create_member(&ctx.state, "Walk-in", "9000000001", None).await;

    let response = ctx
        .server
        .post("/api/user/auth/login")
        .json(&json!({ "mobile": "9000000001", "password": "anything" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let ctx = TestContext::new().await;

    ctx.server
        .get("/api/admin/dashboard")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    ctx.server
        .get("/api/user/profile")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let ctx = TestContext::new().await;

    ctx.as_member(ctx.server.get("/api/admin/members"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    ctx.as_admin(ctx.server.get("/api/user/profile"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let ctx = TestContext::new().await;
    let (name, value) = bearer("not-a-jwt");

    ctx.server
        .get("/api/admin/dashboard")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_admin_is_rejected_by_me() {
    let ctx = TestContext::new().await;
    let (name, value) = bearer(&token_for(Uuid::new_v4(), Role::Admin));

    ctx.server
        .get("/api/admin/auth/me")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "status": "ok",
            "timezone": "Asia/Kolkata",
            "gymDate": format_dmy(ctx.state.today()),
        })
    );
}

#[tokio::test]
async fn test_startup_reports_missing_setup() {
    let ctx = TestContext::new().await;
    assert_eq!(
        missing_setup(&ctx.state).await.unwrap(),
        vec!["membership packages"]
    );

    ctx.as_admin(ctx.server.post("/api/admin/packages"))
        .json(&json!({ "name": "Monthly", "durationMonths": 1, "price": 1500.0 }))
        .await
        .assert_status(StatusCode::CREATED);
    assert!(missing_setup(&ctx.state).await.unwrap().is_empty());
}
