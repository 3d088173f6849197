use axum::http::StatusCode;
use chrono::NaiveDate;
use gymdesk_core::models::{
    dashboard::DashboardSummary,
    member::Member,
    package::{Package, Subscription},
    pagination::Paginated,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::test_utils::{MEMBER_PASSWORD, TestContext};

async fn create_package(ctx: &TestContext, name: &str, months: u32) -> Package {
    let response = ctx
        .as_admin(ctx.server.post("/api/admin/packages"))
        .json(&json!({ "name": name, "durationMonths": months, "price": 4000.0 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_package_validation() {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.post("/api/admin/packages"))
        .json(&json!({ "name": "Free", "durationMonths": 0, "price": 0.0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleted_package_is_deactivated_and_hidden() {
    let ctx = TestContext::new().await;
    let package = create_package(&ctx, "Quarterly", 3).await;

    let deactivated: Package = ctx
        .as_admin(ctx.server.delete(&format!("/api/admin/packages/{}", package.id)))
        .await
        .json();
    assert!(!deactivated.is_active);

    let listed: Vec<Package> = ctx
        .as_admin(ctx.server.get("/api/admin/packages"))
        .await
        .json();
    assert!(listed.iter().all(|p| p.id != package.id));
}

#[tokio::test]
async fn test_create_member_records_package_name() {
    let ctx = TestContext::new().await;
    let package = create_package(&ctx, "Gold Plan", 12).await;

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/members"))
        .json(&json!({ "name": "Neha", "mobile": "9844444444", "packageId": package.id }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let member: Member = response.json();
    assert_eq!(member.package_id, Some(package.id));
    assert_eq!(member.package_name.as_deref(), Some("Gold Plan"));
}

#[tokio::test]
async fn test_subscription_runs_to_day_before_same_date() {
    let ctx = TestContext::new().await;
    let package = create_package(&ctx, "Quarterly", 3).await;
    let path = format!("/api/admin/members/{}/subscriptions", ctx.member.id);

    let response = ctx
        .as_admin(ctx.server.post(&path))
        .json(&json!({ "packageId": package.id, "startDate": "2024-01-31" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let subscription: Subscription = response.json();
    assert_eq!(subscription.end_date, NaiveDate::from_ymd_opt(2024, 4, 29).unwrap());
    assert_eq!(subscription.amount_paid, 4000.0);

    let member: Member = ctx
        .as_admin(ctx.server.get(&format!("/api/admin/members/{}", ctx.member.id)))
        .await
        .json();
    assert_eq!(member.package_id, Some(package.id));

    let history: Vec<Subscription> = ctx.as_admin(ctx.server.get(&path)).await.json();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_soft_deleted_member_disappears() {
    let ctx = TestContext::new().await;
    let path = format!("/api/admin/members/{}", ctx.member.id);

    ctx.as_admin(ctx.server.delete(&path)).await.assert_status_ok();

    ctx.as_admin(ctx.server.get(&path))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    let page: Paginated<Member> = ctx
        .as_admin(ctx.server.get("/api/admin/members"))
        .await
        .json();
    assert_eq!(page.pagination.total, 0);

    // The token outlives the member
    ctx.as_member(ctx.server.get("/api/user/profile"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_can_set_member_password() {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.put(&format!("/api/admin/members/{}", ctx.member.id)))
        .json(&json!({ "password": "new-secret" }))
        .await
        .assert_status_ok();

    ctx.server
        .post("/api/user/auth/login")
        .json(&json!({ "mobile": ctx.member.mobile, "password": "new-secret" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_member_update_trims_mobile_used_for_login() {
    let ctx = TestContext::new().await;

    let response = ctx
        .as_admin(ctx.server.put(&format!("/api/admin/members/{}", ctx.member.id)))
        .json(&json!({ "name": "  Asha Rao ", "mobile": " 9000000001 " }))
        .await;
    response.assert_status_ok();
    let member: Member = response.json();
    assert_eq!(member.name, "Asha Rao");
    assert_eq!(member.mobile, "9000000001");

    ctx.server
        .post("/api/user/auth/login")
        .json(&json!({ "mobile": "9000000001", "password": MEMBER_PASSWORD }))
        .await
        .assert_status_ok();
}

#[rstest]
#[case(json!({ "name": "   " }))]
#[case(json!({ "mobile": "" }))]
#[case(json!({ "password": "     a" }))]
#[case(json!({ "password": "abc" }))]
#[tokio::test]
async fn test_member_update_rejects_invalid_fields(#[case] body: serde_json::Value) {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.put(&format!("/api/admin/members/{}", ctx.member.id)))
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let stored = ctx.state.repos.members.get_member(ctx.member.id).await.unwrap().unwrap();
    assert_eq!(stored.name, ctx.member.name);
    assert_eq!(stored.mobile, ctx.member.mobile);
}

#[tokio::test]
async fn test_create_member_rejects_padded_short_password() {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.post("/api/admin/members"))
        .json(&json!({ "name": "Ravi", "mobile": "9000000002", "password": "     a" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_update_keeps_plan() {
    let ctx = TestContext::new().await;

    let response = ctx
        .as_member(ctx.server.put("/api/user/profile"))
        .json(&json!({ "name": "Asha K", "address": "MG Road" }))
        .await;
    response.assert_status_ok();

    let member: Member = response.json();
    assert_eq!(member.name, "Asha K");
    assert_eq!(member.address.as_deref(), Some("MG Road"));
    assert_eq!(member.mobile, ctx.member.mobile);
}

#[tokio::test]
async fn test_dashboard_counts_today() {
    let ctx = TestContext::new().await;
    ctx.as_member(ctx.server.post("/api/user/attendance/scan"))
        .json(&json!({ "gymId": crate::test_utils::GYM_CODE }))
        .await
        .assert_status_ok();

    let summary: DashboardSummary = ctx
        .as_admin(ctx.server.get("/api/admin/dashboard"))
        .await
        .json();

    assert_eq!(summary.date, ctx.state.today());
    assert_eq!(summary.total_members, 1);
    assert_eq!(summary.active_subscriptions, 1);
    assert_eq!(summary.member_check_ins_today, 1);
    assert_eq!(summary.employees_present_today, 0);
}
