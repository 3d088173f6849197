use axum::http::StatusCode;
use gymdesk_core::{
    date_range::format_dmy,
    models::{
        attendance::{AttendanceLog, AttendanceSource, ScanOutcome, ScanResponse},
        auth::Role,
        employee::Employee,
        gym::QrCodeResponse,
    },
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{GYM_CODE, TestContext, bearer, create_member, token_for};

async fn create_employee(ctx: &TestContext) -> Employee {
    let response = ctx
        .as_admin(ctx.server.post("/api/admin/employees"))
        .json(&json!({ "name": "Vikram", "mobile": "9822222222", "role": "Trainer" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn scan(ctx: &TestContext, code: &str) -> (StatusCode, ScanResponse) {
    let response = ctx
        .as_member(ctx.server.post("/api/user/attendance/scan"))
        .json(&json!({ "gymId": code }))
        .await;
    (response.status_code(), response.json())
}

#[tokio::test]
async fn test_punch_toggles_in_then_out_then_conflicts() {
    let ctx = TestContext::new().await;
    let employee = create_employee(&ctx).await;
    let punch = || {
        ctx.as_admin(ctx.server.post("/api/admin/employees/attendance"))
            .json(&json!({ "employeeId": employee.id }))
    };

    let punched_in: AttendanceLog = punch().await.json();
    assert!(punched_in.out_time.is_none());
    assert_eq!(punched_in.source, AttendanceSource::Punch);

    let punched_out: AttendanceLog = punch().await.json();
    assert_eq!(punched_out.id, punched_in.id);
    assert!(punched_out.out_time.is_some());
    assert!(punched_out.total_hours.is_some());

    punch().await.assert_status(StatusCode::CONFLICT);

    let today: Vec<AttendanceLog> = ctx
        .as_admin(ctx.server.get("/api/admin/employees/attendance"))
        .await
        .json();
    assert_eq!(today.len(), 1);
}

#[tokio::test]
async fn test_manual_attendance_overwrites_the_day() {
    let ctx = TestContext::new().await;
    let employee = create_employee(&ctx).await;
    let date = "05-03-2024";

    let first: AttendanceLog = ctx
        .as_admin(ctx.server.post("/api/admin/employees/attendance/manual"))
        .json(&json!({ "employeeId": employee.id, "date": date, "inTime": "09:00" }))
        .await
        .json();
    assert!(first.out_time.is_none());

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/employees/attendance/manual"))
        .json(&json!({
            "employeeId": employee.id,
            "date": date,
            "inTime": "08:30",
            "outTime": "17:00",
        }))
        .await;
    response.assert_status_ok();
    let second: AttendanceLog = response.json();

    assert_eq!(second.id, first.id);
    assert_eq!(format_dmy(second.date), date);
    assert_eq!(second.total_hours, Some(8.5));
    assert_eq!(second.source, AttendanceSource::Manual);

    let logs: Vec<AttendanceLog> = ctx
        .as_admin(ctx.server.get("/api/admin/employees/attendance"))
        .add_query_param("dateFilter", "custom")
        .add_query_param("from", date)
        .add_query_param("employeeId", employee.id)
        .await
        .json();
    assert_eq!(logs, vec![second]);
}

#[tokio::test]
async fn test_manual_attendance_rejects_out_before_in() {
    let ctx = TestContext::new().await;
    let employee = create_employee(&ctx).await;

    ctx.as_admin(ctx.server.post("/api/admin/employees/attendance/manual"))
        .json(&json!({
            "employeeId": employee.id,
            "date": "05-03-2024",
            "inTime": "18:00",
            "outTime": "09:00",
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scan_checks_in_then_out_then_already() {
    let ctx = TestContext::new().await;

    let (status, first) = scan(&ctx, GYM_CODE).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first.outcome, ScanOutcome::CheckIn);
    assert!(first.success);

    let (status, second) = scan(&ctx, GYM_CODE).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second.outcome, ScanOutcome::CheckOut);

    let (status, third) = scan(&ctx, GYM_CODE).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(third.outcome, ScanOutcome::Already);
    assert!(!third.success);
}

#[tokio::test]
async fn test_scan_with_stale_code_after_regenerate() {
    let ctx = TestContext::new().await;

    let (status, response) = scan(&ctx, "not-the-code").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.outcome, ScanOutcome::Invalid);

    let rotated: QrCodeResponse = ctx
        .as_admin(ctx.server.post("/api/admin/gym-details/qr-code/regenerate"))
        .await
        .json();
    assert_ne!(rotated.gym_id, GYM_CODE);

    let (status, response) = scan(&ctx, GYM_CODE).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.outcome, ScanOutcome::Invalid);

    let (status, response) = scan(&ctx, &rotated.gym_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.outcome, ScanOutcome::CheckIn);

    let current: QrCodeResponse = ctx
        .as_admin(ctx.server.get("/api/admin/gym-details/qr-code"))
        .await
        .json();
    assert_eq!(current.gym_id, rotated.gym_id);
}

#[tokio::test]
async fn test_scan_without_subscription_is_expired() {
    let ctx = TestContext::new().await;
    let lapsed = create_member(&ctx.state, "Lapsed", "9833333333", Some("secret12")).await;
    let (name, value) = bearer(&token_for(lapsed.id, Role::Member));

    let response = ctx
        .server
        .post("/api/user/attendance/scan")
        .add_header(name, value)
        .json(&json!({ "gymId": GYM_CODE }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<ScanResponse>().outcome, ScanOutcome::Expired);
}

#[tokio::test]
async fn test_member_attendance_history_defaults_to_last_week() {
    let ctx = TestContext::new().await;
    scan(&ctx, GYM_CODE).await;

    let history: Vec<AttendanceLog> = ctx
        .as_member(ctx.server.get("/api/user/attendance"))
        .await
        .json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].subject_id, ctx.member.id);
    assert_eq!(history[0].source, AttendanceSource::Qr);

    let admin_view: Vec<AttendanceLog> = ctx
        .as_admin(ctx.server.get("/api/admin/members/attendance"))
        .await
        .json();
    assert_eq!(admin_view, history);
}
