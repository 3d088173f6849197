use axum::http::StatusCode;
use chrono::{Duration, Utc};
use gymdesk_core::models::{
    follow_up::{BulkDeleteResponse, FollowUp},
    pagination::Paginated,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::TestContext;

async fn create_follow_up(ctx: &TestContext, name: &str, due_in_hours: i64) -> FollowUp {
    let due_at = Utc::now() + Duration::hours(due_in_hours);
    let response = ctx
        .as_admin(ctx.server.post("/api/admin/follow-ups"))
        .json(&json!({
            "name": name,
            "mobile": "9811111111",
            "followUpType": "Balance Due",
            "dueAt": due_at,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_new_follow_up_is_pending() {
    let ctx = TestContext::new().await;

    let follow_up = create_follow_up(&ctx, "Meera", 4).await;

    assert!(!follow_up.is_done);
    assert_eq!(follow_up.done_at, None);
}

#[tokio::test]
async fn test_mark_done_is_idempotent() {
    let ctx = TestContext::new().await;
    let follow_up = create_follow_up(&ctx, "Meera", 4).await;
    let path = format!("/api/admin/follow-ups/{}/done", follow_up.id);

    let first: FollowUp = ctx.as_admin(ctx.server.put(&path)).await.json();
    let second: FollowUp = ctx.as_admin(ctx.server.put(&path)).await.json();

    assert!(first.is_done);
    assert!(second.is_done);
    assert!(first.done_at.is_some());
    assert_eq!(first.done_at, second.done_at);
}

#[tokio::test]
async fn test_member_follow_up_takes_contact_from_member() {
    let ctx = TestContext::new().await;

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/follow-ups"))
        .json(&json!({
            "memberId": ctx.member.id,
            "followUpType": "Membership Renewal",
            "dueAt": Utc::now(),
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let follow_up: FollowUp = response.json();
    assert_eq!(follow_up.name, ctx.member.name);
    assert_eq!(follow_up.mobile, ctx.member.mobile);
}

#[tokio::test]
async fn test_follow_up_without_contact_is_rejected() {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.post("/api/admin/follow-ups"))
        .json(&json!({ "followUpType": "Other", "dueAt": Utc::now() }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_filters() {
    let ctx = TestContext::new().await;
    create_follow_up(&ctx, "Past due", -3).await;
    let upcoming = create_follow_up(&ctx, "Upcoming", 30).await;
    let finished = create_follow_up(&ctx, "Finished", -5).await;
    ctx.as_admin(ctx.server.put(&format!("/api/admin/follow-ups/{}/done", finished.id)))
        .await
        .assert_status_ok();

    let list = |status: &'static str| {
        ctx.as_admin(ctx.server.get("/api/admin/follow-ups"))
            .add_query_param("status", status)
    };

    let overdue: Paginated<FollowUp> = list("overdue").await.json();
    let pending: Paginated<FollowUp> = list("pending").await.json();
    let done: Paginated<FollowUp> = list("done").await.json();

    assert_eq!(
        overdue.data.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        vec!["Past due"]
    );
    assert_eq!(pending.pagination.total, 2);
    assert_eq!(pending.data.last().map(|f| f.id), Some(upcoming.id));
    assert_eq!(done.data.len(), 1);
    assert_eq!(done.data[0].id, finished.id);
}

#[tokio::test]
async fn test_bulk_delete_reports_partial_result() {
    let ctx = TestContext::new().await;
    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(create_follow_up(&ctx, &format!("Lead {}", i), i).await.id);
    }
    let unknown = Uuid::new_v4();
    let mut request = ids.clone();
    request.insert(1, unknown);

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/follow-ups/bulk-delete"))
        .json(&json!({ "ids": request }))
        .await;
    response.assert_status_ok();

    let result: BulkDeleteResponse = response.json();
    assert_eq!(result.deleted_count, 3);
    assert_eq!(result.deleted, ids);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].id, unknown);

    for id in ids {
        ctx.as_admin(ctx.server.get(&format!("/api/admin/follow-ups/{}", id)))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_bulk_delete_needs_ids() {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.post("/api/admin/follow-ups/bulk-delete"))
        .json(&json!({ "ids": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
