use std::sync::Arc;

use axum::http::StatusCode;
use gymdesk_core::models::{
    enquiry::{Enquiry, EnquiryStats, EnquiryStatus, LeadType},
    follow_up::FollowUp,
    pagination::Paginated,
};
use gymdesk_db::{Repositories, repositories::enquiry::MockEnquiryRepository};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::TestContext;

async fn create_enquiry(ctx: &TestContext, name: &str, mobile: &str) -> Enquiry {
    let response = ctx
        .as_admin(ctx.server.post("/api/admin/enquiries"))
        .json(&json!({ "name": name, "mobile": mobile, "leadType": "Hot" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_create_enquiry_defaults_to_open() {
    let ctx = TestContext::new().await;

    let enquiry = create_enquiry(&ctx, "Ravi", "9123456780").await;

    assert_eq!(enquiry.status, EnquiryStatus::Open);
    assert_eq!(enquiry.lead_type, LeadType::Hot);
}

#[tokio::test]
async fn test_create_enquiry_requires_name() {
    let ctx = TestContext::new().await;

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/enquiries"))
        .json(&json!({ "name": "  ", "mobile": "9123456780" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_update_is_stored() {
    let ctx = TestContext::new().await;
    let enquiry = create_enquiry(&ctx, "Ravi", "9123456780").await;

    let response = ctx
        .as_admin(ctx.server.put(&format!("/api/admin/enquiries/{}", enquiry.id)))
        .json(&json!({ "status": "Not Interested" }))
        .await;
    response.assert_status_ok();

    let fetched: Enquiry = ctx
        .as_admin(ctx.server.get(&format!("/api/admin/enquiries/{}", enquiry.id)))
        .await
        .json();
    assert_eq!(fetched.status, EnquiryStatus::NotInterested);
    assert_eq!(fetched.name, "Ravi");
}

#[tokio::test]
async fn test_stats_counts_sum_to_total() {
    let ctx = TestContext::new().await;
    let statuses = ["Closed", "Call Done", "Call Done", "Call Not Connected"];
    for (i, status) in statuses.iter().enumerate() {
        let enquiry = create_enquiry(&ctx, &format!("Lead {}", i), &format!("90000000{:02}", i)).await;
        ctx.as_admin(ctx.server.put(&format!("/api/admin/enquiries/{}", enquiry.id)))
            .json(&json!({ "status": status }))
            .await
            .assert_status_ok();
    }
    create_enquiry(&ctx, "Still open", "9000000099").await;

    let stats: EnquiryStats = ctx
        .as_admin(ctx.server.get("/api/admin/enquiries/stats"))
        .await
        .json();

    assert_eq!(stats.total, 5);
    assert_eq!(stats.status_sum(), stats.total);
    assert_eq!(stats.call_done, 2);
    assert_eq!(stats.open, 1);
}

#[tokio::test]
async fn test_list_filters_by_keyword_and_paginates() {
    let ctx = TestContext::new().await;
    for i in 0..3 {
        create_enquiry(&ctx, &format!("Priya {}", i), &format!("98000000{:02}", i)).await;
    }
    create_enquiry(&ctx, "Karan", "9700000000").await;

    let page: Paginated<Enquiry> = ctx
        .as_admin(ctx.server.get("/api/admin/enquiries"))
        .add_query_param("keyword", "PRIYA")
        .add_query_param("limit", 2)
        .await
        .json();

    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.data.len(), 2);
    assert!(page.data.iter().all(|e| e.name.starts_with("Priya")));
}

#[tokio::test]
async fn test_unknown_status_filter_is_rejected() {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.get("/api/admin/enquiries"))
        .add_query_param("status", "Maybe")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let ctx = TestContext::new().await;
    let enquiry = create_enquiry(&ctx, "Ravi", "9123456780").await;
    let path = format!("/api/admin/enquiries/{}", enquiry.id);

    ctx.as_admin(ctx.server.delete(&path)).await.assert_status_ok();
    ctx.as_admin(ctx.server.get(&path))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.as_admin(ctx.server.delete(&path))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_follow_up_from_enquiry_copies_contact() {
    let ctx = TestContext::new().await;
    let enquiry = create_enquiry(&ctx, "Ravi", "9123456780").await;

    let response = ctx
        .as_admin(ctx.server.post(&format!("/api/admin/enquiries/{}/follow-ups", enquiry.id)))
        .json(&json!({ "dueAt": "2030-01-15T05:30:00Z", "comment": "Call after payday" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let follow_up: FollowUp = response.json();
    assert_eq!(follow_up.enquiry_id, Some(enquiry.id));
    assert_eq!(follow_up.name, "Ravi");
    assert_eq!(follow_up.mobile, "9123456780");
    assert_eq!(follow_up.convertibility, Some(LeadType::Hot));
    assert!(!follow_up.is_done);
}

#[tokio::test]
async fn test_follow_up_for_unknown_enquiry_is_not_found() {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.post(&format!("/api/admin/enquiries/{}/follow-ups", Uuid::new_v4())))
        .json(&json!({ "dueAt": "2030-01-15T05:30:00Z" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_database_failure_returns_generic_500() {
    let mut mock = MockEnquiryRepository::new();
    mock.expect_list_enquiries()
        .returning(|_, _| Err(eyre::eyre!("connection reset by peer")));

    let mut repos = Repositories::in_memory();
    repos.enquiries = Arc::new(mock);
    let ctx = TestContext::with_repos(repos).await;

    let response = ctx.as_admin(ctx.server.get("/api/admin/enquiries")).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": false, "message": "Internal server error" })
    );
}

#[tokio::test]
async fn test_stats_total_comes_from_status_snapshot() {
    let mut mock = MockEnquiryRepository::new();
    mock.expect_count_by_status().times(1).returning(|| {
        Ok(vec![
            (EnquiryStatus::Open, 4),
            (EnquiryStatus::Closed, 1),
            (EnquiryStatus::CallNotConnected, 2),
        ])
    });

    let mut repos = Repositories::in_memory();
    repos.enquiries = Arc::new(mock);
    let ctx = TestContext::with_repos(repos).await;

    let response = ctx.as_admin(ctx.server.get("/api/admin/enquiries/stats")).await;
    response.assert_status_ok();

    let stats: EnquiryStats = response.json();
    assert_eq!(stats.total, 7);
    assert_eq!(stats.call_not_connected, 2);
    assert_eq!(stats.status_sum(), stats.total);
}
