use axum::http::StatusCode;
use gymdesk_core::models::{attendance::AttendanceLog, employee::Employee};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use crate::test_utils::TestContext;

async fn hire(ctx: &TestContext, name: &str, mobile: &str, role: &str) -> Employee {
    let response = ctx
        .as_admin(ctx.server.post("/api/admin/employees"))
        .json(&json!({ "name": name, "mobile": mobile, "role": role }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn deactivate(ctx: &TestContext, employee: &Employee) {
    ctx.as_admin(ctx.server.put(&format!("/api/admin/employees/{}", employee.id)))
        .json(&json!({ "isActive": false }))
        .await
        .assert_status_ok();
}

fn names(employees: &[Employee]) -> Vec<&str> {
    let mut names: Vec<&str> = employees.iter().map(|e| e.name.as_str()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_list_hides_inactive_unless_asked() {
    let ctx = TestContext::new().await;
    hire(&ctx, "Vikram", "9822222222", "Trainer").await;
    let left = hire(&ctx, "Meera", "9833333333", "Receptionist").await;
    deactivate(&ctx, &left).await;

    let active: Vec<Employee> = ctx
        .as_admin(ctx.server.get("/api/admin/employees"))
        .await
        .json();
    assert_eq!(names(&active), vec!["Vikram"]);

    let everyone: Vec<Employee> = ctx
        .as_admin(ctx.server.get("/api/admin/employees"))
        .add_query_param("includeInactive", true)
        .await
        .json();
    assert_eq!(names(&everyone), vec!["Meera", "Vikram"]);
}

#[rstest]
#[case("vik", vec!["Vikram"])]
#[case("98333", vec!["Meera"])]
#[case("nobody", vec![])]
#[tokio::test]
async fn test_list_filters_by_keyword(#[case] keyword: &str, #[case] expected: Vec<&str>) {
    let ctx = TestContext::new().await;
    hire(&ctx, "Vikram", "9822222222", "Trainer").await;
    hire(&ctx, "Meera", "9833333333", "Receptionist").await;

    let found: Vec<Employee> = ctx
        .as_admin(ctx.server.get("/api/admin/employees"))
        .add_query_param("keyword", keyword)
        .await
        .json();

    assert_eq!(names(&found), expected);
}

#[tokio::test]
async fn test_role_lookup_ignores_case_and_inactive_staff() {
    let ctx = TestContext::new().await;
    hire(&ctx, "Vikram", "9822222222", "Trainer").await;
    hire(&ctx, "Arjun", "9844444444", "trainer").await;
    hire(&ctx, "Meera", "9833333333", "Receptionist").await;
    let former = hire(&ctx, "Kabir", "9855555555", "Trainer").await;
    deactivate(&ctx, &former).await;

    let trainers: Vec<Employee> = ctx
        .as_admin(ctx.server.get("/api/admin/employees/role/TRAINER"))
        .await
        .json();

    assert_eq!(names(&trainers), vec!["Arjun", "Vikram"]);
}

#[tokio::test]
async fn test_create_requires_role() {
    let ctx = TestContext::new().await;

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/employees"))
        .json(&json!({ "name": "Vikram", "mobile": "9822222222", "role": " " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Role is required");
}

#[tokio::test]
async fn test_update_trims_and_rejects_blank_fields() {
    let ctx = TestContext::new().await;
    let employee = hire(&ctx, "Vikram", "9822222222", "Trainer").await;
    let url = format!("/api/admin/employees/{}", employee.id);

    ctx.as_admin(ctx.server.put(&url))
        .json(&json!({ "name": "" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .as_admin(ctx.server.put(&url))
        .json(&json!({ "mobile": " 9866666666 ", "role": " Head Trainer " }))
        .await;
    response.assert_status_ok();
    let updated: Employee = response.json();

    assert_eq!(updated.name, "Vikram");
    assert_eq!(updated.mobile, "9866666666");
    assert_eq!(updated.role, "Head Trainer");
}

#[tokio::test]
async fn test_attendance_list_filters_by_employee() {
    let ctx = TestContext::new().await;
    let vikram = hire(&ctx, "Vikram", "9822222222", "Trainer").await;
    let meera = hire(&ctx, "Meera", "9833333333", "Receptionist").await;
    for employee in [&vikram, &meera] {
        ctx.as_admin(ctx.server.post("/api/admin/employees/attendance"))
            .json(&json!({ "employeeId": employee.id }))
            .await
            .assert_status_ok();
    }

    let all: Vec<AttendanceLog> = ctx
        .as_admin(ctx.server.get("/api/admin/employees/attendance"))
        .await
        .json();
    assert_eq!(all.len(), 2);

    let only_meera: Vec<AttendanceLog> = ctx
        .as_admin(ctx.server.get("/api/admin/employees/attendance"))
        .add_query_param("employeeId", meera.id)
        .await
        .json();
    assert_eq!(only_meera.len(), 1);
    assert_eq!(only_meera[0].subject_id, meera.id);
    assert_eq!(only_meera[0].subject_name, "Meera");
}

#[tokio::test]
async fn test_inactive_employee_cannot_punch() {
    let ctx = TestContext::new().await;
    let employee = hire(&ctx, "Kabir", "9855555555", "Trainer").await;
    deactivate(&ctx, &employee).await;

    ctx.as_admin(ctx.server.post("/api/admin/employees/attendance"))
        .json(&json!({ "employeeId": employee.id }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
