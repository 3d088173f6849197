use axum::http::StatusCode;
use chrono::Duration;
use gymdesk_core::{
    date_range::day_bounds,
    models::{
        diet::DietPlanResponse,
        water::WaterIntakeSummary,
        workout::{
            CompleteWorkoutResponse, Workout, WorkoutLog, WorkoutStats, WorkoutStatusResponse,
        },
    },
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::TestContext;

async fn create_workout(ctx: &TestContext) -> Workout {
    let response = ctx
        .as_admin(ctx.server.post("/api/admin/workouts"))
        .json(&json!({
            "name": "Leg Day",
            "durationMinutes": 45,
            "exercises": [{ "name": "Squat", "sets": 4, "reps": "8-10", "restSeconds": 90 }],
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn status(ctx: &TestContext, workout_id: Uuid) -> WorkoutStatusResponse {
    ctx.as_member(ctx.server.get("/api/user/workouts/status"))
        .add_query_param("workoutId", workout_id)
        .await
        .json()
}

#[tokio::test]
async fn test_status_window_excludes_start_of_tomorrow() {
    let ctx = TestContext::new().await;
    let workout = create_workout(&ctx).await;
    let (start, end) = day_bounds(ctx.state.today(), ctx.state.timezone);

    let log_at = |date| WorkoutLog {
        id: Uuid::new_v4(),
        member_id: ctx.member.id,
        workout_id: workout.id,
        date,
        duration_minutes: None,
    };

    ctx.state
        .repos
        .workouts
        .insert_workout_log(&log_at(end))
        .await
        .unwrap();
    ctx.state
        .repos
        .workouts
        .insert_workout_log(&log_at(start - Duration::seconds(1)))
        .await
        .unwrap();
    assert!(!status(&ctx, workout.id).await.completed);

    ctx.state
        .repos
        .workouts
        .insert_workout_log(&log_at(start))
        .await
        .unwrap();
    let today = status(&ctx, workout.id).await;
    assert!(today.completed);
    assert_eq!(today.completed_at, Some(start));
}

#[tokio::test]
async fn test_completing_twice_returns_first_log() {
    let ctx = TestContext::new().await;
    let workout = create_workout(&ctx).await;
    let path = format!("/api/user/workouts/{}/complete", workout.id);

    let first: CompleteWorkoutResponse = ctx
        .as_member(ctx.server.post(&path))
        .json(&json!({ "durationMinutes": 40 }))
        .await
        .json();
    let second: CompleteWorkoutResponse = ctx.as_member(ctx.server.post(&path)).await.json();

    assert!(!first.already_completed);
    assert_eq!(first.log.duration_minutes, Some(40));
    assert!(second.already_completed);
    assert_eq!(second.log.id, first.log.id);

    let stats: WorkoutStats = ctx
        .as_member(ctx.server.get("/api/user/workouts/stats"))
        .await
        .json();
    assert_eq!(
        stats,
        WorkoutStats {
            total_completed: 1,
            this_week: 1,
            current_streak: 1,
        }
    );
}

#[tokio::test]
async fn test_member_sees_workout_catalogue() {
    let ctx = TestContext::new().await;
    let workout = create_workout(&ctx).await;

    let listed: Vec<Workout> = ctx
        .as_member(ctx.server.get("/api/user/workouts"))
        .await
        .json();
    assert_eq!(listed, vec![workout.clone()]);

    let fetched: Workout = ctx
        .as_member(ctx.server.get(&format!("/api/user/workouts/{}", workout.id)))
        .await
        .json();
    assert_eq!(fetched.exercises[0].reps, "8-10");

    ctx.as_admin(ctx.server.delete(&format!("/api/admin/workouts/{}", workout.id)))
        .await
        .assert_status_ok();
    ctx.as_member(ctx.server.get(&format!("/api/user/workouts/{}", workout.id)))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_diet_plan_follows_assignment() {
    let ctx = TestContext::new().await;

    ctx.as_member(ctx.server.get("/api/user/diet-plan"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let plan: DietPlanResponse = ctx
        .as_admin(ctx.server.post("/api/admin/diet-plans"))
        .json(&json!({
            "name": "Lean bulk",
            "meals": [
                { "time": "07:30 AM", "name": "Breakfast", "items": ["Oats"], "calories": 450 },
                { "time": "01:00 PM", "name": "Lunch", "calories": 700 },
            ],
        }))
        .await
        .json();
    assert_eq!(plan.total_calories, 1150);

    ctx.as_admin(ctx.server.put(&format!("/api/admin/members/{}", ctx.member.id)))
        .json(&json!({ "dietPlanId": plan.plan.id }))
        .await
        .assert_status_ok();

    let assigned: DietPlanResponse = ctx
        .as_member(ctx.server.get("/api/user/diet-plan"))
        .await
        .json();
    assert_eq!(assigned.plan.id, plan.plan.id);
}

#[tokio::test]
async fn test_water_intake_accumulates_for_today() {
    let ctx = TestContext::new().await;

    for amount in [250, 500] {
        ctx.as_member(ctx.server.post("/api/user/water-intake"))
            .json(&json!({ "amountMl": amount }))
            .await
            .assert_status_ok();
    }
    ctx.as_member(ctx.server.post("/api/user/water-intake"))
        .json(&json!({ "amountMl": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let summary: WaterIntakeSummary = ctx
        .as_member(ctx.server.get("/api/user/water-intake"))
        .await
        .json();
    assert_eq!(summary.total_ml, 750);
    assert_eq!(summary.goal_ml, 3000);
    assert_eq!(summary.entries.len(), 2);
}
