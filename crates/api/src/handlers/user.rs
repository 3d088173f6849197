//! Handlers behind `/api/user/**`. The member is always the bearer of the
//! token; no handler takes a member id from the request.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    date_range::{DatePreset, DateRange, day_bounds},
    errors::GymError,
    models::{
        attendance::{
            AttendanceFilter, AttendanceListQuery, AttendanceLog, AttendanceSource, ScanOutcome,
            ScanRequest, ScanResponse, SubjectKind,
        },
        diet::DietPlanResponse,
        member::{Member, UpdateMemberRequest, UpdateProfileRequest},
        water::{AddWaterRequest, WaterEntry, WaterIntakeSummary},
        workout::{
            CompleteWorkoutRequest, CompleteWorkoutResponse, Workout, WorkoutLog, WorkoutStats,
            WorkoutStatusQuery, WorkoutStatusResponse,
        },
    },
};

use crate::{
    ApiState,
    handlers::member::{load_member, save_member},
    middleware::{auth::AuthUser, error_handling::AppError},
};

fn reply(
    status: StatusCode,
    outcome: ScanOutcome,
    message: &str,
) -> Result<(StatusCode, Json<ScanResponse>), AppError> {
    Ok((status, Json(ScanResponse::new(outcome, message))))
}

async fn load_workout(state: &ApiState, id: Uuid) -> Result<Workout, AppError> {
    let workout = state
        .repos
        .workouts
        .get_workout(id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Workout with ID {} not found", id)))?;
    Ok(workout)
}

async fn todays_completion(
    state: &ApiState,
    member_id: Uuid,
    workout_id: Uuid,
) -> Result<Option<WorkoutLog>, AppError> {
    let (start, end) = day_bounds(state.today(), state.timezone);
    let log = state
        .repos
        .workouts
        .find_workout_log_between(member_id, workout_id, start, end)
        .await
        .map_err(GymError::Database)?;
    Ok(log)
}

async fn water_summary(state: &ApiState, member_id: Uuid) -> Result<WaterIntakeSummary, AppError> {
    let today = state.today();
    let (start, end) = day_bounds(today, state.timezone);
    let entries = state
        .repos
        .water
        .list_water_entries(member_id, start, end)
        .await
        .map_err(GymError::Database)?;
    Ok(WaterIntakeSummary::new(today, entries))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Member>, AppError> {
    Ok(Json(load_member(&state, user.id).await?))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Member>, AppError> {
    let update: UpdateMemberRequest = payload.into();
    update.validate()?;

    let mut member = load_member(&state, user.id).await?;
    member.apply(&update, state.now());

    Ok(Json(save_member(&state, &member).await?))
}

/// QR attendance. The scanned code must match the gym's current code and
/// the member needs a subscription covering today. The first scan of the
/// day checks in, the second checks out.
#[axum::debug_handler]
pub async fn scan_attendance(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ScanResponse>), AppError> {
    let gym = state
        .repos
        .gym
        .get_gym_details()
        .await
        .map_err(GymError::Database)?;
    let code_matches = gym.is_some_and(|g| g.gym_code == payload.gym_id.trim());
    if !code_matches {
        tracing::warn!("Member {} scanned an invalid gym code", user.id);
        return reply(StatusCode::BAD_REQUEST, ScanOutcome::Invalid, "Invalid QR code");
    }

    let member = load_member(&state, user.id).await?;
    let today = state.today();
    let now = state.now();

    let subscription = state
        .repos
        .subscriptions
        .find_active_subscription(member.id, today)
        .await
        .map_err(GymError::Database)?;
    if subscription.is_none() {
        return reply(
            StatusCode::FORBIDDEN,
            ScanOutcome::Expired,
            "Your membership has expired",
        );
    }

    let existing = state
        .repos
        .attendance
        .find_attendance(SubjectKind::Member, member.id, today)
        .await
        .map_err(GymError::Database)?;

    match existing {
        None => {
            let log = AttendanceLog::check_in(
                SubjectKind::Member,
                member.id,
                &member.name,
                today,
                now,
                AttendanceSource::Qr,
            );
            let inserted = state
                .repos
                .attendance
                .insert_attendance(&log)
                .await
                .map_err(GymError::Database)?;
            match inserted {
                Some(_) => reply(StatusCode::OK, ScanOutcome::CheckIn, "Checked in"),
                None => reply(
                    StatusCode::CONFLICT,
                    ScanOutcome::Already,
                    "Attendance already recorded for today",
                ),
            }
        }
        Some(mut log) if log.is_open() => {
            log.check_out(now)?;
            state
                .repos
                .attendance
                .save_attendance(&log)
                .await
                .map_err(GymError::Database)?;
            reply(StatusCode::OK, ScanOutcome::CheckOut, "Checked out")
        }
        Some(_) => reply(
            StatusCode::CONFLICT,
            ScanOutcome::Already,
            "You have already checked in and out today",
        ),
    }
}

#[axum::debug_handler]
pub async fn attendance_history(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AttendanceListQuery>,
) -> Result<Json<Vec<AttendanceLog>>, AppError> {
    let today = state.today();
    let range = DateRange::from_query(
        query.date_filter.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
        today,
        Some(DatePreset::LastWeek),
    )?
    .unwrap_or_else(|| DateRange::single(today));

    let filter = AttendanceFilter {
        kind: SubjectKind::Member,
        subject_id: Some(user.id),
        from: range.start,
        to: range.end,
    };

    let logs = state
        .repos
        .attendance
        .list_attendance(&filter)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(logs))
}

#[axum::debug_handler]
pub async fn list_workouts(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Workout>>, AppError> {
    let workouts = state
        .repos
        .workouts
        .list_workouts()
        .await
        .map_err(GymError::Database)?;

    Ok(Json(workouts))
}

#[axum::debug_handler]
pub async fn get_workout(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Workout>, AppError> {
    Ok(Json(load_workout(&state, id).await?))
}

#[axum::debug_handler]
pub async fn workout_status(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<WorkoutStatusQuery>,
) -> Result<Json<WorkoutStatusResponse>, AppError> {
    let log = todays_completion(&state, user.id, query.workout_id).await?;

    Ok(Json(WorkoutStatusResponse {
        completed: log.is_some(),
        completed_at: log.map(|l| l.date),
    }))
}

/// Logs a completion. Completing the same workout twice on one day returns
/// the first log.
#[axum::debug_handler]
pub async fn complete_workout(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    payload: Option<Json<CompleteWorkoutRequest>>,
) -> Result<Json<CompleteWorkoutResponse>, AppError> {
    let workout = load_workout(&state, id).await?;

    if let Some(log) = todays_completion(&state, user.id, workout.id).await? {
        return Ok(Json(CompleteWorkoutResponse {
            already_completed: true,
            log,
        }));
    }

    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let log = WorkoutLog {
        id: Uuid::new_v4(),
        member_id: user.id,
        workout_id: workout.id,
        date: state.now(),
        duration_minutes: Some(request.duration_minutes.unwrap_or(workout.duration_minutes)),
    };

    let created = state
        .repos
        .workouts
        .insert_workout_log(&log)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(CompleteWorkoutResponse {
        already_completed: false,
        log: created,
    }))
}

#[axum::debug_handler]
pub async fn workout_stats(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WorkoutStats>, AppError> {
    let completions = state
        .repos
        .workouts
        .list_member_completions(user.id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(WorkoutStats::compute(
        &completions,
        state.today(),
        state.timezone,
    )))
}

#[axum::debug_handler]
pub async fn get_diet_plan(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DietPlanResponse>, AppError> {
    let member = load_member(&state, user.id).await?;
    let plan_id = member
        .diet_plan_id
        .ok_or_else(|| GymError::NotFound("No diet plan has been assigned yet".to_string()))?;

    let plan = state
        .repos
        .diet_plans
        .get_diet_plan(plan_id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Diet plan with ID {} not found", plan_id)))?;

    Ok(Json(plan.into()))
}

#[axum::debug_handler]
pub async fn get_water_intake(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WaterIntakeSummary>, AppError> {
    Ok(Json(water_summary(&state, user.id).await?))
}

#[axum::debug_handler]
pub async fn add_water_intake(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddWaterRequest>,
) -> Result<Json<WaterIntakeSummary>, AppError> {
    payload.validate()?;

    let entry = WaterEntry {
        id: Uuid::new_v4(),
        member_id: user.id,
        amount_ml: payload.amount_ml,
        logged_at: state.now(),
    };
    state
        .repos
        .water
        .insert_water_entry(&entry)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(water_summary(&state, user.id).await?))
}
