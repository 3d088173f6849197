use axum::{Json, extract::State};
use std::sync::Arc;

use gymdesk_core::{
    date_range::day_bounds,
    errors::GymError,
    models::{attendance::SubjectKind, dashboard::DashboardSummary},
};

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<DashboardSummary>, AppError> {
    let today = state.today();
    let (start, end) = day_bounds(today, state.timezone);
    let repos = &state.repos;

    let total_members = repos.members.count_members().await.map_err(GymError::Database)?;
    let active_subscriptions = repos
        .subscriptions
        .count_active_subscriptions(today)
        .await
        .map_err(GymError::Database)?;
    let enquiries_today = repos
        .enquiries
        .count_created_between(start, end)
        .await
        .map_err(GymError::Database)?;
    let pending_follow_ups_today = repos
        .follow_ups
        .count_pending_due_between(start, end)
        .await
        .map_err(GymError::Database)?;
    let member_check_ins_today = repos
        .attendance
        .count_attendance(SubjectKind::Member, today)
        .await
        .map_err(GymError::Database)?;
    let employees_present_today = repos
        .attendance
        .count_attendance(SubjectKind::Employee, today)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(DashboardSummary {
        date: today,
        total_members,
        active_subscriptions,
        enquiries_today,
        pending_follow_ups_today,
        member_check_ins_today,
        employees_present_today,
    }))
}
