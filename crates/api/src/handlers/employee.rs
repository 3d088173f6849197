use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use gymdesk_core::{
    date_range::{DatePreset, DateRange, local_time_on, parse_dmy},
    errors::GymError,
    models::{
        attendance::{
            AttendanceFilter, AttendanceListQuery, AttendanceLog, AttendanceSource,
            ManualAttendanceRequest, PunchRequest, SubjectKind,
        },
        employee::{
            CreateEmployeeRequest, Employee, EmployeeFilter, EmployeeListQuery,
            UpdateEmployeeRequest,
        },
        normalize_keyword,
    },
};

use crate::{ApiState, middleware::error_handling::AppError};

async fn load_employee(state: &ApiState, id: Uuid) -> Result<Employee, AppError> {
    let employee = state
        .repos
        .employees
        .get_employee(id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Employee with ID {} not found", id)))?;
    Ok(employee)
}

#[axum::debug_handler]
pub async fn list_employees(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<EmployeeListQuery>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let filter = EmployeeFilter {
        role: None,
        keyword: normalize_keyword(query.keyword.as_deref()),
        include_inactive: query.include_inactive,
    };

    let employees = state
        .repos
        .employees
        .list_employees(&filter)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(employees))
}

#[axum::debug_handler]
pub async fn list_employees_by_role(
    State(state): State<Arc<ApiState>>,
    Path(role): Path<String>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let filter = EmployeeFilter {
        role: Some(role.trim().to_string()),
        ..Default::default()
    };

    let employees = state
        .repos
        .employees
        .list_employees(&filter)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(employees))
}

#[axum::debug_handler]
pub async fn create_employee(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    if payload.name.trim().is_empty() || payload.mobile.trim().is_empty() {
        return Err(GymError::Validation("Name and mobile number are required".to_string()).into());
    }
    if payload.role.trim().is_empty() {
        return Err(GymError::Validation("Role is required".to_string()).into());
    }

    let now = state.now();
    let employee = Employee {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        mobile: payload.mobile.trim().to_string(),
        email: payload.email,
        gender: payload.gender,
        role: payload.role.trim().to_string(),
        employee_type: payload.employee_type,
        address: payload.address,
        photo_url: payload.photo_url,
        joining_date: payload.joining_date,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let created = state
        .repos
        .employees
        .create_employee(&employee)
        .await
        .map_err(GymError::Database)?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn get_employee(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(load_employee(&state, id).await?))
}

#[axum::debug_handler]
pub async fn update_employee(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<Employee>, AppError> {
    payload.validate()?;
    let mut employee = load_employee(&state, id).await?;
    employee.apply(&payload, state.now());

    let updated = state
        .repos
        .employees
        .update_employee(&employee)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Employee with ID {} not found", id)))?;

    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn list_employee_attendance(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AttendanceListQuery>,
) -> Result<Json<Vec<AttendanceLog>>, AppError> {
    let today = state.today();
    let range = DateRange::from_query(
        query.date_filter.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
        today,
        Some(DatePreset::Today),
    )?
    .unwrap_or_else(|| DateRange::single(today));

    let filter = AttendanceFilter {
        kind: SubjectKind::Employee,
        subject_id: query.employee_id,
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

/// Punch toggle: the first punch of the day checks the employee in, the
/// second checks them out, any further punch is rejected.
#[axum::debug_handler]
pub async fn punch_attendance(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<PunchRequest>,
) -> Result<Json<AttendanceLog>, AppError> {
    let employee = load_employee(&state, payload.employee_id).await?;
    if !employee.is_active {
        return Err(GymError::Validation(format!("{} is not an active employee", employee.name)).into());
    }

    let now = state.now();
    let today = state.today();
    let existing = state
        .repos
        .attendance
        .find_attendance(SubjectKind::Employee, employee.id, today)
        .await
        .map_err(GymError::Database)?;

    match existing {
        None => {
            let log = AttendanceLog::check_in(
                SubjectKind::Employee,
                employee.id,
                &employee.name,
                today,
                now,
                AttendanceSource::Punch,
            );
            let created = state
                .repos
                .attendance
                .insert_attendance(&log)
                .await
                .map_err(GymError::Database)?
                .ok_or_else(|| {
                    GymError::Conflict(format!("{} has already punched in today", employee.name))
                })?;
            tracing::info!("Employee {} punched in", employee.id);
            Ok(Json(created))
        }
        Some(mut log) if log.is_open() => {
            log.check_out(now)?;
            let saved = state
                .repos
                .attendance
                .save_attendance(&log)
                .await
                .map_err(GymError::Database)?;
            tracing::info!("Employee {} punched out", employee.id);
            Ok(Json(saved))
        }
        Some(_) => Err(GymError::Conflict(format!(
            "{} has already punched in and out today",
            employee.name
        ))
        .into()),
    }
}

/// Creates or overwrites an employee's log for the given day.
#[axum::debug_handler]
pub async fn manual_attendance(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ManualAttendanceRequest>,
) -> Result<Json<AttendanceLog>, AppError> {
    let employee = load_employee(&state, payload.employee_id).await?;
    let tz = state.timezone;

    let date = parse_dmy(&payload.date)?;
    let in_time = local_time_on(date, &payload.in_time, tz)?;
    let out_time = payload
        .out_time
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| local_time_on(date, t, tz))
        .transpose()?;

    let existing = state
        .repos
        .attendance
        .find_attendance(SubjectKind::Employee, employee.id, date)
        .await
        .map_err(GymError::Database)?;

    let mut log = AttendanceLog::check_in(
        SubjectKind::Employee,
        employee.id,
        &employee.name,
        date,
        in_time,
        AttendanceSource::Manual,
    );
    if let Some(existing) = &existing {
        log.id = existing.id;
    }
    if let Some(out_time) = out_time {
        log.check_out(out_time)?;
    }

    let saved = match existing {
        Some(_) => state
            .repos
            .attendance
            .save_attendance(&log)
            .await
            .map_err(GymError::Database)?,
        None => state
            .repos
            .attendance
            .insert_attendance(&log)
            .await
            .map_err(GymError::Database)?
            .ok_or_else(|| {
                GymError::Conflict(format!(
                    "Attendance for {} on {} was recorded concurrently",
                    employee.name, payload.date
                ))
            })?,
    };

    tracing::info!(
        "Manual attendance for employee {} on {}",
        employee.id,
        saved.date
    );
    Ok(Json(saved))
}
