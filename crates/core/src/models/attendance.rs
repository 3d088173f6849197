use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GymError, GymResult};

labelled_enum!(
    SubjectKind {
        Employee => "employee",
        Member => "member",
    }
);

labelled_enum!(
    AttendanceSource {
        Punch => "punch",
        Qr => "qr",
        Manual => "manual",
    }
);

/// One subject's attendance for one gym-local calendar day. The store keeps
/// at most one log per (kind, subject, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceLog {
    pub id: Uuid,
    pub subject_kind: SubjectKind,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub date: NaiveDate,
    pub in_time: DateTime<Utc>,
    pub out_time: Option<DateTime<Utc>>,
    pub total_hours: Option<f64>,
    pub source: AttendanceSource,
}

impl AttendanceLog {
    pub fn check_in(
        kind: SubjectKind,
        subject_id: Uuid,
        subject_name: &str,
        date: NaiveDate,
        at: DateTime<Utc>,
        source: AttendanceSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_kind: kind,
            subject_id,
            subject_name: subject_name.to_string(),
            date,
            in_time: at,
            out_time: None,
            total_hours: None,
            source,
        }
    }

    pub fn is_open(&self) -> bool {
        self.out_time.is_none()
    }

    pub fn check_out(&mut self, at: DateTime<Utc>) -> GymResult<()> {
        self.total_hours = Some(total_hours(self.in_time, at)?);
        self.out_time = Some(at);
        Ok(())
    }
}

/// Elapsed hours between punch-in and punch-out, rounded to two decimals.
pub fn total_hours(in_time: DateTime<Utc>, out_time: DateTime<Utc>) -> GymResult<f64> {
    if out_time < in_time {
        return Err(GymError::Validation(
            "Out time cannot be earlier than in time".to_string(),
        ));
    }
    let hours = (out_time - in_time).num_seconds() as f64 / 3600.0;
    Ok((hours * 100.0).round() / 100.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchRequest {
    pub employee_id: Uuid,
}

/// Admin correction of an employee's day. `date` is `dd-mm-yyyy`; times are
/// `HH:MM` in the gym's timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAttendanceRequest {
    pub employee_id: Uuid,
    pub date: String,
    pub in_time: String,
    pub out_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListQuery {
    pub date_filter: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceFilter {
    pub kind: SubjectKind,
    pub subject_id: Option<Uuid>,
    /// Inclusive calendar-day range.
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl AttendanceFilter {
    pub fn matches(&self, log: &AttendanceLog) -> bool {
        log.subject_kind == self.kind
            && self.subject_id.is_none_or(|id| log.subject_id == id)
            && log.date >= self.from
            && log.date <= self.to
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub gym_id: String,
}

labelled_enum!(
    ScanOutcome {
        CheckIn => "checkin",
        CheckOut => "checkout",
        Already => "already",
        Expired => "expired",
        Invalid => "invalid",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "type")]
    pub outcome: ScanOutcome,
}

impl ScanResponse {
    pub fn new(outcome: ScanOutcome, message: impl Into<String>) -> Self {
        Self {
            success: matches!(outcome, ScanOutcome::CheckIn | ScanOutcome::CheckOut),
            message: message.into(),
            outcome,
        }
    }
}
