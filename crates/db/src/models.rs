//! Row types as stored in PostgreSQL, and their conversion into domain
//! records. Enum columns hold the display label; unsigned counters are
//! stored as INTEGER.

use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use gymdesk_core::models::{
    attendance::AttendanceLog,
    auth::Admin,
    diet::{DietPlan, Meal},
    employee::Employee,
    enquiry::Enquiry,
    follow_up::FollowUp,
    gym::GymDetails,
    member::Member,
    package::{Package, Subscription},
    water::WaterEntry,
    workout::{Exercise, Workout, WorkoutLog},
};

fn parse_opt<T>(value: Option<String>) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = gymdesk_core::errors::GymError>,
{
    value.map(|v| v.parse::<T>()).transpose().map_err(|e| eyre!(e))
}

fn parse<T>(value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = gymdesk_core::errors::GymError>,
{
    value.parse::<T>().map_err(|e| eyre!(e))
}

pub(crate) fn to_u32(value: i32, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| eyre!("Negative value {} in column {}", value, column))
}

pub(crate) fn to_i32(value: u32, column: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| eyre!("Value {} too large for column {}", value, column))
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAdmin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbAdmin> for Admin {
    fn from(row: DbAdmin) -> Self {
        Admin {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEnquiry {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub source: Option<String>,
    pub interested_in: Option<String>,
    pub lead_type: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbEnquiry> for Enquiry {
    type Error = eyre::Report;

    fn try_from(row: DbEnquiry) -> Result<Self> {
        Ok(Enquiry {
            id: row.id,
            name: row.name,
            mobile: row.mobile,
            email: row.email,
            gender: parse_opt(row.gender)?,
            address: row.address,
            source: row.source,
            interested_in: row.interested_in,
            lead_type: parse(&row.lead_type)?,
            status: parse(&row.status)?,
            assigned_to: row.assigned_to,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFollowUp {
    pub id: Uuid,
    pub enquiry_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub name: String,
    pub mobile: String,
    pub follow_up_type: String,
    pub convertibility: Option<String>,
    pub due_at: DateTime<Utc>,
    pub comment: Option<String>,
    pub response: Option<String>,
    pub is_done: bool,
    pub done_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbFollowUp> for FollowUp {
    type Error = eyre::Report;

    fn try_from(row: DbFollowUp) -> Result<Self> {
        Ok(FollowUp {
            id: row.id,
            enquiry_id: row.enquiry_id,
            member_id: row.member_id,
            name: row.name,
            mobile: row.mobile,
            follow_up_type: parse(&row.follow_up_type)?,
            convertibility: parse_opt(row.convertibility)?,
            due_at: row.due_at,
            comment: row.comment,
            response: row.response,
            is_done: row.is_done,
            done_at: row.done_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEmployee {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub role: String,
    pub employee_type: String,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbEmployee> for Employee {
    type Error = eyre::Report;

    fn try_from(row: DbEmployee) -> Result<Self> {
        Ok(Employee {
            id: row.id,
            name: row.name,
            mobile: row.mobile,
            email: row.email,
            gender: parse_opt(row.gender)?,
            role: row.role,
            employee_type: parse(&row.employee_type)?,
            address: row.address,
            photo_url: row.photo_url,
            joining_date: row.joining_date,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMember {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub package_id: Option<Uuid>,
    pub package_name: Option<String>,
    pub diet_plan_id: Option<Uuid>,
    pub password_hash: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbMember> for Member {
    type Error = eyre::Report;

    fn try_from(row: DbMember) -> Result<Self> {
        Ok(Member {
            id: row.id,
            name: row.name,
            mobile: row.mobile,
            email: row.email,
            gender: parse_opt(row.gender)?,
            address: row.address,
            photo_url: row.photo_url,
            date_of_birth: row.date_of_birth,
            package_id: row.package_id,
            package_name: row.package_name,
            diet_plan_id: row.diet_plan_id,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPackage {
    pub id: Uuid,
    pub name: String,
    pub duration_months: i32,
    pub price: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbPackage> for Package {
    type Error = eyre::Report;

    fn try_from(row: DbPackage) -> Result<Self> {
        Ok(Package {
            id: row.id,
            name: row.name,
            duration_months: to_u32(row.duration_months, "packages.duration_months")?,
            price: row.price,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSubscription {
    pub id: Uuid,
    pub member_id: Uuid,
    pub package_id: Option<Uuid>,
    pub package_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount_paid: f64,
    pub created_at: DateTime<Utc>,
}

impl From<DbSubscription> for Subscription {
    fn from(row: DbSubscription) -> Self {
        Subscription {
            id: row.id,
            member_id: row.member_id,
            package_id: row.package_id,
            package_name: row.package_name,
            start_date: row.start_date,
            end_date: row.end_date,
            amount_paid: row.amount_paid,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAttendanceLog {
    pub id: Uuid,
    pub subject_kind: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub date: NaiveDate,
    pub in_time: DateTime<Utc>,
    pub out_time: Option<DateTime<Utc>>,
    pub total_hours: Option<f64>,
    pub source: String,
}

impl TryFrom<DbAttendanceLog> for AttendanceLog {
    type Error = eyre::Report;

    fn try_from(row: DbAttendanceLog) -> Result<Self> {
        Ok(AttendanceLog {
            id: row.id,
            subject_kind: parse(&row.subject_kind)?,
            subject_id: row.subject_id,
            subject_name: row.subject_name,
            date: row.date,
            in_time: row.in_time,
            out_time: row.out_time,
            total_hours: row.total_hours,
            source: parse(&row.source)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGymDetails {
    pub id: Uuid,
    pub name: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub gym_code: String,
    pub updated_at: DateTime<Utc>,
}

impl From<DbGymDetails> for GymDetails {
    fn from(row: DbGymDetails) -> Self {
        GymDetails {
            id: row.id,
            name: row.name,
            mobile: row.mobile,
            email: row.email,
            address: row.address,
            logo_url: row.logo_url,
            gym_code: row.gym_code,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbWorkout {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub exercises: Json<Vec<Exercise>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbWorkout> for Workout {
    type Error = eyre::Report;

    fn try_from(row: DbWorkout) -> Result<Self> {
        Ok(Workout {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            duration_minutes: to_u32(row.duration_minutes, "workouts.duration_minutes")?,
            exercises: row.exercises.0,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWorkoutLog {
    pub id: Uuid,
    pub member_id: Uuid,
    pub workout_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
}

impl TryFrom<DbWorkoutLog> for WorkoutLog {
    type Error = eyre::Report;

    fn try_from(row: DbWorkoutLog) -> Result<Self> {
        Ok(WorkoutLog {
            id: row.id,
            member_id: row.member_id,
            workout_id: row.workout_id,
            date: row.date,
            duration_minutes: row
                .duration_minutes
                .map(|m| to_u32(m, "workout_logs.duration_minutes"))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbDietPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub meals: Json<Vec<Meal>>,
    pub created_at: DateTime<Utc>,
}

impl From<DbDietPlan> for DietPlan {
    fn from(row: DbDietPlan) -> Self {
        DietPlan {
            id: row.id,
            name: row.name,
            description: row.description,
            meals: row.meals.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWaterEntry {
    pub id: Uuid,
    pub member_id: Uuid,
    pub amount_ml: i32,
    pub logged_at: DateTime<Utc>,
}

impl TryFrom<DbWaterEntry> for WaterEntry {
    type Error = eyre::Report;

    fn try_from(row: DbWaterEntry) -> Result<Self> {
        Ok(WaterEntry {
            id: row.id,
            member_id: row.member_id,
            amount_ml: to_u32(row.amount_ml, "water_intake.amount_ml")?,
            logged_at: row.logged_at,
        })
    }
}

/// Converts a batch of rows, failing on the first malformed one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
