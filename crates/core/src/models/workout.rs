use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GymError, GymResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    /// "12", "8-10" or "30s"; kept as text since trainers write it freely.
    pub reps: String,
    #[serde(default)]
    pub rest_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl CreateWorkoutRequest {
    pub fn validate(&self) -> GymResult<()> {
        if self.name.trim().is_empty() {
            return Err(GymError::Validation("Workout name is required".to_string()));
        }
        if self.duration_minutes == 0 {
            return Err(GymError::Validation(
                "Workout duration must be at least one minute".to_string(),
            ));
        }
        if let Some(bad) = self.exercises.iter().find(|e| e.name.trim().is_empty()) {
            return Err(GymError::Validation(format!(
                "Exercise with {} sets has no name",
                bad.sets
            )));
        }
        Ok(())
    }
}

/// A member finishing a workout in the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: Uuid,
    pub member_id: Uuid,
    pub workout_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWorkoutRequest {
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWorkoutResponse {
    pub already_completed: bool,
    pub log: WorkoutLog,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStatusQuery {
    pub workout_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStatusResponse {
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    pub total_completed: u64,
    /// Completions over the seven local days ending today.
    pub this_week: u64,
    /// Consecutive local days with a completion, ending today, or
    /// yesterday when nothing has been logged yet today.
    pub current_streak: u32,
}

impl WorkoutStats {
    pub fn compute(completions: &[DateTime<Utc>], today: NaiveDate, tz: Tz) -> Self {
        let days: BTreeSet<NaiveDate> = completions
            .iter()
            .map(|at| at.with_timezone(&tz).date_naive())
            .collect();

        let week_start = today.checked_sub_days(Days::new(6)).unwrap_or(today);
        let this_week = completions
            .iter()
            .map(|at| at.with_timezone(&tz).date_naive())
            .filter(|d| *d >= week_start && *d <= today)
            .count() as u64;

        let mut cursor = if days.contains(&today) {
            Some(today)
        } else {
            today.pred_opt()
        };
        let mut current_streak = 0;
        while let Some(day) = cursor.filter(|d| days.contains(d)) {
            current_streak += 1;
            cursor = day.pred_opt();
        }

        Self {
            total_completed: completions.len() as u64,
            this_week,
            current_streak,
        }
    }
}
