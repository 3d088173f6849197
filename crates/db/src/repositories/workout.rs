use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use mockall::automock;
use sqlx::types::Json;
use uuid::Uuid;

use gymdesk_core::models::workout::{Workout, WorkoutLog};

use super::PgStore;
use crate::models::{DbWorkout, DbWorkoutLog, convert_all, to_i32};

const COLUMNS: &str = "id, name, category, description, duration_minutes, exercises, created_at";
const LOG_COLUMNS: &str = "id, member_id, workout_id, date, duration_minutes";

#[automock]
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn create_workout(&self, workout: &Workout) -> Result<Workout>;

    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>>;

    /// Newest first.
    async fn list_workouts(&self) -> Result<Vec<Workout>>;

    async fn delete_workout(&self, id: Uuid) -> Result<bool>;

    async fn insert_workout_log(&self, log: &WorkoutLog) -> Result<WorkoutLog>;

    /// First completion of `workout_id` by `member_id` in `[start, end)`.
    async fn find_workout_log_between(
        &self,
        member_id: Uuid,
        workout_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<WorkoutLog>>;

    /// Completion times of every workout by the member, oldest first.
    async fn list_member_completions(&self, member_id: Uuid) -> Result<Vec<DateTime<Utc>>>;
}

#[async_trait]
impl WorkoutRepository for PgStore {
    async fn create_workout(&self, workout: &Workout) -> Result<Workout> {
        tracing::debug!(
            "Creating workout: id={}, exercises={}",
            workout.id,
            workout.exercises.len()
        );

        let row = sqlx::query_as::<_, DbWorkout>(&format!(
            r#"
            INSERT INTO workouts ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(workout.id)
        .bind(&workout.name)
        .bind(&workout.category)
        .bind(&workout.description)
        .bind(to_i32(workout.duration_minutes, "workouts.duration_minutes")?)
        .bind(Json(&workout.exercises))
        .bind(workout.created_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        let row = sqlx::query_as::<_, DbWorkout>(&format!(
            "SELECT {COLUMNS} FROM workouts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_workouts(&self) -> Result<Vec<Workout>> {
        let rows = sqlx::query_as::<_, DbWorkout>(&format!(
            "SELECT {COLUMNS} FROM workouts ORDER BY created_at DESC, id"
        ))
        .fetch_all(self.pool())
        .await?;

        convert_all(rows)
    }

    async fn delete_workout(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_workout_log(&self, log: &WorkoutLog) -> Result<WorkoutLog> {
        let duration = log
            .duration_minutes
            .map(|m| to_i32(m, "workout_logs.duration_minutes"))
            .transpose()?;

        let row = sqlx::query_as::<_, DbWorkoutLog>(&format!(
            r#"
            INSERT INTO workout_logs ({LOG_COLUMNS})
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(log.id)
        .bind(log.member_id)
        .bind(log.workout_id)
        .bind(log.date)
        .bind(duration)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn find_workout_log_between(
        &self,
        member_id: Uuid,
        workout_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<WorkoutLog>> {
        let row = sqlx::query_as::<_, DbWorkoutLog>(&format!(
            r#"
            SELECT {LOG_COLUMNS} FROM workout_logs
            WHERE member_id = $1 AND workout_id = $2 AND date >= $3 AND date < $4
            ORDER BY date
            LIMIT 1
            "#
        ))
        .bind(member_id)
        .bind(workout_id)
        .bind(start)
        .bind(end)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_member_completions(&self, member_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let dates = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT date FROM workout_logs WHERE member_id = $1 ORDER BY date",
        )
        .bind(member_id)
        .fetch_all(self.pool())
        .await?;

        Ok(dates)
    }
}
