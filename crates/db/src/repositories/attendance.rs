use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::Result;
use mockall::automock;
use uuid::Uuid;

use gymdesk_core::models::attendance::{AttendanceFilter, AttendanceLog, SubjectKind};

use super::{PgStore, to_count};
use crate::models::{DbAttendanceLog, convert_all};

const COLUMNS: &str =
    "id, subject_kind, subject_id, subject_name, date, in_time, out_time, total_hours, source";

#[automock]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_attendance(
        &self,
        kind: SubjectKind,
        subject_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceLog>>;

    /// Inserts a new day log. Returns `None` when the subject already has a
    /// log for that date.
    async fn insert_attendance(&self, log: &AttendanceLog) -> Result<Option<AttendanceLog>>;

    /// Overwrites times and source of an existing log.
    async fn save_attendance(&self, log: &AttendanceLog) -> Result<AttendanceLog>;

    /// Most recent day first.
    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceLog>>;

    async fn count_attendance(&self, kind: SubjectKind, date: NaiveDate) -> Result<u64>;
}

#[async_trait]
impl AttendanceRepository for PgStore {
    async fn find_attendance(
        &self,
        kind: SubjectKind,
        subject_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceLog>> {
        let row = sqlx::query_as::<_, DbAttendanceLog>(&format!(
            r#"
            SELECT {COLUMNS} FROM attendance_logs
            WHERE subject_kind = $1 AND subject_id = $2 AND date = $3
            "#
        ))
        .bind(kind.as_str())
        .bind(subject_id)
        .bind(date)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert_attendance(&self, log: &AttendanceLog) -> Result<Option<AttendanceLog>> {
        tracing::debug!(
            "Recording check-in: kind={}, subject_id={}, date={}",
            log.subject_kind,
            log.subject_id,
            log.date
        );

        let row = sqlx::query_as::<_, DbAttendanceLog>(&format!(
            r#"
            INSERT INTO attendance_logs ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (subject_kind, subject_id, date) DO NOTHING
            RETURNING {COLUMNS}
            "#
        ))
        .bind(log.id)
        .bind(log.subject_kind.as_str())
        .bind(log.subject_id)
        .bind(&log.subject_name)
        .bind(log.date)
        .bind(log.in_time)
        .bind(log.out_time)
        .bind(log.total_hours)
        .bind(log.source.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn save_attendance(&self, log: &AttendanceLog) -> Result<AttendanceLog> {
        let row = sqlx::query_as::<_, DbAttendanceLog>(&format!(
            r#"
            UPDATE attendance_logs
            SET in_time = $2, out_time = $3, total_hours = $4, source = $5
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(log.id)
        .bind(log.in_time)
        .bind(log.out_time)
        .bind(log.total_hours)
        .bind(log.source.as_str())
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceLog>> {
        let rows = sqlx::query_as::<_, DbAttendanceLog>(&format!(
            r#"
            SELECT {COLUMNS} FROM attendance_logs
            WHERE subject_kind = $1
              AND ($2::uuid IS NULL OR subject_id = $2)
              AND date >= $3 AND date <= $4
            ORDER BY date DESC, in_time DESC
            "#
        ))
        .bind(filter.kind.as_str())
        .bind(filter.subject_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(self.pool())
        .await?;

        convert_all(rows)
    }

    async fn count_attendance(&self, kind: SubjectKind, date: NaiveDate) -> Result<u64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_logs WHERE subject_kind = $1 AND date = $2",
        )
        .bind(kind.as_str())
        .bind(date)
        .fetch_one(self.pool())
        .await?;
        Ok(to_count(total))
    }
}
