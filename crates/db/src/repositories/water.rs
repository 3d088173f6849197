use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use mockall::automock;
use uuid::Uuid;

use gymdesk_core::models::water::WaterEntry;

use super::PgStore;
use crate::models::{DbWaterEntry, convert_all, to_i32};

#[automock]
#[async_trait]
pub trait WaterRepository: Send + Sync {
    async fn insert_water_entry(&self, entry: &WaterEntry) -> Result<WaterEntry>;

    /// Entries logged in `[start, end)`, oldest first.
    async fn list_water_entries(
        &self,
        member_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WaterEntry>>;
}

#[async_trait]
impl WaterRepository for PgStore {
    async fn insert_water_entry(&self, entry: &WaterEntry) -> Result<WaterEntry> {
        let row = sqlx::query_as::<_, DbWaterEntry>(
            r#"
            INSERT INTO water_intake (id, member_id, amount_ml, logged_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, member_id, amount_ml, logged_at
            "#,
        )
        .bind(entry.id)
        .bind(entry.member_id)
        .bind(to_i32(entry.amount_ml, "water_intake.amount_ml")?)
        .bind(entry.logged_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn list_water_entries(
        &self,
        member_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WaterEntry>> {
        let rows = sqlx::query_as::<_, DbWaterEntry>(
            r#"
            SELECT id, member_id, amount_ml, logged_at
            FROM water_intake
            WHERE member_id = $1 AND logged_at >= $2 AND logged_at < $3
            ORDER BY logged_at
            "#,
        )
        .bind(member_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;

        convert_all(rows)
    }
}
