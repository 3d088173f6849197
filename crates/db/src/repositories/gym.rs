use async_trait::async_trait;
use eyre::Result;
use mockall::automock;

use gymdesk_core::models::gym::GymDetails;

use super::PgStore;
use crate::models::DbGymDetails;

const COLUMNS: &str = "id, name, mobile, email, address, logo_url, gym_code, updated_at";

/// The deployment holds a single gym record.
#[automock]
#[async_trait]
pub trait GymRepository: Send + Sync {
    async fn get_gym_details(&self) -> Result<Option<GymDetails>>;

    /// Inserts or replaces the gym record.
    async fn save_gym_details(&self, details: &GymDetails) -> Result<GymDetails>;
}

#[async_trait]
impl GymRepository for PgStore {
    async fn get_gym_details(&self) -> Result<Option<GymDetails>> {
        let row = sqlx::query_as::<_, DbGymDetails>(&format!(
            "SELECT {COLUMNS} FROM gym_details ORDER BY updated_at DESC LIMIT 1"
        ))
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn save_gym_details(&self, details: &GymDetails) -> Result<GymDetails> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM gym_details WHERE id <> $1")
            .bind(details.id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, DbGymDetails>(&format!(
            r#"
            INSERT INTO gym_details ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name, mobile = EXCLUDED.mobile, email = EXCLUDED.email,
                address = EXCLUDED.address, logo_url = EXCLUDED.logo_url,
                gym_code = EXCLUDED.gym_code, updated_at = EXCLUDED.updated_at
            RETURNING {COLUMNS}
            "#
        ))
        .bind(details.id)
        .bind(&details.name)
        .bind(&details.mobile)
        .bind(&details.email)
        .bind(&details.address)
        .bind(&details.logo_url)
        .bind(&details.gym_code)
        .bind(details.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!("Gym details saved: id={}", row.id);
        Ok(row.into())
    }
}
