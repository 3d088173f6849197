use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::Result;
use mockall::automock;
use uuid::Uuid;

use gymdesk_core::models::package::Subscription;

use super::{PgStore, to_count};
use crate::models::DbSubscription;

const COLUMNS: &str =
    "id, member_id, package_id, package_name, start_date, end_date, amount_paid, created_at";

#[automock]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create_subscription(&self, subscription: &Subscription) -> Result<Subscription>;

    /// Most recent start first.
    async fn list_member_subscriptions(&self, member_id: Uuid) -> Result<Vec<Subscription>>;

    /// The subscription covering `date`, preferring the one ending last.
    async fn find_active_subscription(
        &self,
        member_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Subscription>>;

    /// Distinct members with a subscription covering `date`.
    async fn count_active_subscriptions(&self, date: NaiveDate) -> Result<u64>;

    async fn list_subscriptions_without_package(&self) -> Result<Vec<Subscription>>;

    async fn set_subscription_package(&self, id: Uuid, package_id: Uuid) -> Result<bool>;
}

#[async_trait]
impl SubscriptionRepository for PgStore {
    async fn create_subscription(&self, subscription: &Subscription) -> Result<Subscription> {
        tracing::debug!(
            "Creating subscription: member_id={}, {} to {}",
            subscription.member_id,
            subscription.start_date,
            subscription.end_date
        );

        let row = sqlx::query_as::<_, DbSubscription>(&format!(
            r#"
            INSERT INTO subscriptions ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(subscription.id)
        .bind(subscription.member_id)
        .bind(subscription.package_id)
        .bind(&subscription.package_name)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.amount_paid)
        .bind(subscription.created_at)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn list_member_subscriptions(&self, member_id: Uuid) -> Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, DbSubscription>(&format!(
            r#"
            SELECT {COLUMNS} FROM subscriptions
            WHERE member_id = $1
            ORDER BY start_date DESC, created_at DESC
            "#
        ))
        .bind(member_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_active_subscription(
        &self,
        member_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Subscription>> {
        let row = sqlx::query_as::<_, DbSubscription>(&format!(
            r#"
            SELECT {COLUMNS} FROM subscriptions
            WHERE member_id = $1 AND start_date <= $2 AND end_date >= $2
            ORDER BY end_date DESC
            LIMIT 1
            "#
        ))
        .bind(member_id)
        .bind(date)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn count_active_subscriptions(&self, date: NaiveDate) -> Result<u64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT s.member_id)
            FROM subscriptions s
            JOIN members m ON m.id = s.member_id
            WHERE NOT m.is_deleted AND s.start_date <= $1 AND s.end_date >= $1
            "#,
        )
        .bind(date)
        .fetch_one(self.pool())
        .await?;
        Ok(to_count(total))
    }

    async fn list_subscriptions_without_package(&self) -> Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, DbSubscription>(&format!(
            r#"
            SELECT {COLUMNS} FROM subscriptions
            WHERE package_id IS NULL
            ORDER BY created_at, id
            "#
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_subscription_package(&self, id: Uuid, package_id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE subscriptions SET package_id = $2 WHERE id = $1")
            .bind(id)
            .bind(package_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
