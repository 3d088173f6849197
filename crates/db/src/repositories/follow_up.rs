use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use mockall::automock;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use gymdesk_core::models::{
    follow_up::{FollowUp, FollowUpFilter, FollowUpStatus},
    pagination::PageQuery,
};

use super::{PgStore, push_keyword, to_count};
use crate::models::{DbFollowUp, convert_all};

const COLUMNS: &str = "id, enquiry_id, member_id, name, mobile, follow_up_type, convertibility, \
                       due_at, comment, response, is_done, done_at, created_at, updated_at";

#[automock]
#[async_trait]
pub trait FollowUpRepository: Send + Sync {
    async fn create_follow_up(&self, follow_up: &FollowUp) -> Result<FollowUp>;

    async fn get_follow_up(&self, id: Uuid) -> Result<Option<FollowUp>>;

    /// Earliest due first.
    async fn list_follow_ups(
        &self,
        filter: &FollowUpFilter,
        page: PageQuery,
    ) -> Result<(Vec<FollowUp>, u64)>;

    async fn update_follow_up(&self, follow_up: &FollowUp) -> Result<Option<FollowUp>>;

    async fn delete_follow_up(&self, id: Uuid) -> Result<bool>;

    /// Pending follow-ups due in `[start, end)`.
    async fn count_pending_due_between(&self, start: DateTime<Utc>, end: DateTime<Utc>)
    -> Result<u64>;
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &FollowUpFilter) {
    builder.push(" WHERE TRUE");
    match filter.status {
        None => {}
        Some(FollowUpStatus::Pending) => {
            builder.push(" AND NOT is_done");
        }
        Some(FollowUpStatus::Done) => {
            builder.push(" AND is_done");
        }
        Some(FollowUpStatus::Overdue) => {
            builder.push(" AND NOT is_done AND due_at < ").push_bind(filter.now);
        }
    }
    if let Some(kind) = filter.follow_up_type {
        builder.push(" AND follow_up_type = ").push_bind(kind.as_str());
    }
    if let Some(convertibility) = filter.convertibility {
        builder
            .push(" AND convertibility = ")
            .push_bind(convertibility.as_str());
    }
    if let Some((start, end)) = filter.due_between {
        builder
            .push(" AND due_at >= ")
            .push_bind(start)
            .push(" AND due_at < ")
            .push_bind(end);
    }
    if let Some(keyword) = &filter.keyword {
        push_keyword(builder, keyword, &["name", "mobile", "comment"]);
    }
}

#[async_trait]
impl FollowUpRepository for PgStore {
    async fn create_follow_up(&self, follow_up: &FollowUp) -> Result<FollowUp> {
        tracing::debug!(
            "Creating follow-up: id={}, type={}, due_at={}",
            follow_up.id,
            follow_up.follow_up_type,
            follow_up.due_at
        );

        let row = sqlx::query_as::<_, DbFollowUp>(&format!(
            r#"
            INSERT INTO follow_ups ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(follow_up.id)
        .bind(follow_up.enquiry_id)
        .bind(follow_up.member_id)
        .bind(&follow_up.name)
        .bind(&follow_up.mobile)
        .bind(follow_up.follow_up_type.as_str())
        .bind(follow_up.convertibility.map(|c| c.as_str()))
        .bind(follow_up.due_at)
        .bind(&follow_up.comment)
        .bind(&follow_up.response)
        .bind(follow_up.is_done)
        .bind(follow_up.done_at)
        .bind(follow_up.created_at)
        .bind(follow_up.updated_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn get_follow_up(&self, id: Uuid) -> Result<Option<FollowUp>> {
        let row = sqlx::query_as::<_, DbFollowUp>(&format!(
            "SELECT {COLUMNS} FROM follow_ups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_follow_ups(
        &self,
        filter: &FollowUpFilter,
        page: PageQuery,
    ) -> Result<(Vec<FollowUp>, u64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM follow_ups");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(self.pool()).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM follow_ups"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY due_at ASC, id LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = select
            .build_query_as::<DbFollowUp>()
            .fetch_all(self.pool())
            .await?;

        Ok((convert_all(rows)?, to_count(total)))
    }

    async fn update_follow_up(&self, follow_up: &FollowUp) -> Result<Option<FollowUp>> {
        let row = sqlx::query_as::<_, DbFollowUp>(&format!(
            r#"
            UPDATE follow_ups
            SET follow_up_type = $2, convertibility = $3, due_at = $4, comment = $5,
                response = $6, is_done = $7, done_at = $8, updated_at = $9
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(follow_up.id)
        .bind(follow_up.follow_up_type.as_str())
        .bind(follow_up.convertibility.map(|c| c.as_str()))
        .bind(follow_up.due_at)
        .bind(&follow_up.comment)
        .bind(&follow_up.response)
        .bind(follow_up.is_done)
        .bind(follow_up.done_at)
        .bind(follow_up.updated_at)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete_follow_up(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM follow_ups WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_pending_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM follow_ups WHERE NOT is_done AND due_at >= $1 AND due_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool())
        .await?;
        Ok(to_count(total))
    }
}
