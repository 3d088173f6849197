use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use mockall::automock;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use gymdesk_core::models::{
    enquiry::{Enquiry, EnquiryFilter, EnquiryStatus},
    pagination::PageQuery,
};

use super::{PgStore, push_keyword, to_count};
use crate::models::{DbEnquiry, convert_all};

const COLUMNS: &str = "id, name, mobile, email, gender, address, source, interested_in, \
                       lead_type, status, assigned_to, comment, created_at, updated_at";

#[automock]
#[async_trait]
pub trait EnquiryRepository: Send + Sync {
    async fn create_enquiry(&self, enquiry: &Enquiry) -> Result<Enquiry>;

    async fn get_enquiry(&self, id: Uuid) -> Result<Option<Enquiry>>;

    /// Newest first. Returns the page and the number of matching rows.
    async fn list_enquiries(
        &self,
        filter: &EnquiryFilter,
        page: PageQuery,
    ) -> Result<(Vec<Enquiry>, u64)>;

    async fn update_enquiry(&self, enquiry: &Enquiry) -> Result<Option<Enquiry>>;

    async fn delete_enquiry(&self, id: Uuid) -> Result<bool>;

    async fn count_by_status(&self) -> Result<Vec<(EnquiryStatus, u64)>>;

    /// Enquiries created in `[start, end)`.
    async fn count_created_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u64>;

    /// Every enquiry in creation order.
    async fn all_enquiries(&self) -> Result<Vec<Enquiry>>;
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &EnquiryFilter) {
    builder.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(lead_type) = filter.lead_type {
        builder.push(" AND lead_type = ").push_bind(lead_type.as_str());
    }
    if let Some(gender) = filter.gender {
        builder.push(" AND gender = ").push_bind(gender.as_str());
    }
    if let Some(keyword) = &filter.keyword {
        push_keyword(builder, keyword, &["name", "mobile", "email"]);
    }
}

#[async_trait]
impl EnquiryRepository for PgStore {
    async fn create_enquiry(&self, enquiry: &Enquiry) -> Result<Enquiry> {
        tracing::debug!("Creating enquiry: id={}, name={}", enquiry.id, enquiry.name);

        let row = sqlx::query_as::<_, DbEnquiry>(&format!(
            r#"
            INSERT INTO enquiries ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(enquiry.id)
        .bind(&enquiry.name)
        .bind(&enquiry.mobile)
        .bind(&enquiry.email)
        .bind(enquiry.gender.map(|g| g.as_str()))
        .bind(&enquiry.address)
        .bind(&enquiry.source)
        .bind(&enquiry.interested_in)
        .bind(enquiry.lead_type.as_str())
        .bind(enquiry.status.as_str())
        .bind(enquiry.assigned_to)
        .bind(&enquiry.comment)
        .bind(enquiry.created_at)
        .bind(enquiry.updated_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn get_enquiry(&self, id: Uuid) -> Result<Option<Enquiry>> {
        let row = sqlx::query_as::<_, DbEnquiry>(&format!(
            "SELECT {COLUMNS} FROM enquiries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_enquiries(
        &self,
        filter: &EnquiryFilter,
        page: PageQuery,
    ) -> Result<(Vec<Enquiry>, u64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM enquiries");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(self.pool()).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM enquiries"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = select
            .build_query_as::<DbEnquiry>()
            .fetch_all(self.pool())
            .await?;

        Ok((convert_all(rows)?, to_count(total)))
    }

    async fn update_enquiry(&self, enquiry: &Enquiry) -> Result<Option<Enquiry>> {
        let row = sqlx::query_as::<_, DbEnquiry>(&format!(
            r#"
            UPDATE enquiries
            SET name = $2, mobile = $3, email = $4, gender = $5, address = $6, source = $7,
                interested_in = $8, lead_type = $9, status = $10, assigned_to = $11,
                comment = $12, updated_at = $13
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(enquiry.id)
        .bind(&enquiry.name)
        .bind(&enquiry.mobile)
        .bind(&enquiry.email)
        .bind(enquiry.gender.map(|g| g.as_str()))
        .bind(&enquiry.address)
        .bind(&enquiry.source)
        .bind(&enquiry.interested_in)
        .bind(enquiry.lead_type.as_str())
        .bind(enquiry.status.as_str())
        .bind(enquiry.assigned_to)
        .bind(&enquiry.comment)
        .bind(enquiry.updated_at)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete_enquiry(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM enquiries WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self) -> Result<Vec<(EnquiryStatus, u64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM enquiries GROUP BY status")
                .fetch_all(self.pool())
                .await?;

        let mut counts = Vec::with_capacity(rows.len());
        for (label, count) in rows {
            match label.parse::<EnquiryStatus>() {
                Ok(status) => counts.push((status, to_count(count))),
                Err(_) => tracing::warn!("Ignoring enquiries with unknown status '{}'", label),
            }
        }
        Ok(counts)
    }

    async fn count_created_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM enquiries WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool())
        .await?;
        Ok(to_count(total))
    }

    async fn all_enquiries(&self) -> Result<Vec<Enquiry>> {
        let rows = sqlx::query_as::<_, DbEnquiry>(&format!(
            "SELECT {COLUMNS} FROM enquiries ORDER BY created_at, id"
        ))
        .fetch_all(self.pool())
        .await?;

        convert_all(rows)
    }
}
