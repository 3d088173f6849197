use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use mockall::automock;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use gymdesk_core::models::{
    member::{Member, MemberFilter},
    pagination::PageQuery,
};

use super::{PgStore, push_keyword, to_count};
use crate::models::{DbMember, convert_all};

const COLUMNS: &str = "id, name, mobile, email, gender, address, photo_url, date_of_birth, \
                       package_id, package_name, diet_plan_id, password_hash, is_deleted, \
                       created_at, updated_at";

/// Member together with the stored hash; `None` means app login is disabled.
#[derive(Debug, Clone)]
pub struct MemberCredentials {
    pub member: Member,
    pub password_hash: Option<String>,
}

/// Soft-deleted members are invisible to every method except
/// `list_members_without_package`, which the maintenance tools use.
#[automock]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create_member(&self, member: &Member, password_hash: Option<String>) -> Result<Member>;

    async fn get_member(&self, id: Uuid) -> Result<Option<Member>>;

    /// Every member registered on the mobile number, oldest first. Family
    /// members may share a phone.
    async fn find_member_credentials(&self, mobile: &str) -> Result<Vec<MemberCredentials>>;

    /// Newest first.
    async fn list_members(&self, filter: &MemberFilter, page: PageQuery)
    -> Result<(Vec<Member>, u64)>;

    async fn update_member(&self, member: &Member) -> Result<Option<Member>>;

    async fn set_member_password(&self, id: Uuid, password_hash: String) -> Result<bool>;

    async fn delete_member(&self, id: Uuid) -> Result<bool>;

    async fn count_members(&self) -> Result<u64>;

    /// Members carrying a legacy `package_name` but no `package_id`.
    async fn list_members_without_package(&self) -> Result<Vec<Member>>;

    async fn set_member_package(&self, id: Uuid, package_id: Uuid) -> Result<bool>;
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MemberFilter) {
    builder.push(" WHERE NOT is_deleted");
    if let Some(keyword) = &filter.keyword {
        push_keyword(builder, keyword, &["name", "mobile", "email"]);
    }
}

#[async_trait]
impl MemberRepository for PgStore {
    async fn create_member(&self, member: &Member, password_hash: Option<String>) -> Result<Member> {
        tracing::debug!(
            "Creating member: id={}, has_password={}",
            member.id,
            password_hash.is_some()
        );

        let row = sqlx::query_as::<_, DbMember>(&format!(
            r#"
            INSERT INTO members ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(member.id)
        .bind(&member.name)
        .bind(&member.mobile)
        .bind(&member.email)
        .bind(member.gender.map(|g| g.as_str()))
        .bind(&member.address)
        .bind(&member.photo_url)
        .bind(member.date_of_birth)
        .bind(member.package_id)
        .bind(&member.package_name)
        .bind(member.diet_plan_id)
        .bind(password_hash)
        .bind(member.is_deleted)
        .bind(member.created_at)
        .bind(member.updated_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn get_member(&self, id: Uuid) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, DbMember>(&format!(
            "SELECT {COLUMNS} FROM members WHERE id = $1 AND NOT is_deleted"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_member_credentials(&self, mobile: &str) -> Result<Vec<MemberCredentials>> {
        let rows = sqlx::query_as::<_, DbMember>(&format!(
            r#"
            SELECT {COLUMNS} FROM members
            WHERE mobile = $1 AND NOT is_deleted
            ORDER BY created_at
            "#
        ))
        .bind(mobile.trim())
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                let password_hash = row.password_hash.clone();
                Member::try_from(row).map(|member| MemberCredentials {
                    member,
                    password_hash,
                })
            })
            .collect()
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: PageQuery,
    ) -> Result<(Vec<Member>, u64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM members");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(self.pool()).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM members"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let rows = select
            .build_query_as::<DbMember>()
            .fetch_all(self.pool())
            .await?;

        Ok((convert_all(rows)?, to_count(total)))
    }

    async fn update_member(&self, member: &Member) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, DbMember>(&format!(
            r#"
            UPDATE members
            SET name = $2, mobile = $3, email = $4, gender = $5, address = $6, photo_url = $7,
                date_of_birth = $8, package_id = $9, package_name = $10, diet_plan_id = $11,
                updated_at = $12
            WHERE id = $1 AND NOT is_deleted
            RETURNING {COLUMNS}
            "#
        ))
        .bind(member.id)
        .bind(&member.name)
        .bind(&member.mobile)
        .bind(&member.email)
        .bind(member.gender.map(|g| g.as_str()))
        .bind(&member.address)
        .bind(&member.photo_url)
        .bind(member.date_of_birth)
        .bind(member.package_id)
        .bind(&member.package_name)
        .bind(member.diet_plan_id)
        .bind(member.updated_at)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn set_member_password(&self, id: Uuid, password_hash: String) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE members SET password_hash = $2, updated_at = $3 WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE members SET is_deleted = TRUE, updated_at = $2 WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_members(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE NOT is_deleted")
            .fetch_one(self.pool())
            .await?;
        Ok(to_count(total))
    }

    async fn list_members_without_package(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, DbMember>(&format!(
            r#"
            SELECT {COLUMNS} FROM members
            WHERE package_id IS NULL AND package_name IS NOT NULL AND package_name <> ''
            ORDER BY created_at, id
            "#
        ))
        .fetch_all(self.pool())
        .await?;

        convert_all(rows)
    }

    async fn set_member_package(&self, id: Uuid, package_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE members SET package_id = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(package_id)
                .bind(Utc::now())
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
