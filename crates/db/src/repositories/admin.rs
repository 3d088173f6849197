use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use uuid::Uuid;

use gymdesk_core::models::auth::Admin;

use super::PgStore;
use crate::models::DbAdmin;

/// Admin together with the stored hash, only used for login.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub admin: Admin,
    pub password_hash: String,
}

#[automock]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create_admin(&self, admin: &Admin, password_hash: &str) -> Result<Admin>;

    /// Case-insensitive lookup by email.
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminCredentials>>;

    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>>;
}

#[async_trait]
impl AdminRepository for PgStore {
    async fn create_admin(&self, admin: &Admin, password_hash: &str) -> Result<Admin> {
        tracing::debug!("Creating admin: id={}, email={}", admin.id, admin.email);

        let row = sqlx::query_as::<_, DbAdmin>(
            r#"
            INSERT INTO admins (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(admin.id)
        .bind(&admin.name)
        .bind(admin.email.trim().to_lowercase())
        .bind(password_hash)
        .bind(admin.created_at)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminCredentials>> {
        let row = sqlx::query_as::<_, DbAdmin>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM admins
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email.trim())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|row| AdminCredentials {
            password_hash: row.password_hash.clone(),
            admin: row.into(),
        }))
    }

    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>> {
        let row = sqlx::query_as::<_, DbAdmin>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }
}
