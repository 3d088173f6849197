use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use uuid::Uuid;

use gymdesk_core::models::package::Package;

use super::PgStore;
use crate::models::{DbPackage, convert_all, to_i32};

const COLUMNS: &str = "id, name, duration_months, price, description, is_active, created_at";

#[automock]
#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create_package(&self, package: &Package) -> Result<Package>;

    async fn get_package(&self, id: Uuid) -> Result<Option<Package>>;

    /// Creation order, which is also the tie-break order for name matching.
    async fn list_packages(&self, include_inactive: bool) -> Result<Vec<Package>>;

    async fn update_package(&self, package: &Package) -> Result<Option<Package>>;
}

#[async_trait]
impl PackageRepository for PgStore {
    async fn create_package(&self, package: &Package) -> Result<Package> {
        tracing::debug!("Creating package: id={}, name={}", package.id, package.name);

        let row = sqlx::query_as::<_, DbPackage>(&format!(
            r#"
            INSERT INTO packages ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(package.id)
        .bind(&package.name)
        .bind(to_i32(package.duration_months, "packages.duration_months")?)
        .bind(package.price)
        .bind(&package.description)
        .bind(package.is_active)
        .bind(package.created_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn get_package(&self, id: Uuid) -> Result<Option<Package>> {
        let row = sqlx::query_as::<_, DbPackage>(&format!(
            "SELECT {COLUMNS} FROM packages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_packages(&self, include_inactive: bool) -> Result<Vec<Package>> {
        let rows = sqlx::query_as::<_, DbPackage>(&format!(
            r#"
            SELECT {COLUMNS} FROM packages
            WHERE is_active OR $1
            ORDER BY created_at, id
            "#
        ))
        .bind(include_inactive)
        .fetch_all(self.pool())
        .await?;

        convert_all(rows)
    }

    async fn update_package(&self, package: &Package) -> Result<Option<Package>> {
        let row = sqlx::query_as::<_, DbPackage>(&format!(
            r#"
            UPDATE packages
            SET name = $2, duration_months = $3, price = $4, description = $5, is_active = $6
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(package.id)
        .bind(&package.name)
        .bind(to_i32(package.duration_months, "packages.duration_months")?)
        .bind(package.price)
        .bind(&package.description)
        .bind(package.is_active)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
