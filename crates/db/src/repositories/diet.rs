use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use sqlx::types::Json;
use uuid::Uuid;

use gymdesk_core::models::diet::DietPlan;

use super::PgStore;
use crate::models::DbDietPlan;

const COLUMNS: &str = "id, name, description, meals, created_at";

#[automock]
#[async_trait]
pub trait DietPlanRepository: Send + Sync {
    async fn create_diet_plan(&self, plan: &DietPlan) -> Result<DietPlan>;

    async fn get_diet_plan(&self, id: Uuid) -> Result<Option<DietPlan>>;

    async fn list_diet_plans(&self) -> Result<Vec<DietPlan>>;
}

#[async_trait]
impl DietPlanRepository for PgStore {
    async fn create_diet_plan(&self, plan: &DietPlan) -> Result<DietPlan> {
        tracing::debug!("Creating diet plan: id={}, meals={}", plan.id, plan.meals.len());

        let row = sqlx::query_as::<_, DbDietPlan>(&format!(
            r#"
            INSERT INTO diet_plans ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(plan.id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(Json(&plan.meals))
        .bind(plan.created_at)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn get_diet_plan(&self, id: Uuid) -> Result<Option<DietPlan>> {
        let row = sqlx::query_as::<_, DbDietPlan>(&format!(
            "SELECT {COLUMNS} FROM diet_plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_diet_plans(&self) -> Result<Vec<DietPlan>> {
        let rows = sqlx::query_as::<_, DbDietPlan>(&format!(
            "SELECT {COLUMNS} FROM diet_plans ORDER BY created_at DESC, id"
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
