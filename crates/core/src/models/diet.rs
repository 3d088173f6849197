use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GymError, GymResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Display time such as "07:30 AM".
    pub time: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
    pub calories: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub meals: Vec<Meal>,
    pub created_at: DateTime<Utc>,
}

impl DietPlan {
    pub fn total_calories(&self) -> u32 {
        self.meals.iter().filter_map(|m| m.calories).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDietPlanRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub meals: Vec<Meal>,
}

impl CreateDietPlanRequest {
    pub fn validate(&self) -> GymResult<()> {
        if self.name.trim().is_empty() {
            return Err(GymError::Validation("Diet plan name is required".to_string()));
        }
        if self.meals.iter().any(|m| m.name.trim().is_empty()) {
            return Err(GymError::Validation("Every meal needs a name".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanResponse {
    #[serde(flatten)]
    pub plan: DietPlan,
    pub total_calories: u32,
}

impl From<DietPlan> for DietPlanResponse {
    fn from(plan: DietPlan) -> Self {
        let total_calories = plan.total_calories();
        Self {
            plan,
            total_calories,
        }
    }
}
