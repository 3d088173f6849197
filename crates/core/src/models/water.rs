use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GymError, GymResult};

pub const DAILY_WATER_GOAL_ML: u32 = 3000;
pub const MAX_WATER_ENTRY_ML: u32 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterEntry {
    pub id: Uuid,
    pub member_id: Uuid,
    pub amount_ml: u32,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWaterRequest {
    pub amount_ml: u32,
}

impl AddWaterRequest {
    pub fn validate(&self) -> GymResult<()> {
        if self.amount_ml == 0 || self.amount_ml > MAX_WATER_ENTRY_ML {
            return Err(GymError::Validation(format!(
                "Amount must be between 1 and {} ml",
                MAX_WATER_ENTRY_ML
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterIntakeSummary {
    pub date: NaiveDate,
    pub total_ml: u32,
    pub goal_ml: u32,
    pub entries: Vec<WaterEntry>,
}

impl WaterIntakeSummary {
    pub fn new(date: NaiveDate, entries: Vec<WaterEntry>) -> Self {
        Self {
            date,
            total_ml: entries.iter().map(|e| e.amount_ml).sum(),
            goal_ml: DAILY_WATER_GOAL_ML,
            entries,
        }
    }
}
