use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GymError, GymResult};

/// Membership plan definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Uuid,
    pub name: String,
    pub duration_months: u32,
    pub price: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    pub name: String,
    pub duration_months: u32,
    pub price: f64,
    pub description: Option<String>,
}

impl CreatePackageRequest {
    pub fn validate(&self) -> GymResult<()> {
        if self.name.trim().is_empty() {
            return Err(GymError::Validation("Package name is required".to_string()));
        }
        if self.duration_months == 0 {
            return Err(GymError::Validation(
                "Package duration must be at least one month".to_string(),
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(GymError::Validation("Package price must be zero or more".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub duration_months: Option<u32>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl Package {
    pub fn apply(&mut self, update: &UpdatePackageRequest) -> GymResult<()> {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(months) = update.duration_months {
            self.duration_months = months;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if update.description.is_some() {
            self.description = update.description.clone();
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        CreatePackageRequest {
            name: self.name.clone(),
            duration_months: self.duration_months,
            price: self.price,
            description: None,
        }
        .validate()
    }
}

/// A member's enrollment in a package for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub member_id: Uuid,
    pub package_id: Option<Uuid>,
    pub package_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount_paid: f64,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub package_id: Uuid,
    /// Defaults to today in the gym's timezone.
    pub start_date: Option<NaiveDate>,
    /// Defaults to the package price.
    pub amount_paid: Option<f64>,
}

/// Last day (inclusive) of a subscription starting on `start`: one day
/// before the same calendar day `months` later.
pub fn subscription_end_date(start: NaiveDate, months: u32) -> GymResult<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .ok_or_else(|| GymError::Validation("Subscription end date is out of range".to_string()))
}
