use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Gender, keyword_matches};
use crate::errors::{GymError, GymResult};

labelled_enum!(
    EmployeeType {
        FullTime => "Full Time",
        PartTime => "Part Time",
    }
);

impl Default for EmployeeType {
    fn default() -> Self {
        EmployeeType::FullTime
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    /// Free text such as "Trainer" or "Receptionist"; matched
    /// case-insensitively by the role lookup.
    pub role: String,
    pub employee_type: EmployeeType,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub role: String,
    #[serde(default)]
    pub employee_type: EmployeeType,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub joining_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub role: Option<String>,
    pub employee_type: Option<EmployeeType>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl UpdateEmployeeRequest {
    pub fn validate(&self) -> GymResult<()> {
        let blank = |field: &Option<String>| field.as_deref().is_some_and(|v| v.trim().is_empty());
        if blank(&self.name) || blank(&self.mobile) || blank(&self.role) {
            return Err(GymError::Validation(
                "Name, mobile number and role cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Employee {
    pub fn apply(&mut self, update: &UpdateEmployeeRequest, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(mobile) = &update.mobile {
            self.mobile = mobile.trim().to_string();
        }
        if update.email.is_some() {
            self.email = update.email.clone();
        }
        if update.gender.is_some() {
            self.gender = update.gender;
        }
        if let Some(role) = &update.role {
            self.role = role.trim().to_string();
        }
        if let Some(employee_type) = update.employee_type {
            self.employee_type = employee_type;
        }
        if update.address.is_some() {
            self.address = update.address.clone();
        }
        if update.photo_url.is_some() {
            self.photo_url = update.photo_url.clone();
        }
        if update.joining_date.is_some() {
            self.joining_date = update.joining_date;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListQuery {
    pub keyword: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    pub role: Option<String>,
    pub keyword: Option<String>,
    pub include_inactive: bool,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        (self.include_inactive || employee.is_active)
            && self
                .role
                .as_deref()
                .is_none_or(|r| employee.role.eq_ignore_ascii_case(r))
            && self.keyword.as_deref().is_none_or(|k| {
                keyword_matches(
                    k,
                    &[
                        Some(employee.name.as_str()),
                        Some(employee.mobile.as_str()),
                        employee.email.as_deref(),
                    ],
                )
            })
    }
}
