use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Gender, keyword_matches};
use crate::errors::{GymError, GymResult};

/// Gym member. Members are never hard-deleted; `is_deleted` hides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub package_id: Option<Uuid>,
    /// Legacy denormalized plan name; `migrate-packages` backfills
    /// `package_id` from it.
    pub package_name: Option<String>,
    pub diet_plan_id: Option<Uuid>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub package_id: Option<Uuid>,
    pub diet_plan_id: Option<Uuid>,
    /// Enables member-app login when set.
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub package_id: Option<Uuid>,
    pub diet_plan_id: Option<Uuid>,
    pub password: Option<String>,
}

/// Self-service profile edit from the member app; plan and diet
/// assignments stay admin-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl UpdateMemberRequest {
    /// Name and mobile may be left out but not blanked.
    pub fn validate(&self) -> GymResult<()> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(GymError::Validation("Name cannot be empty".to_string()));
        }
        if self.mobile.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(GymError::Validation(
                "Mobile number cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<UpdateProfileRequest> for UpdateMemberRequest {
    fn from(profile: UpdateProfileRequest) -> Self {
        UpdateMemberRequest {
            name: profile.name,
            email: profile.email,
            gender: profile.gender,
            address: profile.address,
            date_of_birth: profile.date_of_birth,
            ..Default::default()
        }
    }
}

impl Member {
    /// Applies profile fields. Password changes are handled by the caller
    /// because the hash lives outside this record.
    pub fn apply(&mut self, update: &UpdateMemberRequest, now: DateTime<Utc>) {
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
        if update.address.is_some() {
            self.address = update.address.clone();
        }
        if update.photo_url.is_some() {
            self.photo_url = update.photo_url.clone();
        }
        if update.date_of_birth.is_some() {
            self.date_of_birth = update.date_of_birth;
        }
        if update.package_id.is_some() {
            self.package_id = update.package_id;
        }
        if update.diet_plan_id.is_some() {
            self.diet_plan_id = update.diet_plan_id;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberFilter {
    pub keyword: Option<String>,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        !member.is_deleted
            && self.keyword.as_deref().is_none_or(|k| {
                keyword_matches(
                    k,
                    &[
                        Some(member.name.as_str()),
                        Some(member.mobile.as_str()),
                        member.email.as_deref(),
                    ],
                )
            })
    }
}
