use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Gender, keyword_matches};

labelled_enum!(
    /// Sales temperature of a lead. Follow-ups reuse it as their
    /// "convertibility" rating.
    LeadType {
        Hot => "Hot",
        Warm => "Warm",
        Cold => "Cold",
    }
);

labelled_enum!(
    EnquiryStatus {
        Open => "Open",
        Closed => "Closed",
        NotInterested => "Not Interested",
        CallDone => "Call Done",
        CallNotConnected => "Call Not Connected",
    }
);

impl Default for LeadType {
    fn default() -> Self {
        LeadType::Warm
    }
}

impl Default for EnquiryStatus {
    fn default() -> Self {
        EnquiryStatus::Open
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub source: Option<String>,
    pub interested_in: Option<String>,
    pub lead_type: LeadType,
    pub status: EnquiryStatus,
    pub assigned_to: Option<Uuid>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnquiryRequest {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub source: Option<String>,
    pub interested_in: Option<String>,
    #[serde(default)]
    pub lead_type: LeadType,
    #[serde(default)]
    pub status: EnquiryStatus,
    pub assigned_to: Option<Uuid>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnquiryRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub source: Option<String>,
    pub interested_in: Option<String>,
    pub lead_type: Option<LeadType>,
    pub status: Option<EnquiryStatus>,
    pub assigned_to: Option<Uuid>,
    pub comment: Option<String>,
}

impl Enquiry {
    /// Applies the fields present in `update`; absent fields keep their value.
    pub fn apply(&mut self, update: &UpdateEnquiryRequest, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(mobile) = &update.mobile {
            self.mobile = mobile.clone();
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
        if update.source.is_some() {
            self.source = update.source.clone();
        }
        if update.interested_in.is_some() {
            self.interested_in = update.interested_in.clone();
        }
        if let Some(lead_type) = update.lead_type {
            self.lead_type = lead_type;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.assigned_to.is_some() {
            self.assigned_to = update.assigned_to;
        }
        if update.comment.is_some() {
            self.comment = update.comment.clone();
        }
        self.updated_at = now;
    }
}

/// Raw query string of the enquiry list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub lead_type: Option<String>,
    pub gender: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnquiryFilter {
    pub status: Option<EnquiryStatus>,
    pub lead_type: Option<LeadType>,
    pub gender: Option<Gender>,
    /// Lowercased; matched against name, mobile and email.
    pub keyword: Option<String>,
}

impl EnquiryFilter {
    pub fn from_query(query: &EnquiryListQuery) -> crate::errors::GymResult<Self> {
        Ok(Self {
            status: super::parse_optional(query.status.as_deref())?,
            lead_type: super::parse_optional(query.lead_type.as_deref())?,
            gender: super::parse_optional(query.gender.as_deref())?,
            keyword: super::normalize_keyword(query.keyword.as_deref()),
        })
    }

    pub fn matches(&self, enquiry: &Enquiry) -> bool {
        self.status.is_none_or(|s| enquiry.status == s)
            && self.lead_type.is_none_or(|l| enquiry.lead_type == l)
            && self.gender.is_none_or(|g| enquiry.gender == Some(g))
            && self.keyword.as_deref().is_none_or(|k| {
                keyword_matches(
                    k,
                    &[
                        Some(enquiry.name.as_str()),
                        Some(enquiry.mobile.as_str()),
                        enquiry.email.as_deref(),
                    ],
                )
            })
    }
}

/// Counts per status. `total` is the sum of the buckets so both come from
/// the same snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryStats {
    pub total: u64,
    pub open: u64,
    pub closed: u64,
    pub not_interested: u64,
    pub call_done: u64,
    pub call_not_connected: u64,
}

impl EnquiryStats {
    pub fn from_counts(counts: &[(EnquiryStatus, u64)]) -> Self {
        let mut stats = EnquiryStats::default();
        for (status, count) in counts {
            let slot = match status {
                EnquiryStatus::Open => &mut stats.open,
                EnquiryStatus::Closed => &mut stats.closed,
                EnquiryStatus::NotInterested => &mut stats.not_interested,
                EnquiryStatus::CallDone => &mut stats.call_done,
                EnquiryStatus::CallNotConnected => &mut stats.call_not_connected,
            };
            *slot += count;
        }
        stats.total = stats.status_sum();
        stats
    }

    pub fn status_sum(&self) -> u64 {
        self.open + self.closed + self.not_interested + self.call_done + self.call_not_connected
    }
}
