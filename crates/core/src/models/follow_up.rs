use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enquiry::LeadType;
use super::keyword_matches;
use crate::errors::{GymError, GymResult};

labelled_enum!(
    FollowUpType {
        BalanceDue => "Balance Due",
        MembershipRenewal => "Membership Renewal",
        Birthday => "Birthday",
        Enquiry => "Enquiry",
        Feedback => "Feedback",
        Other => "Other",
    }
);

labelled_enum!(
    /// List filter over completion. `Overdue` is pending with a due time in
    /// the past.
    FollowUpStatus {
        Pending => "pending",
        Done => "done",
        Overdue => "overdue",
    }
);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: Uuid,
    pub enquiry_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub name: String,
    pub mobile: String,
    pub follow_up_type: FollowUpType,
    pub convertibility: Option<LeadType>,
    pub due_at: DateTime<Utc>,
    pub comment: Option<String>,
    pub response: Option<String>,
    pub is_done: bool,
    pub done_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFollowUpRequest {
    pub enquiry_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub follow_up_type: FollowUpType,
    pub convertibility: Option<LeadType>,
    pub due_at: DateTime<Utc>,
    pub comment: Option<String>,
    pub is_done: Option<bool>,
}

/// Body of `POST /enquiries/:id/follow-ups`; contact details come from the
/// enquiry itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryFollowUpRequest {
    pub follow_up_type: Option<FollowUpType>,
    pub due_at: DateTime<Utc>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFollowUpRequest {
    pub follow_up_type: Option<FollowUpType>,
    pub convertibility: Option<LeadType>,
    pub due_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub response: Option<String>,
    pub is_done: Option<bool>,
}

impl FollowUp {
    /// Builds a new pending-by-default follow-up; `name` and `mobile` must
    /// already be resolved by the caller.
    pub fn new(
        request: &CreateFollowUpRequest,
        name: String,
        mobile: String,
        now: DateTime<Utc>,
    ) -> Self {
        let is_done = request.is_done.unwrap_or(false);
        Self {
            id: Uuid::new_v4(),
            enquiry_id: request.enquiry_id,
            member_id: request.member_id,
            name,
            mobile,
            follow_up_type: request.follow_up_type,
            convertibility: request.convertibility,
            due_at: request.due_at,
            comment: request.comment.clone(),
            response: None,
            is_done,
            done_at: is_done.then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: &UpdateFollowUpRequest, now: DateTime<Utc>) {
        if let Some(kind) = update.follow_up_type {
            self.follow_up_type = kind;
        }
        if update.convertibility.is_some() {
            self.convertibility = update.convertibility;
        }
        if let Some(due_at) = update.due_at {
            self.due_at = due_at;
        }
        if update.comment.is_some() {
            self.comment = update.comment.clone();
        }
        if update.response.is_some() {
            self.response = update.response.clone();
        }
        if let Some(is_done) = update.is_done {
            self.set_done(is_done, now);
        }
        self.updated_at = now;
    }

    /// Marking an already-done follow-up again keeps the original `done_at`.
    pub fn set_done(&mut self, is_done: bool, now: DateTime<Utc>) {
        if is_done && !self.is_done {
            self.done_at = Some(now);
        }
        if !is_done {
            self.done_at = None;
        }
        self.is_done = is_done;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub follow_up_type: Option<String>,
    pub convertibility: Option<String>,
    pub keyword: Option<String>,
    pub date_filter: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpFilter {
    pub status: Option<FollowUpStatus>,
    pub follow_up_type: Option<FollowUpType>,
    pub convertibility: Option<LeadType>,
    pub keyword: Option<String>,
    /// Half-open `[start, end)` window over `due_at`.
    pub due_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Reference time for the `overdue` status.
    pub now: DateTime<Utc>,
}

impl FollowUpFilter {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            status: None,
            follow_up_type: None,
            convertibility: None,
            keyword: None,
            due_between: None,
            now,
        }
    }

    pub fn matches(&self, follow_up: &FollowUp) -> bool {
        let status_ok = match self.status {
            None => true,
            Some(FollowUpStatus::Pending) => !follow_up.is_done,
            Some(FollowUpStatus::Done) => follow_up.is_done,
            Some(FollowUpStatus::Overdue) => !follow_up.is_done && follow_up.due_at < self.now,
        };
        status_ok
            && self
                .follow_up_type
                .is_none_or(|t| follow_up.follow_up_type == t)
            && self
                .convertibility
                .is_none_or(|c| follow_up.convertibility == Some(c))
            && self
                .due_between
                .is_none_or(|(start, end)| follow_up.due_at >= start && follow_up.due_at < end)
            && self.keyword.as_deref().is_none_or(|k| {
                keyword_matches(
                    k,
                    &[
                        Some(follow_up.name.as_str()),
                        Some(follow_up.mobile.as_str()),
                        follow_up.comment.as_deref(),
                    ],
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

impl BulkDeleteRequest {
    pub const MAX_IDS: usize = 500;

    pub fn validate(&self) -> GymResult<()> {
        if self.ids.is_empty() {
            return Err(GymError::Validation("No follow-ups selected".to_string()));
        }
        if self.ids.len() > Self::MAX_IDS {
            return Err(GymError::Validation(format!(
                "At most {} follow-ups can be deleted at once",
                Self::MAX_IDS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteFailure {
    pub id: Uuid,
    pub reason: String,
}

/// Partial-result outcome: every id is attempted on its own and nothing is
/// rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub deleted_count: usize,
    pub deleted: Vec<Uuid>,
    pub failed: Vec<BulkDeleteFailure>,
}

impl BulkDeleteResponse {
    pub fn record_deleted(&mut self, id: Uuid) {
        self.deleted.push(id);
        self.deleted_count = self.deleted.len();
    }

    pub fn record_failed(&mut self, id: Uuid, reason: impl Into<String>) {
        self.failed.push(BulkDeleteFailure {
            id,
            reason: reason.into(),
        });
    }
}
