use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline numbers on the admin dashboard, all for the gym-local `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub total_members: u64,
    pub active_subscriptions: u64,
    pub enquiries_today: u64,
    pub pending_follow_ups_today: u64,
    pub member_check_ins_today: u64,
    pub employees_present_today: u64,
}
