use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-deployment gym settings. `gym_code` is the secret printed into the
/// attendance QR code; rotating it invalidates every printed copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GymDetails {
    pub id: Uuid,
    pub name: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub gym_code: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGymDetailsRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl GymDetails {
    pub fn apply(&mut self, update: &UpdateGymDetailsRequest, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if update.mobile.is_some() {
            self.mobile = update.mobile.clone();
        }
        if update.email.is_some() {
            self.email = update.email.clone();
        }
        if update.address.is_some() {
            self.address = update.address.clone();
        }
        self.updated_at = now;
    }
}

/// What the dashboard renders into the printable QR code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    /// QR payload; members' scans must echo it back as `gymId`.
    pub gym_id: String,
    pub gym_name: String,
    pub logo_url: Option<String>,
}

impl From<&GymDetails> for QrCodeResponse {
    fn from(gym: &GymDetails) -> Self {
        Self {
            gym_id: gym.gym_code.clone(),
            gym_name: gym.name.clone(),
            logo_url: gym.logo_url.clone(),
        }
    }
}
