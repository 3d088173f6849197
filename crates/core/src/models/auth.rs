use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::member::Member;

labelled_enum!(
    /// Which client a bearer token was issued to.
    Role {
        Admin => "admin",
        Member => "member",
    }
);

/// Back-office login. The password hash never leaves the persistence layer
/// except for verification at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLoginRequest {
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLoginResponse {
    pub token: String,
    pub member: Member,
}
