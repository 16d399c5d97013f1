//! Registration model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use super::event::deserialize_lenient_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrationStatus {
    #[serde(alias = "active", alias = "Active", alias = "REGISTERED", alias = "registered")]
    Active,
    #[serde(alias = "cancelled", alias = "Cancelled", alias = "CANCELED", alias = "canceled")]
    Cancelled,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Active => write!(f, "ACTIVE"),
            RegistrationStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub visitor_id: i64,
    pub status: RegistrationStatus,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Registration {
    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Active
    }
}

/// Body of `POST /events/:id/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub visitor_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_code: Option<String>,
}

/// Body of the legacy `POST /registrations`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRegistrationRequest {
    pub event_id: i64,
    pub visitor_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_code: Option<String>,
}
