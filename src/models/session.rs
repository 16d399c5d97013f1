//! Session model
//!
//! The session is an explicit value owned by the caller; persisting it (browser
//! storage, keyring, config file) is the caller's business.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[serde(alias = "visitor", alias = "Visitor")]
    Visitor,
    #[serde(alias = "organizer", alias = "Organizer")]
    Organizer,
    #[serde(alias = "admin", alias = "Admin")]
    Admin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub visitor_id: Option<i64>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl Session {
    pub fn new(token: impl Into<String>, visitor_id: i64, role: Role) -> Self {
        Self {
            token: Some(token.into()),
            visitor_id: Some(visitor_id),
            role: Some(role),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Bearer token, if one is present and non-blank
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.trim().is_empty())
    }

    /// Whether the session can be used for authenticated requests at `now`.
    ///
    /// JWT tokens are checked against their `exp` claim; the signature is the
    /// backend's concern. Opaque tokens are accepted as long as they are non-blank.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        let Some(token) = self.bearer_token() else {
            return false;
        };

        match token_expiry(token) {
            Some(exp) => exp > now.timestamp(),
            None => true,
        }
    }

    /// Drop everything; used when the backend answers 401
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn token_expiry(token: &str) -> Option<i64> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .and_then(|data| data.claims.exp)
}
