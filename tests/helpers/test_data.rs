//! Test data helpers for creating test objects
//!
//! This module provides helper functions for creating events, sessions and
//! settings pointed at a mock backend.

use chrono::{Duration, Utc};
use serde_json::{json, Value};

use eventzen::config::{RegistrationContract, Settings};
use eventzen::models::{Event, Role, Session};

pub const TEST_VISITOR_ID: i64 = 42;
pub const TEST_TOKEN: &str = "visitor-token";

/// Visitor session with an opaque token
pub fn test_session() -> Session {
    Session::new(TEST_TOKEN, TEST_VISITOR_ID, Role::Visitor)
}

/// Settings aimed at `base_url`
pub fn test_settings(base_url: &str, contract: RegistrationContract, reconcile: bool) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = base_url.to_string();
    settings.api.timeout_seconds = 5;
    settings.api.registration_contract = contract;
    settings.features.reconcile_after_mutation = reconcile;
    settings
}

/// ISO date `days` from now
pub fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

/// JSON for a public event thirty days out
pub fn public_event_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "An evening of social dancing",
        "category": "Dance",
        "location": "Ballroom",
        "city": "Berlin",
        "state": "Berlin",
        "date": days_from_now(30),
        "eventType": "PUBLIC",
        "maxAttendees": 50,
        "currentAttendees": 10,
        "organizerName": "Swing Society",
        "isActive": true
    })
}

/// JSON for a private event thirty days out
pub fn private_event_json(id: i64, title: &str) -> Value {
    let mut event = public_event_json(id, title);
    event["eventType"] = json!("PRIVATE");
    event
}

/// JSON for an event at capacity
pub fn full_event_json(id: i64, title: &str) -> Value {
    let mut event = public_event_json(id, title);
    event["maxAttendees"] = json!(100);
    event["currentAttendees"] = json!(100);
    event
}

pub fn registration_json(id: i64, event_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "eventId": event_id,
        "visitorId": TEST_VISITOR_ID,
        "status": status,
        "createdAt": "2025-08-01T10:00:00Z"
    })
}

pub fn event_from_json(value: Value) -> Event {
    serde_json::from_value(value).expect("valid test event")
}
