//! Event model

use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::errors::{EventZenError, Result};
use crate::utils::helpers::parse_event_date;

/// Visibility of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    #[default]
    #[serde(alias = "public", alias = "Public")]
    Public,
    #[serde(alias = "private", alias = "Private")]
    Private,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Public => f.pad("PUBLIC"),
            EventType::Private => f.pad("PRIVATE"),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = EventZenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(EventType::Public),
            "PRIVATE" => Ok(EventType::Private),
            other => Err(EventZenError::Validation(format!("Unknown event type: {}", other))),
        }
    }
}

/// Event as served by `GET /events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// `None` when the backend sent no date or one that does not parse
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_code: Option<String>,
    /// `None` when unlimited or when the backend sent something unusable
    #[serde(default, deserialize_with = "deserialize_lenient_capacity")]
    pub max_attendees: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    pub current_attendees: u32,
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Accepts any JSON value; only well-formed date strings survive.
pub(crate) fn deserialize_lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(raw) => parse_event_date(&raw),
        _ => None,
    })
}

fn count_from_value(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(raw) => raw.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Null, negative or non-numeric counts read as 0
fn deserialize_lenient_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(count_from_value(&value).unwrap_or(0))
}

fn deserialize_lenient_capacity<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

impl Event {
    pub fn is_private(&self) -> bool {
        self.event_type == EventType::Private
    }

    /// Capacity reached; advisory only, the backend has the final word
    pub fn is_full(&self) -> bool {
        matches!(self.max_attendees, Some(max) if self.current_attendees >= max)
    }

    pub fn spots_left(&self) -> Option<u32> {
        self.max_attendees.map(|max| max.saturating_sub(self.current_attendees))
    }

    /// `false` when the date is missing or invalid
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        matches!(self.date, Some(date) if date >= now)
    }

    /// `false` when the date is missing or invalid
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        matches!(self.date, Some(date) if date < now)
    }

    /// Display status of the event at `now`
    pub fn status(&self, now: DateTime<Utc>) -> EventStatus {
        if self.is_past(now) {
            EventStatus::Completed
        } else if self.is_full() {
            EventStatus::Full
        } else if self.is_upcoming(now) {
            EventStatus::Upcoming
        } else {
            EventStatus::Unscheduled
        }
    }

    /// Human readable location built from the most specific parts available
    pub fn display_location(&self) -> String {
        [&self.location, &self.city, &self.state]
            .iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Display status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Upcoming,
    Full,
    Completed,
    Unscheduled,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Upcoming => write!(f, "Upcoming"),
            EventStatus::Full => write!(f, "Full"),
            EventStatus::Completed => write!(f, "Completed"),
            EventStatus::Unscheduled => write!(f, "Unscheduled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub date: DateTime<Utc>,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_code: Option<String>,
    pub max_attendees: Option<u32>,
    pub image_url: Option<String>,
}

impl CreateEventRequest {
    /// Client-side checks run before the request is sent
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(EventZenError::Validation("Event title is required".to_string()));
        }

        if self.event_type == EventType::Private
            && self.private_code.as_deref().map_or(true, |code| code.trim().is_empty())
        {
            return Err(EventZenError::Validation(
                "Private events require a private code".to_string(),
            ));
        }

        if self.max_attendees == Some(0) {
            return Err(EventZenError::Validation(
                "Maximum attendees must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateEventRequest {
    pub fn validate(&self) -> Result<()> {
        if matches!(self.title.as_deref(), Some(title) if title.trim().is_empty()) {
            return Err(EventZenError::Validation("Event title cannot be empty".to_string()));
        }

        if matches!(self.private_code.as_deref(), Some(code) if code.trim().is_empty()) {
            return Err(EventZenError::Validation("Private code cannot be empty".to_string()));
        }

        if self.max_attendees == Some(0) {
            return Err(EventZenError::Validation(
                "Maximum attendees must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
