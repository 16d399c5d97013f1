//! Filter criteria model

use serde::{Deserialize, Serialize};
use crate::utils::errors::{EventZenError, Result};
use super::event::EventType;

/// Date-based status constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatusFilter {
    #[serde(alias = "upcoming")]
    Upcoming,
    #[serde(alias = "completed", alias = "past", alias = "Past")]
    Completed,
}

impl std::str::FromStr for EventStatusFilter {
    type Err = EventZenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(EventStatusFilter::Upcoming),
            "completed" | "past" => Ok(EventStatusFilter::Completed),
            other => Err(EventZenError::Validation(format!("Unknown status filter: {}", other))),
        }
    }
}

/// Active filter constraints; empty strings and `None` mean "no constraint"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub category: String,
    pub location: String,
    pub organizer: String,
    pub event_type: Option<EventType>,
    pub status: Option<EventStatusFilter>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = organizer.into();
        self
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn with_status(mut self, status: EventStatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    /// No constraint is active
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty()
            && self.category.is_empty()
            && self.location.is_empty()
            && self.organizer.is_empty()
            && self.event_type.is_none()
            && self.status.is_none()
    }

    /// Clear every constraint
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
