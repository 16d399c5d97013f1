//! Client application state
//!
//! `AppState` is a plain value owned by the caller. Every change goes through
//! [`apply_local_transition`], [`reconcile`] or [`reconcile_registrations`],
//! each of which consumes the old state and returns the new one.

use std::collections::{HashMap, HashSet};
use chrono::{DateTime, Utc};
use crate::models::{Event, FilterCriteria, Registration};
use super::filter::{self, SortOrder};

/// Private code prompt currently shown for an event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrivateCodePrompt {
    /// Backend or validation message to show inside the prompt
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    catalog: Vec<Event>,
    registered: HashSet<i64>,
    /// event id -> registration id, when known
    registrations: HashMap<i64, i64>,
    criteria: FilterCriteria,
    prompts: HashMap<i64, PrivateCodePrompt>,
    in_flight: HashSet<i64>,
    catalog_loading: bool,
    catalog_generation: u64,
    last_error: Option<String>,
    session_expired: bool,
}

/// Local state changes driven by user actions and request results
#[derive(Debug, Clone, PartialEq)]
pub enum LocalTransition {
    /// A registration or cancellation request was sent for the event
    RequestStarted { event_id: i64 },
    /// The request failed; the registered set is left untouched
    RequestFailed { event_id: i64, message: String },
    PrivateCodeRequested { event_id: i64 },
    /// Backend refused the code, or the code was blank; the prompt stays open
    PrivateCodeRejected { event_id: i64, message: String },
    PromptDismissed { event_id: i64 },
    RegistrationConfirmed { event_id: i64, registration_id: Option<i64> },
    RegistrationCancelled { event_id: i64 },
    EventUpserted(Event),
    EventRemoved { event_id: i64 },
    CriteriaChanged(FilterCriteria),
    CriteriaReset,
    /// The backend answered 401; everything tied to the session is dropped
    SessionExpired { message: String },
    /// A failure not tied to a single event, such as a failed list fetch
    ErrorReported { message: String },
    MessageDismissed,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with an already fetched catalog
    pub fn with_catalog(catalog: Vec<Event>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &[Event] {
        &self.catalog
    }

    pub fn event(&self, event_id: i64) -> Option<&Event> {
        self.catalog.iter().find(|event| event.id == event_id)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn registered_event_ids(&self) -> &HashSet<i64> {
        &self.registered
    }

    pub fn is_registered(&self, event_id: i64) -> bool {
        self.registered.contains(&event_id)
    }

    pub fn registration_id(&self, event_id: i64) -> Option<i64> {
        self.registrations.get(&event_id).copied()
    }

    pub fn prompt(&self, event_id: i64) -> Option<&PrivateCodePrompt> {
        self.prompts.get(&event_id)
    }

    /// The action button for this event should be disabled
    pub fn is_in_flight(&self, event_id: i64) -> bool {
        self.in_flight.contains(&event_id)
    }

    pub fn is_catalog_loading(&self) -> bool {
        self.catalog_loading
    }

    pub fn catalog_generation(&self) -> u64 {
        self.catalog_generation
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    /// Catalog filtered by the current criteria, in catalog order
    pub fn visible_events(&self, now: DateTime<Utc>) -> Vec<&Event> {
        filter::filter_events(&self.catalog, &self.criteria, now)
    }

    /// Catalog filtered by the current criteria and sorted by date
    pub fn visible_events_sorted(&self, now: DateTime<Utc>, order: SortOrder) -> Vec<&Event> {
        let mut events = self.visible_events(now);
        filter::sort_by_date(&mut events, order);
        events
    }

    pub fn my_events(&self) -> Vec<&Event> {
        filter::my_events(&self.catalog, &self.registered)
    }

    pub fn past_registered_events(&self, now: DateTime<Utc>) -> Vec<&Event> {
        filter::past_registered_events(&self.catalog, &self.registered, now)
    }

    /// Mark a catalog fetch as started; the returned generation identifies its response
    pub fn begin_catalog_load(mut self) -> (Self, u64) {
        self.catalog_generation += 1;
        self.catalog_loading = true;
        let generation = self.catalog_generation;
        (self, generation)
    }

    /// Apply a catalog fetch result. Responses for a superseded generation are ignored.
    pub fn finish_catalog_load(
        mut self,
        generation: u64,
        result: std::result::Result<Vec<Event>, String>,
    ) -> (Self, bool) {
        if generation != self.catalog_generation {
            return (self, false);
        }

        self.catalog_loading = false;
        match result {
            Ok(catalog) => (reconcile(self, catalog), true),
            Err(message) => {
                self.last_error = Some(message);
                (self, true)
            }
        }
    }
}

/// Apply one local transition
pub fn apply_local_transition(mut state: AppState, transition: LocalTransition) -> AppState {
    match transition {
        LocalTransition::RequestStarted { event_id } => {
            state.in_flight.insert(event_id);
            state.last_error = None;
        }
        LocalTransition::RequestFailed { event_id, message } => {
            state.in_flight.remove(&event_id);
            state.last_error = Some(message);
        }
        LocalTransition::PrivateCodeRequested { event_id } => {
            state.prompts.insert(event_id, PrivateCodePrompt::default());
        }
        LocalTransition::PrivateCodeRejected { event_id, message } => {
            state.in_flight.remove(&event_id);
            state.prompts.insert(event_id, PrivateCodePrompt { error: Some(message) });
        }
        LocalTransition::PromptDismissed { event_id } => {
            state.prompts.remove(&event_id);
        }
        LocalTransition::RegistrationConfirmed { event_id, registration_id } => {
            state.in_flight.remove(&event_id);
            state.prompts.remove(&event_id);
            state.registered.insert(event_id);
            if let Some(registration_id) = registration_id {
                state.registrations.insert(event_id, registration_id);
            }
            state.last_error = None;
        }
        LocalTransition::RegistrationCancelled { event_id } => {
            state.in_flight.remove(&event_id);
            state.registered.remove(&event_id);
            state.registrations.remove(&event_id);
            state.last_error = None;
        }
        LocalTransition::EventUpserted(event) => {
            match state.catalog.iter_mut().find(|existing| existing.id == event.id) {
                Some(existing) => *existing = event,
                None => state.catalog.push(event),
            }
        }
        LocalTransition::EventRemoved { event_id } => {
            state.catalog.retain(|event| event.id != event_id);
            state.prompts.remove(&event_id);
        }
        LocalTransition::CriteriaChanged(criteria) => {
            state.criteria = criteria;
        }
        LocalTransition::CriteriaReset => {
            state.criteria.reset();
        }
        LocalTransition::SessionExpired { message } => {
            state.session_expired = true;
            state.last_error = Some(message);
            state.registered.clear();
            state.registrations.clear();
            state.prompts.clear();
            state.in_flight.clear();
        }
        LocalTransition::ErrorReported { message } => {
            state.last_error = Some(message);
        }
        LocalTransition::MessageDismissed => {
            state.last_error = None;
        }
    }
    state
}

/// Swap in a freshly fetched catalog, keeping registrations, prompts and criteria
pub fn reconcile(mut state: AppState, fresh_catalog: Vec<Event>) -> AppState {
    let ids: HashSet<i64> = fresh_catalog.iter().map(|event| event.id).collect();
    state.prompts.retain(|event_id, _| ids.contains(event_id));
    state.catalog = fresh_catalog;
    state
}

/// Rebuild the registered set from the visitor's registrations; cancelled ones are ignored
pub fn reconcile_registrations(mut state: AppState, registrations: &[Registration]) -> AppState {
    state.registered.clear();
    state.registrations.clear();
    for registration in registrations.iter().filter(|r| r.is_active()) {
        state.registered.insert(registration.event_id);
        state.registrations.insert(registration.event_id, registration.id);
    }
    state.session_expired = false;
    state
}
