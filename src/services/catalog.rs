//! Catalog service
//!
//! Loads the event catalog and the visitor's registrations into `AppState`,
//! and runs organizer event management against the backend.

use chrono::Utc;
use tracing::{info, warn};
use crate::models::{CreateEventRequest, Event, Session, UpdateEventRequest};
use crate::state::{apply_local_transition, reconcile_registrations, AppState, LocalTransition};
use crate::utils::errors::{EventZenError, Result};
use crate::utils::logging::log_catalog_refresh;
use super::api::ApiClient;

#[derive(Debug, Clone)]
pub struct CatalogService {
    api: ApiClient,
}

impl CatalogService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the catalog. While the request runs the state reports loading;
    /// errors end up in `last_error` with the previous catalog kept.
    pub async fn load_catalog(&self, state: AppState, session: &Session) -> AppState {
        let (state, generation) = state.begin_catalog_load();
        let result = self.api.list_events(session).await;
        self.finish_load(state, generation, result)
    }

    /// Apply a catalog response fetched elsewhere; stale generations are dropped
    pub fn finish_load(&self, state: AppState, generation: u64, result: Result<Vec<Event>>) -> AppState {
        match result {
            Ok(catalog) => {
                let events = catalog.len();
                let (state, applied) = state.finish_catalog_load(generation, Ok(catalog));
                log_catalog_refresh(generation, events, applied);
                state
            }
            Err(e) => {
                let (state, applied) = state.finish_catalog_load(generation, Err(e.user_message()));
                if applied && e.clears_session() {
                    return apply_local_transition(state, LocalTransition::SessionExpired { message: e.user_message() });
                }
                state
            }
        }
    }

    /// Rebuild the registered set from the backend. Anonymous sessions are left alone.
    pub async fn load_registrations(&self, state: AppState, session: &Session) -> AppState {
        let Some(visitor_id) = session.visitor_id else {
            return state;
        };
        if !session.is_authenticated_at(Utc::now()) {
            return state;
        }

        match self.api.visitor_registrations(session, visitor_id).await {
            Ok(registrations) => {
                info!(visitor_id = visitor_id, count = registrations.len(), "Loaded visitor registrations");
                reconcile_registrations(state, &registrations)
            }
            Err(e) => {
                warn!(visitor_id = visitor_id, error = %e, "Failed to load visitor registrations");
                let transition = if e.clears_session() {
                    LocalTransition::SessionExpired { message: e.user_message() }
                } else {
                    LocalTransition::ErrorReported { message: e.user_message() }
                };
                apply_local_transition(state, transition)
            }
        }
    }

    /// Create an event as organizer and add it to the catalog
    pub async fn create_event(
        &self,
        state: AppState,
        session: &Session,
        request: &CreateEventRequest,
    ) -> (AppState, Result<Event>) {
        match self.api.create_event(session, request).await {
            Ok(event) => {
                info!(event_id = event.id, "Created event");
                let state = apply_local_transition(state, LocalTransition::EventUpserted(event.clone()));
                (state, Ok(event))
            }
            Err(e) => (record_error(state, &e), Err(e)),
        }
    }

    /// Update an event and replace it in the catalog
    pub async fn update_event(
        &self,
        state: AppState,
        session: &Session,
        event_id: i64,
        request: &UpdateEventRequest,
    ) -> (AppState, Result<Event>) {
        match self.api.update_event(session, event_id, request).await {
            Ok(event) => {
                info!(event_id = event.id, "Updated event");
                let state = apply_local_transition(state, LocalTransition::EventUpserted(event.clone()));
                (state, Ok(event))
            }
            Err(e) => (record_error(state, &e), Err(e)),
        }
    }

    /// Delete an event; only then does it leave the catalog
    pub async fn delete_event(&self, state: AppState, session: &Session, event_id: i64) -> (AppState, Result<()>) {
        match self.api.delete_event(session, event_id).await {
            Ok(()) => {
                info!(event_id = event_id, "Deleted event");
                (apply_local_transition(state, LocalTransition::EventRemoved { event_id }), Ok(()))
            }
            Err(e) => (record_error(state, &e), Err(e)),
        }
    }
}

fn record_error(state: AppState, error: &EventZenError) -> AppState {
    let message = error.user_message();
    let transition = if error.clears_session() {
        LocalTransition::SessionExpired { message }
    } else {
        LocalTransition::ErrorReported { message }
    };
    apply_local_transition(state, transition)
}
