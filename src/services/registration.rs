//! Registration service
//!
//! Runs the visitor's "register" and "cancel" actions: the eligibility gate
//! first, then the backend, then the matching local transition. On any
//! failure the registered set is left exactly as it was.

use chrono::Utc;
use tracing::{info, warn};
use crate::config::{RegistrationContract, Settings};
use crate::models::{RegistrationPayload, Session};
use crate::state::{apply_local_transition, evaluate, reconcile, AppState, GateDecision, LocalTransition};
use crate::utils::errors::{ErrorKind, EventZenError, Result};
use crate::utils::logging::{log_gate_decision, log_registration_attempt};
use super::api::ApiClient;

/// What the caller should show after a register or cancel action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    Cancelled,
    /// Show (or keep showing) the private code prompt
    PromptPrivateCode { error: Option<String> },
    RedirectToLogin,
    /// The backend refused the session; the caller must clear it and re-login
    SessionExpired { message: String },
    Full,
    Closed,
    AlreadyRegistered,
    NotRegistered,
    InFlight,
    Failed { message: String, kind: ErrorKind },
}

/// Registration service composing the gate with the backend client
#[derive(Debug, Clone)]
pub struct RegistrationService {
    api: ApiClient,
    contract: RegistrationContract,
    reconcile_after_mutation: bool,
}

impl RegistrationService {
    pub fn new(api: ApiClient, settings: &Settings) -> Self {
        Self {
            api,
            contract: settings.api.registration_contract,
            reconcile_after_mutation: settings.features.reconcile_after_mutation,
        }
    }

    pub fn contract(&self) -> RegistrationContract {
        self.contract
    }

    /// Attempt to register the session's visitor for `event_id`.
    ///
    /// `private_code` is the value typed into the prompt; pass `None` on the
    /// first click so that private events open the prompt instead.
    pub async fn register(
        &self,
        state: AppState,
        session: &Session,
        event_id: i64,
        private_code: Option<&str>,
    ) -> (AppState, RegistrationOutcome) {
        let now = Utc::now();

        let (mut state, event) = match state.event(event_id).cloned() {
            Some(event) => (state, event),
            None => match self.api.get_event(session, event_id).await {
                Ok(event) => {
                    let state = apply_local_transition(state, LocalTransition::EventUpserted(event.clone()));
                    (state, event)
                }
                Err(e) => return fail(state, event_id, e),
            },
        };

        let decision = evaluate(&state, session, &event, private_code, now);
        log_gate_decision(event_id, decision.name());

        let private_code = match decision {
            GateDecision::Submit { private_code } => private_code,
            GateDecision::InFlight => return (state, RegistrationOutcome::InFlight),
            GateDecision::AlreadyRegistered => return (state, RegistrationOutcome::AlreadyRegistered),
            GateDecision::RedirectToLogin => return (state, RegistrationOutcome::RedirectToLogin),
            GateDecision::Full => return (state, RegistrationOutcome::Full),
            GateDecision::Closed => return (state, RegistrationOutcome::Closed),
            GateDecision::PromptPrivateCode { error } => {
                state = match &error {
                    Some(message) => apply_local_transition(
                        state,
                        LocalTransition::PrivateCodeRejected { event_id, message: message.clone() },
                    ),
                    None => apply_local_transition(state, LocalTransition::PrivateCodeRequested { event_id }),
                };
                return (state, RegistrationOutcome::PromptPrivateCode { error });
            }
        };

        let Some(visitor_id) = session.visitor_id else {
            let error = EventZenError::Validation("Your visitor profile is not loaded yet".to_string());
            return fail(state, event_id, error);
        };

        log_registration_attempt(event_id, Some(visitor_id), "register", event.is_private());
        state = apply_local_transition(state, LocalTransition::RequestStarted { event_id });

        let result = match self.contract {
            RegistrationContract::EventScoped => {
                let payload = RegistrationPayload { visitor_id, private_code: private_code.clone() };
                self.api.register_for_event(session, event_id, &payload).await
            }
            RegistrationContract::Legacy => {
                self.api
                    .register_for_event_legacy(session, event_id, visitor_id, private_code.as_deref())
                    .await
            }
        };

        match result {
            Ok(registration) => {
                info!(event_id = event_id, visitor_id = visitor_id, "Registered for event");
                let state = apply_local_transition(
                    state,
                    LocalTransition::RegistrationConfirmed {
                        event_id,
                        registration_id: registration.map(|r| r.id),
                    },
                );
                (self.refresh_after_mutation(state, session).await, RegistrationOutcome::Registered)
            }
            Err(e) if event.is_private() && e.is_private_code_mismatch() => {
                let message = e.user_message();
                let state = apply_local_transition(
                    state,
                    LocalTransition::PrivateCodeRejected { event_id, message: message.clone() },
                );
                (state, RegistrationOutcome::PromptPrivateCode { error: Some(message) })
            }
            Err(e) => {
                // The code was not the problem; the error goes to last_error instead
                let state = apply_local_transition(state, LocalTransition::PromptDismissed { event_id });
                fail(state, event_id, e)
            }
        }
    }

    /// Cancel the session's registration for `event_id`
    pub async fn cancel(&self, state: AppState, session: &Session, event_id: i64) -> (AppState, RegistrationOutcome) {
        if state.is_in_flight(event_id) {
            return (state, RegistrationOutcome::InFlight);
        }
        if !state.is_registered(event_id) {
            return (state, RegistrationOutcome::NotRegistered);
        }
        if !session.is_authenticated_at(Utc::now()) {
            return (state, RegistrationOutcome::RedirectToLogin);
        }

        log_registration_attempt(event_id, session.visitor_id, "cancel", false);
        let state = apply_local_transition(state, LocalTransition::RequestStarted { event_id });

        let registration_id = match state.registration_id(event_id) {
            Some(id) => id,
            None => match self.find_registration_id(session, event_id).await {
                Ok(id) => id,
                Err(e) => return fail(state, event_id, e),
            },
        };

        match self.api.cancel_registration(session, registration_id).await {
            Ok(()) => {
                info!(event_id = event_id, registration_id = registration_id, "Cancelled registration");
                let state = apply_local_transition(state, LocalTransition::RegistrationCancelled { event_id });
                (self.refresh_after_mutation(state, session).await, RegistrationOutcome::Cancelled)
            }
            Err(e) => fail(state, event_id, e),
        }
    }

    async fn find_registration_id(&self, session: &Session, event_id: i64) -> Result<i64> {
        let visitor_id = session.visitor_id.ok_or(EventZenError::NotAuthenticated)?;
        let registrations = self.api.visitor_registrations(session, visitor_id).await?;
        registrations
            .iter()
            .find(|r| r.event_id == event_id && r.is_active())
            .map(|r| r.id)
            .ok_or(EventZenError::RegistrationNotFound { event_id })
    }

    /// Background refresh reconciling attendee counts; a failure keeps the optimistic state
    async fn refresh_after_mutation(&self, state: AppState, session: &Session) -> AppState {
        if !self.reconcile_after_mutation {
            return state;
        }

        match self.api.list_events(session).await {
            Ok(catalog) => reconcile(state, catalog),
            Err(e) => {
                warn!(error = %e, "Catalog refresh after registration change failed");
                state
            }
        }
    }
}

/// Record a failed attempt without touching the registered set
fn fail(state: AppState, event_id: i64, error: EventZenError) -> (AppState, RegistrationOutcome) {
    let message = error.user_message();
    let state = apply_local_transition(
        state,
        LocalTransition::RequestFailed { event_id, message: message.clone() },
    );

    if error.clears_session() {
        let state = apply_local_transition(state, LocalTransition::SessionExpired { message: message.clone() });
        return (state, RegistrationOutcome::SessionExpired { message });
    }

    if matches!(error, EventZenError::NotAuthenticated) {
        return (state, RegistrationOutcome::RedirectToLogin);
    }

    (state, RegistrationOutcome::Failed { message, kind: error.kind() })
}
