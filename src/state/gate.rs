//! Registration eligibility gate
//!
//! Decides, before any request is made, whether a visitor's registration
//! attempt may go to the backend.

use chrono::{DateTime, Utc};
use crate::models::{Event, Session};
use super::app_state::AppState;

/// Outcome of evaluating a registration request locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A request for this event is already pending
    InFlight,
    AlreadyRegistered,
    /// No usable session; send the user to the login page
    RedirectToLogin,
    /// Capacity reached
    Full,
    /// Inactive or already past
    Closed,
    /// Private event: ask for the code, optionally showing an error
    PromptPrivateCode { error: Option<String> },
    /// Go ahead and call the backend
    Submit { private_code: Option<String> },
}

impl GateDecision {
    pub fn allows_submit(&self) -> bool {
        matches!(self, GateDecision::Submit { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            GateDecision::InFlight => "in_flight",
            GateDecision::AlreadyRegistered => "already_registered",
            GateDecision::RedirectToLogin => "redirect_to_login",
            GateDecision::Full => "full",
            GateDecision::Closed => "closed",
            GateDecision::PromptPrivateCode { .. } => "prompt_private_code",
            GateDecision::Submit { .. } => "submit",
        }
    }
}

/// Evaluate a registration request for `event`.
///
/// `private_code` is what the visitor typed into the prompt, if it was shown.
pub fn evaluate(
    state: &AppState,
    session: &Session,
    event: &Event,
    private_code: Option<&str>,
    now: DateTime<Utc>,
) -> GateDecision {
    if state.is_in_flight(event.id) {
        return GateDecision::InFlight;
    }

    if state.is_registered(event.id) {
        return GateDecision::AlreadyRegistered;
    }

    if !session.is_authenticated_at(now) {
        return GateDecision::RedirectToLogin;
    }

    if event.is_full() {
        return GateDecision::Full;
    }

    if !event.is_active || event.is_past(now) {
        return GateDecision::Closed;
    }

    if event.is_private() {
        return match private_code.map(str::trim) {
            None => GateDecision::PromptPrivateCode { error: None },
            Some("") => GateDecision::PromptPrivateCode {
                error: Some("Please enter the private event code".to_string()),
            },
            Some(code) => GateDecision::Submit { private_code: Some(code.to_string()) },
        };
    }

    GateDecision::Submit { private_code: None }
}

/// What the event's action button offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Register,
    Cancel,
    /// Disabled while a request is pending
    Pending,
    Full,
    Closed,
    Login,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Register => write!(f, "Register"),
            EventAction::Cancel => write!(f, "Cancel"),
            EventAction::Pending => write!(f, "Pending"),
            EventAction::Full => write!(f, "Full"),
            EventAction::Closed => write!(f, "Closed"),
            EventAction::Login => write!(f, "Log in to register"),
        }
    }
}

/// Button state for an event in the derived view
pub fn action_for(state: &AppState, session: &Session, event: &Event, now: DateTime<Utc>) -> EventAction {
    match evaluate(state, session, event, None, now) {
        GateDecision::InFlight => EventAction::Pending,
        GateDecision::AlreadyRegistered => EventAction::Cancel,
        GateDecision::RedirectToLogin => EventAction::Login,
        GateDecision::Full => EventAction::Full,
        GateDecision::Closed => EventAction::Closed,
        GateDecision::PromptPrivateCode { .. } | GateDecision::Submit { .. } => EventAction::Register,
    }
}
