//! Client state module
//!
//! This module holds the event catalog cache, the filter engine deriving the
//! visible view from it, and the registration eligibility gate.

pub mod app_state;
pub mod filter;
pub mod gate;

pub use app_state::{AppState, LocalTransition, PrivateCodePrompt, apply_local_transition, reconcile, reconcile_registrations};
pub use filter::{SortOrder, filter_events, matches, sort_by_date};
pub use gate::{GateDecision, EventAction, evaluate, action_for};
