//! EventZen client core
//!
//! Client-side logic shared by EventZen front ends: the event catalog cache,
//! the filter engine deriving visible views from it, the registration
//! eligibility gate, and the token-authenticated backend client.

pub mod config;
pub mod services;
pub mod models;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventZenError, Result};

// Re-export main components for easy access
pub use services::{ServiceFactory, RegistrationOutcome};
pub use state::{AppState, LocalTransition, GateDecision};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
