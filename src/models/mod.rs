//! Data models module
//!
//! This module contains all data structures exchanged with the backend
//! and held in client state

pub mod event;
pub mod registration;
pub mod filter;
pub mod session;

// Re-export commonly used models
pub use event::{Event, EventType, EventStatus, CreateEventRequest, UpdateEventRequest};
pub use registration::{Registration, RegistrationStatus, RegistrationPayload, LegacyRegistrationRequest};
pub use filter::{FilterCriteria, EventStatusFilter};
pub use session::{Session, Role};
