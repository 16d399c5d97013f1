//! Error handling for EventZen
//!
//! This module defines the main error types used throughout the client core
//! and maps every failure onto the four user-facing error classes.

use std::sync::OnceLock;
use regex::Regex;
use thiserror::Error;

/// Main error type for EventZen client operations
#[derive(Error, Debug)]
pub enum EventZenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Registration not found for event {event_id}")]
    RegistrationNotFound { event_id: i64 },

    #[error("Rejected by backend ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Backend unavailable: {0}")]
    Network(String),

    /// 5xx answer; the body is not shown to the user
    #[error("Server error ({status})")]
    ServerUnavailable { status: u16 },

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for EventZen operations
pub type Result<T> = std::result::Result<T, EventZenError>;

/// User-facing error classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected locally, the action is blocked before any request
    Validation,
    /// The session is missing or was refused; re-login required
    Authorization,
    /// The backend refused on business grounds (capacity, code, duplicate)
    BusinessRule,
    /// Network trouble; the user may retry
    Transient,
}

const RETRYABLE_MESSAGE: &str = "Something went wrong while contacting the server. Please try again.";

fn code_mismatch_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(invalid|incorrect|wrong|mismatch\w*|does not match)\W+(private\s+)?(event\s+)?code|(private\s+)?code\W+(is\s+)?(invalid|incorrect|wrong|mismatch\w*|does not match)")
            .expect("code mismatch pattern is valid")
    })
}

impl EventZenError {
    /// Classify the error for presentation
    pub fn kind(&self) -> ErrorKind {
        match self {
            EventZenError::Validation(_) => ErrorKind::Validation,
            EventZenError::NotAuthenticated => ErrorKind::Authorization,
            EventZenError::SessionExpired(_) => ErrorKind::Authorization,
            EventZenError::PermissionDenied(_) => ErrorKind::Authorization,
            EventZenError::Rejected { .. } => ErrorKind::BusinessRule,
            EventZenError::EventNotFound { .. } => ErrorKind::BusinessRule,
            EventZenError::RegistrationNotFound { .. } => ErrorKind::BusinessRule,
            EventZenError::Network(_) => ErrorKind::Transient,
            EventZenError::ServerUnavailable { .. } => ErrorKind::Transient,
            EventZenError::Timeout => ErrorKind::Transient,
            EventZenError::InvalidResponse(_) => ErrorKind::Transient,
            EventZenError::Http(_) => ErrorKind::Transient,
            EventZenError::Serialization(_) => ErrorKind::Transient,
            EventZenError::Io(_) => ErrorKind::Transient,
            EventZenError::Config(_) => ErrorKind::Validation,
            EventZenError::UrlParse(_) => ErrorKind::Validation,
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            EventZenError::Config(_) => false,
            EventZenError::UrlParse(_) => false,
            EventZenError::SessionExpired(_) => false,
            EventZenError::NotAuthenticated => false,
            _ => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventZenError::Config(_) => ErrorSeverity::Critical,
            EventZenError::UrlParse(_) => ErrorSeverity::Critical,
            EventZenError::NotAuthenticated => ErrorSeverity::Warning,
            EventZenError::SessionExpired(_) => ErrorSeverity::Warning,
            EventZenError::PermissionDenied(_) => ErrorSeverity::Warning,
            EventZenError::Rejected { .. } => ErrorSeverity::Info,
            EventZenError::Validation(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Text to show the user
    pub fn user_message(&self) -> String {
        match self {
            EventZenError::Rejected { message, .. } => message.clone(),
            EventZenError::Validation(message) => message.clone(),
            EventZenError::NotAuthenticated => "Please log in to continue.".to_string(),
            EventZenError::SessionExpired(_) => "Your session has expired. Please log in again.".to_string(),
            EventZenError::PermissionDenied(message) => message.clone(),
            EventZenError::EventNotFound { .. } => "This event no longer exists.".to_string(),
            EventZenError::RegistrationNotFound { .. } => "No active registration was found for this event.".to_string(),
            _ => RETRYABLE_MESSAGE.to_string(),
        }
    }

    /// Whether the backend refused a private event code
    pub fn is_private_code_mismatch(&self) -> bool {
        match self {
            EventZenError::Rejected { message, .. } => code_mismatch_pattern().is_match(message),
            _ => false,
        }
    }

    /// Whether the local session must be discarded
    pub fn clears_session(&self) -> bool {
        matches!(self, EventZenError::SessionExpired(_))
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
