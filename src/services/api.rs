//! EventZen backend client
//!
//! This service wraps the backend REST endpoints: catalog, event detail,
//! registration (both contracts), cancellation, visitor registrations and
//! organizer event management. Every request carries the session's bearer
//! token when one is present and an `X-Request-Id` for log correlation.

use std::time::Duration;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;
use crate::config::settings::Settings;
use crate::models::{
    CreateEventRequest, Event, LegacyRegistrationRequest, Registration, RegistrationPayload,
    Session, UpdateEventRequest,
};
use crate::utils::errors::{EventZenError, Result};
use crate::utils::helpers::generate_request_id;
use crate::utils::logging::log_api_error;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP client for the EventZen backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new ApiClient from settings
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_base_url(&settings.api.base_url, settings.request_timeout(), &settings.api.user_agent)
    }

    /// Create a client for an explicit base URL
    pub fn with_base_url(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(EventZenError::Http)?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /events`
    pub async fn list_events(&self, session: &Session) -> Result<Vec<Event>> {
        let response = self.send(self.request(Method::GET, "/events", session), "GET /events").await?;
        let body: serde_json::Value = Self::read_json(response, "GET /events").await?;

        let items = match body {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut object) => match object.remove("events") {
                Some(serde_json::Value::Array(items)) => items,
                _ => {
                    return Err(EventZenError::InvalidResponse(
                        "expected an array of events".to_string(),
                    ))
                }
            },
            _ => {
                return Err(EventZenError::InvalidResponse(
                    "expected an array of events".to_string(),
                ))
            }
        };

        let total = items.len();
        let events: Vec<Event> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Event>(item) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed event in catalog");
                    None
                }
            })
            .collect();

        debug!(received = total, kept = events.len(), "Fetched event catalog");
        Ok(events)
    }

    /// `GET /events/:id`
    pub async fn get_event(&self, session: &Session, event_id: i64) -> Result<Event> {
        let path = format!("/events/{}", event_id);
        let response = self.send(self.request(Method::GET, &path, session), "GET /events/:id").await;
        match response {
            Err(EventZenError::Rejected { status: 404, .. }) => Err(EventZenError::EventNotFound { event_id }),
            other => Self::read_json(other?, "GET /events/:id").await,
        }
    }

    /// `POST /events/:id/register`
    pub async fn register_for_event(
        &self,
        session: &Session,
        event_id: i64,
        payload: &RegistrationPayload,
    ) -> Result<Option<Registration>> {
        Self::require_token(session)?;
        let path = format!("/events/{}/register", event_id);
        let request = self.request(Method::POST, &path, session).json(payload);
        let response = self.send(request, "POST /events/:id/register").await?;
        Ok(Self::read_registration(response).await)
    }

    /// Legacy `POST /registrations`
    pub async fn register_for_event_legacy(
        &self,
        session: &Session,
        event_id: i64,
        visitor_id: i64,
        private_code: Option<&str>,
    ) -> Result<Option<Registration>> {
        Self::require_token(session)?;
        let body = LegacyRegistrationRequest {
            event_id,
            visitor_id,
            private_code: private_code.map(str::to_string),
        };
        let request = self.request(Method::POST, "/registrations", session).json(&body);
        let response = self.send(request, "POST /registrations").await?;
        Ok(Self::read_registration(response).await)
    }

    /// `DELETE /registrations/:id`
    pub async fn cancel_registration(&self, session: &Session, registration_id: i64) -> Result<()> {
        Self::require_token(session)?;
        let path = format!("/registrations/{}", registration_id);
        self.send(self.request(Method::DELETE, &path, session), "DELETE /registrations/:id").await?;
        Ok(())
    }

    /// `GET /registrations/visitor/:visitorId`
    pub async fn visitor_registrations(&self, session: &Session, visitor_id: i64) -> Result<Vec<Registration>> {
        Self::require_token(session)?;
        let path = format!("/registrations/visitor/{}", visitor_id);
        let response = self
            .send(self.request(Method::GET, &path, session), "GET /registrations/visitor/:id")
            .await?;
        Self::read_json(response, "GET /registrations/visitor/:id").await
    }

    /// `POST /events`
    pub async fn create_event(&self, session: &Session, request: &CreateEventRequest) -> Result<Event> {
        request.validate()?;
        Self::require_token(session)?;
        self.send_json(Method::POST, "/events", session, request, "POST /events").await
    }

    /// `PUT /events/:id`
    pub async fn update_event(&self, session: &Session, event_id: i64, request: &UpdateEventRequest) -> Result<Event> {
        request.validate()?;
        Self::require_token(session)?;
        let path = format!("/events/{}", event_id);
        self.send_json(Method::PUT, &path, session, request, "PUT /events/:id").await
    }

    /// `DELETE /events/:id`
    pub async fn delete_event(&self, session: &Session, event_id: i64) -> Result<()> {
        Self::require_token(session)?;
        let path = format!("/events/{}", event_id);
        match self.send(self.request(Method::DELETE, &path, session), "DELETE /events/:id").await {
            Err(EventZenError::Rejected { status: 404, .. }) => Err(EventZenError::EventNotFound { event_id }),
            other => other.map(|_| ()),
        }
    }

    fn require_token(session: &Session) -> Result<()> {
        session.bearer_token().map(|_| ()).ok_or(EventZenError::NotAuthenticated)
    }

    fn request(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, generate_request_id());

        if let Some(token) = session.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        body: &B,
        endpoint: &str,
    ) -> Result<T> {
        let request = self.request(method, path, session).json(body);
        let response = self.send(request, endpoint).await?;
        Self::read_json(response, endpoint).await
    }

    /// Send a request and turn non-2xx answers into errors
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response> {
        debug!(endpoint = endpoint, "Sending backend request");

        let response = request.send().await.map_err(|e| {
            let error = if e.is_timeout() {
                EventZenError::Timeout
            } else if e.is_connect() {
                EventZenError::Network(e.to_string())
            } else {
                EventZenError::Http(e)
            };
            log_api_error(endpoint, &error, None);
            error
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        let error = match status {
            StatusCode::UNAUTHORIZED => EventZenError::SessionExpired(message),
            StatusCode::FORBIDDEN => EventZenError::PermissionDenied(message),
            s if s.is_server_error() => {
                debug!(endpoint = endpoint, status = s.as_u16(), body = %body, "Server error body");
                EventZenError::ServerUnavailable { status: s.as_u16() }
            }
            _ => EventZenError::Rejected { status: status.as_u16(), message },
        };
        log_api_error(endpoint, &error, Some(status.as_str()));
        Err(error)
    }

    async fn read_json<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            let error = EventZenError::InvalidResponse(e.to_string());
            log_api_error(endpoint, &error, None);
            error
        })
    }

    /// Registration endpoints may answer with the registration, a wrapper, or nothing at all
    async fn read_registration(response: Response) -> Option<Registration> {
        let text = response.text().await.ok()?;
        parse_registration(&text)
    }
}

/// Pull the user-facing message out of a JSON error body. Anything else
/// (HTML error pages, plain text) yields `None`.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body.trim()).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}

pub(crate) fn parse_registration(text: &str) -> Option<Registration> {
    if text.trim().is_empty() {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let candidate = value.get("registration").cloned().unwrap_or(value);
    serde_json::from_value(candidate).ok()
}
