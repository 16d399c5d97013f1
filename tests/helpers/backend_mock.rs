//! Mock EventZen backend for testing
//!
//! This module provides a mock HTTP server that simulates the EventZen REST
//! backend. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Mock EventZen backend server
pub struct BackendMockServer {
    pub server: MockServer,
}

impl BackendMockServer {
    /// Start a new mock backend
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// `GET /events`
    pub async fn mock_catalog(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `GET /events` answering with an error status
    pub async fn mock_catalog_error(&self, status: u16, message: &str) {
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": message })))
            .mount(&self.server)
            .await;
    }

    /// `GET /events/:id`
    pub async fn mock_event_detail(&self, event_id: i64, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/events/{}", event_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `POST /events/:id/register` for any body
    pub async fn mock_register(&self, event_id: i64, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/events/{}/register", event_id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `POST /events/:id/register` answering with a non-JSON body, as a proxy would
    pub async fn mock_register_raw(&self, event_id: i64, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/events/{}/register", event_id)))
            .respond_with(
                ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "text/html"),
            )
            .mount(&self.server)
            .await;
    }

    /// `POST /events/:id/register` only when the body carries `private_code`
    pub async fn mock_register_with_code(&self, event_id: i64, private_code: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/events/{}/register", event_id)))
            .and(body_partial_json(json!({ "privateCode": private_code })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Legacy `POST /registrations`
    pub async fn mock_legacy_register(&self, event_id: i64, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/registrations"))
            .and(body_partial_json(json!({ "eventId": event_id })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `DELETE /registrations/:id`
    pub async fn mock_cancel(&self, registration_id: i64, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/registrations/{}", registration_id)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// `GET /registrations/visitor/:visitorId`
    pub async fn mock_visitor_registrations(&self, visitor_id: i64, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/registrations/visitor/{}", visitor_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `POST /events` requiring the given bearer token
    pub async fn mock_create_event(&self, token: &str, body: Value) {
        Mock::given(method("POST"))
            .and(path("/events"))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(201).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `PUT /events/:id`
    pub async fn mock_update_event(&self, event_id: i64, body: Value) {
        Mock::given(method("PUT"))
            .and(path(format!("/events/{}", event_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `DELETE /events/:id`
    pub async fn mock_delete_event(&self, event_id: i64, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/events/{}", event_id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": "Event not found" })))
            .mount(&self.server)
            .await;
    }

    /// Every request the server has seen so far
    pub async fn received(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests matching a method and path
    pub async fn received_for(&self, http_method: &str, request_path: &str) -> Vec<Request> {
        self.received()
            .await
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .collect()
    }

    /// Reset all mocks
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}
