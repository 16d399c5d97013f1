//! Registration and cancellation against a mock backend
//!
//! These tests drive the registration service end to end: gate, HTTP call
//! and the resulting local state.

mod helpers;

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::json;

use eventzen::config::RegistrationContract;
use eventzen::models::Session;
use eventzen::services::{ApiClient, RegistrationOutcome, RegistrationService};
use eventzen::state::{action_for, apply_local_transition, AppState, EventAction, LocalTransition};
use eventzen::utils::ErrorKind;
use helpers::*;

fn service(mock: &BackendMockServer, contract: RegistrationContract, reconcile: bool) -> RegistrationService {
    let settings = test_settings(&mock.base_url(), contract, reconcile);
    let api = ApiClient::new(&settings).expect("client");
    RegistrationService::new(api, &settings)
}

fn registered(state: AppState, event_id: i64, registration_id: Option<i64>) -> AppState {
    apply_local_transition(state, LocalTransition::RegistrationConfirmed { event_id, registration_id })
}

#[tokio::test]
async fn test_public_registration_updates_state_and_reconciles() {
    let mock = BackendMockServer::new().await;
    let mut refreshed = public_event_json(1, "Lindy Night");
    refreshed["currentAttendees"] = json!(11);
    mock.mock_catalog(json!([refreshed])).await;
    mock.mock_register(1, 201, registration_json(501, 1, "ACTIVE")).await;

    let state = AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]);
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (state, outcome) = service.register(state, &test_session(), 1, None).await;

    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert!(state.is_registered(1));
    assert!(!state.is_in_flight(1));
    assert_eq!(state.registration_id(1), Some(501));
    assert_eq!(state.event(1).map(|e| e.current_attendees), Some(11));

    let posts = mock.received_for("POST", "/events/1/register").await;
    assert_eq!(posts.len(), 1);
    let auth = posts[0].headers.get("authorization").and_then(|v| v.to_str().ok());
    assert_eq!(auth, Some("Bearer visitor-token"));
    assert!(posts[0].headers.get("x-request-id").is_some());
    let body: serde_json::Value = serde_json::from_slice(&posts[0].body).unwrap();
    assert_eq!(body, json!({ "visitorId": 42 }));
}

#[tokio::test]
async fn test_full_event_makes_no_request() {
    let mock = BackendMockServer::new().await;
    let state = AppState::with_catalog(vec![event_from_json(full_event_json(2, "Sold Out Ball"))]);
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (state, outcome) = service.register(state, &test_session(), 2, None).await;

    assert_eq!(outcome, RegistrationOutcome::Full);
    assert!(!state.is_registered(2));
    assert!(mock.received().await.is_empty());
}

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_login() {
    let mock = BackendMockServer::new().await;
    let state = AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]);
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (state, outcome) = service.register(state, &Session::anonymous(), 1, None).await;

    assert_eq!(outcome, RegistrationOutcome::RedirectToLogin);
    assert!(!state.is_registered(1));
    assert!(mock.received().await.is_empty());
}

#[tokio::test]
async fn test_private_event_prompt_wrong_code_then_right_code() {
    let mock = BackendMockServer::new().await;
    // Specific mock first so the catch-all below does not shadow it
    mock.mock_register_with_code(3, "SWING42", 201, registration_json(600, 3, "ACTIVE")).await;
    mock.mock_register(3, 400, json!({ "message": "Invalid private code" })).await;

    let state = AppState::with_catalog(vec![event_from_json(private_event_json(3, "Members Jam"))]);
    let service = service(&mock, RegistrationContract::EventScoped, false);
    let session = test_session();

    let (state, outcome) = service.register(state, &session, 3, None).await;
    assert_eq!(outcome, RegistrationOutcome::PromptPrivateCode { error: None });
    assert!(state.prompt(3).is_some());
    assert!(mock.received().await.is_empty());

    let (state, outcome) = service.register(state, &session, 3, Some("WRONG")).await;
    assert_eq!(
        outcome,
        RegistrationOutcome::PromptPrivateCode { error: Some("Invalid private code".to_string()) }
    );
    assert!(!state.is_registered(3));
    assert!(!state.is_in_flight(3));
    assert_eq!(
        state.prompt(3).and_then(|p| p.error.as_deref()),
        Some("Invalid private code")
    );

    let (state, outcome) = service.register(state, &session, 3, Some("SWING42")).await;
    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert!(state.is_registered(3));
    assert!(state.prompt(3).is_none());
}

#[tokio::test]
async fn test_blank_private_code_is_caught_locally() {
    let mock = BackendMockServer::new().await;
    let state = AppState::with_catalog(vec![event_from_json(private_event_json(3, "Members Jam"))]);
    let service = service(&mock, RegistrationContract::EventScoped, false);

    let (state, outcome) = service.register(state, &test_session(), 3, Some("   ")).await;

    assert_matches!(outcome, RegistrationOutcome::PromptPrivateCode { error: Some(_) });
    assert!(state.prompt(3).and_then(|p| p.error.as_ref()).is_some());
    assert!(mock.received().await.is_empty());
}

#[tokio::test]
async fn test_legacy_contract_posts_to_registrations() {
    let mock = BackendMockServer::new().await;
    mock.mock_legacy_register(1, 200, json!({ "message": "Registered successfully" })).await;

    let state = AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]);
    let service = service(&mock, RegistrationContract::Legacy, false);

    let (state, outcome) = service.register(state, &test_session(), 1, None).await;

    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert!(state.is_registered(1));
    assert_eq!(state.registration_id(1), None);

    let posts = mock.received_for("POST", "/registrations").await;
    assert_eq!(posts.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&posts[0].body).unwrap();
    assert_eq!(body, json!({ "eventId": 1, "visitorId": 42 }));
}

#[tokio::test]
async fn test_business_rejection_is_surfaced_verbatim() {
    let mock = BackendMockServer::new().await;
    mock.mock_register(1, 409, json!({ "message": "Already registered for this event" })).await;

    let state = AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]);
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (state, outcome) = service.register(state, &test_session(), 1, None).await;

    assert_eq!(
        outcome,
        RegistrationOutcome::Failed {
            message: "Already registered for this event".to_string(),
            kind: ErrorKind::BusinessRule,
        }
    );
    assert!(!state.is_registered(1));
    assert!(!state.is_in_flight(1));
    assert_eq!(state.last_error(), Some("Already registered for this event"));
    // No reconcile after a failure
    assert!(mock.received_for("GET", "/events").await.is_empty());
}

#[tokio::test]
async fn test_gateway_error_page_is_transient_and_hidden() {
    let mock = BackendMockServer::new().await;
    mock.mock_register_raw(
        1,
        503,
        "<html><body><h1>503 Service Temporarily Unavailable</h1></body></html>",
    )
    .await;

    let state = AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]);
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (state, outcome) = service.register(state, &test_session(), 1, None).await;

    let RegistrationOutcome::Failed { message, kind } = outcome else {
        panic!("expected a failure, got {:?}", outcome);
    };
    assert_eq!(kind, ErrorKind::Transient);
    assert!(!message.contains("<html>"));
    assert_eq!(state.last_error(), Some(message.as_str()));
    assert!(!state.is_registered(1));
    assert!(!state.is_in_flight(1));
}

#[tokio::test]
async fn test_private_event_rejected_for_capacity_closes_prompt() {
    let mock = BackendMockServer::new().await;
    mock.mock_register(3, 409, json!({ "message": "Registration limit reached" })).await;

    let state = AppState::with_catalog(vec![event_from_json(private_event_json(3, "Members Jam"))]);
    let service = service(&mock, RegistrationContract::EventScoped, false);
    let session = test_session();

    let (state, _) = service.register(state, &session, 3, None).await;
    assert!(state.prompt(3).is_some());

    let (state, outcome) = service.register(state, &session, 3, Some("SWING42")).await;

    assert_eq!(
        outcome,
        RegistrationOutcome::Failed {
            message: "Registration limit reached".to_string(),
            kind: ErrorKind::BusinessRule,
        }
    );
    assert!(state.prompt(3).is_none());
    assert_eq!(state.last_error(), Some("Registration limit reached"));
    assert!(!state.is_registered(3));
}

#[tokio::test]
async fn test_unauthorized_expires_session() {
    let mock = BackendMockServer::new().await;
    mock.mock_register(1, 401, json!({ "message": "Token expired" })).await;

    let state = registered(
        AppState::with_catalog(vec![
            event_from_json(public_event_json(1, "Lindy Night")),
            event_from_json(public_event_json(2, "Blues Night")),
        ]),
        2,
        Some(9),
    );
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (state, outcome) = service.register(state, &test_session(), 1, None).await;

    assert_matches!(outcome, RegistrationOutcome::SessionExpired { .. });
    assert!(state.session_expired());
    assert!(!state.is_registered(1));
    assert_eq!(state.catalog().len(), 2);
}

#[tokio::test]
async fn test_network_failure_leaves_state_unchanged() {
    let settings = test_settings("http://127.0.0.1:9", RegistrationContract::EventScoped, true);
    let service = RegistrationService::new(ApiClient::new(&settings).unwrap(), &settings);
    let state = AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]);

    let (state, outcome) = service.register(state, &test_session(), 1, None).await;

    assert_matches!(outcome, RegistrationOutcome::Failed { kind: ErrorKind::Transient, .. });
    assert!(!state.is_registered(1));
    assert!(!state.is_in_flight(1));
    assert!(state.last_error().is_some());
}

#[tokio::test]
async fn test_event_missing_from_catalog_is_fetched() {
    let mock = BackendMockServer::new().await;
    mock.mock_event_detail(7, public_event_json(7, "Pop-up Jam")).await;
    mock.mock_register(7, 201, registration_json(700, 7, "ACTIVE")).await;

    let service = service(&mock, RegistrationContract::EventScoped, false);
    let (state, outcome) = service.register(AppState::new(), &test_session(), 7, None).await;

    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert!(state.event(7).is_some());
    assert!(state.is_registered(7));
}

#[tokio::test]
async fn test_cancel_flips_action_back_to_register() {
    let mock = BackendMockServer::new().await;
    mock.mock_cancel(77, 204).await;
    mock.mock_catalog(json!([public_event_json(1, "Lindy Night")])).await;

    let session = test_session();
    let state = registered(
        AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]),
        1,
        Some(77),
    );
    let now = Utc::now();
    let event = state.event(1).cloned().unwrap();
    assert_eq!(action_for(&state, &session, &event, now), EventAction::Cancel);

    let service = service(&mock, RegistrationContract::EventScoped, true);
    let (state, outcome) = service.cancel(state, &session, 1).await;

    assert_eq!(outcome, RegistrationOutcome::Cancelled);
    assert!(!state.is_registered(1));
    assert!(state.my_events().is_empty());
    assert_eq!(action_for(&state, &session, &event, now), EventAction::Register);
    assert_eq!(mock.received_for("DELETE", "/registrations/77").await.len(), 1);
}

#[tokio::test]
async fn test_cancel_looks_up_unknown_registration_id() {
    let mock = BackendMockServer::new().await;
    mock.mock_visitor_registrations(
        TEST_VISITOR_ID,
        json!([registration_json(87, 1, "CANCELLED"), registration_json(88, 1, "ACTIVE")]),
    )
    .await;
    mock.mock_cancel(88, 200).await;

    let state = registered(
        AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]),
        1,
        None,
    );
    let service = service(&mock, RegistrationContract::EventScoped, false);

    let (state, outcome) = service.cancel(state, &test_session(), 1).await;

    assert_eq!(outcome, RegistrationOutcome::Cancelled);
    assert!(!state.is_registered(1));
    assert_eq!(mock.received_for("DELETE", "/registrations/88").await.len(), 1);
}

#[tokio::test]
async fn test_cancel_failure_keeps_registration() {
    let mock = BackendMockServer::new().await;
    mock.mock_cancel(77, 500).await;

    let state = registered(
        AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]),
        1,
        Some(77),
    );
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (state, outcome) = service.cancel(state, &test_session(), 1).await;

    assert_matches!(outcome, RegistrationOutcome::Failed { kind: ErrorKind::Transient, .. });
    assert!(state.is_registered(1));
    assert!(!state.is_in_flight(1));
}

#[tokio::test]
async fn test_cancel_when_not_registered_is_local() {
    let mock = BackendMockServer::new().await;
    let state = AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]);
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (_, outcome) = service.cancel(state, &test_session(), 1).await;

    assert_eq!(outcome, RegistrationOutcome::NotRegistered);
    assert!(mock.received().await.is_empty());
}

#[tokio::test]
async fn test_in_flight_request_is_not_duplicated() {
    let mock = BackendMockServer::new().await;
    let state = apply_local_transition(
        AppState::with_catalog(vec![event_from_json(public_event_json(1, "Lindy Night"))]),
        LocalTransition::RequestStarted { event_id: 1 },
    );
    let service = service(&mock, RegistrationContract::EventScoped, true);

    let (state, outcome) = service.register(state, &test_session(), 1, None).await;

    assert_eq!(outcome, RegistrationOutcome::InFlight);
    assert!(state.is_in_flight(1));
    assert!(mock.received().await.is_empty());
}
