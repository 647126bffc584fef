use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::common::{account_inputs, build_service, personal_inputs, read_json_body, TestStore};
use crate::forms::gateway::MockRegistrationGateway;
use crate::forms::registration::domain::RegistrationInput;
use crate::forms::registration::router;

type Store = TestStore;
type Gateway = MockRegistrationGateway;

#[tokio::test]
async fn create_handler_returns_created_with_a_view() {
    let (service, _store, _gateway) = build_service();

    let response = router::create_handler::<Store, Gateway>(State(service)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["activeStep"], "account");
    assert!(body["sessionId"].as_str().is_some());
}

#[tokio::test]
async fn view_handler_returns_not_found_for_unknown_sessions() {
    let (service, _store, _gateway) = build_service();

    let response = router::view_handler::<Store, Gateway>(
        State(service),
        Path("reg-sess-unknown".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "session not found");
}

#[tokio::test]
async fn failed_step_validation_is_reported_in_the_view() {
    let (service, _store, _gateway) = build_service();
    let session = service.create().expect("session opens").session_id;

    let response =
        router::next_handler::<Store, Gateway>(State(service), Path(session.0.clone())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["activeStep"], "account");
    assert_eq!(body["errors"]["email"], "Invalid email address");
}

#[tokio::test]
async fn submit_handler_rejects_sessions_short_of_the_final_step() {
    let (service, _store, _gateway) = build_service();
    let session = service.create().expect("session opens").session_id;

    let response =
        router::submit_handler::<Store, Gateway>(State(service), Path(session.0.clone())).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_flags_invalid_records_as_unprocessable() {
    let (service, _store, _gateway) = build_service();
    let session = service.create().expect("session opens").session_id;

    for input in account_inputs() {
        service.set_field(&session, input).expect("edit applies");
    }
    service.next(&session).expect("navigation runs");
    for input in personal_inputs() {
        service.set_field(&session, input).expect("edit applies");
    }
    service.next(&session).expect("navigation runs");
    // Drift the confirmation after the account step was already passed.
    service
        .set_field(
            &session,
            RegistrationInput::ConfirmPassword("drifted".to_string()),
        )
        .expect("edit applies");

    let response =
        router::submit_handler::<Store, Gateway>(State(service), Path(session.0.clone())).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["errors"]["confirmPassword"], "Passwords don't match");
}

#[tokio::test]
async fn submit_handler_completes_a_valid_session() {
    let (service, _store, _gateway) = build_service();
    let session = service.create().expect("session opens").session_id;

    for input in account_inputs() {
        service.set_field(&session, input).expect("edit applies");
    }
    service.next(&session).expect("navigation runs");
    for input in personal_inputs() {
        service.set_field(&session, input).expect("edit applies");
    }
    service.next(&session).expect("navigation runs");

    let response =
        router::submit_handler::<Store, Gateway>(State(service), Path(session.0.clone())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "complete");
    assert_eq!(body["registrationId"], "reg-000001");
}

#[tokio::test]
async fn set_field_handler_applies_the_edit() {
    let (service, _store, _gateway) = build_service();
    let session = service.create().expect("session opens").session_id;

    let response = router::set_field_handler::<Store, Gateway>(
        State(service),
        Path(session.0.clone()),
        axum::Json(RegistrationInput::Email("ada@example.com".to_string())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["summary"]["email"], "ada@example.com");
}

#[tokio::test]
async fn discard_handler_returns_no_content() {
    let (service, _store, _gateway) = build_service();
    let session = service.create().expect("session opens").session_id;

    let response = router::discard_handler::<Store, Gateway>(
        State(service.clone()),
        Path(session.0.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response =
        router::discard_handler::<Store, Gateway>(State(service), Path(session.0)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
