use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::RegistrationInput;
use super::service::{RegistrationService, RegistrationServiceError};
use super::wizard::RegistrationWizard;
use crate::forms::gateway::RegistrationGateway;
use crate::forms::session::{SessionId, SessionStore, SessionStoreError};
use crate::forms::SubmitOutcome;

/// Router builder exposing the registration wizard over HTTP.
pub fn registration_router<S, G>(service: Arc<RegistrationService<S, G>>) -> Router
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/registration/sessions",
            post(create_handler::<S, G>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id",
            get(view_handler::<S, G>).delete(discard_handler::<S, G>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id/fields",
            post(set_field_handler::<S, G>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id/next",
            post(next_handler::<S, G>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id/back",
            post(back_handler::<S, G>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id/submit",
            post(submit_handler::<S, G>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<S, G>(
    State(service): State<Arc<RegistrationService<S, G>>>,
) -> Response
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    match service.create() {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_handler<S, G>(
    State(service): State<Arc<RegistrationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_field_handler<S, G>(
    State(service): State<Arc<RegistrationService<S, G>>>,
    Path(session_id): Path<String>,
    axum::Json(input): axum::Json<RegistrationInput>,
) -> Response
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    match service.set_field(&SessionId(session_id), input) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn next_handler<S, G>(
    State(service): State<Arc<RegistrationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    match service.next(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn back_handler<S, G>(
    State(service): State<Arc<RegistrationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    match service.back(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<S, G>(
    State(service): State<Arc<RegistrationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    match service.submit(&SessionId(session_id)).await {
        Ok((SubmitOutcome::Invalid, view)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(view)).into_response()
        }
        Ok((_, view)) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn discard_handler<S, G>(
    State(service): State<Arc<RegistrationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    match service.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: RegistrationServiceError) -> Response {
    let status = match &error {
        RegistrationServiceError::SubmissionInFlight => StatusCode::CONFLICT,
        RegistrationServiceError::Wizard(_) => StatusCode::CONFLICT,
        RegistrationServiceError::Store(SessionStoreError::NotFound) => StatusCode::NOT_FOUND,
        RegistrationServiceError::Store(SessionStoreError::Conflict) => StatusCode::CONFLICT,
        RegistrationServiceError::Store(SessionStoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
