use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;

use super::controller::JobApplicationForm;
use super::domain::{EntryKey, JobApplicationInput};
use super::service::{JobApplicationService, JobApplicationServiceError};
use crate::forms::gateway::JobApplicationGateway;
use crate::forms::session::{SessionId, SessionStore, SessionStoreError};
use crate::forms::SubmitOutcome;

/// Router builder exposing the job application form over HTTP.
pub fn job_application_router<S, G>(service: Arc<JobApplicationService<S, G>>) -> Router
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/job-applications/sessions",
            post(create_handler::<S, G>),
        )
        .route(
            "/api/v1/job-applications/sessions/:session_id",
            get(view_handler::<S, G>).delete(discard_handler::<S, G>),
        )
        .route(
            "/api/v1/job-applications/sessions/:session_id/fields",
            post(set_field_handler::<S, G>),
        )
        .route(
            "/api/v1/job-applications/sessions/:session_id/experience",
            post(append_experience_handler::<S, G>),
        )
        .route(
            "/api/v1/job-applications/sessions/:session_id/experience/:key",
            delete(remove_experience_handler::<S, G>),
        )
        .route(
            "/api/v1/job-applications/sessions/:session_id/submit",
            post(submit_handler::<S, G>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<S, G>(
    State(service): State<Arc<JobApplicationService<S, G>>>,
) -> Response
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
{
    match service.create() {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_handler<S, G>(
    State(service): State<Arc<JobApplicationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_field_handler<S, G>(
    State(service): State<Arc<JobApplicationService<S, G>>>,
    Path(session_id): Path<String>,
    axum::Json(input): axum::Json<JobApplicationInput>,
) -> Response
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
{
    match service.set_field(&SessionId(session_id), input) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn append_experience_handler<S, G>(
    State(service): State<Arc<JobApplicationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
{
    match service.append_experience(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_experience_handler<S, G>(
    State(service): State<Arc<JobApplicationService<S, G>>>,
    Path((session_id, key)): Path<(String, u64)>,
) -> Response
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
{
    match service.remove_experience(&SessionId(session_id), EntryKey(key)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<S, G>(
    State(service): State<Arc<JobApplicationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
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
    State(service): State<Arc<JobApplicationService<S, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
{
    match service.discard(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: JobApplicationServiceError) -> Response {
    let status = match &error {
        JobApplicationServiceError::SubmissionInFlight => StatusCode::CONFLICT,
        JobApplicationServiceError::UnknownEntry(_) => StatusCode::NOT_FOUND,
        JobApplicationServiceError::Store(SessionStoreError::NotFound) => StatusCode::NOT_FOUND,
        JobApplicationServiceError::Store(SessionStoreError::Conflict) => StatusCode::CONFLICT,
        JobApplicationServiceError::Store(SessionStoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
