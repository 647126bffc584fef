use crate::infra::{AppState, InMemorySessionStore};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use forms_portal::forms::gateway::{MockJobApplicationGateway, MockRegistrationGateway};
use forms_portal::forms::job_application::{
    job_application_router, JobApplicationForm, JobApplicationService,
};
use forms_portal::forms::registration::{
    registration_router, RegistrationService, RegistrationWizard,
};

pub(crate) type RegistrationStore = InMemorySessionStore<RegistrationWizard>;
pub(crate) type JobApplicationStore = InMemorySessionStore<JobApplicationForm>;

/// Compose both form routers with the operational endpoints.
pub(crate) fn with_form_routes(
    registration: Arc<RegistrationService<RegistrationStore, MockRegistrationGateway>>,
    job_application: Arc<JobApplicationService<JobApplicationStore, MockJobApplicationGateway>>,
) -> axum::Router {
    registration_router(registration)
        .merge(job_application_router(job_application))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
