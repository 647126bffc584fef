use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::with_form_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use forms_portal::config::AppConfig;
use forms_portal::error::AppError;
use forms_portal::forms::gateway::{MockJobApplicationGateway, MockRegistrationGateway};
use forms_portal::forms::job_application::JobApplicationService;
use forms_portal::forms::registration::RegistrationService;
use forms_portal::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let latency = config.gateway.latency();
    let registration_service = Arc::new(RegistrationService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(MockRegistrationGateway::new(latency)),
    ));
    let job_application_service = Arc::new(JobApplicationService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(MockJobApplicationGateway::new(latency)),
    ));

    let app = with_form_routes(registration_service, job_application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "enterprise forms portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
