use crate::cli::ServeArgs;
use crate::infra::{self, AppState};
use crate::routes::with_mission_routes;
use axum::http::{header, HeaderValue, Method};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mission_secure::assessment::responses::{InMemoryResponseRepository, ResponseService};
use mission_secure::assessment::{standard_catalog, Assessor, AssessmentState};
use mission_secure::config::{AppConfig, ConfigError};
use mission_secure::error::AppError;
use mission_secure::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let assessment = AssessmentState {
        assessor: Assessor::new(
            infra::scoring_engine(&config)?,
            infra::refiner(&config, None)?,
        ),
        catalog: standard_catalog(),
    };
    let repository = Arc::new(InMemoryResponseRepository::default());
    let responses = Arc::new(ResponseService::new(repository));

    let app = with_mission_routes(assessment, responses)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.server.cors_origin)?)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        cors_origin = %config.server.cors_origin,
        refinement = config.refinement.is_enabled(),
        "mission secure api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = origin.trim();
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidCorsOrigin)?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}
