use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use mission_secure::assessment::responses::{response_router, ResponseRepository, ResponseService};
use mission_secure::assessment::{assessment_router, AssessmentState};
use serde_json::json;
use std::sync::Arc;

pub(crate) const INDEX_BANNER: &str = "Mission Secure API is running. POST /api/grade";

pub(crate) fn with_mission_routes<R>(
    assessment: AssessmentState,
    responses: Arc<ResponseService<R>>,
) -> axum::Router
where
    R: ResponseRepository + 'static,
{
    assessment_router(assessment)
        .merge(response_router(responses))
        .route("/", get(index))
        .route("/api/health", get(api_health))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn index() -> &'static str {
    INDEX_BANNER
}

pub(crate) async fn api_health() -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
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

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use mission_secure::assessment::responses::InMemoryResponseRepository;
    use mission_secure::assessment::{standard_catalog, Assessor, ScoringEngine};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, Arc<AtomicBool>) {
        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let assessment = AssessmentState {
            assessor: Assessor::local_only(ScoringEngine::default()),
            catalog: standard_catalog(),
        };
        let responses = Arc::new(ResponseService::new(Arc::new(
            InMemoryResponseRepository::default(),
        )));
        let router = with_mission_routes(assessment, responses).layer(Extension(state));
        (router, readiness)
    }

    async fn read_body(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body")
            .to_vec()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn index_describes_the_service() {
        let (router, _) = app(true);
        let response = router.oneshot(get_request("/")).await.expect("responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, INDEX_BANNER.as_bytes());
    }

    #[tokio::test]
    async fn api_health_reports_ok_with_timestamp() {
        let (router, _) = app(true);
        let response = router
            .oneshot(get_request("/api/health"))
            .await
            .expect("responds");
        let body: serde_json::Value =
            serde_json::from_slice(&read_body(response).await).expect("json body");
        assert_eq!(body["ok"], true);
        let time = body["time"].as_str().expect("time string");
        assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        let (router, readiness) = app(false);
        let response = router
            .clone()
            .oneshot(get_request("/ready"))
            .await
            .expect("responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        readiness.store(true, Ordering::Release);
        let response = router.oneshot(get_request("/ready")).await.expect("responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn merged_router_serves_catalog_and_stats() {
        let (router, _) = app(true);
        let catalog = router
            .clone()
            .oneshot(get_request("/api/catalog"))
            .await
            .expect("responds");
        assert_eq!(catalog.status(), StatusCode::OK);

        let stats = router
            .oneshot(get_request("/api/stats/mission-secure-v1"))
            .await
            .expect("responds");
        assert_eq!(stats.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_slice(&read_body(stats).await).expect("json body");
        assert_eq!(body["totalResponses"], 0);
    }

    #[tokio::test]
    async fn metrics_are_rendered_as_prometheus_text() {
        let (router, _) = app(true);
        let response = router
            .oneshot(get_request("/metrics"))
            .await
            .expect("responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
