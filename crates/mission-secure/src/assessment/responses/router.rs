use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::NewResponse;
use super::repository::ResponseRepository;
use super::service::{ResponseService, ResponseServiceError};

/// Router exposing response logging and the statistics view.
pub fn response_router<R>(service: Arc<ResponseService<R>>) -> Router
where
    R: ResponseRepository + 'static,
{
    Router::new()
        .route("/responses", post(record_handler::<R>))
        .route("/api/stats/:quiz_id", get(stats_handler::<R>))
        .with_state(service)
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<ResponseService<R>>>,
    axum::Json(response): axum::Json<NewResponse>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    match service.record(response) {
        Ok(event) => (
            StatusCode::CREATED,
            axum::Json(json!({ "ok": true, "id": event.id })),
        )
            .into_response(),
        Err(ResponseServiceError::Validation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            tracing::error!(error = %other, "failed to store response");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn stats_handler<R>(
    State(service): State<Arc<ResponseService<R>>>,
    Path(quiz_id): Path<String>,
) -> Response
where
    R: ResponseRepository + 'static,
{
    match service.stats(&quiz_id) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(other) => {
            tracing::error!(error = %other, quiz_id = %quiz_id, "failed to aggregate stats");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
