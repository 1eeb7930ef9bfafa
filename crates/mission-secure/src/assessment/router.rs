use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::assessor::Assessor;
use super::catalog::{QuestionCatalog, QUIZ_ID};
use super::domain::{AnswerMap, Question};
use super::refinement::{refine_or_fallback, RefinementRequest, ScoreSource};
use super::report::AssessmentReport;
use super::scoring::ScoreResult;
use super::shuffle::shuffle_questions_thread_rng;

/// Local notes forwarded to the refiner are capped at this many entries.
pub const MAX_LOCAL_NOTES: usize = 8;

#[derive(Clone)]
pub struct AssessmentState {
    pub assessor: Assessor,
    pub catalog: &'static QuestionCatalog,
}

/// Router exposing the catalog, local scoring, and the grading proxy.
pub fn assessment_router(state: AssessmentState) -> Router {
    Router::new()
        .route("/api/catalog", get(catalog_handler))
        .route("/api/score", post(score_handler))
        .route("/api/grade", post(grade_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogQuery {
    #[serde(default = "default_shuffle")]
    shuffle: bool,
}

fn default_shuffle() -> bool {
    true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CatalogResponse {
    quiz_id: &'static str,
    questions: Vec<Question>,
}

pub(crate) async fn catalog_handler(
    State(state): State<AssessmentState>,
    Query(query): Query<CatalogQuery>,
) -> axum::Json<CatalogResponse> {
    let questions = if query.shuffle {
        shuffle_questions_thread_rng(state.catalog)
    } else {
        state.catalog.questions().to_vec()
    };
    axum::Json(CatalogResponse {
        quiz_id: QUIZ_ID,
        questions,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    answers: AnswerMap,
    #[serde(default)]
    refine: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    result: ScoreResult,
    report: AssessmentReport,
}

pub(crate) async fn score_handler(
    State(state): State<AssessmentState>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> axum::Json<ScoreResponse> {
    let questions = state.catalog.questions();
    let result = state.assessor.score(&request.answers, questions);
    let report = if request.refine {
        state.assessor.assess(&request.answers, questions).await
    } else {
        AssessmentReport::local(&result, Utc::now())
    };
    axum::Json(ScoreResponse { result, report })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GradeRequest {
    #[serde(default)]
    answers: Value,
    #[serde(default)]
    local_score: Value,
    #[serde(default)]
    local_notes: Value,
}

/// Coerce a loosely typed score to 0..=100; anything non-numeric is 0.
fn coerce_score(raw: &Value) -> u8 {
    let numeric = match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    numeric
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(0)
}

fn coerce_notes(raw: &Value) -> Vec<String> {
    raw.as_array()
        .map(|notes| {
            notes
                .iter()
                .filter_map(Value::as_str)
                .take(MAX_LOCAL_NOTES)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) async fn grade_handler(
    State(state): State<AssessmentState>,
    body: Option<axum::Json<GradeRequest>>,
) -> Response {
    let request = body.map(|axum::Json(request)| request).unwrap_or_default();
    let refinement = RefinementRequest {
        answers: request.answers,
        local_score: coerce_score(&request.local_score),
        local_notes: coerce_notes(&request.local_notes),
    };

    let refined = refine_or_fallback(state.assessor.refiner(), &refinement).await;
    // `refined: false` marks an echo of the caller's own values.
    (
        StatusCode::OK,
        axum::Json(json!({
            "score": refined.score,
            "notes": refined.notes,
            "refined": refined.source == ScoreSource::Remote,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_are_coerced_like_loose_numbers() {
        assert_eq!(coerce_score(&json!(72)), 72);
        assert_eq!(coerce_score(&json!("64")), 64);
        assert_eq!(coerce_score(&json!(140)), 100);
        assert_eq!(coerce_score(&json!(-2)), 0);
        assert_eq!(coerce_score(&json!("high")), 0);
        assert_eq!(coerce_score(&Value::Null), 0);
    }

    #[test]
    fn notes_are_truncated_to_eight() {
        let notes: Vec<String> = (0..12).map(|index| format!("note {index}")).collect();
        assert_eq!(coerce_notes(&json!(notes)).len(), MAX_LOCAL_NOTES);
        assert!(coerce_notes(&json!("not a list")).is_empty());
    }
}
