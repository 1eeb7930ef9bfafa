use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::assessment::domain::AnswerWeight;
use crate::assessment::refinement::Refiner;

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn catalog_route_can_return_canonical_order() {
    let response = assessment_app(None)
        .oneshot(
            Request::get("/api/catalog?shuffle=false")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["quizId"], "mission-secure-v1");
    let ids: Vec<&str> = body["questions"]
        .as_array()
        .expect("questions array")
        .iter()
        .map(|question| question["id"].as_str().expect("id"))
        .collect();
    assert_eq!(
        ids,
        ["q1", "q2", "q3", "q4", "q5", "q6", "q7", "q8", "q9", "q10"]
    );
}

#[tokio::test]
async fn catalog_route_shuffles_by_default() {
    let response = assessment_app(None)
        .oneshot(
            Request::get("/api/catalog")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    let body = read_json_body(response).await;
    let questions = body["questions"].as_array().expect("questions array");
    assert_eq!(questions.len(), 10);
    assert!(questions
        .iter()
        .all(|question| question["options"].as_array().map(Vec::len) == Some(3)));
}

#[tokio::test]
async fn score_route_returns_result_and_report() {
    let answers = answers_all(AnswerWeight::Best);
    let response = assessment_app(None)
        .oneshot(post_json("/api/score", &json!({ "answers": answers })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["result"]["percent"], 100);
    assert_eq!(body["report"]["score"], 100);
    assert_eq!(body["report"]["celebrate"], true);
    assert_eq!(body["report"]["refined"], false);
}

#[tokio::test]
async fn score_route_rejects_invalid_weights() {
    let response = assessment_app(None)
        .oneshot(post_json(
            "/api/score",
            &json!({ "answers": { "q1": { "label": "Maybe", "weight": 0.7, "tag": "iffy" } } }),
        ))
        .await
        .expect("router responds");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn grade_route_echoes_clamped_local_values_without_refiner() {
    let response = assessment_app(None)
        .oneshot(post_json(
            "/api/grade",
            &json!({ "answers": {}, "localScore": 150, "localNotes": ["keep me"] }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body, json!({ "score": 100, "notes": ["keep me"], "refined": false }));
}

#[tokio::test]
async fn grade_route_tolerates_missing_body() {
    let response = assessment_app(None)
        .oneshot(
            Request::post("/api/grade")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body, json!({ "score": 0, "notes": [], "refined": false }));
}

#[tokio::test]
async fn grade_route_merges_refiner_reply() {
    let refiner: Arc<dyn Refiner> = Arc::new(FixedRefiner(json!({ "score": 61.6 })));
    let response = assessment_app(Some(refiner))
        .oneshot(post_json(
            "/api/grade",
            &json!({ "localScore": 70, "localNotes": ["local note"] }),
        ))
        .await
        .expect("router responds");

    let body = read_json_body(response).await;
    assert_eq!(body, json!({ "score": 62, "notes": ["local note"], "refined": true }));
}

#[tokio::test]
async fn grade_route_falls_back_when_refiner_fails() {
    let refiner: Arc<dyn Refiner> = Arc::new(UnreachableRefiner);
    let response = assessment_app(Some(refiner))
        .oneshot(post_json(
            "/api/grade",
            &json!({ "localScore": "45", "localNotes": ["a", 3, "b"] }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body, json!({ "score": 45, "notes": ["a", "b"], "refined": false }));
}
