use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use mission_secure::assessment::domain::AnswerTag;
use mission_secure::assessment::responses::{
    response_router, HttpResponseLogger, InMemoryResponseRepository, NewResponse,
    ResponseLogWorker, ResponseService, ResponseSink,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn response(session_id: &str, question_id: &str, label: &str, weight: f64) -> NewResponse {
    let tag = match weight {
        w if w >= 1.0 => AnswerTag::Best,
        w if w > 0.0 => AnswerTag::Iffy,
        _ => AnswerTag::Bad,
    };
    NewResponse {
        session_id: session_id.to_string(),
        quiz_id: "mission-secure-v1".to_string(),
        question_id: question_id.to_string(),
        option_label: label.to_string(),
        option_tag: tag,
        weight,
    }
}

fn post_response(body: &Value) -> Request<Body> {
    Request::post("/responses")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize")))
        .expect("request builds")
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn responses_route_stores_events_and_stats_aggregate_them() {
    let repository = Arc::new(InMemoryResponseRepository::default());
    let router = response_router(Arc::new(ResponseService::new(repository.clone())));

    for (session, label, weight) in [("s1", "Yes", 1.0), ("s2", "Yes", 1.0), ("s3", "No", 0.0)] {
        let body = serde_json::to_value(response(session, "q1", label, weight)).expect("json");
        let reply = router
            .clone()
            .oneshot(post_response(&body))
            .await
            .expect("router responds");
        assert_eq!(reply.status(), StatusCode::CREATED);
        let payload = read_json_body(reply).await;
        assert_eq!(payload["ok"], true);
        assert!(payload["id"].as_str().is_some());
    }
    assert_eq!(repository.len(), 3);

    let stats = router
        .oneshot(
            Request::get("/api/stats/mission-secure-v1")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(stats.status(), StatusCode::OK);

    let payload = read_json_body(stats).await;
    assert_eq!(payload["totalResponses"], 3);
    assert_eq!(payload["sessions"], 3);
    let question = &payload["questions"][0];
    assert_eq!(question["questionId"], "q1");
    assert_eq!(question["total"], 3);
    let yes = question["options"]
        .as_array()
        .expect("options")
        .iter()
        .find(|option| option["label"] == "Yes")
        .expect("yes option");
    assert_eq!(yes["count"], 2);
}

#[tokio::test]
async fn responses_route_rejects_out_of_set_weight() {
    let repository = Arc::new(InMemoryResponseRepository::default());
    let router = response_router(Arc::new(ResponseService::new(repository.clone())));

    let body = json!({
        "sessionId": "s1",
        "quizId": "mission-secure-v1",
        "questionId": "q1",
        "optionLabel": "Maybe",
        "optionTag": "iffy",
        "weight": 0.7
    });
    let reply = router
        .oneshot(post_response(&body))
        .await
        .expect("router responds");

    assert_eq!(reply.status(), StatusCode::BAD_REQUEST);
    assert!(repository.is_empty());
}

#[tokio::test]
async fn responses_route_rejects_tag_that_contradicts_weight() {
    let repository = Arc::new(InMemoryResponseRepository::default());
    let router = response_router(Arc::new(ResponseService::new(repository.clone())));

    let body = json!({
        "sessionId": "s1",
        "quizId": "mission-secure-v1",
        "questionId": "q1",
        "optionLabel": "No",
        "optionTag": "best",
        "weight": 0
    });
    let reply = router
        .oneshot(post_response(&body))
        .await
        .expect("router responds");

    assert_eq!(reply.status(), StatusCode::BAD_REQUEST);
    assert!(repository.is_empty());
}

#[tokio::test]
async fn worker_forwards_events_over_http_and_survives_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_partial_json(json!({ "questionId": "q2" })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true, "id": "x" })))
        .mount(&server)
        .await;

    let logger = HttpResponseLogger::new(server.uri(), Duration::from_secs(5)).expect("client");
    let (sink, rx) = ResponseSink::channel();
    let handle = ResponseLogWorker::new(rx, Arc::new(logger)).spawn();

    sink.submit(response("s1", "q1", "Yes", 1.0));
    sink.submit(response("s1", "q2", "No", 0.0));
    sink.submit(response("s1", "q3", "Partly", 0.5));
    drop(sink);

    let summary = handle.await.expect("worker joins");
    assert_eq!(summary.delivered, 2);
    assert_eq!(summary.dropped, 1);
}
