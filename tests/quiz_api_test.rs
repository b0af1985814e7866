mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use common::{body_json, get, json_request, multipart_request, Part, StubCompletion, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn home_reports_status() {
    let app = TestApp::with_completion(StubCompletion::failing());

    let resp = app.router.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"status": "StudySync Backend Running"})
    );
}

#[tokio::test]
async fn full_bank_is_returned_as_a_permutation() {
    let app = TestApp::with_completion(StubCompletion::failing());
    app.write_bank("1", 5);

    for _ in 0..5 {
        let req = json_request("POST", "/get-quiz", &json!({"units": ["1"]}));
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        let questions = body["quiz"]["unit_1"].as_array().expect("unit_1 present");
        let texts: HashSet<_> = questions
            .iter()
            .map(|q| q["question"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(questions.len(), 5);
        assert_eq!(texts.len(), 5);
        for i in 0..5 {
            assert!(texts.contains(&format!("Unit 1 question {}", i)));
        }
    }
}

#[tokio::test]
async fn large_bank_is_sampled_down_without_repeats() {
    let app = TestApp::with_completion(StubCompletion::failing());
    app.write_bank("2", 30);

    let req = json_request("POST", "/get-quiz", &json!({"units": [2]}));
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let questions = body["quiz"]["unit_2"].as_array().unwrap();
    let texts: HashSet<_> = questions.iter().map(|q| q["question"].to_string()).collect();
    assert_eq!(questions.len(), 5);
    assert_eq!(texts.len(), 5);
    assert!(questions.iter().all(|q| q["options"].as_array().unwrap().len() == 4));
}

#[tokio::test]
async fn unknown_units_are_absent_from_the_quiz() {
    let app = TestApp::with_completion(StubCompletion::failing());
    app.write_bank("1", 5);

    let req = json_request(
        "POST",
        "/get-quiz",
        &json!({"units": ["9", "1", "../unit1"]}),
    );
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let quiz = body["quiz"].as_object().unwrap();
    assert_eq!(quiz.keys().collect::<Vec<_>>(), vec!["unit_1"]);
    assert!(!quiz.contains_key("unit_9"));
}

#[tokio::test]
async fn empty_unit_list_gives_empty_quiz() {
    let app = TestApp::with_completion(StubCompletion::failing());

    let req = json_request("POST", "/get-quiz", &json!({"units": []}));
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"quiz": {}}));
}

#[tokio::test]
async fn undersized_bank_is_a_server_error() {
    let app = TestApp::with_completion(StubCompletion::failing());
    app.write_bank("3", 4);

    let req = json_request("POST", "/get-quiz", &json!({"units": ["3"]}));
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(resp).await;
    assert_eq!(
        body["error"],
        "Question bank for unit 3 has 4 questions, 5 requested"
    );
}

#[tokio::test]
async fn malformed_bank_is_a_server_error() {
    let app = TestApp::with_completion(StubCompletion::failing());
    app.write_raw_bank("1", "{not json");

    let req = json_request("POST", "/get-quiz", &json!({"units": ["1"]}));
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(resp).await;
    let error = body["error"].as_str().expect("error message");
    assert!(error.starts_with("Invalid question bank"), "{}", error);
}

#[tokio::test]
async fn malformed_request_body_is_rejected() {
    let app = TestApp::with_completion(StubCompletion::failing());

    let req = json_request("POST", "/get-quiz", &json!({"unit": ["1"]}));
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn provider_failure_serves_the_fixed_mock_quiz() {
    let stub = StubCompletion::failing();
    let app = TestApp::with_completion(stub.clone());

    let resp = app.router.clone().oneshot(get("/generate-quiz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "source": "mock",
            "quiz": [
                {
                    "question": "What is DBMS?",
                    "options": ["Software", "Hardware", "Network", "Protocol"],
                    "answer": 0
                },
                {
                    "question": "Which language is used to query databases?",
                    "options": ["HTML", "SQL", "CSS", "Python"],
                    "answer": 1
                }
            ]
        })
    );
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn generated_quiz_uses_uploaded_syllabus_names() {
    let stub = StubCompletion::replying("[{\"question\": \"What is 3NF?\"}]");
    let app = TestApp::with_completion(stub.clone());

    let upload = multipart_request(
        "/upload-syllabus",
        &[Part::file("syllabus", "normalization.pdf", b"%PDF")],
    );
    let resp = app.router.clone().oneshot(upload).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.router.clone().oneshot(get("/generate-quiz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"source": "openai", "quiz": "[{\"question\": \"What is 3NF?\"}]"})
    );
    assert_eq!(
        stub.last_user_prompt().as_deref(),
        Some("Syllabus topics: normalization.pdf")
    );
}
