//! In-process tests for the HTTP API, driving the axum router directly.


use std::sync::Arc;

use assistants_client::AssistantsClient;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chat_service::{build_router, PersonaLoader, ServiceConfig, SessionManager};
use mockito::{Matcher, ServerGuard};
use openai_mock::{assistant_json, message_json, messages_list_json, run_json, thread_json};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> ServiceConfig {
    ServiceConfig {
        openai_api_key: "sk-test-key".to_string(),
        openai_base_url: None,
        model: "gpt-4-turbo-preview".to_string(),
        assistant_name: "Chatbot Assistant".to_string(),
        persona_file: "./persona.txt".to_string(),
        persona_poll_interval_secs: 60,
        run_poll_interval_ms: 5,
        host: "127.0.0.1".to_string(),
        port: 0,
        log_file: None,
    }
}

/// Builds the router on top of a SessionManager wired to the mock backend.
async fn test_app(server: &mut ServerGuard) -> Router {
    server
        .mock("POST", "/assistants")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(assistant_json("asst_1"))
        .create_async()
        .await;

    let client = AssistantsClient::with_base_url("sk-test-key".to_string(), server.url());
    let persona = Arc::new(PersonaLoader::new("./persona-that-does-not-exist.txt"));
    let session = SessionManager::initialize(client, persona, &test_config())
        .await
        .expect("SessionManager::initialize must succeed with mocked backend");
    build_router(Arc::new(session))
}

async fn request_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(b) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_chat_rejects_missing_fields() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&mut server).await;

    let (status, body) =
        request_json(&app, Method::POST, "/api/chat", Some(json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) =
        request_json(&app, Method::POST, "/api/chat", Some(json!({"userId": "u1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request_json(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({"userId": "", "message": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_service_up() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&mut server).await;

    let (status, body) = request_json(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "UP", "service": "chat-service"}));
}

#[tokio::test]
async fn test_reset_returns_confirmation_payload() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&mut server).await;

    let (status, body) = request_json(&app, Method::DELETE, "/api/thread/u42", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Thread reset successfully", "userId": "u42"})
    );
}

#[tokio::test]
async fn test_chat_end_to_end_reuses_thread() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&mut server).await;

    let thread_create = server
        .mock("POST", "/threads")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(thread_json("thread_1"))
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/threads/thread_1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(message_json("msg_u", "thread_1", "user", "hi"))
        .create_async()
        .await;
    server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(run_json("run_1", "thread_1", "queued"))
        .create_async()
        .await;
    server
        .mock("GET", "/threads/thread_1/runs/run_1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(run_json("run_1", "thread_1", "completed"))
        .create_async()
        .await;
    server
        .mock("GET", "/threads/thread_1/messages")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(messages_list_json(&[message_json(
            "msg_a", "thread_1", "assistant", "Hi u1!",
        )]))
        .create_async()
        .await;

    let (status, first) = request_json(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({"userId": "u1", "message": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["response"], "Hi u1!");
    assert_eq!(first["threadId"], "thread_1");

    let (status, second) = request_json(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({"userId": "u1", "message": "something else"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["threadId"], first["threadId"]);

    thread_create.assert_async().await;
}

#[tokio::test]
async fn test_chat_backend_failure_still_returns_200() {
    let mut server = mockito::Server::new_async().await;
    let app = test_app(&mut server).await;
    server
        .mock("POST", "/threads")
        .with_status(500)
        .with_body(r#"{"error": {"message": "boom", "type": "server_error"}}"#)
        .create_async()
        .await;

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({"userId": "u1", "message": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("Sorry, an error occurred:"));
    assert_eq!(body["threadId"], Value::Null);
}
