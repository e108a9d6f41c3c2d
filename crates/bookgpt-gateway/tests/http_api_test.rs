//! HTTP contract tests: the router is driven directly with `oneshot`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bookgpt_core::book::BookLibrary;
use bookgpt_core::prompt::Prompt;
use bookgpt_core::provider::{Completion, GenerationProvider, ProviderChain};
use bookgpt_gateway::{Gateway, GatewayConfig, GatewayState};
use bookgpt_providers::ProviderRouter;

const BODY_LIMIT: usize = 1_048_576;

#[derive(Debug, Clone, Copy)]
enum Script {
    Reply(&'static str),
    Panic,
}

/// Provider that counts calls and follows a fixed script
#[derive(Debug)]
struct CountingProvider {
    script: Script,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl GenerationProvider for CountingProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _prompt: &Prompt) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::Reply(content) => Ok(Completion {
                provider: "scripted".to_string(),
                content: content.to_string(),
                token_cost: 10,
            }),
            Script::Panic => panic!("provider exploded"),
        }
    }
}

fn app_with_chain(chain: ProviderChain) -> Router {
    let state = GatewayState::new(GatewayConfig::new(), BookLibrary::builtin(), chain);
    Gateway::with_state(state).build_router()
}

fn scripted_app(script: Script) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider {
        script,
        calls: calls.clone(),
    };
    let chain = ProviderChain::new(vec![Arc::new(provider)]).with_timeout(Duration::from_secs(5));
    (app_with_chain(chain), calls)
}

/// Both real providers present but without credentials
fn keyless_app() -> Router {
    let router = ProviderRouter::from_lookup(&|_: &str| -> Option<String> { None });
    app_with_chain(router.into_chain(Duration::from_secs(5)))
}

async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, String, Option<String>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, text, _) = post_raw(app, uri, body.to_string()).await;
    (status, serde_json::from_str(&text).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn scenario_a_inputs() -> Value {
    json!({
        "currentScenario": "legacy systems",
        "industry": "Retail",
        "intendedToBe": "omnichannel leader",
        "goal": "increase online revenue",
        "marketSegment": "",
        "additionalContext": ""
    })
}

fn stakeholder_inputs(stakeholders: Value) -> Value {
    json!({
        "transformationContext": "Moving the bank to cloud core banking",
        "successDefinition": "All branches on the new core by Q4",
        "keyChallenges": "Legacy skills, regulator scrutiny",
        "timeline": "12 months",
        "stakeholders": stakeholders
    })
}

#[tokio::test]
async fn test_mission_vision_without_credentials_falls_back() {
    let (status, body) = post_json(
        keyless_app(),
        "/api/mission-vision",
        json!({ "userInputs": scenario_a_inputs() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], json!("fallback"));
    let options = body["options"].as_array().unwrap();
    assert_eq!(options.len(), 3);
    for option in options {
        let mission = option["mission"].as_str().unwrap().to_lowercase();
        assert!(mission.contains("retail"), "{}", mission);
    }
}

#[tokio::test]
async fn test_chat_empty_message_is_rejected() {
    let (app, calls) = scripted_app(Script::Reply("unused"));
    let (status, body) = post_json(app, "/api/chat", json!({ "message": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "response": "Invalid message format",
            "success": false,
            "error": "Message is required and must be a string"
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chat_non_string_message_is_rejected() {
    let (status, body) = post_json(keyless_app(), "/api/chat", json!({ "message": 42 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Message is required and must be a string"));
}

#[tokio::test]
async fn test_chat_book_without_author_still_answers() {
    let (status, body) = post_json(
        keyless_app(),
        "/api/chat",
        json!({
            "message": "Who is Darcy?",
            "book": { "id": 3, "title": "Pride and Prejudice" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], json!("fallback"));
    assert!(body["response"].as_str().unwrap().contains("Who is Darcy?"));
}

#[tokio::test]
async fn test_chat_unparseable_body_is_not_blamed_on_message() {
    let (status, text, _) = post_raw(keyless_app(), "/api/chat", "{\"message\": ".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["response"], json!("Invalid message format"));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_stakeholder_empty_list_never_reaches_providers() {
    let (app, calls) = scripted_app(Script::Reply("{}"));
    let (status, body) = post_json(
        app,
        "/api/stakeholder-motivation",
        stakeholder_inputs(json!([])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["strategy"], json!(null));
    assert!(body["error"].as_str().unwrap().contains("stakeholders"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stakeholder_missing_subfields_are_indexed() {
    let (status, body) = post_json(
        keyless_app(),
        "/api/stakeholder-motivation",
        stakeholder_inputs(json!([
            { "name": "Ana", "role": "CFO", "influenceLevel": "High", "interestLevel": "Low" },
            { "name": "Raj", "influenceLevel": "Low" }
        ])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("Missing required fields: stakeholders[1].role, stakeholders[1].interestLevel")
    );
}

#[tokio::test]
async fn test_stakeholder_fallback_builds_default_strategy() {
    let (status, body) = post_json(
        keyless_app(),
        "/api/stakeholder-motivation",
        stakeholder_inputs(json!([
            { "name": "Ana", "role": "CFO", "influenceLevel": "High", "interestLevel": "High" },
            { "name": "Raj", "role": "Teller", "influenceLevel": "Low", "interestLevel": "High" }
        ])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("fallback"));
    let mappings = body["strategy"]["stakeholderMappings"].as_array().unwrap();
    assert_eq!(mappings.len(), 2);
    assert_eq!(body["strategy"]["communicationTimeline"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_mission_vision_requires_user_inputs() {
    let (status, body) = post_json(keyless_app(), "/api/mission-vision", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "options": [], "success": false, "error": "User inputs are required" })
    );
}

#[tokio::test]
async fn test_mission_vision_lists_every_missing_field() {
    let (status, body) = post_json(
        keyless_app(),
        "/api/mission-vision",
        json!({ "userInputs": { "currentScenario": "paper forms", "intendedToBe": " " } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("Missing required fields: industry, goal, intendedToBe")
    );
}

#[tokio::test]
async fn test_mission_vision_uses_provider_json() {
    let reply = r#"Sure! {"options":[{"id":"a","approach":"Lean","mission":"M","vision":"V","rationale":"R"}]} Enjoy."#;
    let (app, calls) = scripted_app(Script::Reply(reply));
    let (status, body) = post_json(
        app,
        "/api/mission-vision",
        json!({ "userInputs": scenario_a_inputs() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("provider"));
    assert_eq!(body["options"][0]["approach"], json!("Lean"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_chat_reply_from_provider() {
    let (app, _) = scripted_app(Script::Reply("  Gatsby longs for the past.  "));
    let (status, body) = post_json(
        app,
        "/api/chat",
        json!({
            "message": "What does the green light mean?",
            "book": { "id": 1, "title": "The Great Gatsby", "author": "F. Scott Fitzgerald" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "response": "Gatsby longs for the past.",
            "success": true,
            "source": "provider"
        })
    );
}

#[tokio::test]
async fn test_chat_panic_becomes_generic_500() {
    let (app, _) = scripted_app(Script::Panic);
    let (status, body) = post_json(app, "/api/chat", json!({ "message": "Hello" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Internal server error"));
    assert_eq!(
        body["response"],
        json!("I'm sorry, I encountered an error while processing your request. Please try again.")
    );
}

#[tokio::test]
async fn test_structured_panic_returns_empty_payload() {
    let (app, _) = scripted_app(Script::Panic);
    let (status, body) = post_json(
        app,
        "/api/mission-vision",
        json!({ "userInputs": scenario_a_inputs() }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["options"], json!([]));
    assert!(!body["error"].as_str().unwrap().contains("exploded"));
}

#[tokio::test]
async fn test_chat_stream_sends_words_then_done() {
    let (app, _) = scripted_app(Script::Reply("Hello there reader"));
    let (status, text, content_type) = post_raw(
        app,
        "/api/chat/stream",
        json!({ "message": "Hi" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/event-stream"));
    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .collect();
    assert_eq!(
        data,
        vec![
            r#"{"chunk":"Hello "}"#,
            r#"{"chunk":"there "}"#,
            r#"{"chunk":"reader "}"#,
            "[DONE]"
        ]
    );
}

#[tokio::test]
async fn test_chat_stream_validation_matches_chat() {
    let (status, text, _) =
        post_raw(keyless_app(), "/api/chat/stream", json!({ "message": "   " }).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["response"], json!("Invalid message format"));
}

#[tokio::test]
async fn test_mission_vision_revision_requires_all_parts() {
    let (status, body) = post_json(keyless_app(), "/api/mission-vision/revise", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("Missing required fields: feedback, originalData, currentResults")
    );
    assert_eq!(body["options"], json!([]));
}

#[tokio::test]
async fn test_mission_vision_revision_fallback() {
    let (status, body) = post_json(
        keyless_app(),
        "/api/mission-vision/revise",
        json!({
            "feedback": "Make it shorter",
            "originalData": scenario_a_inputs(),
            "currentResults": [
                { "id": "option-1", "approach": "A", "mission": "M", "vision": "V", "rationale": "R" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("fallback"));
    assert_eq!(body["options"][0]["id"], json!("revised-fallback-1"));
}

#[tokio::test]
async fn test_stakeholder_revision_fallback_quotes_feedback() {
    let original = stakeholder_inputs(json!([
        { "name": "Ana", "role": "CFO", "influenceLevel": "High", "interestLevel": "High" }
    ]));
    let (status, body) = post_json(
        keyless_app(),
        "/api/stakeholder-motivation/revise",
        json!({
            "feedback": "Involve the CFO earlier",
            "originalData": original,
            "currentResults": { "stakeholderMappings": [] }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["strategy"]["overallStrategy"]
        .as_str()
        .unwrap()
        .starts_with("Revised engagement approach addressing: Involve the CFO earlier..."));
}

#[tokio::test]
async fn test_malformed_body_is_a_bad_request() {
    let (status, text, _) =
        post_raw(keyless_app(), "/api/stakeholder-motivation", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_health_and_test_endpoints() {
    let (status, body) = get_json(keyless_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["version"], json!(bookgpt_gateway::VERSION));

    let (status, body) = get_json(keyless_app(), "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Server is working!"));
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_books_catalog() {
    let (status, body) = get_json(keyless_app(), "/api/books").await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"The 7Ms of Digital Transformation"));
    assert_eq!(titles.len(), 3);
}

#[tokio::test]
async fn test_status_reports_chain_order_and_availability() {
    let (status, body) = get_json(keyless_app(), "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mockMode"], json!(false));
    assert_eq!(
        body["providers"],
        json!([
            { "name": "gemini", "available": false },
            { "name": "openai", "available": false }
        ])
    );
}
