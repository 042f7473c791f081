//! Integration tests for the coach-web server.
//!
//! These tests start a real axum server on a random port and exercise the
//! JSON endpoints. Most use a stub gateway with a canned completion; the
//! transport tests point the real HTTP gateway at a fake upstream server.

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use coach_rs::gateway::CompletionFuture;
use coach_rs::prelude::*;
use coach_web::{ErrorBody, WebConfig, spawn_web};
use serde_json::{Value, json};

// ── Helpers ──────────────────────────────────────────────────────────

/// Gateway that answers every request with the same text.
struct Fixed(String);

impl CompletionGateway for Fixed {
    fn complete<'a>(&'a self, _request: &'a CompletionRequest) -> CompletionFuture<'a> {
        let text = self.0.clone();
        Box::pin(async move { Ok(text) })
    }
}

/// Spawn a test server on port 0 around `coach` and return its base URL.
async fn spawn_with(coach: Coach) -> String {
    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        ..Default::default()
    };
    let addr = spawn_web(coach, config).await.unwrap();
    format!("http://{addr}")
}

async fn spawn_stubbed(reply: &str) -> String {
    spawn_with(Coach::new(Arc::new(Fixed(reply.to_string())))).await
}

async fn post_json(url: String, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap()
}

const PLAN: &str = r#"{
  "name": "Week 1 - Foundations",
  "focus": "weight-loss",
  "exercises": [
    {"name": "Squat", "sets": 3, "reps": 12, "weight": null, "duration": null, "restTime": 60,
     "difficulty": "beginner", "equipment": "Bodyweight", "instructions": "Sit back.",
     "muscleGroups": ["Legs"]},
    {"name": "Push-up", "sets": 3, "reps": 10, "weight": null, "duration": null, "restTime": 60,
     "difficulty": "beginner", "equipment": "Bodyweight", "instructions": "Brace.",
     "muscleGroups": ["Chest"]},
    {"name": "Glute bridge", "sets": 3, "reps": 15, "weight": null, "duration": null, "restTime": 45,
     "difficulty": "beginner", "equipment": "Bodyweight", "instructions": "Squeeze.",
     "muscleGroups": ["Glutes"]}
  ],
  "totalDuration": 30,
  "estimatedCalories": 200,
  "notes": "",
  "warmup": [{"name": "Marching", "duration": 120}],
  "cooldown": [{"name": "Stretch", "duration": 120}]
}"#;

fn beginner_profile() -> Value {
    json!({
        "fitnessLevel": "beginner",
        "goals": ["weight-loss"],
        "location": "home",
        "equipment": [],
        "workoutDuration": 30
    })
}

// ── Fake upstream ────────────────────────────────────────────────────

/// Last request body the fake upstream received.
type Captured = Arc<Mutex<Option<Value>>>;

async fn fake_completions(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer test-key");
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "bad key"}})),
        );
    }
    *captured.lock().unwrap() = Some(body);
    (
        StatusCode::OK,
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Drink water."}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        })),
    )
}

async fn overloaded() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "model overloaded")
}

/// Spawn a fake completions API and return its base URL.
async fn spawn_upstream(captured: Captured) -> String {
    let router = Router::new()
        .route("/ok/chat/completions", post(fake_completions))
        .route("/busy/chat/completions", post(overloaded))
        .with_state(captured);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_against(config: GatewayConfig) -> String {
    let coach = Coach::from_config(config, RetryConfig::default()).unwrap();
    spawn_with(coach).await
}

// ── Health ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
    let base = spawn_stubbed("unused").await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}

// ── Chat ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_returns_response() {
    let base = spawn_stubbed("Aim for 7-9 hours of sleep.").await;
    let resp = post_json(
        format!("{base}/ai-coach/chat"),
        json!({"message": "How much sleep?", "context": {"fitnessLevel": "beginner"}}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["response"], "Aim for 7-9 hours of sleep.");
}

#[tokio::test]
async fn chat_without_message_is_400() {
    let base = spawn_stubbed("unused").await;

    let resp = post_json(format!("{base}/ai-coach/chat"), json!({})).await;
    assert_eq!(resp.status(), 400);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.error, "Missing message");
    assert_eq!(body.code, "bad_request");

    let resp = post_json(format!("{base}/ai-coach/chat"), json!({"message": "   "})).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let base = spawn_stubbed("unused").await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/ai-coach/chat"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, "bad_request");
}

// ── Generate ─────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_returns_plan() {
    let base = spawn_stubbed(PLAN).await;
    let resp = post_json(
        format!("{base}/ai-coach/generate"),
        json!({"userProfile": beginner_profile(), "week": 1}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let plan: Value = resp.json().await.unwrap();
    assert_eq!(plan["exercises"].as_array().unwrap().len(), 3);
    assert_eq!(plan["totalDuration"], 30.0);
}

#[tokio::test]
async fn generate_without_profile_is_400() {
    let base = spawn_stubbed(PLAN).await;
    let resp = post_json(format!("{base}/ai-coach/generate"), json!({"week": 2})).await;
    assert_eq!(resp.status(), 400);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.error, "Missing userProfile");
}

#[tokio::test]
async fn generate_with_malformed_profile_is_400() {
    let base = spawn_stubbed(PLAN).await;
    let resp = post_json(
        format!("{base}/ai-coach/generate"),
        json!({"userProfile": {"fitnessLevel": "expert"}}),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: ErrorBody = resp.json().await.unwrap();
    assert!(body.error.starts_with("Invalid userProfile"), "{}", body.error);
}

#[tokio::test]
async fn generate_with_non_json_completion_is_validation_500() {
    let base = spawn_stubbed("Here is a great plan: do squats!").await;
    let resp = post_json(
        format!("{base}/ai-coach/generate"),
        json!({"userProfile": beginner_profile()}),
    )
    .await;
    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, "validation");
    assert_eq!(body.error, "failed to produce a valid workout plan");
}

#[tokio::test]
async fn generate_with_out_of_range_plan_is_validation_500() {
    let base = spawn_stubbed(&PLAN.replace("\"reps\": 12", "\"reps\": 25")).await;
    let resp = post_json(
        format!("{base}/ai-coach/generate"),
        json!({"userProfile": beginner_profile()}),
    )
    .await;
    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, "validation");
}

// ── Supplementary endpoints ──────────────────────────────────────────

#[tokio::test]
async fn analyze_returns_analysis() {
    let analysis = r#"{"strengths": ["consistency"], "weaknesses": ["mobility"],
        "plateaus": [], "recommendations": ["stretch daily"],
        "nextWeekAdjustments": "Add one mobility session.",
        "motivationalMessage": "Great work!"}"#;
    let base = spawn_stubbed(analysis).await;
    let resp = post_json(
        format!("{base}/ai-coach/analyze"),
        json!({
            "userProfile": beginner_profile(),
            "workoutHistory": [{"name": "Full body", "date": "2025-01-02", "duration": 30, "type": "strength"}],
            "personalRecords": []
        }),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["motivationalMessage"], "Great work!");
}

#[tokio::test]
async fn exercises_returns_list() {
    let list = r#"[{"name": "Row", "sets": 4, "reps": 8, "restTime": 90,
        "difficulty": "intermediate", "equipment": "Dumbbells",
        "instructions": "Pull to hip.", "muscleGroups": ["Back"]}]"#;
    let base = spawn_stubbed(list).await;
    let resp = post_json(
        format!("{base}/ai-coach/exercises"),
        json!({"muscleGroup": "back", "equipment": ["Dumbbells"], "difficulty": "intermediate"}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["exercises"][0]["name"], "Row");

    let resp = post_json(format!("{base}/ai-coach/exercises"), json!({})).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn form_tips_returns_text() {
    let base = spawn_stubbed("Keep your back neutral.").await;
    let resp = post_json(
        format!("{base}/ai-coach/form-tips"),
        json!({"exerciseName": "Deadlift"}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["tips"], "Keep your back neutral.");
}

// ── Real gateway against a fake upstream ─────────────────────────────

#[tokio::test]
async fn missing_key_is_configuration_500() {
    let captured = Captured::default();
    let upstream = spawn_upstream(captured.clone()).await;
    let base = spawn_against(GatewayConfig::default().with_base_url(format!("{upstream}/ok"))).await;

    let resp = post_json(format!("{base}/ai-coach/chat"), json!({"message": "hi"})).await;
    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, "configuration");
    assert!(body.error.contains("ZHIPU_API_KEY"));
    assert!(captured.lock().unwrap().is_none(), "no request should reach upstream");
}

#[tokio::test]
async fn upstream_error_status_is_transport_500() {
    let upstream = spawn_upstream(Captured::default()).await;
    let base = spawn_against(
        GatewayConfig::default()
            .with_api_key("test-key")
            .with_base_url(format!("{upstream}/busy")),
    )
    .await;

    let resp = post_json(format!("{base}/ai-coach/form-tips"), json!({"exerciseName": "Squat"})).await;
    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, "transport");
    assert!(body.error.contains("503"), "{}", body.error);
}

#[tokio::test]
async fn chat_reaches_upstream_with_conversation_shape() {
    let captured = Captured::default();
    let upstream = spawn_upstream(captured.clone()).await;
    let base = spawn_against(
        GatewayConfig::default()
            .with_api_key("test-key")
            .with_model("glm-test")
            .with_base_url(format!("{upstream}/ok")),
    )
    .await;

    let resp = post_json(
        format!("{base}/ai-coach/chat"),
        json!({"message": "Should I stretch?"}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["response"], "Drink water.");

    let sent = captured.lock().unwrap().clone().unwrap();
    assert_eq!(sent["model"], "glm-test");
    assert_eq!(sent["max_tokens"], 2000);
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "Should I stretch?");
}

#[tokio::test]
async fn chat_forwards_free_form_context() {
    let captured = Captured::default();
    let upstream = spawn_upstream(captured.clone()).await;
    let base = spawn_against(
        GatewayConfig::default()
            .with_api_key("test-key")
            .with_base_url(format!("{upstream}/ok")),
    )
    .await;

    let resp = post_json(
        format!("{base}/ai-coach/chat"),
        json!({
            "message": "I'm always tired.",
            "context": {"fitnessLevel": "Beginner", "workSchedule": "night shifts", "sleepHours": 5}
        }),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let sent = captured.lock().unwrap().clone().unwrap();
    let system = sent["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("night shifts"), "{system}");
    assert!(system.contains("\"sleepHours\": 5"), "{system}");
}

#[tokio::test]
async fn wrong_key_is_transport_500_with_401() {
    let upstream = spawn_upstream(Captured::default()).await;
    let base = spawn_against(
        GatewayConfig::default()
            .with_api_key("wrong")
            .with_base_url(format!("{upstream}/ok")),
    )
    .await;

    let resp = post_json(format!("{base}/ai-coach/chat"), json!({"message": "hi"})).await;
    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.code, "transport");
    assert!(body.error.contains("401"), "{}", body.error);
}

#[tokio::test]
async fn structured_call_uses_prompt_sampling() {
    let captured = Captured::default();
    let upstream = spawn_upstream(captured.clone()).await;
    let base = spawn_against(
        GatewayConfig::default()
            .with_api_key("test-key")
            .with_base_url(format!("{upstream}/ok")),
    )
    .await;

    // "Drink water." is not a plan, so this fails validation after the call.
    let resp = post_json(
        format!("{base}/ai-coach/generate"),
        json!({"userProfile": beginner_profile(), "week": 3,
               "previousFeedback": [{"feedback": "too easy", "rating": 4}]}),
    )
    .await;
    assert_eq!(resp.status(), 500);

    let sent = captured.lock().unwrap().clone().unwrap();
    assert_eq!(sent["max_tokens"], 4000);
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    let prompt = messages[0]["content"].as_str().unwrap();
    assert!(prompt.contains("too easy"));
    assert!(prompt.contains("increase intensity"));
}
