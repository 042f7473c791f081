//! Schema-validated bridge between a fitness coaching app and an LLM.
//!
//! `coach-rs` turns a user's training profile into prompts for an
//! OpenAI-compatible chat completions endpoint and refuses to hand back
//! anything the model produced until it has passed schema validation.
//! The pipeline has three pieces:
//!
//! - [`prompt`] — pure builders that render a profile, feedback history or
//!   chat context into prompt text, including the JSON shape the model must
//!   answer with.
//! - [`gateway`] — the [`CompletionGateway`](gateway::CompletionGateway)
//!   trait, its HTTP implementation, and an optional retry decorator.
//! - [`schema`] — the registry of JSON Schemas derived from the output
//!   types in [`plan`], used to parse and validate raw model text.
//!
//! [`Coach`](coach::Coach) wires the three together into typed operations.
//!
//! # Getting started
//!
//! ```ignore
//! use coach_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CoachError> {
//!     let coach = Coach::from_config(GatewayConfig::from_env(), RetryConfig::default())?;
//!
//!     let profile: UserProfile = serde_json::from_str(
//!         r#"{"fitnessLevel":"beginner","goals":["weight-loss"],"workoutDuration":30}"#,
//!     )
//!     .unwrap();
//!
//!     let plan = coach.generate_workout_plan(&profile, 1, &[]).await?;
//!     println!("{} ({} exercises)", plan.name, plan.exercises.len());
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every operation fails with a [`CoachError`](error::CoachError) of one of
//! three kinds: configuration (no credential), transport (the endpoint was
//! unreachable or answered with a non-success status), or validation (the
//! model's text did not parse or did not match the schema). Transport and
//! validation failures are never conflated: the gateway does no parsing of
//! the completion content.

pub mod coach;
pub mod config;
pub mod error;
pub mod gateway;
pub mod plan;
pub mod prelude;
pub mod profile;
pub mod prompt;
pub mod schema;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Re-export schemars for downstream crates.
pub use schemars;

// ── Constants ──────────────────────────────────────────────────────

/// Default base URL of the completion API (Zhipu GLM, OpenAI-compatible).
pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Default model for all completion calls.
pub const DEFAULT_MODEL: &str = "glm-3-turbo";

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`.
///
/// # Example
///
/// ```
/// use coach_rs::json_schema_for;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct Warmup {
///     name: String,
///     #[schemars(range(min = 10, max = 600))]
///     duration: u32,
/// }
///
/// let schema = json_schema_for::<Warmup>();
/// assert_eq!(schema["type"], "object");
/// assert_eq!(schema["properties"]["duration"]["maximum"], 600.0);
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body, as accepted by OpenAI-compatible
/// endpoints.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
        }
    }
}

/// A message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
pub(crate) struct RawChatResponse {
    pub(crate) choices: Option<Vec<RawChoice>>,
    pub(crate) error: Option<ApiErrorResponse>,
    #[serde(default)]
    pub(crate) usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RawChoice {
    pub(crate) message: RawResponseMessage,
    pub(crate) finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RawResponseMessage {
    pub(crate) content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorResponse {
    pub(crate) message: String,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}
