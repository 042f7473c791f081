//! JSON endpoint handlers.
//!
//! Every handler takes its body as `Result<Json<T>, JsonRejection>` so a
//! malformed request becomes a 400 in the same `{error, code}` shape as
//! every other failure, instead of axum's plain-text rejection.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coach_rs::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub coach: Coach,
}

// ── Errors ─────────────────────────────────────────────────────────

/// Body of every non-200 response.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    /// `bad_request`, or one of `configuration | transport | validation`.
    pub code: String,
}

/// Handler failure, rendered as `{error, code}`.
#[derive(Debug)]
pub enum ApiError {
    /// The request itself was unusable. 400.
    BadRequest(String),
    /// The coaching pipeline failed. 500.
    Coach(CoachError),
}

impl From<CoachError> for ApiError {
    fn from(e: CoachError) -> Self {
        ApiError::Coach(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => {
                debug!("Rejected request: {message}");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: message,
                        code: "bad_request".into(),
                    },
                )
            }
            ApiError::Coach(e) => {
                error!("Coach operation failed ({}): {e}", e.kind());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: e.to_string(),
                        code: e.kind().as_str().into(),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Treat `None`, empty and whitespace-only strings as missing.
fn required(value: Option<String>, missing: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(missing.to_string())),
    }
}

/// The profile is taken as raw JSON first so that "absent" and "present
/// but malformed" produce different messages.
fn parse_profile(value: Option<serde_json::Value>) -> Result<UserProfile, ApiError> {
    match value {
        None | Some(serde_json::Value::Null) => {
            Err(ApiError::BadRequest("Missing userProfile".into()))
        }
        Some(v) => serde_json::from_value(v)
            .map_err(|e| ApiError::BadRequest(format!("Invalid userProfile: {e}"))),
    }
}

// ── Health ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// GET /health
pub async fn get_health() -> Json<Health> {
    Json(Health { status: "ok" })
}

// ── Chat ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChatBody {
    pub message: Option<String>,
    pub context: Option<ChatContext>,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub response: String,
}

/// POST /ai-coach/chat — One conversational turn.
pub async fn post_chat(
    State(app): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> ApiResult<ChatReply> {
    let Json(body) = body?;
    let message = required(body.message, "Missing message")?;
    let response = app.coach.chat(&message, body.context.as_ref()).await?;
    Ok(Json(ChatReply { response }))
}

// ── Workout generation ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub user_profile: Option<serde_json::Value>,
    pub week: Option<u32>,
    pub previous_feedback: Option<Vec<FeedbackEntry>>,
}

/// POST /ai-coach/generate — A schema-valid workout plan.
pub async fn post_generate(
    State(app): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> ApiResult<WorkoutPlan> {
    let Json(body) = body?;
    let profile = parse_profile(body.user_profile)?;
    let week = body.week.unwrap_or(1);
    let feedback = body.previous_feedback.unwrap_or_default();
    debug!(
        "Generating week {week} plan ({} level, {} feedback entries)",
        profile.fitness_level,
        feedback.len()
    );
    let plan = app
        .coach
        .generate_workout_plan(&profile, week, &feedback)
        .await?;
    Ok(Json(plan))
}

// ── Progress analysis ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    pub user_profile: Option<serde_json::Value>,
    pub workout_history: Option<Vec<WorkoutRecord>>,
    pub personal_records: Option<Vec<PersonalRecord>>,
}

/// POST /ai-coach/analyze
pub async fn post_analyze(
    State(app): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> ApiResult<ProgressAnalysis> {
    let Json(body) = body?;
    let profile = parse_profile(body.user_profile)?;
    let history = body.workout_history.unwrap_or_default();
    let records = body.personal_records.unwrap_or_default();
    let analysis = app
        .coach
        .analyze_progress(&profile, &history, &records)
        .await?;
    Ok(Json(analysis))
}

// ── Exercise library ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisesBody {
    pub muscle_group: Option<String>,
    pub equipment: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Serialize)]
pub struct ExercisesReply {
    pub exercises: Vec<Exercise>,
}

/// POST /ai-coach/exercises
pub async fn post_exercises(
    State(app): State<AppState>,
    body: Result<Json<ExercisesBody>, JsonRejection>,
) -> ApiResult<ExercisesReply> {
    let Json(body) = body?;
    let muscle_group = required(body.muscle_group, "Missing muscleGroup")?;
    let equipment = body.equipment.unwrap_or_default();
    let difficulty = body.difficulty.unwrap_or(Difficulty::Beginner);
    let exercises = app
        .coach
        .suggest_exercises(&muscle_group, &equipment, difficulty)
        .await?;
    Ok(Json(ExercisesReply { exercises }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTipsBody {
    pub exercise_name: Option<String>,
}

#[derive(Serialize)]
pub struct FormTipsReply {
    pub tips: String,
}

/// POST /ai-coach/form-tips
pub async fn post_form_tips(
    State(app): State<AppState>,
    body: Result<Json<FormTipsBody>, JsonRejection>,
) -> ApiResult<FormTipsReply> {
    let Json(body) = body?;
    let exercise = required(body.exercise_name, "Missing exerciseName")?;
    let tips = app.coach.form_tips(&exercise).await?;
    Ok(Json(FormTipsReply { tips }))
}
