//! Schema registry for structured model output.
//!
//! Each [`SchemaKind`] owns a JSON Schema generated from its Rust type in
//! [`plan`](crate::plan). Raw model text goes through two stages before it
//! is trusted:
//!
//! 1. **Parse** — trim the text, drop one enclosing Markdown code fence if
//!    present, and decode JSON.
//! 2. **Schema** — run the compiled validator and collect *every*
//!    violation, then deserialize into the typed value.
//!
//! A failure at either stage is a [`ValidationError`]; no partial value is
//! ever returned.

use std::fmt;
use std::sync::LazyLock;

use jsonschema::Validator;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::ValidationError;
use crate::json_schema_for;
use crate::plan::{Exercise, ProgressAnalysis, WorkoutPlan};

/// The structured payloads the model can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    WorkoutPlan,
    ExerciseList,
    ProgressAnalysis,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 3] = [
        SchemaKind::WorkoutPlan,
        SchemaKind::ExerciseList,
        SchemaKind::ProgressAnalysis,
    ];

    /// Human-readable label, used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            SchemaKind::WorkoutPlan => "workout plan",
            SchemaKind::ExerciseList => "exercise list",
            SchemaKind::ProgressAnalysis => "progress analysis",
        }
    }

    /// The JSON Schema for this kind.
    pub fn schema(&self) -> serde_json::Value {
        match self {
            SchemaKind::WorkoutPlan => json_schema_for::<WorkoutPlan>(),
            SchemaKind::ExerciseList => json_schema_for::<Vec<Exercise>>(),
            SchemaKind::ProgressAnalysis => json_schema_for::<ProgressAnalysis>(),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A Rust type that is the validated form of a [`SchemaKind`].
pub trait Structured: DeserializeOwned {
    const KIND: SchemaKind;
}

impl Structured for WorkoutPlan {
    const KIND: SchemaKind = SchemaKind::WorkoutPlan;
}

impl Structured for Vec<Exercise> {
    const KIND: SchemaKind = SchemaKind::ExerciseList;
}

impl Structured for ProgressAnalysis {
    const KIND: SchemaKind = SchemaKind::ProgressAnalysis;
}

// ── Compiled validators ────────────────────────────────────────────

type Compiled = Result<Validator, String>;

fn compile(kind: SchemaKind) -> Compiled {
    jsonschema::validator_for(&kind.schema()).map_err(|e| e.to_string())
}

static WORKOUT_PLAN: LazyLock<Compiled> = LazyLock::new(|| compile(SchemaKind::WorkoutPlan));
static EXERCISE_LIST: LazyLock<Compiled> = LazyLock::new(|| compile(SchemaKind::ExerciseList));
static PROGRESS_ANALYSIS: LazyLock<Compiled> =
    LazyLock::new(|| compile(SchemaKind::ProgressAnalysis));

fn validator(kind: SchemaKind) -> Result<&'static Validator, ValidationError> {
    let compiled: &'static Compiled = match kind {
        SchemaKind::WorkoutPlan => &WORKOUT_PLAN,
        SchemaKind::ExerciseList => &EXERCISE_LIST,
        SchemaKind::ProgressAnalysis => &PROGRESS_ANALYSIS,
    };
    compiled
        .as_ref()
        .map_err(|e| ValidationError::schema(kind, vec![format!("schema did not compile: {e}")]))
}

// ── Pipeline ───────────────────────────────────────────────────────

/// Strip surrounding whitespace and one enclosing Markdown code fence.
///
/// Only the fence is removed; the content is otherwise left untouched.
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    match body.split_once('\n') {
        // First line is a language tag such as `json`.
        Some((tag, inner)) if !tag.contains(['{', '[']) => inner.trim(),
        _ => body.trim(),
    }
}

/// Stage 1: decode raw model text into a JSON value.
pub fn parse_candidate(kind: SchemaKind, raw: &str) -> Result<serde_json::Value, ValidationError> {
    let text = extract_json(raw);
    serde_json::from_str(text).map_err(|e| ValidationError::parse(kind, format!("invalid JSON: {e}")))
}

/// Stage 2: check a JSON value against the schema for `kind`.
///
/// Collects every violation, each formatted as `<instance path>: <message>`.
pub fn validate(kind: SchemaKind, candidate: &serde_json::Value) -> Result<(), ValidationError> {
    let validator = validator(kind)?;
    let violations: Vec<String> = validator
        .iter_errors(candidate)
        .map(|e| {
            let path = e.instance_path().to_string();
            let path = if path.is_empty() { "/".to_string() } else { path };
            format!("{path}: {e}")
        })
        .collect();

    if violations.is_empty() {
        trace!("{kind} passed schema validation");
        Ok(())
    } else {
        Err(ValidationError::schema(kind, violations))
    }
}

/// Validate a JSON value and convert it into its typed form.
pub fn validate_into<T: Structured>(candidate: serde_json::Value) -> Result<T, ValidationError> {
    validate(T::KIND, &candidate)?;
    serde_json::from_value(candidate)
        .map_err(|e| ValidationError::schema(T::KIND, vec![format!("/: {e}")]))
}

/// Run the full parse → validate pipeline on raw model text.
pub fn decode<T: Structured>(raw: &str) -> Result<T, ValidationError> {
    let candidate = parse_candidate(T::KIND, raw)?;
    validate_into(candidate)
}
