//! Structured payloads the model must return.
//!
//! The `schemars` attributes on these types are the single source of the
//! numeric and length bounds: [`schema`](crate::schema) derives its JSON
//! Schemas from them, so a value that reaches the caller as one of these
//! types has already been checked against every bound.
//!
//! Counts and durations are `f64` and typed `number` in the schema. Models
//! write `12.0` for twelve reps, and warm-up minutes are often fractional.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use crate::profile::FitnessLevel as Difficulty;

/// One exercise inside a workout plan or a suggestion list.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    #[schemars(range(min = 1, max = 5))]
    pub sets: f64,
    #[schemars(range(min = 1, max = 20))]
    pub reps: f64,
    /// Load in kilograms, when the exercise is weighted.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Seconds, for timed holds or intervals.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Seconds between sets.
    #[schemars(range(min = 30, max = 300))]
    pub rest_time: f64,
    pub difficulty: Difficulty,
    pub equipment: String,
    pub instructions: String,
    pub muscle_groups: Vec<String>,
}

/// A named warm-up or cool-down activity.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct TimedActivity {
    pub name: String,
    /// Seconds.
    pub duration: f64,
}

/// A single generated session.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub name: String,
    pub focus: String,
    #[schemars(length(min = 3, max = 8))]
    pub exercises: Vec<Exercise>,
    /// Minutes, warm-up and cool-down included.
    #[schemars(range(min = 20, max = 90))]
    pub total_duration: f64,
    pub estimated_calories: f64,
    pub notes: String,
    pub warmup: Vec<TimedActivity>,
    pub cooldown: Vec<TimedActivity>,
}

impl WorkoutPlan {
    /// Total working sets across all exercises.
    pub fn total_sets(&self) -> f64 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

/// The model's read on a user's recent training.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub plateaus: Vec<String>,
    pub recommendations: Vec<String>,
    pub next_week_adjustments: String,
    pub motivational_message: String,
}
