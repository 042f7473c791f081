//! Input types supplied by the caller on every request.
//!
//! Nothing here is persisted: the front end owns the user's profile and
//! workout log and resends whatever is relevant with each call. Field names
//! are camelCase on the wire to match the JSON the front end already
//! produces.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

// ── Enums ──────────────────────────────────────────────────────────

/// Self-reported training experience. Also used as exercise difficulty.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(FitnessLevel::Beginner),
            "intermediate" => Ok(FitnessLevel::Intermediate),
            "advanced" => Ok(FitnessLevel::Advanced),
            other => Err(format!(
                "unknown level '{other}' (expected beginner, intermediate or advanced)"
            )),
        }
    }
}

/// Where the user trains.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Home,
    Gym,
    Outdoor,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Location::Home => "home",
            Location::Gym => "gym",
            Location::Outdoor => "outdoor",
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
        })
    }
}

// ── Profile ────────────────────────────────────────────────────────

/// Everything the onboarding wizard collects about a user.
///
/// Only `fitness_level` is required. List fields accept `null` or absence
/// as empty, so a partially onboarded profile still deserializes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Body weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub fitness_level: FitnessLevel,
    #[serde(default, deserialize_with = "nullable_list")]
    pub goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "nullable_list", skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list", skip_serializing_if = "Vec::is_empty")]
    pub injuries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_schedule: Option<String>,
    #[serde(default, deserialize_with = "nullable_list", skip_serializing_if = "Vec::is_empty")]
    pub available_days: Vec<String>,
    /// Target session length in minutes. Zero is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_duration: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<StressLevel>,
}

impl UserProfile {
    /// A profile with only the required field set.
    pub fn new(fitness_level: FitnessLevel) -> Self {
        Self {
            name: None,
            age: None,
            weight: None,
            height: None,
            fitness_level,
            goals: Vec::new(),
            location: None,
            equipment: Vec::new(),
            injuries: Vec::new(),
            dietary_preferences: None,
            work_schedule: None,
            available_days: Vec::new(),
            workout_duration: None,
            sleep_hours: None,
            stress_level: None,
        }
    }

    /// The first listed goal, which the workout prompt treats as the focus.
    pub fn primary_goal(&self) -> Option<&str> {
        self.goals.first().map(String::as_str)
    }
}

// ── History ────────────────────────────────────────────────────────

/// A user's rating of a past week's plan, 1 through 5.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, String> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "rating {value} is outside {}..={}",
                Self::MIN,
                Self::MAX
            ))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-text feedback on a prior week's workouts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub feedback: String,
    pub rating: Rating,
}

/// A logged workout session, as kept in the client-side workout log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub name: String,
    pub date: String,
    /// Minutes.
    pub duration: u32,
    #[serde(rename = "type")]
    pub workout_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// A best lift, rep count or time for one exercise.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    pub exercise: String,
    /// What was measured, e.g. `"1rm"`, `"reps"`, `"time"`.
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: f64,
    pub date: String,
}

// ── Chat context ───────────────────────────────────────────────────

/// Whatever the front end knows about the user, sent along with a chat
/// message.
///
/// Kept as a free-form JSON object and embedded in the system prompt as
/// is: every key the caller sends reaches the model, and an unexpected
/// value never turns a chat message into a rejected request.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct ChatContext(serde_json::Map<String, serde_json::Value>);

impl ChatContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one camelCase field.
    pub fn with(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// The `fitnessLevel` field, if it names a known level (any case).
    pub fn fitness_level(&self) -> Option<FitnessLevel> {
        self.get("fitnessLevel")?.as_str()?.parse().ok()
    }

    /// True when no field carries a non-null value.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(serde_json::Value::is_null)
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for ChatContext {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

impl From<&UserProfile> for ChatContext {
    fn from(profile: &UserProfile) -> Self {
        match serde_json::to_value(profile) {
            Ok(serde_json::Value::Object(map)) => Self(map),
            _ => Self::default(),
        }
    }
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
