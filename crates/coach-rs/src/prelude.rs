//! Convenience re-exports for common `coach-rs` types.
//!
//! ```ignore
//! use coach_rs::prelude::*;
//! ```
//!
//! Pulls in the [`Coach`] service with its configuration, the profile and
//! history inputs, the structured outputs, and the error types. Prompt
//! builders and the schema registry are left in their modules.

// ── Service ─────────────────────────────────────────────────────────
pub use crate::coach::Coach;
pub use crate::config::GatewayConfig;
pub use crate::gateway::{
    CompletionGateway, CompletionRequest, HttpGateway, RetryConfig, RetryingGateway,
};

// ── Inputs ──────────────────────────────────────────────────────────
pub use crate::profile::{
    ChatContext, FeedbackEntry, FitnessLevel, Location, PersonalRecord, Rating, StressLevel,
    UserProfile, WorkoutRecord,
};

// ── Outputs ─────────────────────────────────────────────────────────
pub use crate::plan::{Difficulty, Exercise, ProgressAnalysis, TimedActivity, WorkoutPlan};

// ── Errors ──────────────────────────────────────────────────────────
pub use crate::error::{CoachError, ErrorKind, TransportError, ValidationError};
