//! Prompt builders for every model call.
//!
//! All builders are pure: the same inputs always render byte-identical
//! text, and none of them touch the network or any shared state. Missing
//! optional profile fields render as explicit fallback text
//! ([`NOT_SPECIFIED`], [`NONE`], [`BODYWEIGHT`], ...) rather than an empty
//! string, so the model never sees a blank value.
//!
//! - [`workout`] — weekly workout plan generation.
//! - [`analysis`] — progress analysis over recent history.
//! - [`chat`] — system preamble for the conversational coach.
//! - [`exercise`] — exercise suggestions and form tips.

pub mod analysis;
pub mod builder;
pub mod chat;
pub mod exercise;
pub mod workout;

pub use analysis::build_analysis_prompt;
pub use builder::PromptBuilder;
pub use chat::build_chat_system_prompt;
pub use exercise::{build_exercise_suggestion_prompt, build_form_tips_prompt};
pub use workout::build_workout_prompt;

use serde::Serialize;

/// Fallback for an unset optional profile value.
pub const NOT_SPECIFIED: &str = "not specified";
/// Fallback for an empty injury / feedback list.
pub const NONE: &str = "none";
/// Fallback for an empty equipment list.
pub const BODYWEIGHT: &str = "bodyweight";
/// Fallback for an empty list of available days.
pub const ALL_DAYS: &str = "all days";

/// Render an optional value, or `fallback` when it is unset or blank.
pub(crate) fn or_fallback<T: ToString>(value: Option<T>, fallback: &str) -> String {
    value
        .map(|v| v.to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Join a list with `", "`, or `fallback` when it is empty.
pub(crate) fn list_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

/// Pretty-printed JSON for embedding caller data in a prompt.
pub(crate) fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// The last `n` items of a slice.
pub(crate) fn most_recent<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_for_none_and_blank() {
        assert_eq!(or_fallback(None::<u32>, NOT_SPECIFIED), "not specified");
        assert_eq!(or_fallback(Some("  "), NOT_SPECIFIED), "not specified");
        assert_eq!(or_fallback(Some(42), NOT_SPECIFIED), "42");
    }

    #[test]
    fn list_fallback() {
        assert_eq!(list_or(&[], BODYWEIGHT), "bodyweight");
        assert_eq!(
            list_or(&["Dumbbells".into(), "Bench".into()], BODYWEIGHT),
            "Dumbbells, Bench"
        );
    }

    #[test]
    fn most_recent_keeps_tail() {
        let items: Vec<u32> = (1..=12).collect();
        assert_eq!(most_recent(&items, 5), &[8, 9, 10, 11, 12]);
        assert_eq!(most_recent(&items[..3], 5), &[1, 2, 3]);
    }
}
