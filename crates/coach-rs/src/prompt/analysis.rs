//! Progress analysis prompt.

use super::{PromptBuilder, most_recent, pretty_json};
use crate::profile::{PersonalRecord, UserProfile, WorkoutRecord};

/// Workouts embedded in the prompt; older sessions are left out.
pub const RECENT_WORKOUTS: usize = 5;
/// Personal records embedded in the prompt.
pub const RECENT_RECORDS: usize = 10;

const ANALYSIS_TASKS: &str = "\
1. Identify strengths (consistent performance, progress in key areas)
2. Identify weaknesses (plateaus, missing exercises, low performance areas)
3. Detect plateaus (stagnant PRs, lack of progress)
4. Provide specific recommendations for improvement
5. Suggest adjustments for next week
6. Include a motivational message";

/// Literal example of the progress-analysis shape.
pub const PROGRESS_ANALYSIS_EXAMPLE: &str = r#"{
  "strengths": ["strength 1", "strength 2"],
  "weaknesses": ["weakness 1", "weakness 2"],
  "plateaus": ["plateau 1", "plateau 2"],
  "recommendations": ["recommendation 1", "recommendation 2"],
  "nextWeekAdjustments": "specific suggestions for week plan",
  "motivationalMessage": "encouraging message"
}"#;

/// Render the progress analysis prompt.
///
/// Only the last [`RECENT_WORKOUTS`] workouts and [`RECENT_RECORDS`]
/// records are included, to keep the prompt size bounded; the heading
/// still reports the full workout count.
pub fn build_analysis_prompt(
    profile: &UserProfile,
    history: &[WorkoutRecord],
    records: &[PersonalRecord],
) -> String {
    PromptBuilder::new(
        "You are analyzing a user's fitness progress to provide insights and recommendations.",
    )
    .section("USER PROFILE", pretty_json(profile))
    .section(
        &format!("RECENT WORKOUT HISTORY ({} workouts)", history.len()),
        pretty_json(most_recent(history, RECENT_WORKOUTS)),
    )
    .section(
        "PERSONAL RECORDS",
        pretty_json(most_recent(records, RECENT_RECORDS)),
    )
    .section("ANALYSIS TASKS", ANALYSIS_TASKS)
    .section(
        "RESPONSE AS JSON ONLY with this exact structure",
        PROGRESS_ANALYSIS_EXAMPLE,
    )
    .build()
}
