//! Exercise suggestion and form-tip prompts.

use super::{BODYWEIGHT, list_or};
use crate::plan::Difficulty;

/// How many exercises a suggestion prompt asks for.
pub const SUGGESTION_COUNT: usize = 5;

/// Literal example of the exercise-list shape. Carries `difficulty`
/// because the exercise schema requires it.
pub const EXERCISE_LIST_EXAMPLE: &str = r#"[
  {
    "name": "Exercise Name",
    "sets": 3,
    "reps": 12,
    "restTime": 90,
    "difficulty": "intermediate",
    "equipment": "Barbell",
    "instructions": "Brief instructions",
    "muscleGroups": ["Chest", "Triceps"]
  }
]"#;

pub fn build_exercise_suggestion_prompt(
    muscle_group: &str,
    equipment: &[String],
    difficulty: Difficulty,
) -> String {
    format!(
        "\
Suggest {SUGGESTION_COUNT} exercises for {muscle_group} muscle group.

Equipment available: {equipment}
Difficulty level: {difficulty}

For each exercise, provide:
- Name
- Sets and reps
- Rest time
- Difficulty
- Equipment needed
- Brief instructions
- Muscle groups targeted

Respond as a JSON array with this structure:
{EXERCISE_LIST_EXAMPLE}",
        equipment = list_or(equipment, BODYWEIGHT),
    )
}

/// Plain-text form cues for one exercise.
pub fn build_form_tips_prompt(exercise_name: &str) -> String {
    format!(
        "\
Provide detailed form tips for {exercise_name}.

Include:
1. Starting position
2. Movement pattern
3. Common mistakes to avoid
4. Breathing technique
5. Safety considerations

Keep it concise and actionable. Format as plain text."
    )
}
