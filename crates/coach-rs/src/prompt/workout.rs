//! Weekly workout plan prompt.

use std::fmt::Write as _;

use super::{ALL_DAYS, BODYWEIGHT, NONE, NOT_SPECIFIED, PromptBuilder, list_or, or_fallback};
use crate::profile::{FeedbackEntry, UserProfile};

/// Session cap used when the profile has no target duration.
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

/// Progression instruction for the first week.
pub const START_PROGRESSION: &str = "start at appropriate level";
/// Progression instruction for every later week.
pub const INCREASE_PROGRESSION: &str = "increase intensity by 5-10% or vary exercises";

const SAFETY_RULES: &str = "\
- Always include disclaimers for users with injuries
- Suggest consulting healthcare professionals for pain or discomfort
- Provide alternatives for high-impact exercises if needed
- Ensure exercises match the available equipment
- Consider fatigue levels based on sleep and stress";

/// Literal example of the workout-plan shape checked by
/// [`SchemaKind::WorkoutPlan`](crate::schema::SchemaKind::WorkoutPlan).
pub const WORKOUT_PLAN_EXAMPLE: &str = r#"{
  "name": "Week X - Focus Area",
  "focus": "primary goal of this workout",
  "exercises": [
    {
      "name": "Exercise Name",
      "sets": 3,
      "reps": 12,
      "weight": 60,
      "duration": null,
      "restTime": 90,
      "difficulty": "intermediate",
      "equipment": "Dumbbells",
      "instructions": "Brief instructions",
      "muscleGroups": ["Chest", "Triceps"]
    }
  ],
  "totalDuration": 45,
  "estimatedCalories": 300,
  "notes": "any special considerations",
  "warmup": [
    {"name": "Jumping Jacks", "duration": 60},
    {"name": "Arm Circles", "duration": 30}
  ],
  "cooldown": [
    {"name": "Stretching", "duration": 60}
  ]
}"#;

/// Render the prompt for week `week` of a user's plan.
///
/// `feedback` is ordered most recent first; entry `i` is labelled
/// `Week {week - i}`, stopping at week 0.
pub fn build_workout_prompt(profile: &UserProfile, week: u32, feedback: &[FeedbackEntry]) -> String {
    PromptBuilder::new(format!(
        "You are an expert fitness coach creating a personalized workout plan for Week {week}."
    ))
    .section("USER PROFILE", profile_block(profile))
    .section("PREVIOUS FEEDBACK", feedback_block(week, feedback))
    .section("INSTRUCTIONS", instructions_block(profile, week, feedback))
    .section("IMPORTANT SAFETY RULES", SAFETY_RULES)
    .section(
        "RESPONSE AS JSON ONLY with this exact structure",
        WORKOUT_PLAN_EXAMPLE,
    )
    .build()
}

fn profile_block(p: &UserProfile) -> String {
    let lines = [
        ("Name", or_fallback(p.name.as_deref(), NOT_SPECIFIED)),
        ("Age", or_fallback(p.age, NOT_SPECIFIED)),
        ("Weight", or_fallback(p.weight.map(|w| format!("{w} kg")), NOT_SPECIFIED)),
        ("Height", or_fallback(p.height.map(|h| format!("{h} cm")), NOT_SPECIFIED)),
        ("Fitness Level", p.fitness_level.to_string()),
        ("Goals", list_or(&p.goals, NOT_SPECIFIED)),
        ("Location", or_fallback(p.location, NOT_SPECIFIED)),
        ("Available Equipment", list_or(&p.equipment, BODYWEIGHT)),
        ("Injuries", list_or(&p.injuries, NONE)),
        (
            "Dietary Preferences",
            or_fallback(p.dietary_preferences.as_deref(), NOT_SPECIFIED),
        ),
        ("Available Days", list_or(&p.available_days, ALL_DAYS)),
        (
            "Workout Duration",
            or_fallback(
                p.workout_duration.map(|d| format!("{d} minutes per session")),
                NOT_SPECIFIED,
            ),
        ),
        ("Work Schedule", or_fallback(p.work_schedule.as_deref(), NOT_SPECIFIED)),
        (
            "Sleep Hours",
            or_fallback(p.sleep_hours.map(|h| format!("{h} per night")), NOT_SPECIFIED),
        ),
        ("Stress Level", or_fallback(p.stress_level, NOT_SPECIFIED)),
    ];

    let mut out = String::new();
    for (label, value) in lines {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(out, "- {label}: {value}");
    }
    out
}

fn feedback_block(week: u32, feedback: &[FeedbackEntry]) -> String {
    if feedback.is_empty() {
        return "No previous feedback".to_string();
    }
    feedback
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let back = u32::try_from(i).unwrap_or(u32::MAX);
            let label = week.saturating_sub(back);
            format!("- Week {label}: {} (Rating: {}/5)", f.feedback, f.rating)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn instructions_block(p: &UserProfile, week: u32, feedback: &[FeedbackEntry]) -> String {
    let focus = p.primary_goal().unwrap_or("general fitness");
    let schedule = or_fallback(p.work_schedule.as_deref(), "flexible schedule");
    let cap = p
        .workout_duration
        .map_or(DEFAULT_SESSION_MINUTES, |d| d.get());
    let injuries = list_or(&p.injuries, NONE);
    let progression = if week > 1 {
        INCREASE_PROGRESSION
    } else {
        START_PROGRESSION
    };
    let addressed: Vec<String> = feedback.iter().map(|f| f.feedback.clone()).collect();
    let addressed = list_or(&addressed, NONE);

    format!(
        "\
1. Create a workout focused on: {focus}
2. Consider fitness level: {level}
3. Account for lifestyle: {schedule}
4. Total duration under {cap} minutes
5. Include 5-7 main exercises
6. Add warm-up (5-10 minutes) and cool-down (5-10 minutes)
7. Provide clear instructions for each exercise
8. Consider injuries: {injuries}
9. Progress from previous weeks: {progression}
10. Address feedback: {addressed}",
        level = p.fitness_level,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FitnessLevel, Location, Rating, StressLevel};
    use std::num::NonZeroU32;

    fn scenario_profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "fitnessLevel": "beginner",
            "goals": ["weight-loss"],
            "equipment": [],
            "workoutDuration": 30
        }))
        .unwrap()
    }

    fn full_profile() -> UserProfile {
        UserProfile {
            name: Some("Jordan".into()),
            age: Some(34),
            weight: Some(72.5),
            height: Some(178.0),
            fitness_level: FitnessLevel::Intermediate,
            goals: vec!["muscle-gain".into(), "endurance".into()],
            location: Some(Location::Gym),
            equipment: vec!["Barbell".into(), "Dumbbells".into()],
            injuries: vec!["lower back".into()],
            dietary_preferences: Some("vegetarian".into()),
            work_schedule: Some("9-5 weekdays".into()),
            available_days: vec!["Monday".into(), "Thursday".into()],
            workout_duration: NonZeroU32::new(45),
            sleep_hours: Some(6.5),
            stress_level: Some(StressLevel::High),
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let profile = full_profile();
        let feedback = vec![FeedbackEntry {
            feedback: "legs sore".into(),
            rating: Rating::new(3).unwrap(),
        }];
        assert_eq!(
            build_workout_prompt(&profile, 2, &feedback),
            build_workout_prompt(&profile, 2, &feedback)
        );
    }

    #[test]
    fn prompt_contains_every_profile_value() {
        let prompt = build_workout_prompt(&full_profile(), 1, &[]);
        for needle in [
            "Jordan",
            "34",
            "72.5 kg",
            "178 cm",
            "intermediate",
            "muscle-gain",
            "endurance",
            "gym",
            "Barbell",
            "Dumbbells",
            "lower back",
            "vegetarian",
            "Monday",
            "Thursday",
            "45 minutes per session",
            "9-5 weekdays",
            "6.5 per night",
            "high",
        ] {
            assert!(prompt.contains(needle), "missing {needle:?}");
        }
    }

    #[test]
    fn unset_fields_use_fallbacks() {
        let prompt = build_workout_prompt(&UserProfile::new(FitnessLevel::Beginner), 1, &[]);
        assert!(prompt.contains("- Name: not specified"));
        assert!(prompt.contains("- Available Equipment: bodyweight"));
        assert!(prompt.contains("- Injuries: none"));
        assert!(prompt.contains("- Available Days: all days"));
        assert!(prompt.contains("- Sleep Hours: not specified"));
        assert!(prompt.contains("- Stress Level: not specified"));
        assert!(prompt.contains("Create a workout focused on: general fitness"));
        assert!(prompt.contains("Total duration under 60 minutes"));
        assert!(prompt.contains("No previous feedback"));
        assert!(!prompt.contains("None"));
        assert!(!prompt.contains(": \n"));
    }

    #[test]
    fn week_one_starts_at_appropriate_level() {
        let prompt = build_workout_prompt(&scenario_profile(), 1, &[]);
        assert!(prompt.contains("start at appropriate level"));
        assert!(!prompt.contains("increase intensity"));
        assert!(prompt.contains("- Available Equipment: bodyweight"));
        assert!(prompt.contains("Total duration under 30 minutes"));
    }

    #[test]
    fn later_weeks_increase_intensity_and_echo_feedback() {
        let feedback = vec![FeedbackEntry {
            feedback: "too easy".into(),
            rating: Rating::new(4).unwrap(),
        }];
        let prompt = build_workout_prompt(&scenario_profile(), 3, &feedback);
        assert!(prompt.contains("increase intensity"));
        assert!(!prompt.contains("start at appropriate level"));
        assert!(prompt.contains("- Week 3: too easy (Rating: 4/5)"));
        assert!(prompt.contains("10. Address feedback: too easy"));
    }

    #[test]
    fn feedback_weeks_count_back_from_current() {
        let entry = FeedbackEntry {
            feedback: "ok".into(),
            rating: Rating::new(3).unwrap(),
        };
        let prompt = build_workout_prompt(&scenario_profile(), 2, &[entry.clone(), entry.clone()]);
        assert!(prompt.contains("- Week 2: ok (Rating: 3/5)\n- Week 1: ok (Rating: 3/5)"));

        let prompt = build_workout_prompt(&scenario_profile(), 1, &[entry.clone(), entry]);
        assert!(prompt.contains("- Week 1: ok (Rating: 3/5)\n- Week 0: ok (Rating: 3/5)"));
    }

    #[test]
    fn safety_rules_and_shape_always_present() {
        let prompt = build_workout_prompt(&scenario_profile(), 1, &[]);
        assert!(prompt.contains("consulting healthcare professionals"));
        assert!(prompt.contains("disclaimers for users with injuries"));
        assert!(prompt.contains(WORKOUT_PLAN_EXAMPLE));
    }

    #[test]
    fn example_shape_matches_schema() {
        let example: serde_json::Value = serde_json::from_str(WORKOUT_PLAN_EXAMPLE).unwrap();
        let err = crate::schema::validate(crate::schema::SchemaKind::WorkoutPlan, &example)
            .unwrap_err();
        // The example lists one exercise; everything else about it is valid.
        assert_eq!(err.violations.len(), 1, "{:?}", err.violations);
        assert!(err.violations[0].starts_with("/exercises"));
    }
}
