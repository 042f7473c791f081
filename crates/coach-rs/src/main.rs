//! Run a coaching operation from the command line and print the result.
//!
//! Reads the API key from the `ZHIPU_API_KEY` environment variable. Inputs
//! that are structured (profiles, feedback, history) are read from JSON
//! files in the same camelCase shape the HTTP API accepts.
//!
//! # Examples
//!
//! ```sh
//! # Week 3 plan with last week's feedback
//! coach workout --profile profile.json --week 3 --feedback feedback.json
//!
//! # Inspect the prompt without calling the model
//! coach --dry-run workout --profile profile.json
//!
//! # Progress analysis
//! coach analyze --profile profile.json --history workouts.json --records prs.json
//!
//! # One chat turn, with optional context
//! coach chat --message "How do I fix knee cave on squats?" --context ctx.json
//!
//! # Exercise ideas and form cues
//! coach exercises --muscle-group back --equipment Dumbbells --difficulty beginner
//! coach form-tips --exercise "Romanian deadlift"
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use coach_rs::prelude::*;
use coach_rs::prompt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Fitness coaching backed by a chat-completions model.
#[derive(Parser)]
#[command(name = "coach", version)]
struct Cli {
    // ── Model selection ────────────────────────────────────────
    /// Model to use (default: glm-3-turbo)
    #[arg(long, env = "ZHIPU_MODEL")]
    model: Option<String>,

    /// API base URL, without the /chat/completions suffix
    #[arg(long, env = "ZHIPU_BASE_URL")]
    base_url: Option<String>,

    /// Retries for transient upstream failures (0 = none)
    #[arg(long, default_value_t = 0)]
    retries: u32,

    // ── Output control ─────────────────────────────────────────
    /// Print the prompt that would be sent instead of calling the model
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log request/response summaries to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a workout plan
    Workout {
        /// User profile JSON file
        #[arg(long)]
        profile: PathBuf,
        /// Program week (1 = first week)
        #[arg(long, default_value_t = 1)]
        week: u32,
        /// JSON array of {feedback, rating} from earlier weeks
        #[arg(long)]
        feedback: Option<PathBuf>,
    },
    /// Analyze recent training
    Analyze {
        /// User profile JSON file
        #[arg(long)]
        profile: PathBuf,
        /// JSON array of completed workouts
        #[arg(long)]
        history: Option<PathBuf>,
        /// JSON array of personal records
        #[arg(long)]
        records: Option<PathBuf>,
    },
    /// Ask the coach a question
    Chat {
        /// Message text
        #[arg(long)]
        message: Option<String>,
        /// Read the message from stdin
        #[arg(long)]
        stdin: bool,
        /// Chat context JSON file
        #[arg(long)]
        context: Option<PathBuf>,
    },
    /// Suggest exercises for a muscle group
    Exercises {
        #[arg(long)]
        muscle_group: String,
        /// Available equipment (repeatable)
        #[arg(long)]
        equipment: Vec<String>,
        #[arg(long, default_value = "beginner")]
        difficulty: Difficulty,
    },
    /// Form cues for one exercise
    FormTips {
        #[arg(long)]
        exercise: String,
    },
}

// ── Input helpers ──────────────────────────────────────────────────

/// Load a JSON file into `T`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("failed to parse '{}': {e}", path.display()))
}

/// Load an optional JSON array file; a missing flag means an empty list.
fn read_list<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>, String> {
    path.map_or(Ok(Vec::new()), read_json)
}

fn read_stdin_content() -> Result<String, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    Ok(buf)
}

fn chat_message(message: Option<&str>, stdin: bool) -> Result<String, String> {
    let piped = if stdin {
        Some(read_stdin_content()?)
    } else {
        None
    };
    let text = match (message, piped) {
        (Some(msg), Some(piped)) => format!("{msg}\n\n{piped}"),
        (Some(msg), None) => msg.to_string(),
        (None, Some(piped)) => piped,
        (None, None) => return Err("provide --message, --stdin, or both".to_string()),
    };
    if text.trim().is_empty() {
        return Err("message is empty".to_string());
    }
    Ok(text)
}

fn to_pretty<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to format output: {e}"))
}

// ── Commands ───────────────────────────────────────────────────────

fn gateway_config(cli: &Cli) -> GatewayConfig {
    let mut config = GatewayConfig::from_env();
    if let Some(model) = &cli.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    config
}

/// Render the prompt a command would send, for `--dry-run`.
fn render_prompt(command: &Command) -> Result<String, String> {
    match command {
        Command::Workout {
            profile,
            week,
            feedback,
        } => {
            let profile: UserProfile = read_json(profile)?;
            let feedback: Vec<FeedbackEntry> = read_list(feedback.as_deref())?;
            Ok(prompt::build_workout_prompt(&profile, *week, &feedback))
        }
        Command::Analyze {
            profile,
            history,
            records,
        } => {
            let profile: UserProfile = read_json(profile)?;
            let history: Vec<WorkoutRecord> = read_list(history.as_deref())?;
            let records: Vec<PersonalRecord> = read_list(records.as_deref())?;
            Ok(prompt::build_analysis_prompt(&profile, &history, &records))
        }
        Command::Chat {
            message,
            stdin,
            context,
        } => {
            let message = chat_message(message.as_deref(), *stdin)?;
            let context: Option<ChatContext> = context.as_deref().map(read_json).transpose()?;
            let system = prompt::build_chat_system_prompt(context.as_ref());
            Ok(format!("[system]\n{system}\n\n[user]\n{message}"))
        }
        Command::Exercises {
            muscle_group,
            equipment,
            difficulty,
        } => Ok(prompt::build_exercise_suggestion_prompt(
            muscle_group,
            equipment,
            *difficulty,
        )),
        Command::FormTips { exercise } => Ok(prompt::build_form_tips_prompt(exercise)),
    }
}

async fn run(cli: &Cli) -> Result<String, String> {
    if cli.dry_run {
        return render_prompt(&cli.command);
    }

    let config = gateway_config(cli);
    debug!("Gateway config: {config:?}");
    let coach = Coach::from_config(config, RetryConfig::with_retries(cli.retries))
        .map_err(|e| e.to_string())?;

    match &cli.command {
        Command::Workout {
            profile,
            week,
            feedback,
        } => {
            let profile: UserProfile = read_json(profile)?;
            let feedback: Vec<FeedbackEntry> = read_list(feedback.as_deref())?;
            let plan = coach
                .generate_workout_plan(&profile, *week, &feedback)
                .await
                .map_err(|e| e.to_string())?;
            to_pretty(&plan)
        }
        Command::Analyze {
            profile,
            history,
            records,
        } => {
            let profile: UserProfile = read_json(profile)?;
            let history: Vec<WorkoutRecord> = read_list(history.as_deref())?;
            let records: Vec<PersonalRecord> = read_list(records.as_deref())?;
            let analysis = coach
                .analyze_progress(&profile, &history, &records)
                .await
                .map_err(|e| e.to_string())?;
            to_pretty(&analysis)
        }
        Command::Chat {
            message,
            stdin,
            context,
        } => {
            let message = chat_message(message.as_deref(), *stdin)?;
            let context: Option<ChatContext> = context.as_deref().map(read_json).transpose()?;
            coach
                .chat(&message, context.as_ref())
                .await
                .map_err(|e| e.to_string())
        }
        Command::Exercises {
            muscle_group,
            equipment,
            difficulty,
        } => {
            let exercises = coach
                .suggest_exercises(muscle_group, equipment, *difficulty)
                .await
                .map_err(|e| e.to_string())?;
            to_pretty(&exercises)
        }
        Command::FormTips { exercise } => {
            coach.form_tips(exercise).await.map_err(|e| e.to_string())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
