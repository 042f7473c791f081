//! Typed coaching operations.
//!
//! [`Coach`] glues the three pipeline stages together: a prompt builder
//! renders the request, a [`CompletionGateway`] fetches the raw completion,
//! and for structured operations the schema registry decides whether the
//! text is trustworthy. A structured result is either fully valid or an
//! error; partial objects never escape.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::CoachError;
use crate::gateway::{
    CompletionGateway, CompletionRequest, HttpGateway, RetryConfig, RetryingGateway,
};
use crate::plan::{Difficulty, Exercise, ProgressAnalysis, WorkoutPlan};
use crate::profile::{ChatContext, FeedbackEntry, PersonalRecord, UserProfile, WorkoutRecord};
use crate::prompt;
use crate::schema::{self, Structured};

/// Entry point for every coaching operation. Cheap to clone.
#[derive(Clone)]
pub struct Coach {
    gateway: Arc<dyn CompletionGateway>,
}

impl Coach {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self { gateway }
    }

    /// Build the HTTP gateway, wrapped in a retry decorator when
    /// `retry.max_retries > 0`.
    pub fn from_config(config: GatewayConfig, retry: RetryConfig) -> Result<Self, CoachError> {
        let http = HttpGateway::new(config)?;
        let gateway: Arc<dyn CompletionGateway> = if retry.max_retries > 0 {
            Arc::new(RetryingGateway::new(http, retry))
        } else {
            Arc::new(http)
        };
        Ok(Self::new(gateway))
    }

    /// Produce a schema-valid plan for `week` of the user's program.
    pub async fn generate_workout_plan(
        &self,
        profile: &UserProfile,
        week: u32,
        feedback: &[FeedbackEntry],
    ) -> Result<WorkoutPlan, CoachError> {
        let prompt = prompt::build_workout_prompt(profile, week, feedback);
        self.structured(prompt).await
    }

    pub async fn analyze_progress(
        &self,
        profile: &UserProfile,
        history: &[WorkoutRecord],
        records: &[PersonalRecord],
    ) -> Result<ProgressAnalysis, CoachError> {
        let prompt = prompt::build_analysis_prompt(profile, history, records);
        self.structured(prompt).await
    }

    /// One conversational turn. The reply is returned verbatim.
    pub async fn chat(
        &self,
        message: &str,
        context: Option<&ChatContext>,
    ) -> Result<String, CoachError> {
        let system = prompt::build_chat_system_prompt(context);
        let request = CompletionRequest::conversation(system, message);
        self.gateway.complete(&request).await
    }

    pub async fn suggest_exercises(
        &self,
        muscle_group: &str,
        equipment: &[String],
        difficulty: Difficulty,
    ) -> Result<Vec<Exercise>, CoachError> {
        let prompt = prompt::build_exercise_suggestion_prompt(muscle_group, equipment, difficulty);
        self.structured(prompt).await
    }

    pub async fn form_tips(&self, exercise_name: &str) -> Result<String, CoachError> {
        let request = CompletionRequest::freeform(prompt::build_form_tips_prompt(exercise_name));
        self.gateway.complete(&request).await
    }

    async fn structured<T: Structured>(&self, prompt: String) -> Result<T, CoachError> {
        let request = CompletionRequest::structured(prompt);
        let raw = self.gateway.complete(&request).await?;
        debug!("Decoding {} ({} bytes)", T::KIND, raw.len());

        schema::decode::<T>(&raw).map_err(|e| {
            warn!(
                "Model output rejected as {} at {:?} stage: {}",
                e.kind,
                e.stage,
                e.detail()
            );
            CoachError::from(e)
        })
    }
}
