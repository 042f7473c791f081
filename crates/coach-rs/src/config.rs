//! Gateway configuration.
//!
//! [`GatewayConfig`] is a plain value handed to the gateway constructor, so
//! tests can build one directly and nothing reads the environment behind
//! the caller's back. [`GatewayConfig::from_env`] is the one place the
//! process environment is consulted.

use std::fmt;
use std::time::Duration;

use crate::error::CoachError;
use crate::gateway::CompletionInput;
use crate::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable holding the bearer credential.
pub const API_KEY_ENV: &str = "ZHIPU_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "ZHIPU_MODEL";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "ZHIPU_BASE_URL";

/// Sampling parameters sent with a completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Sampling {
    /// Single user-prompt calls: workouts, analysis, suggestions, form tips.
    pub const PROMPT: Sampling = Sampling {
        temperature: 0.7,
        max_tokens: 4000,
    };

    /// System + user conversation calls (chat).
    pub const CONVERSATION: Sampling = Sampling {
        temperature: 0.8,
        max_tokens: 2000,
    };
}

/// Everything the HTTP gateway needs to reach the completion endpoint.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Bearer credential. `None` (or blank) fails every call with a
    /// configuration error.
    pub api_key: Option<String>,
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// API base URL, without the `/chat/completions` suffix.
    /// Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Sampling for [`CompletionInput::Prompt`]. Default: [`Sampling::PROMPT`].
    pub prompt_sampling: Sampling,
    /// Sampling for [`CompletionInput::Conversation`].
    /// Default: [`Sampling::CONVERSATION`].
    pub conversation_sampling: Sampling,
    /// TCP connect timeout. The request itself has no deadline.
    pub connect_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            prompt_sampling: Sampling::PROMPT,
            conversation_sampling: Sampling::CONVERSATION,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("prompt_sampling", &self.prompt_sampling)
            .field("conversation_sampling", &self.conversation_sampling)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl GatewayConfig {
    /// Read [`API_KEY_ENV`], [`MODEL_ENV`] and [`BASE_URL_ENV`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: get(API_KEY_ENV),
            model: get(MODEL_ENV).unwrap_or(defaults.model),
            base_url: get(BASE_URL_ENV).unwrap_or(defaults.base_url),
            ..defaults
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a non-blank credential is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// The credential, or a configuration error naming [`API_KEY_ENV`].
    pub fn require_api_key(&self) -> Result<&str, CoachError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(CoachError::configuration(API_KEY_ENV)),
        }
    }

    /// The model name, or a configuration error naming [`MODEL_ENV`].
    pub fn require_model(&self) -> Result<&str, CoachError> {
        let model = self.model.trim();
        if model.is_empty() {
            Err(CoachError::configuration(MODEL_ENV))
        } else {
            Ok(model)
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Sampling preset for a call shape.
    pub fn sampling_for(&self, input: &CompletionInput) -> Sampling {
        match input {
            CompletionInput::Prompt(_) => self.prompt_sampling,
            CompletionInput::Conversation { .. } => self.conversation_sampling,
        }
    }
}
