//! HTTP gateway for OpenAI-compatible chat completions endpoints.

use std::time::Instant;

use tracing::{debug, error, trace};

use super::{CompletionFuture, CompletionGateway, CompletionRequest};
use crate::config::GatewayConfig;
use crate::error::{CoachError, TransportError};
use crate::{ChatRequest, RawChatResponse};

/// Async HTTP client for the completion endpoint.
///
/// Holds a read-only [`GatewayConfig`] and a shared `reqwest::Client`;
/// safe to share across concurrent requests.
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, CoachError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("coach-rs/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send one completion request and return the first choice's content.
    pub async fn send(&self, request: &CompletionRequest) -> Result<String, CoachError> {
        // Both checks happen before any network I/O.
        let api_key = self.config.require_api_key()?;
        let model = self.config.require_model()?;

        let sampling = self.config.sampling_for(&request.input);
        let body = ChatRequest {
            model: model.to_string(),
            messages: request.input.messages(),
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
        };

        debug!(
            "LLM request: model={}, shape={}, mode={:?}, messages={}, max_tokens={}, temp={}",
            body.model,
            request.input.shape(),
            request.mode,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(&body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::Request(format!("failed to read response: {e}")))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            error!("completion API error: HTTP {status}: {text}");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let parsed: RawChatResponse = serde_json::from_str(&text)
            .map_err(|e| TransportError::Envelope(format!("failed to parse response: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(TransportError::Envelope(format!("API error: {}", err.message)).into());
        }

        if let Some(ref usage) = parsed.usage {
            debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            );
        }

        let choice = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| TransportError::Envelope("no completion choices returned".into()))?;

        debug!(
            "LLM output: finish_reason={}",
            choice.finish_reason.as_deref().unwrap_or("(none)")
        );

        choice
            .message
            .content
            .ok_or_else(|| TransportError::Envelope("first choice has no content".into()).into())
    }
}

impl CompletionGateway for HttpGateway {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.send(request))
    }
}
