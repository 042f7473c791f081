//! Outbound calls to the completion endpoint.
//!
//! - [`CompletionGateway`] — the dyn-compatible seam every caller goes
//!   through. Implementations return the raw text of the first completion
//!   choice and never parse it.
//! - [`client`] — [`HttpGateway`], the OpenAI-compatible HTTP
//!   implementation.
//! - [`retry`] — [`RetryingGateway`], an optional decorator adding bounded
//!   exponential backoff for transient transport failures.
//!
//! A call either succeeds with raw text or fails once with a configuration
//! or transport error; there is no implicit retry or timeout.

pub mod client;
pub mod retry;

pub use client::HttpGateway;
pub use retry::{RetryConfig, RetryingGateway};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::Message;
use crate::error::CoachError;

/// Boxed future returned by [`CompletionGateway::complete`].
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String, CoachError>> + Send + 'a>>;

/// Whether the caller will run the completion through schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Expected to be JSON matching a schema kind.
    Structured,
    /// Opaque display text.
    Freeform,
}

/// The two call shapes the endpoint is used with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionInput {
    /// A single user-role message.
    Prompt(String),
    /// A system preamble followed by one user message.
    Conversation { system: String, user: String },
}

impl CompletionInput {
    /// The message list sent on the wire.
    pub fn messages(&self) -> Vec<Message> {
        match self {
            CompletionInput::Prompt(prompt) => vec![Message::user(prompt)],
            CompletionInput::Conversation { system, user } => {
                vec![Message::system(system), Message::user(user)]
            }
        }
    }

    /// Short label for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            CompletionInput::Prompt(_) => "prompt",
            CompletionInput::Conversation { .. } => "conversation",
        }
    }
}

/// One completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub input: CompletionInput,
    pub mode: ResponseMode,
}

impl CompletionRequest {
    /// A single prompt whose answer must be schema-validated.
    pub fn structured(prompt: impl Into<String>) -> Self {
        Self {
            input: CompletionInput::Prompt(prompt.into()),
            mode: ResponseMode::Structured,
        }
    }

    /// A single prompt whose answer is display text.
    pub fn freeform(prompt: impl Into<String>) -> Self {
        Self {
            input: CompletionInput::Prompt(prompt.into()),
            mode: ResponseMode::Freeform,
        }
    }

    /// A chat turn: system preamble plus the user's message.
    pub fn conversation(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            input: CompletionInput::Conversation {
                system: system.into(),
                user: user.into(),
            },
            mode: ResponseMode::Freeform,
        }
    }
}

/// Sends a [`CompletionRequest`] and returns the raw completion text.
///
/// Uses a boxed future so the trait is dyn-compatible and can sit behind
/// `Arc<dyn CompletionGateway>`.
pub trait CompletionGateway: Send + Sync {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

impl<G: CompletionGateway + ?Sized> CompletionGateway for Arc<G> {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        (**self).complete(request)
    }
}
