//! Error kinds surfaced by the coaching pipeline.
//!
//! The three kinds stay distinguishable all the way to the caller:
//!
//! - [`CoachError::Configuration`] — a required setting (the API key) is
//!   missing. Raised before any network I/O.
//! - [`CoachError::Transport`] — the completion endpoint was unreachable,
//!   answered with a non-success status, or sent an envelope without a
//!   completion.
//! - [`CoachError::Validation`] — the completion text did not parse as JSON
//!   or violated the declared schema.

use std::fmt;

use crate::schema::SchemaKind;

/// Top-level error for every coach operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoachError {
    #[error("{setting} is not configured. Please add it to your environment variables.")]
    Configuration { setting: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CoachError {
    pub fn configuration(setting: impl Into<String>) -> Self {
        CoachError::Configuration {
            setting: setting.into(),
        }
    }

    /// Which of the three kinds this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoachError::Configuration { .. } => ErrorKind::Configuration,
            CoachError::Transport(_) => ErrorKind::Transport,
            CoachError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Upstream HTTP status, when the failure came from a non-success reply.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            CoachError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Coarse classification of a [`CoachError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Transport => "transport",
            ErrorKind::Validation => "validation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The endpoint answered with a non-2xx status.
    #[error("completion API error ({status}): {body}")]
    Status { status: u16, body: String },
    /// The request never produced a response (DNS, refused, reset, ...).
    #[error("completion request failed: {0}")]
    Request(String),
    /// A 2xx reply whose envelope carried no usable completion.
    #[error("malformed completion response: {0}")]
    Envelope(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Which stage of the parse → validate pipeline rejected the model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    /// The text was not JSON.
    Parse,
    /// The JSON violated the schema for its kind.
    Schema,
}

/// Model output that could not be trusted as the requested kind.
///
/// The `Display` form is deliberately generic; the individual violations
/// are kept in `violations` for logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to produce a valid {kind}")]
pub struct ValidationError {
    pub kind: SchemaKind,
    pub stage: ValidationStage,
    pub violations: Vec<String>,
}

impl ValidationError {
    pub fn parse(kind: SchemaKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            stage: ValidationStage::Parse,
            violations: vec![detail.into()],
        }
    }

    pub fn schema(kind: SchemaKind, violations: Vec<String>) -> Self {
        Self {
            kind,
            stage: ValidationStage::Schema,
            violations,
        }
    }

    /// All violations joined on one line, for log output.
    pub fn detail(&self) -> String {
        self.violations.join("; ")
    }
}
