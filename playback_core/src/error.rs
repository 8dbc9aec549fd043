// Typed errors with thiserror. Surface meaningful messages to JS.
// Only `ContentUnavailable` is user-visible; precondition violations are recovered by the orchestrator.

use thiserror::Error;

use crate::types::StepId;

/// Engine error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    #[error("Precondition violated: {0}")]
    PreconditionViolation(Precondition),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PlaybackError {
    /// Programmer-error class: must not corrupt state and is never shown to the user.
    pub fn is_precondition(&self) -> bool {
        matches!(self, PlaybackError::PreconditionViolation(_))
    }
}

/// Which precondition a caller broke.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    #[error("advance called at the last step (index {index})")]
    AdvancePastEnd { index: usize },

    #[error("candle {index} out of range (count {count})")]
    CandleOutOfRange { index: usize, count: usize },

    #[error("slide {index} out of range (count {count})")]
    SlideOutOfRange { index: usize, count: usize },

    #[error("step {0} is not part of this sequence")]
    StepNotInSequence(StepId),

    #[error("message reveal still in progress")]
    RevealInProgress,

    #[error("input {input} not accepted by step {step}")]
    InputNotAccepted { input: &'static str, step: StepId },

    #[error("session already torn down")]
    SessionClosed,
}

impl From<Precondition> for PlaybackError {
    fn from(violation: Precondition) -> Self {
        PlaybackError::PreconditionViolation(violation)
    }
}

impl From<serde_json::Error> for PlaybackError {
    fn from(err: serde_json::Error) -> Self {
        PlaybackError::Serialization(err.to_string())
    }
}
