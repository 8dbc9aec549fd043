// Single-shot step completion.
// A latch hands out at most one token; the token is not Clone, so it can be consumed only once.

use crate::types::StepId;

/// Proof that a step finished. Stamped with the activation it belongs to so the
/// orchestrator can drop tokens from a step that is no longer the frontier.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a completion advances playback only when handed to the orchestrator"]
pub struct StepCompletion {
    step: StepId,
    activation: u64,
}

impl StepCompletion {
    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn activation(&self) -> u64 {
        self.activation
    }
}

/// Fires at most once per step activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionLatch {
    step: StepId,
    activation: u64,
    fired: bool,
}

impl CompletionLatch {
    pub fn new(step: StepId, activation: u64) -> Self {
        CompletionLatch {
            step,
            activation,
            fired: false,
        }
    }

    pub fn fire(&mut self) -> Option<StepCompletion> {
        if self.fired {
            return None;
        }
        self.fired = true;
        Some(StepCompletion {
            step: self.step,
            activation: self.activation,
        })
    }

    #[cfg(test)]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
