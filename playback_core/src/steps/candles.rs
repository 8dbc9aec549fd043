// Candle-blow step: N lit switches, completion once all are out and the settle delay elapses.

use serde::{Deserialize, Serialize};

use crate::completion::{CompletionLatch, StepCompletion};
use crate::error::{PlaybackError, Precondition};
use crate::timer::Timer;
use crate::types::{StepId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandlePhase {
    Lit,
    /// Terminal: every candle is out, completion pending or delivered.
    Celebrating,
}

pub struct CandleStep {
    lit: Vec<bool>,
    phase: CandlePhase,
    settle: Timer,
    settle_delay_us: u64,
    latch: CompletionLatch,
}

impl CandleStep {
    pub fn new(count: usize, settle_delay_us: u64, activation: u64) -> Self {
        CandleStep {
            lit: vec![true; count],
            phase: CandlePhase::Lit,
            settle: Timer::idle(),
            settle_delay_us,
            latch: CompletionLatch::new(StepId::Cake, activation),
        }
    }

    /// Blow out one candle. Returns whether anything changed.
    pub fn extinguish(&mut self, index: usize, now: Timestamp) -> Result<bool, PlaybackError> {
        let count = self.lit.len();
        let Some(candle) = self.lit.get_mut(index) else {
            return Err(Precondition::CandleOutOfRange { index, count }.into());
        };
        if !*candle || self.phase == CandlePhase::Celebrating {
            return Ok(false);
        }
        *candle = false;

        if self.lit.iter().all(|lit| !lit) {
            log::debug!("all {} candles out, settling for {}us", count, self.settle_delay_us);
            self.phase = CandlePhase::Celebrating;
            self.settle.start_once(now, self.settle_delay_us);
        }
        Ok(true)
    }

    /// Deliver the completion once the settle delay has passed.
    pub fn poll(&mut self, now: Timestamp) -> Option<StepCompletion> {
        if self.settle.fire_next(now) {
            return self.latch.fire();
        }
        None
    }

    pub fn lit(&self) -> &[bool] {
        &self.lit
    }

    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|lit| **lit).count()
    }

    pub fn phase(&self) -> CandlePhase {
        self.phase
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.settle.deadline()
    }
}
