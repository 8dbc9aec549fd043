// Typewriter message reveal.
// Reveals the plain text one character per tick; the sanitized markup replaces it once complete.

use serde::{Deserialize, Serialize};

use crate::completion::{CompletionLatch, StepCompletion};
use crate::error::{PlaybackError, Precondition};
use crate::markup::{self, Sanitizer};
use crate::timer::Timer;
use crate::types::{StepId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPhase {
    Revealing,
    /// Terminal: full text shown, continue action available.
    Complete,
}

pub struct TypewriterStep {
    plain: String,
    /// Length of `plain` in chars.
    total: usize,
    revealed: usize,
    phase: RevealPhase,
    ticker: Timer,
    safe_markup: String,
    latch: CompletionLatch,
}

impl TypewriterStep {
    /// Start revealing `message` at `now`. The sanitizer runs here, once.
    pub fn new(
        message: &str,
        sanitizer: &dyn Sanitizer,
        tick_us: u64,
        activation: u64,
        now: Timestamp,
    ) -> Self {
        let plain = markup::plain_text(message);
        let total = plain.chars().count();
        let mut step = TypewriterStep {
            plain,
            total,
            revealed: 0,
            phase: RevealPhase::Revealing,
            ticker: Timer::idle(),
            safe_markup: sanitizer.sanitize(message),
            latch: CompletionLatch::new(StepId::Message, activation),
        };

        if total == 0 {
            step.phase = RevealPhase::Complete;
        } else {
            step.ticker.start_repeating(now, tick_us);
        }
        step
    }

    /// Reveal one character per elapsed tick.
    pub fn poll(&mut self, now: Timestamp) {
        while self.phase == RevealPhase::Revealing && self.ticker.fire_next(now) {
            self.revealed += 1;
            if self.revealed >= self.total {
                self.finish();
            }
        }
    }

    /// Jump to the full text. No-op once complete.
    pub fn skip(&mut self) -> bool {
        if self.phase == RevealPhase::Complete {
            return false;
        }
        log::debug!("reveal skipped at {}/{}", self.revealed, self.total);
        self.finish();
        true
    }

    /// The explicit continue action; only available once complete.
    pub fn proceed(&mut self) -> Result<Option<StepCompletion>, PlaybackError> {
        if self.phase != RevealPhase::Complete {
            return Err(Precondition::RevealInProgress.into());
        }
        Ok(self.latch.fire())
    }

    fn finish(&mut self) {
        self.ticker.cancel();
        self.revealed = self.total;
        self.phase = RevealPhase::Complete;
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn total_count(&self) -> usize {
        self.total
    }

    pub fn revealed_text(&self) -> &str {
        match self.plain.char_indices().nth(self.revealed) {
            Some((end, _)) => &self.plain[..end],
            None => &self.plain,
        }
    }

    /// Sanitized markup, only once the reveal is complete.
    pub fn rendered_markup(&self) -> Option<&str> {
        match self.phase {
            RevealPhase::Complete => Some(&self.safe_markup),
            RevealPhase::Revealing => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.ticker.deadline()
    }

    pub fn ticks_scheduled(&self) -> u32 {
        self.ticker.armed_count()
    }
}
