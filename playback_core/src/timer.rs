// Deadline timer driven by host time. No callbacks: the owner polls it, so a timer
// can never outlive or mutate a step that has been dropped.

use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Once,
    Repeating { interval_us: u64 },
}

/// One-shot or repeating timer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timer {
    deadline: Option<Timestamp>,
    mode: Option<Mode>,
    /// Number of times an expiry has been scheduled (arming and re-arming).
    armed: u32,
}

impl Timer {
    pub fn idle() -> Self {
        Timer::default()
    }

    /// Fire once, `delay_us` after `now`.
    pub fn start_once(&mut self, now: Timestamp, delay_us: u64) {
        self.mode = Some(Mode::Once);
        self.deadline = Some(now.after(delay_us));
        self.armed += 1;
    }

    /// Fire every `interval_us`, first expiry one interval after `now`.
    pub fn start_repeating(&mut self, now: Timestamp, interval_us: u64) {
        let interval_us = interval_us.max(1);
        self.mode = Some(Mode::Repeating { interval_us });
        self.deadline = Some(now.after(interval_us));
        self.armed += 1;
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.mode = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    pub fn armed_count(&self) -> u32 {
        self.armed
    }

    /// Consume one due expiry, if any. Repeating timers re-arm one interval later,
    /// so calling this in a loop catches up on missed intervals.
    pub fn fire_next(&mut self, now: Timestamp) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if deadline > now {
            return false;
        }
        match self.mode {
            Some(Mode::Repeating { interval_us }) => {
                self.deadline = Some(deadline.after(interval_us));
                self.armed += 1;
            }
            _ => self.cancel(),
        }
        true
    }
}
