// Step components. Exactly one is the frontier at a time; each reports a single completion.

pub mod candles;
pub mod gallery;
pub mod typewriter;

use serde::Serialize;

use crate::completion::{CompletionLatch, StepCompletion};
use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Precondition};
use crate::markup::Sanitizer;
use crate::orchestrator::PlaybackInput;
use crate::present::{self, ShareMetadata};
use crate::types::{SlideDirection, StepId, Timestamp, Wish};

pub use candles::{CandlePhase, CandleStep};
pub use gallery::GalleryStep;
pub use typewriter::{RevealPhase, TypewriterStep};

/// A step whose only interaction is its continue button.
pub struct ContinueStep {
    latch: CompletionLatch,
}

impl ContinueStep {
    pub fn new(step: StepId, activation: u64) -> Self {
        ContinueStep {
            latch: CompletionLatch::new(step, activation),
        }
    }

    pub fn proceed(&mut self) -> Option<StepCompletion> {
        self.latch.fire()
    }
}

/// The frontier step instance. Dropping it cancels whatever it had scheduled.
pub enum ActiveStep {
    Intro(ContinueStep),
    Name(ContinueStep),
    Gallery(GalleryStep),
    Message(TypewriterStep),
    Cake(CandleStep),
    /// Terminal; only replay leaves it.
    Celebration,
}

impl ActiveStep {
    pub fn activate(
        step: StepId,
        wish: &Wish,
        config: &PlaybackConfig,
        sanitizer: &dyn Sanitizer,
        activation: u64,
        now: Timestamp,
    ) -> Self {
        match step {
            StepId::Intro => ActiveStep::Intro(ContinueStep::new(step, activation)),
            StepId::Name => ActiveStep::Name(ContinueStep::new(step, activation)),
            StepId::Gallery => {
                let images = wish.images().into_iter().map(|m| m.url.clone()).collect();
                ActiveStep::Gallery(GalleryStep::new(images, activation))
            }
            StepId::Message => ActiveStep::Message(TypewriterStep::new(
                wish.message(),
                sanitizer,
                config.reveal_tick_us,
                activation,
                now,
            )),
            StepId::Cake => ActiveStep::Cake(CandleStep::new(
                config.candle_count,
                config.candle_settle_delay_us,
                activation,
            )),
            StepId::Celebration => ActiveStep::Celebration,
        }
    }

    pub fn id(&self) -> StepId {
        match self {
            ActiveStep::Intro(_) => StepId::Intro,
            ActiveStep::Name(_) => StepId::Name,
            ActiveStep::Gallery(_) => StepId::Gallery,
            ActiveStep::Message(_) => StepId::Message,
            ActiveStep::Cake(_) => StepId::Cake,
            ActiveStep::Celebration => StepId::Celebration,
        }
    }

    /// Apply a user input. `Replay` never reaches a step.
    pub fn apply(
        &mut self,
        input: &PlaybackInput,
        now: Timestamp,
    ) -> Result<Option<StepCompletion>, PlaybackError> {
        let step = self.id();
        let rejected = || -> PlaybackError {
            Precondition::InputNotAccepted {
                input: input.name(),
                step,
            }
            .into()
        };

        match (self, input) {
            (ActiveStep::Intro(s) | ActiveStep::Name(s), PlaybackInput::Continue) => Ok(s.proceed()),
            (ActiveStep::Gallery(g), PlaybackInput::Continue) => Ok(g.proceed()),
            (ActiveStep::Gallery(g), PlaybackInput::GalleryNext) => {
                g.next();
                Ok(None)
            }
            (ActiveStep::Gallery(g), PlaybackInput::GalleryPrevious) => {
                g.previous();
                Ok(None)
            }
            (ActiveStep::Gallery(g), PlaybackInput::GalleryJump { index }) => {
                g.jump_to(*index)?;
                Ok(None)
            }
            (ActiveStep::Message(m), PlaybackInput::SkipReveal) => {
                m.skip();
                Ok(None)
            }
            (ActiveStep::Message(m), PlaybackInput::Continue) => m.proceed(),
            (ActiveStep::Cake(c), PlaybackInput::BlowCandle { index }) => {
                c.extinguish(*index, now)?;
                Ok(None)
            }
            _ => Err(rejected()),
        }
    }

    /// Drive timers. Only the cake can complete from time alone.
    pub fn poll(&mut self, now: Timestamp) -> Option<StepCompletion> {
        match self {
            ActiveStep::Message(m) => {
                m.poll(now);
                None
            }
            ActiveStep::Cake(c) => c.poll(now),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        match self {
            ActiveStep::Message(m) => m.next_deadline(),
            ActiveStep::Cake(c) => c.next_deadline(),
            _ => None,
        }
    }

    pub fn view(&self, wish: &Wish) -> FrontierView {
        match self {
            ActiveStep::Intro(_) => FrontierView::Intro {
                person_name: wish.person_name().to_string(),
            },
            ActiveStep::Name(_) => FrontierView::Name {
                person_name: wish.person_name().to_string(),
                title: wish.title().to_string(),
                special_date: wish.special_date().and_then(present::format_special_date),
            },
            ActiveStep::Gallery(g) => FrontierView::Gallery {
                index: g.index(),
                count: g.count(),
                direction: g.direction(),
                image_url: g.current_image().unwrap_or_default().to_string(),
            },
            ActiveStep::Message(m) => FrontierView::Message {
                revealed_text: m.revealed_text().to_string(),
                phase: m.phase(),
                markup: m.rendered_markup().map(str::to_string),
            },
            ActiveStep::Cake(c) => FrontierView::Cake {
                lit: c.lit().to_vec(),
                phase: c.phase(),
            },
            ActiveStep::Celebration => FrontierView::Celebration {
                person_name: wish.person_name().to_string(),
                share_text: ShareMetadata::for_wish(wish).share_text,
            },
        }
    }
}

/// What the UI shell renders for the frontier step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum FrontierView {
    Intro {
        person_name: String,
    },
    Name {
        person_name: String,
        title: String,
        special_date: Option<String>,
    },
    Gallery {
        index: usize,
        count: usize,
        direction: SlideDirection,
        image_url: String,
    },
    Message {
        revealed_text: String,
        phase: RevealPhase,
        /// Sanitized markup, present once the reveal is complete.
        markup: Option<String>,
    },
    Cake {
        lit: Vec<bool>,
        phase: CandlePhase,
    },
    Celebration {
        person_name: String,
        share_text: String,
    },
}
