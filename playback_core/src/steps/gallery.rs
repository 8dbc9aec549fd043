// Gallery carousel. Browsable, not gating: continue works from any slide.

use crate::completion::{CompletionLatch, StepCompletion};
use crate::error::{PlaybackError, Precondition};
use crate::types::{SlideDirection, StepId};

pub struct GalleryStep {
    images: Vec<String>,
    index: usize,
    direction: SlideDirection,
    latch: CompletionLatch,
}

impl GalleryStep {
    /// `images` must be non-empty; the sequence excludes the gallery otherwise.
    pub fn new(images: Vec<String>, activation: u64) -> Self {
        debug_assert!(!images.is_empty(), "gallery constructed without images");
        GalleryStep {
            images,
            index: 0,
            direction: SlideDirection::Forward,
            latch: CompletionLatch::new(StepId::Gallery, activation),
        }
    }

    pub fn next(&mut self) -> bool {
        if self.index + 1 >= self.images.len() {
            return false;
        }
        self.index += 1;
        self.direction = SlideDirection::Forward;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.direction = SlideDirection::Backward;
        true
    }

    pub fn jump_to(&mut self, index: usize) -> Result<bool, PlaybackError> {
        let count = self.images.len();
        if index >= count {
            return Err(Precondition::SlideOutOfRange { index, count }.into());
        }
        if index == self.index {
            return Ok(false);
        }
        self.direction = if index > self.index {
            SlideDirection::Forward
        } else {
            SlideDirection::Backward
        };
        self.index = index;
        Ok(true)
    }

    pub fn proceed(&mut self) -> Option<StepCompletion> {
        self.latch.fire()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.images.len()
    }

    pub fn direction(&self) -> SlideDirection {
        self.direction
    }

    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }
}
