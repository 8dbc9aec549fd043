// Ambient effects: background music, the floating-balloon overlay and the celebration confetti.
// The core decides when they run; drivers (JS in the browser) do the actual playing and drawing.
// Driver failures never gate playback.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PlaybackConfig;
use crate::theme::ThemeConfig;
use crate::types::{StepId, Wish};

/// Extra confetti colors layered on top of the theme palette.
const CONFETTI_EXTRA_COLORS: [&str; 2] = ["#FFD700", "#FF69B4"];

/// Extra balloon colors layered on top of the theme palette.
const BALLOON_EXTRA_COLORS: [&str; 6] = [
    "#FF6B6B", "#4ECDC4", "#FFE66D", "#A78BFA", "#F472B6", "#34D399",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmbientError {
    #[error("Ambient source failed to load: {0}")]
    LoadFailed(String),

    #[error("Ambient host error: {0}")]
    Host(String),
}

/// What a driver is asked to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "lowercase")]
pub enum AmbientCue {
    Music {
        src: String,
        volume: f32,
        looped: bool,
    },
    /// Floating balloons. Stopping the overlay plays its fly-away exit.
    Overlay { count: u32, colors: Vec<String> },
    Confetti { colors: Vec<String>, duration_us: u64 },
}

/// Host-side effect implementation.
pub trait AmbientDriver {
    fn start(&mut self, cue: &AmbientCue) -> Result<(), AmbientError>;
    fn stop(&mut self);
}

/// Driver that does nothing. Used where the host supplies none.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentDriver;

impl AmbientDriver for SilentDriver {
    fn start(&mut self, _cue: &AmbientCue) -> Result<(), AmbientError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

/// The three driver slots a session owns.
pub struct AmbientDrivers {
    pub music: Box<dyn AmbientDriver>,
    pub overlay: Box<dyn AmbientDriver>,
    pub celebration: Box<dyn AmbientDriver>,
}

impl AmbientDrivers {
    pub fn silent() -> Self {
        AmbientDrivers {
            music: Box::new(SilentDriver),
            overlay: Box::new(SilentDriver),
            celebration: Box::new(SilentDriver),
        }
    }
}

impl Default for AmbientDrivers {
    fn default() -> Self {
        AmbientDrivers::silent()
    }
}

/// Currently active ambient effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientFlags {
    pub music_playing: bool,
    pub overlay_visible: bool,
    pub overlay_exiting: bool,
    pub celebration_active: bool,
}

impl AmbientFlags {
    /// Flags while the intro is showing.
    pub fn intro() -> Self {
        AmbientFlags {
            music_playing: false,
            overlay_visible: true,
            overlay_exiting: false,
            celebration_active: false,
        }
    }

    pub fn none() -> Self {
        AmbientFlags {
            music_playing: false,
            overlay_visible: false,
            overlay_exiting: false,
            celebration_active: false,
        }
    }
}

/// Wraps a driver so start/stop are idempotent whatever the driver does.
struct DriverSlot {
    name: &'static str,
    driver: Box<dyn AmbientDriver>,
    running: bool,
}

impl DriverSlot {
    fn new(name: &'static str, driver: Box<dyn AmbientDriver>) -> Self {
        DriverSlot {
            name,
            driver,
            running: false,
        }
    }

    fn start(&mut self, cue: &AmbientCue) -> bool {
        if self.running {
            return true;
        }
        match self.driver.start(cue) {
            Ok(()) => {
                log::debug!("ambient {} started", self.name);
                self.running = true;
            }
            Err(e) => log::warn!("ambient {} unavailable: {}", self.name, e),
        }
        self.running
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.driver.stop();
        self.running = false;
        log::debug!("ambient {} stopped", self.name);
    }
}

/// Sequences ambient effects against step transitions.
pub struct AmbientCoordinator {
    music: DriverSlot,
    overlay: DriverSlot,
    celebration: DriverSlot,
    music_cue: AmbientCue,
    overlay_cue: AmbientCue,
    confetti_cue: AmbientCue,
    flags: AmbientFlags,
    /// Set once the session has left the intro; cleared by replay.
    left_intro: bool,
    celebration_launched: bool,
}

impl AmbientCoordinator {
    pub fn new(
        drivers: AmbientDrivers,
        wish: &Wish,
        theme: &ThemeConfig,
        config: &PlaybackConfig,
    ) -> Self {
        let src = wish
            .background_audio()
            .map(|m| m.url.clone())
            .unwrap_or_else(|| config.fallback_music_src.clone());
        let palette = [theme.colors.primary, theme.colors.secondary, theme.colors.accent];

        AmbientCoordinator {
            music: DriverSlot::new("music", drivers.music),
            overlay: DriverSlot::new("overlay", drivers.overlay),
            celebration: DriverSlot::new("celebration", drivers.celebration),
            music_cue: AmbientCue::Music {
                src,
                volume: config.music_volume,
                looped: config.music_loop,
            },
            overlay_cue: AmbientCue::Overlay {
                count: config.overlay_count,
                colors: palette
                    .iter()
                    .chain(BALLOON_EXTRA_COLORS.iter())
                    .map(|c| c.to_string())
                    .collect(),
            },
            confetti_cue: AmbientCue::Confetti {
                colors: palette
                    .iter()
                    .chain(CONFETTI_EXTRA_COLORS.iter())
                    .map(|c| c.to_string())
                    .collect(),
                duration_us: config.confetti_duration_us,
            },
            flags: AmbientFlags::none(),
            left_intro: false,
            celebration_launched: false,
        }
    }

    /// Put effects into their intro state. A still-running overlay is left as is.
    pub fn begin(&mut self) {
        self.music.stop();
        self.celebration.stop();
        self.left_intro = false;
        self.celebration_launched = false;

        let visible = self.overlay.start(&self.overlay_cue);
        self.flags = AmbientFlags {
            overlay_visible: visible,
            ..AmbientFlags::intro()
        };
    }

    /// React to the frontier becoming `step`.
    pub fn on_enter(&mut self, step: StepId) {
        if step == StepId::Intro {
            return;
        }

        if !self.left_intro {
            self.left_intro = true;
            // One-shot: the overlay never re-enters before replay.
            if self.flags.overlay_visible {
                self.overlay.stop();
                self.flags.overlay_visible = false;
                self.flags.overlay_exiting = true;
            }
            self.flags.music_playing = self.music.start(&self.music_cue);
        }

        if step == StepId::Celebration && !self.celebration_launched {
            self.celebration_launched = true;
            self.flags.celebration_active = self.celebration.start(&self.confetti_cue);
        }
    }

    /// Release every driver. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.music.stop();
        self.overlay.stop();
        self.celebration.stop();
        self.flags = AmbientFlags::none();
    }

    pub fn flags(&self) -> AmbientFlags {
        self.flags
    }

    pub fn music_cue(&self) -> &AmbientCue {
        &self.music_cue
    }
}
