// Playback timing and ambient settings passed from JS.
// Every field has a serde default so `{}` is a complete configuration.

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Number of candles on the cake.
    #[serde(default = "default_candle_count")]
    pub candle_count: usize,
    /// Delay between the last candle going out and the cake step completing (microseconds).
    #[serde(default = "default_candle_settle_delay")]
    pub candle_settle_delay_us: u64,
    /// Typewriter interval per revealed character (microseconds).
    #[serde(default = "default_reveal_tick")]
    pub reveal_tick_us: u64,
    /// Music used when the wish carries no audio attachment.
    #[serde(default = "default_fallback_music")]
    pub fallback_music_src: String,
    /// Background music volume, 0.0 to 1.0.
    #[serde(default = "default_music_volume")]
    pub music_volume: f32,
    #[serde(default = "default_true")]
    pub music_loop: bool,
    /// Number of floating balloons in the decorative overlay.
    #[serde(default = "default_overlay_count")]
    pub overlay_count: u32,
    /// How long the celebration confetti keeps streaming (microseconds).
    #[serde(default = "default_confetti_duration")]
    pub confetti_duration_us: u64,
}

fn default_candle_count() -> usize {
    5
}

fn default_candle_settle_delay() -> u64 {
    1_200_000 // 1.2s
}

fn default_reveal_tick() -> u64 {
    30_000 // 30ms
}

fn default_fallback_music() -> String {
    "/music.mp3".to_string()
}

fn default_music_volume() -> f32 {
    0.4
}

fn default_true() -> bool {
    true
}

fn default_overlay_count() -> u32 {
    10
}

fn default_confetti_duration() -> u64 {
    4_000_000 // 4s
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            candle_count: default_candle_count(),
            candle_settle_delay_us: default_candle_settle_delay(),
            reveal_tick_us: default_reveal_tick(),
            fallback_music_src: default_fallback_music(),
            music_volume: default_music_volume(),
            music_loop: default_true(),
            overlay_count: default_overlay_count(),
            confetti_duration_us: default_confetti_duration(),
        }
    }
}

impl PlaybackConfig {
    /// Parse and validate a JSON configuration. An empty string means defaults.
    pub fn from_json(json: &str) -> Result<Self, PlaybackError> {
        if json.trim().is_empty() {
            return Ok(PlaybackConfig::default());
        }
        let config: PlaybackConfig = serde_json::from_str(json)
            .map_err(|e| PlaybackError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlaybackError> {
        if self.candle_count == 0 {
            return Err(PlaybackError::InvalidConfig(
                "candle_count must be at least 1".to_string(),
            ));
        }
        if self.reveal_tick_us == 0 {
            return Err(PlaybackError::InvalidConfig(
                "reveal_tick_us must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(PlaybackError::InvalidConfig(format!(
                "music_volume {} outside 0.0..=1.0",
                self.music_volume
            )));
        }
        Ok(())
    }
}
