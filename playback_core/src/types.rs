// Strong typing over strings. Newtypes for timestamps, typed step ids and media kinds.
// The wire records mirror the stored wish row; `Wish` is the validated snapshot the core runs on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlaybackError;
use crate::markup;

/// Timestamp in microseconds on the host clock. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    pub fn from_millis(ms: u64) -> Self {
        Timestamp(ms.saturating_mul(1000))
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    /// Timestamp shifted forward by `us`, saturating at the end of the clock.
    pub fn after(&self, us: u64) -> Self {
        Timestamp(self.0.saturating_add(us))
    }
}

/// One screen of the playback experience, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepId {
    Intro,
    Name,
    Gallery,
    Message,
    Cake,
    Celebration,
}

impl StepId {
    /// Canonical order before content-based skipping.
    pub const CANONICAL: [StepId; 6] = [
        StepId::Intro,
        StepId::Name,
        StepId::Gallery,
        StepId::Message,
        StepId::Cake,
        StepId::Celebration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Intro => "intro",
            StepId::Name => "name",
            StepId::Gallery => "gallery",
            StepId::Message => "message",
            StepId::Cake => "cake",
            StepId::Celebration => "celebration",
        }
    }

    pub fn parse(id: &str) -> Option<StepId> {
        StepId::CANONICAL.into_iter().find(|s| s.as_str() == id)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of an attached media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

/// A validated media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub url: String,
    pub order: i32,
}

/// Slide transition direction in the gallery. Only selects the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    Forward,
    Backward,
}

/// Media row as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub file_url: String,
    #[serde(default)]
    pub order_index: i32,
}

/// Wish row as delivered by the data-fetch layer. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishRecord {
    pub person_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub special_date: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub wish_media: Option<Vec<MediaRecord>>,
}

/// Immutable wish snapshot. Never mutated by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wish {
    person_name: String,
    title: String,
    special_date: Option<String>,
    message: String,
    theme: String,
    media: Vec<MediaItem>,
}

impl Wish {
    pub fn new(
        person_name: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        theme: impl Into<String>,
    ) -> Self {
        Wish {
            person_name: person_name.into(),
            title: title.into(),
            special_date: None,
            message: message.into(),
            theme: theme.into(),
            media: Vec::new(),
        }
    }

    pub fn with_special_date(mut self, date: impl Into<String>) -> Self {
        self.special_date = Some(date.into());
        self
    }

    pub fn with_media(mut self, kind: MediaKind, url: impl Into<String>, order: i32) -> Self {
        self.media.push(MediaItem {
            kind,
            url: url.into(),
            order,
        });
        self
    }

    /// Validate a stored record into a snapshot.
    pub fn from_record(record: WishRecord) -> Result<Self, PlaybackError> {
        if record.person_name.trim().is_empty() {
            return Err(PlaybackError::ContentUnavailable(
                "wish has no person name".to_string(),
            ));
        }

        let media = record
            .wish_media
            .unwrap_or_default()
            .into_iter()
            .map(|m| {
                if m.file_url.trim().is_empty() {
                    return Err(PlaybackError::ContentUnavailable(
                        "media item has an empty url".to_string(),
                    ));
                }
                Ok(MediaItem {
                    kind: m.kind,
                    url: m.file_url,
                    order: m.order_index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Wish {
            person_name: record.person_name,
            title: record.title,
            special_date: record.special_date.filter(|d| !d.trim().is_empty()),
            message: record.message,
            theme: record.theme,
            media,
        })
    }

    /// Parse a JSON record. `null` and malformed payloads are `ContentUnavailable`.
    pub fn from_json(json: &str) -> Result<Self, PlaybackError> {
        let record: Option<WishRecord> = serde_json::from_str(json)
            .map_err(|e| PlaybackError::ContentUnavailable(format!("malformed wish: {}", e)))?;
        match record {
            Some(record) => Wish::from_record(record),
            None => Err(PlaybackError::ContentUnavailable(
                "wish snapshot is null".to_string(),
            )),
        }
    }

    pub fn person_name(&self) -> &str {
        &self.person_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn special_date(&self) -> Option<&str> {
        self.special_date.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Image items sorted by `order`; equal orders keep insertion order.
    pub fn images(&self) -> Vec<&MediaItem> {
        let mut images: Vec<&MediaItem> = self
            .media
            .iter()
            .filter(|m| m.kind == MediaKind::Image)
            .collect();
        images.sort_by_key(|m| m.order);
        images
    }

    /// First audio item by insertion order.
    pub fn background_audio(&self) -> Option<&MediaItem> {
        self.media.iter().find(|m| m.kind == MediaKind::Audio)
    }

    /// Whether the message has visible text once markup is stripped.
    pub fn has_message(&self) -> bool {
        !markup::plain_text(&self.message).trim().is_empty()
    }
}
