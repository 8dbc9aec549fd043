// Display helpers for the UI shell: special-date formatting and share metadata.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::Wish;

/// Render a stored date as "May 1, 2024". Accepts `YYYY-MM-DD` or RFC 3339.
pub fn format_special_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))?;
    Some(date.format("%B %-d, %Y").to_string())
}

/// Link preview and share-sheet text for a wish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareMetadata {
    pub title: String,
    pub description: String,
    pub share_text: String,
}

impl ShareMetadata {
    pub fn for_wish(wish: &Wish) -> Self {
        let name = wish.person_name();
        ShareMetadata {
            title: format!("{} - A Special Wish for {}", wish.title(), name),
            description: format!(
                "Someone created a special wish for {}. Open it to experience the surprise!",
                name
            ),
            share_text: format!("A special wish for {}!", name),
        }
    }

    /// Title used when the wish lookup failed.
    pub fn not_found() -> Self {
        ShareMetadata {
            title: "Wish Not Found".to_string(),
            description: String::new(),
            share_text: String::new(),
        }
    }
}
