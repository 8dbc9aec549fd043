// Rich-text handling for the message step.
// Plain text drives the typewriter; sanitized markup is what gets rendered afterwards.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());

/// Formatting the message editor produces. Everything else is dropped, keeping its text.
const FORMATTING_TAGS: [&str; 22] = [
    "a", "b", "blockquote", "br", "code", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i",
    "li", "ol", "p", "pre", "s", "strong", "u", "ul",
];

/// Elements removed together with their content.
const EXECUTABLE_TAGS: [&str; 6] = ["script", "style", "iframe", "object", "embed", "noscript"];

static ALLOWLIST: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::default();
    builder
        .tags(FORMATTING_TAGS.iter().copied().collect())
        .clean_content_tags(EXECUTABLE_TAGS.iter().copied().collect());
    builder
});

/// Strip tags and decode character references.
pub fn plain_text(markup: &str) -> String {
    let stripped = TAG.replace_all(markup, "");
    decode_entities(&stripped)
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ if body.starts_with("#x") || body.starts_with("#X") => {
                    u32::from_str_radix(&body[2..], 16).ok().and_then(char::from_u32)
                }
                _ if body.starts_with('#') => body[1..].parse::<u32>().ok().and_then(char::from_u32),
                _ => None,
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Removes executable content from markup while keeping formatting.
pub trait Sanitizer {
    fn sanitize(&self, markup: &str) -> String;
}

/// Allowlist sanitizer used when the host does not provide one.
///
/// Keeps the editor's formatting tags, drops script-like elements with their content,
/// and strips every attribute and URL scheme ammonia does not allow.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSanitizer;

impl Sanitizer for BasicSanitizer {
    fn sanitize(&self, markup: &str) -> String {
        ALLOWLIST.clean(markup).to_string()
    }
}
