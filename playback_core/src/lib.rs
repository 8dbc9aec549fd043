// playback_core: Rust/WASM engine for the wish playback experience.
// Sequencing, gating and timing live here; JS renders, plays audio and forwards input.

mod ambient;
mod completion;
mod config;
mod error;
mod markup;
mod orchestrator;
mod present;
mod steps;
mod theme;
mod timer;
mod types;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub use ambient::{
    AmbientCoordinator, AmbientCue, AmbientDriver, AmbientDrivers, AmbientError, AmbientFlags,
    SilentDriver,
};
pub use completion::{CompletionLatch, StepCompletion};
pub use config::PlaybackConfig;
pub use error::{PlaybackError, Precondition};
pub use markup::{plain_text, BasicSanitizer, Sanitizer};
pub use orchestrator::{
    HostBindings, InputBatch, Playback, PlaybackEvent, PlaybackInput, PlaybackSnapshot,
    StepSequence,
};
pub use present::{format_special_date, ShareMetadata};
pub use steps::{
    ActiveStep, CandlePhase, CandleStep, FrontierView, GalleryStep, RevealPhase, TypewriterStep,
};
pub use theme::{resolve as resolve_theme_config, ThemeColors, ThemeConfig, ThemeKey};
pub use timer::Timer;
pub use types::*;

/// Initialize panic hook and console logging for the browser.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Ambient driver backed by a `{ start(cueJson), stop() }` object from JS.
struct JsAmbientDriver {
    name: &'static str,
    start: js_sys::Function,
    stop: js_sys::Function,
}

impl AmbientDriver for JsAmbientDriver {
    fn start(&mut self, cue: &AmbientCue) -> Result<(), AmbientError> {
        let payload = to_json(cue).map_err(|e| AmbientError::Host(e.to_string()))?;
        self.start
            .call1(&JsValue::NULL, &JsValue::from_str(&payload))
            .map(|_| ())
            .map_err(|e| AmbientError::Host(format!("{} start threw: {:?}", self.name, e)))
    }

    fn stop(&mut self) {
        if let Err(e) = self.stop.call0(&JsValue::NULL) {
            log::warn!("{} stop threw: {:?}", self.name, e);
        }
    }
}

/// Sanitizer backed by a JS `sanitize(markup) -> string` function (e.g. DOMPurify).
struct JsSanitizer {
    sanitize: js_sys::Function,
}

impl Sanitizer for JsSanitizer {
    fn sanitize(&self, markup: &str) -> String {
        match self
            .sanitize
            .call1(&JsValue::NULL, &JsValue::from_str(markup))
            .ok()
            .and_then(|v| v.as_string())
        {
            Some(safe) => safe,
            None => {
                log::warn!("host sanitizer failed, using built-in sanitizer");
                BasicSanitizer.sanitize(markup)
            }
        }
    }
}

fn js_function(target: &JsValue, key: &str) -> Option<js_sys::Function> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
}

fn js_driver(host: &JsValue, name: &'static str) -> Box<dyn AmbientDriver> {
    let entry = js_sys::Reflect::get(host, &JsValue::from_str(name))
        .ok()
        .filter(|v| v.is_object());
    let functions = entry.and_then(|e| Some((js_function(&e, "start")?, js_function(&e, "stop")?)));
    match functions {
        Some((start, stop)) => Box::new(JsAmbientDriver { name, start, stop }),
        None => {
            log::debug!("no {} driver supplied", name);
            Box::new(SilentDriver)
        }
    }
}

/// Host object shape: `{ music?, overlay?, celebration?: {start, stop}, sanitize?: fn }`.
fn host_bindings(host: &JsValue) -> HostBindings {
    if !host.is_object() {
        return HostBindings::default();
    }
    let sanitizer: Box<dyn Sanitizer> = match js_function(host, "sanitize") {
        Some(sanitize) => Box::new(JsSanitizer { sanitize }),
        None => Box::new(BasicSanitizer),
    };
    HostBindings {
        drivers: AmbientDrivers {
            music: js_driver(host, "music"),
            overlay: js_driver(host, "overlay"),
            celebration: js_driver(host, "celebration"),
        },
        sanitizer,
    }
}

fn to_js_error(err: PlaybackError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, PlaybackError> {
    Ok(serde_json::to_string(value)?)
}

/// Main engine interface exposed to JavaScript.
/// Batch interface to minimize JS↔WASM crossings; every call returns the new snapshot as JSON.
#[wasm_bindgen]
pub struct PlaybackEngine {
    inner: Playback,
}

#[wasm_bindgen]
impl PlaybackEngine {
    /// Open a playback session. Fails with a "Content unavailable" message when the wish
    /// is null or malformed; the shell shows its not-found state for that.
    #[wasm_bindgen(constructor)]
    pub fn new(
        wish_json: &str,
        config_json: &str,
        host: JsValue,
        now_us: u64,
    ) -> Result<PlaybackEngine, JsValue> {
        let inner = Playback::from_json(
            wish_json,
            config_json,
            host_bindings(&host),
            Timestamp::from_micros(now_us),
        )
        .map_err(to_js_error)?;
        Ok(PlaybackEngine { inner })
    }

    /// Apply a batch of timestamped inputs.
    pub fn dispatch(&mut self, batch_json: &str) -> Result<String, JsValue> {
        let batch: InputBatch =
            serde_json::from_str(batch_json).map_err(|e| to_js_error(e.into()))?;
        self.inner.dispatch(batch);
        self.snapshot()
    }

    /// Drive timers (typewriter, candle settle delay) up to `now_us`.
    pub fn tick(&mut self, now_us: u64) -> Result<String, JsValue> {
        self.inner.tick(Timestamp::from_micros(now_us));
        self.snapshot()
    }

    pub fn replay(&mut self, now_us: u64) -> Result<String, JsValue> {
        self.inner.replay(Timestamp::from_micros(now_us));
        self.snapshot()
    }

    /// Jump to a named step of this wish's sequence (deep links, previews).
    pub fn go_to_step(&mut self, step: &str, now_us: u64) -> Result<String, JsValue> {
        let step = StepId::parse(step)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown step: {}", step)))?;
        self.inner
            .go_to_step(step, Timestamp::from_micros(now_us))
            .map_err(to_js_error)?;
        self.snapshot()
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_json(&self.inner.snapshot()).map_err(to_js_error)
    }

    /// Current step identifier, for routing and analytics.
    pub fn current_step(&self) -> String {
        self.inner.current_step().to_string()
    }

    /// Resolved theme for this wish as JSON.
    pub fn theme(&self) -> Result<String, JsValue> {
        to_json(self.inner.theme()).map_err(to_js_error)
    }

    /// Stop all ambient effects. Call when the viewer navigates away.
    pub fn teardown(&mut self) {
        self.inner.teardown();
    }
}

/// Resolve a theme identifier to its configuration JSON. Unknown ids yield the default theme.
#[wasm_bindgen]
pub fn resolve_theme(id: &str) -> Result<String, JsValue> {
    to_json(theme::resolve(id)).map_err(to_js_error)
}

/// Link-preview metadata for a wish record; the not-found title when the record is unusable.
#[wasm_bindgen]
pub fn share_metadata(wish_json: &str) -> Result<String, JsValue> {
    let metadata = match Wish::from_json(wish_json) {
        Ok(wish) => ShareMetadata::for_wish(&wish),
        Err(e) => {
            log::debug!("share metadata fallback: {}", e);
            ShareMetadata::not_found()
        }
    };
    to_json(&metadata).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_theme_serializes_fallback() {
        let json = resolve_theme("unknown").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["key"], "cartoon");
        assert_eq!(value["colors"]["text_muted"], "#a0a0b8");
    }

    #[test]
    fn share_metadata_falls_back_to_not_found() {
        let json = share_metadata(r#"{"person_name": "Sam", "title": "Yay"}"#).unwrap();
        assert!(json.contains("Yay - A Special Wish for Sam"));

        let json = share_metadata("null").unwrap();
        assert!(json.contains("Wish Not Found"));
    }
}
