// Playback orchestrator: computes the step sequence and owns every transition.
// Single active step model: the frontier is the only constructed step, replaced on each transition.

use serde::{Deserialize, Serialize};

use crate::ambient::{AmbientCoordinator, AmbientDrivers, AmbientFlags};
use crate::completion::StepCompletion;
use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Precondition};
use crate::markup::{BasicSanitizer, Sanitizer};
use crate::steps::{ActiveStep, FrontierView};
use crate::theme::{self, ThemeConfig, ThemeKey};
use crate::types::{StepId, Timestamp, Wish};

/// Ordered, content-dependent list of steps for one wish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSequence(Vec<StepId>);

impl StepSequence {
    /// Canonical order minus the gallery without images and the message without text.
    pub fn for_wish(wish: &Wish) -> Self {
        let has_images = !wish.images().is_empty();
        let has_message = wish.has_message();
        StepSequence(
            StepId::CANONICAL
                .into_iter()
                .filter(|step| match step {
                    StepId::Gallery => has_images,
                    StepId::Message => has_message,
                    _ => true,
                })
                .collect(),
        )
    }

    pub fn steps(&self) -> &[StepId] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<StepId> {
        self.0.get(index).copied()
    }

    pub fn position(&self, step: StepId) -> Option<usize> {
        self.0.iter().position(|s| *s == step)
    }

    pub fn contains(&self, step: StepId) -> bool {
        self.0.contains(&step)
    }
}

/// User input routed to the frontier step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackInput {
    Continue,
    BlowCandle { index: usize },
    SkipReveal,
    GalleryNext,
    GalleryPrevious,
    GalleryJump { index: usize },
    Replay,
}

impl PlaybackInput {
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackInput::Continue => "continue",
            PlaybackInput::BlowCandle { .. } => "blow_candle",
            PlaybackInput::SkipReveal => "skip_reveal",
            PlaybackInput::GalleryNext => "gallery_next",
            PlaybackInput::GalleryPrevious => "gallery_previous",
            PlaybackInput::GalleryJump { .. } => "gallery_jump",
            PlaybackInput::Replay => "replay",
        }
    }
}

/// Single timestamped input from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackEvent {
    pub timestamp: Timestamp,
    pub input: PlaybackInput,
}

/// Batch of inputs from JS (minimizes JS↔WASM crossings).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputBatch {
    pub events: Vec<PlaybackEvent>,
}

/// Collaborators the host provides for one session.
pub struct HostBindings {
    pub drivers: AmbientDrivers,
    pub sanitizer: Box<dyn Sanitizer>,
}

impl Default for HostBindings {
    fn default() -> Self {
        HostBindings {
            drivers: AmbientDrivers::silent(),
            sanitizer: Box::new(BasicSanitizer),
        }
    }
}

/// Everything the UI shell needs to render the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub step: StepId,
    pub index: usize,
    pub sequence: Vec<StepId>,
    pub theme: ThemeKey,
    pub ambient: AmbientFlags,
    pub frontier: FrontierView,
    /// When the host should tick next, if a timer is pending.
    pub next_deadline_us: Option<u64>,
}

/// One viewing session of a wish.
pub struct Playback {
    wish: Wish,
    theme: &'static ThemeConfig,
    config: PlaybackConfig,
    sequence: StepSequence,
    current_index: usize,
    frontier: ActiveStep,
    /// Bumped on every step activation; completions from older activations are stale.
    activation: u64,
    ambient: AmbientCoordinator,
    sanitizer: Box<dyn Sanitizer>,
    torn_down: bool,
}

impl Playback {
    /// Open a session. A missing wish is `ContentUnavailable`.
    pub fn new(
        wish: Option<Wish>,
        config: PlaybackConfig,
        host: HostBindings,
        now: Timestamp,
    ) -> Result<Self, PlaybackError> {
        let wish = wish.ok_or_else(|| {
            PlaybackError::ContentUnavailable("no wish snapshot to play".to_string())
        })?;
        config.validate()?;

        let theme = theme::resolve(wish.theme());
        let sequence = StepSequence::for_wish(&wish);
        let ambient = AmbientCoordinator::new(host.drivers, &wish, theme, &config);
        let frontier = ActiveStep::activate(
            StepId::Intro,
            &wish,
            &config,
            host.sanitizer.as_ref(),
            0,
            now,
        );

        let mut playback = Playback {
            wish,
            theme,
            config,
            sequence,
            current_index: 0,
            frontier,
            activation: 0,
            ambient,
            sanitizer: host.sanitizer,
            torn_down: false,
        };
        playback.ambient.begin();

        log::info!(
            "playback opened for {:?}: {:?}",
            playback.wish.person_name(),
            playback.sequence.steps()
        );
        Ok(playback)
    }

    /// Open a session from JSON payloads.
    pub fn from_json(
        wish_json: &str,
        config_json: &str,
        host: HostBindings,
        now: Timestamp,
    ) -> Result<Self, PlaybackError> {
        let wish = Wish::from_json(wish_json)?;
        let config = PlaybackConfig::from_json(config_json)?;
        Playback::new(Some(wish), config, host, now)
    }

    pub fn current_step(&self) -> StepId {
        self.frontier.id()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    pub fn wish(&self) -> &Wish {
        &self.wish
    }

    pub fn theme(&self) -> &'static ThemeConfig {
        self.theme
    }

    pub fn ambient_flags(&self) -> AmbientFlags {
        self.ambient.flags()
    }

    pub fn frontier(&self) -> &ActiveStep {
        &self.frontier
    }

    /// Move to the next step. At the last step this is rejected and nothing changes.
    pub fn advance(&mut self, now: Timestamp) -> Result<StepId, PlaybackError> {
        if self.torn_down {
            return Err(Precondition::SessionClosed.into());
        }
        let next = self.current_index + 1;
        if next >= self.sequence.steps().len() {
            log::warn!("advance ignored at last step {}", self.current_step());
            return Err(Precondition::AdvancePastEnd {
                index: self.current_index,
            }
            .into());
        }
        self.enter(next, now);
        Ok(self.current_step())
    }

    /// Back to the intro with ambient effects in their intro state.
    pub fn replay(&mut self, now: Timestamp) {
        if self.torn_down {
            log::debug!("replay after teardown ignored");
            return;
        }
        log::info!("replay from {}", self.current_step());
        self.enter(0, now);
    }

    /// Jump directly to a step of this sequence. Jumping to the intro is a replay.
    pub fn go_to_step(&mut self, step: StepId, now: Timestamp) -> Result<(), PlaybackError> {
        if self.torn_down {
            return Err(Precondition::SessionClosed.into());
        }
        let index = self
            .sequence
            .position(step)
            .ok_or(Precondition::StepNotInSequence(step))?;
        self.enter(index, now);
        Ok(())
    }

    /// Apply one input, then drive timers up to `now`.
    pub fn handle(&mut self, input: PlaybackInput, now: Timestamp) -> Result<(), PlaybackError> {
        if self.torn_down {
            log::debug!("input {} after teardown ignored", input.name());
            return Ok(());
        }

        match input {
            PlaybackInput::Replay => self.replay(now),
            other => {
                if let Some(completion) = self.frontier.apply(&other, now)? {
                    self.complete(completion, now);
                }
            }
        }
        self.tick(now);
        Ok(())
    }

    /// Drive frontier timers. Completions due by `now` advance playback.
    pub fn tick(&mut self, now: Timestamp) {
        if self.torn_down {
            return;
        }
        while let Some(completion) = self.frontier.poll(now) {
            if !self.complete(completion, now) {
                break;
            }
        }
    }

    /// Apply a batch. Precondition violations are logged and skipped.
    pub fn dispatch(&mut self, batch: InputBatch) {
        for event in batch.events {
            let name = event.input.name();
            if let Err(e) = self.handle(event.input, event.timestamp) {
                if e.is_precondition() {
                    log::warn!("{} rejected: {}", name, e);
                } else {
                    log::error!("{} failed: {}", name, e);
                }
            }
        }
    }

    /// Consume a completion. Only the current activation's token advances.
    pub fn complete(&mut self, completion: StepCompletion, now: Timestamp) -> bool {
        if completion.activation() != self.activation || completion.step() != self.current_step() {
            log::debug!(
                "stale completion from {} (activation {}) dropped",
                completion.step(),
                completion.activation()
            );
            return false;
        }
        match self.advance(now) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("completion of {} not applied: {}", completion.step(), e);
                false
            }
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            step: self.current_step(),
            index: self.current_index,
            sequence: self.sequence.steps().to_vec(),
            theme: self.theme.key,
            ambient: self.ambient.flags(),
            frontier: self.frontier.view(&self.wish),
            next_deadline_us: self.frontier.next_deadline().map(|t| t.as_micros()),
        }
    }

    /// Stop every ambient driver. Further inputs are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.ambient.teardown();
        self.torn_down = true;
        log::info!("playback closed for {:?}", self.wish.person_name());
    }

    fn enter(&mut self, index: usize, now: Timestamp) {
        let Some(step) = self.sequence.get(index) else {
            return;
        };
        self.activation += 1;
        self.frontier = ActiveStep::activate(
            step,
            &self.wish,
            &self.config,
            self.sanitizer.as_ref(),
            self.activation,
            now,
        );
        self.current_index = index;

        if step == StepId::Intro {
            self.ambient.begin();
        } else {
            self.ambient.on_enter(step);
        }
        log::debug!("step {} ({}/{})", step, index + 1, self.sequence.steps().len());
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::tests::Recorder;
    use crate::completion::CompletionLatch;
    use crate::steps::{CandlePhase, RevealPhase};
    use crate::types::MediaKind;
    use proptest::prelude::*;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn alex() -> Wish {
        Wish::new("Alex", "Happy Birthday", "", "cartoon")
    }

    fn sam() -> Wish {
        Wish::new("Sam", "Happy Birthday", "Hi", "festive").with_media(MediaKind::Image, "img1.png", 0)
    }

    fn open(wish: Wish) -> Playback {
        Playback::new(Some(wish), PlaybackConfig::default(), HostBindings::default(), ms(0)).unwrap()
    }

    fn open_recorded(wish: Wish, recorder: &Recorder) -> Playback {
        let host = HostBindings {
            drivers: recorder.drivers(false),
            sanitizer: Box::new(BasicSanitizer),
        };
        Playback::new(Some(wish), PlaybackConfig::default(), host, ms(0)).unwrap()
    }

    fn blow_all(playback: &mut Playback, at: u64) {
        for i in 0..5 {
            playback
                .handle(PlaybackInput::BlowCandle { index: i }, ms(at))
                .unwrap();
        }
    }

    #[test]
    fn sparse_wish_skips_gallery_and_message() {
        let playback = open(alex());
        assert_eq!(
            playback.sequence().steps(),
            &[StepId::Intro, StepId::Name, StepId::Cake, StepId::Celebration]
        );
    }

    #[test]
    fn full_wish_reaches_message_after_three_advances() {
        let mut playback = open(sam());
        assert_eq!(playback.sequence().steps(), &StepId::CANONICAL);

        for _ in 0..3 {
            playback.advance(ms(0)).unwrap();
        }
        assert_eq!(playback.current_step(), StepId::Message);
        assert_eq!(playback.current_index(), 3);
    }

    #[test]
    fn missing_wish_is_content_unavailable() {
        let result = Playback::new(None, PlaybackConfig::default(), HostBindings::default(), ms(0));
        assert!(matches!(result, Err(PlaybackError::ContentUnavailable(_))));

        let result = Playback::from_json("null", "{}", HostBindings::default(), ms(0));
        assert!(matches!(result, Err(PlaybackError::ContentUnavailable(_))));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PlaybackConfig {
            candle_count: 0,
            ..PlaybackConfig::default()
        };
        let result = Playback::new(Some(alex()), config, HostBindings::default(), ms(0));
        assert!(matches!(result, Err(PlaybackError::InvalidConfig(_))));
    }

    #[test]
    fn advance_at_last_step_changes_nothing() {
        let mut playback = open(alex());
        playback.go_to_step(StepId::Celebration, ms(0)).unwrap();
        let before = playback.snapshot();

        let err = playback.advance(ms(10)).unwrap_err();
        assert_eq!(
            err,
            PlaybackError::PreconditionViolation(Precondition::AdvancePastEnd { index: 3 })
        );
        assert_eq!(playback.snapshot(), before);
    }

    #[test]
    fn go_to_step_outside_sequence_is_rejected() {
        let mut playback = open(alex());
        let err = playback.go_to_step(StepId::Gallery, ms(0)).unwrap_err();
        assert_eq!(
            err,
            PlaybackError::PreconditionViolation(Precondition::StepNotInSequence(StepId::Gallery))
        );
        assert_eq!(playback.current_step(), StepId::Intro);
    }

    #[test]
    fn full_walkthrough_with_inputs() {
        let mut playback = open(sam());
        playback.handle(PlaybackInput::Continue, ms(0)).unwrap();
        playback.handle(PlaybackInput::Continue, ms(100)).unwrap();
        assert_eq!(playback.current_step(), StepId::Gallery);

        playback.handle(PlaybackInput::Continue, ms(200)).unwrap();
        assert_eq!(playback.current_step(), StepId::Message);

        // "Hi" takes two ticks.
        assert!(playback.handle(PlaybackInput::Continue, ms(210)).unwrap_err().is_precondition());
        playback.tick(ms(260));
        assert!(matches!(
            playback.snapshot().frontier,
            FrontierView::Message { phase: RevealPhase::Complete, .. }
        ));
        playback.handle(PlaybackInput::Continue, ms(300)).unwrap();
        assert_eq!(playback.current_step(), StepId::Cake);

        blow_all(&mut playback, 400);
        assert_eq!(playback.current_step(), StepId::Cake);
        playback.tick(ms(1_599));
        assert_eq!(playback.current_step(), StepId::Cake);
        playback.tick(ms(1_600));
        assert_eq!(playback.current_step(), StepId::Celebration);

        playback.handle(PlaybackInput::Replay, ms(2_000)).unwrap();
        assert_eq!(playback.current_step(), StepId::Intro);
    }

    #[test]
    fn four_candles_do_not_advance_and_fifth_advances_once() {
        let mut playback = open(alex());
        playback.go_to_step(StepId::Cake, ms(0)).unwrap();

        for i in 0..4 {
            playback.handle(PlaybackInput::BlowCandle { index: i }, ms(10)).unwrap();
        }
        playback.tick(ms(60_000));
        assert_eq!(playback.current_step(), StepId::Cake);

        playback.handle(PlaybackInput::BlowCandle { index: 4 }, ms(60_000)).unwrap();
        assert_eq!(playback.snapshot().next_deadline_us, Some(61_200_000));
        playback.tick(ms(61_200));
        assert_eq!(playback.current_step(), StepId::Celebration);
        playback.tick(ms(70_000));
        assert_eq!(playback.current_step(), StepId::Celebration);
    }

    #[test]
    fn replay_during_settle_delay_drops_pending_completion() {
        let mut playback = open(alex());
        playback.go_to_step(StepId::Cake, ms(0)).unwrap();
        blow_all(&mut playback, 100);
        assert!(matches!(
            playback.snapshot().frontier,
            FrontierView::Cake { phase: CandlePhase::Celebrating, .. }
        ));

        playback.replay(ms(200));
        playback.tick(ms(5_000));
        assert_eq!(playback.current_step(), StepId::Intro);
        assert_eq!(playback.snapshot().next_deadline_us, None);
    }

    #[test]
    fn leaving_message_cancels_typewriter_ticks() {
        let mut playback = open(sam());
        playback.go_to_step(StepId::Message, ms(0)).unwrap();
        assert!(playback.snapshot().next_deadline_us.is_some());

        playback.go_to_step(StepId::Cake, ms(10)).unwrap();
        assert_eq!(playback.snapshot().next_deadline_us, None);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut playback = open(alex());
        let stale = CompletionLatch::new(StepId::Intro, 99).fire().unwrap();
        assert!(!playback.complete(stale, ms(0)));
        assert_eq!(playback.current_step(), StepId::Intro);

        let wrong_step = CompletionLatch::new(StepId::Cake, 0).fire().unwrap();
        assert!(!playback.complete(wrong_step, ms(0)));
        assert_eq!(playback.current_step(), StepId::Intro);
    }

    #[test]
    fn rejected_inputs_leave_state_untouched() {
        let mut playback = open(alex());
        let before = playback.snapshot();

        for input in [
            PlaybackInput::BlowCandle { index: 0 },
            PlaybackInput::SkipReveal,
            PlaybackInput::GalleryJump { index: 3 },
        ] {
            assert!(playback.handle(input, ms(5)).unwrap_err().is_precondition());
        }
        assert_eq!(playback.snapshot(), before);

        playback.go_to_step(StepId::Cake, ms(10)).unwrap();
        let err = playback
            .handle(PlaybackInput::BlowCandle { index: 9 }, ms(20))
            .unwrap_err();
        assert!(err.is_precondition());
        assert!(matches!(
            playback.snapshot().frontier,
            FrontierView::Cake { ref lit, .. } if lit.iter().all(|l| *l)
        ));
    }

    #[test]
    fn celebration_only_accepts_replay() {
        let mut playback = open(alex());
        playback.go_to_step(StepId::Celebration, ms(0)).unwrap();
        assert!(playback.handle(PlaybackInput::Continue, ms(1)).unwrap_err().is_precondition());
        assert_eq!(playback.current_step(), StepId::Celebration);
    }

    #[test]
    fn ambient_follows_the_intro_transition() {
        let recorder = Recorder::default();
        let mut playback = open_recorded(alex(), &recorder);
        assert_eq!(playback.ambient_flags(), AmbientFlags::intro());
        assert_eq!(recorder.take(), vec!["overlay:start:10"]);

        playback.handle(PlaybackInput::Continue, ms(0)).unwrap();
        playback.handle(PlaybackInput::Continue, ms(10)).unwrap();
        assert_eq!(recorder.take(), vec!["overlay:stop", "music:start:/music.mp3"]);

        playback.go_to_step(StepId::Celebration, ms(20)).unwrap();
        assert_eq!(recorder.take(), vec!["celebration:start:5"]);

        playback.replay(ms(30));
        assert_eq!(playback.ambient_flags(), AmbientFlags::intro());
        assert_eq!(
            recorder.take(),
            vec!["music:stop", "celebration:stop", "overlay:start:10"]
        );

        playback.handle(PlaybackInput::Continue, ms(40)).unwrap();
        assert_eq!(recorder.take(), vec!["overlay:stop", "music:start:/music.mp3"]);
    }

    #[test]
    fn replay_is_idempotent() {
        let recorder = Recorder::default();
        let mut playback = open_recorded(sam(), &recorder);
        playback.go_to_step(StepId::Cake, ms(0)).unwrap();

        playback.replay(ms(10));
        let first = playback.snapshot();
        recorder.take();
        playback.replay(ms(20));
        assert_eq!(playback.snapshot(), first);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn teardown_releases_drivers_once() {
        let recorder = Recorder::default();
        let mut playback = open_recorded(alex(), &recorder);
        playback.advance(ms(0)).unwrap();
        recorder.take();

        playback.teardown();
        assert_eq!(recorder.take(), vec!["music:stop"]);
        playback.handle(PlaybackInput::Continue, ms(10)).unwrap();
        assert_eq!(playback.current_step(), StepId::Name);

        drop(playback);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn transitions_after_teardown_restart_nothing() {
        let recorder = Recorder::default();
        let mut playback = open_recorded(sam(), &recorder);
        playback.advance(ms(0)).unwrap();
        playback.teardown();
        recorder.take();

        playback.replay(ms(10));
        let err = playback.advance(ms(20)).unwrap_err();
        assert_eq!(
            err,
            PlaybackError::PreconditionViolation(Precondition::SessionClosed)
        );
        assert!(playback
            .go_to_step(StepId::Celebration, ms(30))
            .unwrap_err()
            .is_precondition());
        assert_eq!(playback.current_step(), StepId::Name);
        assert_eq!(playback.ambient_flags(), AmbientFlags::none());
        assert!(recorder.take().is_empty());

        drop(playback);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn torn_down_reveal_ignores_later_ticks() {
        let wish = Wish::new("Sam", "Happy Birthday", "a much longer birthday message", "cartoon");
        let mut playback = open(wish);
        playback.go_to_step(StepId::Message, ms(0)).unwrap();
        playback.tick(ms(90));
        let before = playback.snapshot();
        assert!(matches!(
            before.frontier,
            FrontierView::Message { ref revealed_text, .. } if revealed_text == "a m"
        ));

        playback.teardown();
        playback.tick(ms(10_090));
        let after = playback.snapshot();
        assert_eq!(after.frontier, before.frontier);
        assert_eq!(after.next_deadline_us, before.next_deadline_us);
        assert_eq!(after.step, StepId::Message);
    }

    #[test]
    fn dispatch_applies_json_batch_and_skips_violations() {
        let mut playback = Playback::from_json(
            r#"{"person_name": "Alex", "title": "Hey", "message": "", "theme": "minimal"}"#,
            r#"{"candle_count": 2, "candle_settle_delay_us": 0}"#,
            HostBindings::default(),
            ms(0),
        )
        .unwrap();

        let batch: InputBatch = serde_json::from_str(
            r#"{"events": [
                {"timestamp": 1000, "input": {"type": "continue"}},
                {"timestamp": 2000, "input": {"type": "gallery_next"}},
                {"timestamp": 3000, "input": {"type": "continue"}},
                {"timestamp": 4000, "input": {"type": "blow_candle", "index": 0}},
                {"timestamp": 5000, "input": {"type": "blow_candle", "index": 1}}
            ]}"#,
        )
        .unwrap();
        playback.dispatch(batch);

        let snapshot = playback.snapshot();
        assert_eq!(snapshot.step, StepId::Celebration);
        assert_eq!(snapshot.theme, ThemeKey::Minimal);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["step"], "celebration");
        assert_eq!(json["frontier"]["step"], "celebration");
        assert_eq!(json["frontier"]["share_text"], "A special wish for Alex!");
        assert_eq!(json["ambient"]["music_playing"], true);
    }

    #[test]
    fn name_view_formats_special_date() {
        let mut playback = open(alex().with_special_date("2024-05-01"));
        playback.advance(ms(0)).unwrap();
        assert_eq!(
            playback.snapshot().frontier,
            FrontierView::Name {
                person_name: "Alex".to_string(),
                title: "Happy Birthday".to_string(),
                special_date: Some("May 1, 2024".to_string()),
            }
        );
    }

    fn wish_strategy() -> impl Strategy<Value = Wish> {
        (
            prop::collection::vec(0i32..10, 0..4),
            prop_oneof![
                Just(String::new()),
                Just("<p></p>".to_string()),
                Just("   ".to_string()),
                "[a-z]{1,12}",
                "<b>[a-z]{1,12}</b>",
            ],
        )
            .prop_map(|(orders, message)| {
                orders.into_iter().fold(
                    Wish::new("Pat", "Title", message, "cartoon"),
                    |wish, order| wish.with_media(MediaKind::Image, format!("{}.png", order), order),
                )
            })
    }

    proptest! {
        /// Intro first, celebration last, gallery/message present exactly when there is content.
        #[test]
        fn sequence_follows_content(wish in wish_strategy()) {
            let sequence = StepSequence::for_wish(&wish);
            prop_assert_eq!(sequence.get(0), Some(StepId::Intro));
            prop_assert_eq!(sequence.steps().last().copied(), Some(StepId::Celebration));
            prop_assert!(sequence.contains(StepId::Name));
            prop_assert!(sequence.contains(StepId::Cake));
            prop_assert_eq!(sequence.contains(StepId::Gallery), !wish.images().is_empty());
            prop_assert_eq!(sequence.contains(StepId::Message), wish.has_message());
        }

        /// advance moves one step until the end, then is a no-op.
        #[test]
        fn advance_walks_one_step_at_a_time(wish in wish_strategy(), extra in 0usize..4) {
            let mut playback = open(wish);
            let len = playback.sequence().steps().len();
            for i in 0..len - 1 {
                prop_assert_eq!(playback.current_index(), i);
                playback.advance(ms(i as u64)).unwrap();
            }
            for _ in 0..extra {
                prop_assert!(playback.advance(ms(100)).is_err());
                prop_assert_eq!(playback.current_index(), len - 1);
            }
        }

        /// replay resets to index 0 from anywhere.
        #[test]
        fn replay_always_returns_to_intro(wish in wish_strategy(), steps in 0usize..6) {
            let mut playback = open(wish);
            for _ in 0..steps {
                let _ = playback.advance(ms(0));
            }
            playback.replay(ms(1));
            prop_assert_eq!(playback.current_index(), 0);
            prop_assert_eq!(playback.ambient_flags(), AmbientFlags::intro());
        }
    }
}
