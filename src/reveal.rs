//! Scroll-driven reveal sequencing.
//!
//! Visual elements (section headers, grid tiles) start in a hidden resting
//! pose (transparent, offset, slightly rotated) and are revealed as the user
//! scrolls them into view. The sequencer keeps one [`RevealEntry`] per
//! registered element and turns viewport geometry into [`RevealEvent`]s that
//! the host feeds to whatever animation primitive it has.
//!
//! ## Policies
//!
//! | Policy | Behaviour |
//! |--------|-----------|
//! | [`RevealPolicy::OneShot`] | Plays once, the first time the element crosses the trigger line. Never re-triggers. |
//! | [`RevealPolicy::Toggle`] | Plays on entry, reverses when the element falls back below the trigger line. |
//! | [`RevealPolicy::Scrub`] | Progress is a continuous function of position between two lines. Scrolling back reverses it. |
//!
//! The trigger line and the scrub lines are fractions of the viewport height,
//! measured from the top: `0.85` means "85% of the way down the viewport".
//!
//! ## Coalescing
//!
//! Scroll events arrive far more often than anything visibly changes.
//! [`RevealSequencer::on_scroll`] only records the latest viewport and
//! processes it when the throttle interval has passed; the host calls
//! [`RevealSequencer::flush`] on its next animation frame to pick up the
//! trailing position. Processing the same geometry twice emits nothing new.
//!
//! ## Teardown
//!
//! Every registration is mirrored on the [`ObserverHost`]: an `observe` per
//! element and a single scroll listener while anything is registered.
//! [`RevealSequencer::teardown`] (also run on drop) releases all of them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::Duration;

/// Smallest scrub progress change worth reporting.
const PROGRESS_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub height: f32,
}

/// Vertical extent of an element relative to the viewport top, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }
}

/// Which side an element slides in from, as a function of its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryDirection {
    /// Even orders enter from the right, odd from the left.
    EvenFromRight,
    /// Even orders enter from the left, odd from the right.
    EvenFromLeft,
}

impl EntryDirection {
    /// `+1.0` for "starts to the right", `-1.0` for "starts to the left".
    pub fn sign(self, order: usize) -> f32 {
        let even = order % 2 == 0;
        match (self, even) {
            (EntryDirection::EvenFromRight, true) | (EntryDirection::EvenFromLeft, false) => 1.0,
            _ => -1.0,
        }
    }
}

/// Entry and exit lines for a scrubbed reveal.
///
/// Progress is `0` when the element's top reaches `start` and `1` when its
/// bottom reaches `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrubRange {
    pub start: f32,
    pub end: f32,
}

impl ScrubRange {
    pub fn progress(&self, bounds: Bounds, viewport: Viewport) -> f32 {
        let start_line = self.start * viewport.height;
        let end_line = self.end * viewport.height;
        let travelled = start_line - bounds.top;
        let span = bounds.height() + start_line - end_line;
        if span <= 0.0 {
            return if travelled >= 0.0 { 1.0 } else { 0.0 };
        }
        (travelled / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealPolicy {
    OneShot,
    Toggle,
    Scrub(ScrubRange),
}

/// Visual state of an element: opacity, translation (px) and rotation (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub opacity: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub rotation: f32,
}

impl Pose {
    pub const VISIBLE: Pose = Pose {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        rotation: 0.0,
    };

    pub fn lerp(from: Pose, to: Pose, t: f32) -> Pose {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Pose {
            opacity: mix(from.opacity, to.opacity),
            offset_x: mix(from.offset_x, to.offset_x),
            offset_y: mix(from.offset_y, to.offset_y),
            rotation: mix(from.rotation, to.rotation),
        }
    }
}

/// Timing and geometry shared by every registered element.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSettings {
    /// Fraction of the viewport height an element's top must rise above.
    pub trigger_line: f32,
    pub duration: Duration,
    /// Delay between consecutive elements revealed in the same pass.
    pub stagger: Duration,
    /// Minimum time between processed scroll positions.
    pub throttle: Duration,
    pub offset_x: f32,
    pub offset_y: f32,
    pub rotation: f32,
    pub direction: EntryDirection,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            trigger_line: 0.85,
            duration: Duration::from_millis(600),
            stagger: Duration::from_millis(100),
            throttle: Duration::from_millis(100),
            offset_x: 200.0,
            offset_y: 20.0,
            rotation: 10.0,
            direction: EntryDirection::EvenFromRight,
        }
    }
}

impl RevealSettings {
    /// Resting pose before an element of the given order is revealed.
    pub fn hidden_pose(&self, order: usize) -> Pose {
        Pose {
            opacity: 0.0,
            offset_x: self.direction.sign(order) * self.offset_x,
            offset_y: self.offset_y,
            rotation: self.rotation,
        }
    }
}

/// Per-element reveal state.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealEntry {
    pub order: usize,
    pub policy: RevealPolicy,
    /// Once true, stays true for the lifetime of the registration.
    pub has_entered_once: bool,
    pub visible: bool,
    pub progress: f32,
}

impl RevealEntry {
    fn new(order: usize, policy: RevealPolicy) -> Self {
        Self {
            order,
            policy,
            has_entered_once: false,
            visible: false,
            progress: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent<K> {
    /// Animate from `from` to [`Pose::VISIBLE`].
    Play {
        key: K,
        from: Pose,
        delay: Duration,
        duration: Duration,
    },
    /// Animate back to the hidden pose `to`.
    Reverse { key: K, to: Pose, duration: Duration },
    /// Jump to a scrubbed position.
    Progress { key: K, progress: f32, pose: Pose },
}

impl<K> RevealEvent<K> {
    pub fn key(&self) -> &K {
        match self {
            RevealEvent::Play { key, .. }
            | RevealEvent::Reverse { key, .. }
            | RevealEvent::Progress { key, .. } => key,
        }
    }
}

/// The host's observation surface (intersection observers, scroll listeners, layout).
pub trait ObserverHost<K> {
    fn observe(&mut self, key: &K);
    fn unobserve(&mut self, key: &K);
    fn listen_scroll(&mut self);
    fn unlisten_scroll(&mut self);
    /// Current viewport-relative bounds, or `None` when not laid out.
    fn measure(&self, key: &K) -> Option<Bounds>;
}

/// Host for headless use (rendering, CLI): observes nothing, measures nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedHost;

impl<K> ObserverHost<K> for DetachedHost {
    fn observe(&mut self, _key: &K) {}
    fn unobserve(&mut self, _key: &K) {}
    fn listen_scroll(&mut self) {}
    fn unlisten_scroll(&mut self) {}
    fn measure(&self, _key: &K) -> Option<Bounds> {
        None
    }
}

pub struct RevealSequencer<K: Eq + Hash + Ord + Clone> {
    settings: RevealSettings,
    host: Box<dyn ObserverHost<K>>,
    entries: HashMap<K, RevealEntry>,
    listening: bool,
    pending: Option<Viewport>,
    last_processed: Option<Duration>,
}

impl<K: Eq + Hash + Ord + Clone> RevealSequencer<K> {
    pub fn new(settings: RevealSettings, host: Box<dyn ObserverHost<K>>) -> Self {
        Self {
            settings,
            host,
            entries: HashMap::new(),
            listening: false,
            pending: None,
            last_processed: None,
        }
    }

    pub fn settings(&self) -> &RevealSettings {
        &self.settings
    }

    /// Register an element, or update order/policy of an existing one.
    ///
    /// Re-registering keeps the element's reveal state and does not observe
    /// it a second time.
    pub fn register(&mut self, key: K, order: usize, policy: RevealPolicy) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.order = order;
            entry.policy = policy;
            return;
        }
        self.host.observe(&key);
        self.entries.insert(key, RevealEntry::new(order, policy));
        if !self.listening {
            self.host.listen_scroll();
            self.listening = true;
        }
    }

    pub fn unregister(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_none() {
            return false;
        }
        self.host.unobserve(key);
        if self.entries.is_empty() {
            self.release_scroll();
        }
        true
    }

    /// Make the registered set exactly `wanted`: new keys are registered,
    /// missing keys unregistered, survivors keep their state.
    pub fn sync(&mut self, wanted: impl IntoIterator<Item = (K, usize, RevealPolicy)>) {
        let wanted: Vec<(K, usize, RevealPolicy)> = wanted.into_iter().collect();
        let keep: HashSet<&K> = wanted.iter().map(|(k, _, _)| k).collect();
        let mut stale: Vec<K> = self
            .entries
            .keys()
            .filter(|k| !keep.contains(k))
            .cloned()
            .collect();
        stale.sort();
        for key in &stale {
            self.unregister(key);
        }
        for (key, order, policy) in wanted {
            self.register(key, order, policy);
        }
    }

    pub fn entry(&self, key: &K) -> Option<&RevealEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Pose the host should currently display for `key`.
    pub fn pose(&self, key: &K) -> Option<Pose> {
        let entry = self.entries.get(key)?;
        let hidden = self.settings.hidden_pose(entry.order);
        Some(match entry.policy {
            RevealPolicy::OneShot | RevealPolicy::Toggle => {
                if entry.visible {
                    Pose::VISIBLE
                } else {
                    hidden
                }
            }
            RevealPolicy::Scrub(_) => Pose::lerp(hidden, Pose::VISIBLE, entry.progress),
        })
    }

    /// Record a scroll/resize position; process it now if the throttle allows.
    pub fn on_scroll(&mut self, viewport: Viewport, now: Duration) -> Vec<RevealEvent<K>> {
        self.pending = Some(viewport);
        let ready = match self.last_processed {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.settings.throttle,
        };
        if ready {
            self.flush(now)
        } else {
            Vec::new()
        }
    }

    /// Process the most recent pending position, if any.
    pub fn flush(&mut self, now: Duration) -> Vec<RevealEvent<K>> {
        let Some(viewport) = self.pending.take() else {
            return Vec::new();
        };
        self.last_processed = Some(now);
        self.process(viewport)
    }

    /// Process `viewport` immediately, ignoring the throttle (after re-render or resize).
    pub fn refresh(&mut self, viewport: Viewport, now: Duration) -> Vec<RevealEvent<K>> {
        self.pending = Some(viewport);
        self.flush(now)
    }

    fn process(&mut self, viewport: Viewport) -> Vec<RevealEvent<K>> {
        let mut measured: Vec<(usize, K, Bounds)> = self
            .entries
            .iter()
            .filter_map(|(key, entry)| {
                self.host
                    .measure(key)
                    .map(|bounds| (entry.order, key.clone(), bounds))
            })
            .collect();
        // Stagger follows the page: top to bottom, then registration order.
        measured.sort_by(|a, b| {
            a.2.top
                .total_cmp(&b.2.top)
                .then_with(|| a.0.cmp(&b.0))
                .then_with(|| a.1.cmp(&b.1))
        });

        let line = self.settings.trigger_line * viewport.height;
        let mut events = Vec::new();
        let mut slot: u32 = 0;

        for (order, key, bounds) in measured {
            let Some(entry) = self.entries.get_mut(&key) else {
                continue;
            };
            let hidden = self.settings.hidden_pose(order);
            let intersects = bounds.top <= line && bounds.bottom >= 0.0;

            match entry.policy {
                RevealPolicy::OneShot => {
                    if intersects && !entry.has_entered_once {
                        entry.has_entered_once = true;
                        entry.visible = true;
                        entry.progress = 1.0;
                        events.push(RevealEvent::Play {
                            key,
                            from: hidden,
                            delay: self.settings.stagger * slot,
                            duration: self.settings.duration,
                        });
                        slot += 1;
                    }
                }
                RevealPolicy::Toggle => {
                    if intersects && !entry.visible {
                        entry.has_entered_once = true;
                        entry.visible = true;
                        entry.progress = 1.0;
                        events.push(RevealEvent::Play {
                            key,
                            from: hidden,
                            delay: self.settings.stagger * slot,
                            duration: self.settings.duration,
                        });
                        slot += 1;
                    } else if entry.visible && bounds.top > line {
                        entry.visible = false;
                        entry.progress = 0.0;
                        events.push(RevealEvent::Reverse {
                            key,
                            to: hidden,
                            duration: self.settings.duration,
                        });
                    }
                }
                RevealPolicy::Scrub(range) => {
                    let progress = range.progress(bounds, viewport);
                    let at_end = progress == 0.0 || progress == 1.0;
                    let changed = (progress - entry.progress).abs() > PROGRESS_EPSILON
                        || (at_end && progress != entry.progress);
                    if changed {
                        entry.progress = progress;
                        entry.visible = progress >= 1.0;
                        if progress > 0.0 {
                            entry.has_entered_once = true;
                        }
                        events.push(RevealEvent::Progress {
                            key,
                            progress,
                            pose: Pose::lerp(hidden, Pose::VISIBLE, progress),
                        });
                    }
                }
            }
        }
        events
    }

    fn release_scroll(&mut self) {
        if self.listening {
            self.host.unlisten_scroll();
            self.listening = false;
        }
        self.pending = None;
    }

    /// Release every observer and the scroll listener.
    pub fn teardown(&mut self) {
        let mut keys: Vec<K> = self.entries.drain().map(|(k, _)| k).collect();
        keys.sort();
        for key in &keys {
            self.host.unobserve(key);
        }
        self.release_scroll();
        self.last_processed = None;
    }
}

impl<K: Eq + Hash + Ord + Clone> Drop for RevealSequencer<K> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const VIEWPORT: Viewport = Viewport { height: 1000.0 };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn sequencer(host: &RecordingHost<&'static str>) -> RevealSequencer<&'static str> {
        RevealSequencer::new(RevealSettings::default(), Box::new(host.clone()))
    }

    fn plays(events: &[RevealEvent<&'static str>]) -> Vec<&'static str> {
        events
            .iter()
            .filter(|e| matches!(e, RevealEvent::Play { .. }))
            .map(|e| *e.key())
            .collect()
    }

    #[test]
    fn direction_alternates_by_parity() {
        assert_eq!(EntryDirection::EvenFromRight.sign(0), 1.0);
        assert_eq!(EntryDirection::EvenFromRight.sign(1), -1.0);
        assert_eq!(EntryDirection::EvenFromLeft.sign(0), -1.0);
        assert_eq!(EntryDirection::EvenFromLeft.sign(3), 1.0);
    }

    #[test]
    fn hidden_pose_uses_direction() {
        let settings = RevealSettings::default();
        assert_eq!(settings.hidden_pose(0).offset_x, 200.0);
        assert_eq!(settings.hidden_pose(1).offset_x, -200.0);
        assert_eq!(settings.hidden_pose(1).opacity, 0.0);
    }

    #[test]
    fn one_shot_plays_exactly_once() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("tile", 0, RevealPolicy::OneShot);
        host.place("tile", 500.0, 700.0);

        let first = seq.refresh(VIEWPORT, ms(0));
        let second = seq.refresh(VIEWPORT, ms(500));
        assert_eq!(plays(&first), vec!["tile"]);
        assert!(second.is_empty());

        // Scrolling away and back does not re-trigger.
        host.place("tile", 1200.0, 1400.0);
        assert!(seq.refresh(VIEWPORT, ms(1000)).is_empty());
        host.place("tile", 500.0, 700.0);
        assert!(seq.refresh(VIEWPORT, ms(1500)).is_empty());
        assert!(seq.entry(&"tile").unwrap().has_entered_once);
    }

    #[test]
    fn one_shot_waits_for_trigger_line() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("tile", 0, RevealPolicy::OneShot);
        host.place("tile", 900.0, 1100.0);
        assert!(seq.refresh(VIEWPORT, ms(0)).is_empty());
        assert_eq!(seq.pose(&"tile").unwrap().opacity, 0.0);

        host.place("tile", 850.0, 1050.0);
        assert_eq!(plays(&seq.refresh(VIEWPORT, ms(200))), vec!["tile"]);
        assert_eq!(seq.pose(&"tile"), Some(Pose::VISIBLE));
    }

    #[test]
    fn batch_is_staggered_by_order() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("b", 1, RevealPolicy::OneShot);
        seq.register("a", 0, RevealPolicy::OneShot);
        seq.register("c", 2, RevealPolicy::OneShot);
        for key in ["a", "b", "c"] {
            host.place(key, 100.0, 300.0);
        }

        let events = seq.refresh(VIEWPORT, ms(0));
        let delays: Vec<(&str, Duration)> = events
            .iter()
            .map(|e| match e {
                RevealEvent::Play { key, delay, .. } => (*key, *delay),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(delays, vec![("a", ms(0)), ("b", ms(100)), ("c", ms(200))]);
    }

    #[test]
    fn batch_is_staggered_top_to_bottom() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("zeta", 0, RevealPolicy::OneShot);
        seq.register("alpha", 0, RevealPolicy::OneShot);
        seq.register("heading", 1, RevealPolicy::OneShot);
        host.place("zeta", 100.0, 300.0);
        host.place("heading", 250.0, 280.0);
        host.place("alpha", 300.0, 500.0);

        let events = seq.refresh(VIEWPORT, ms(0));
        let delays: Vec<(&str, Duration)> = events
            .iter()
            .map(|e| match e {
                RevealEvent::Play { key, delay, .. } => (*key, *delay),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(
            delays,
            vec![("zeta", ms(0)), ("heading", ms(100)), ("alpha", ms(200))]
        );
    }

    #[test]
    fn toggle_reverses_on_scroll_back() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("faq", 0, RevealPolicy::Toggle);

        host.place("faq", 500.0, 700.0);
        assert_eq!(plays(&seq.refresh(VIEWPORT, ms(0))), vec!["faq"]);

        host.place("faq", 950.0, 1150.0);
        let events = seq.refresh(VIEWPORT, ms(200));
        assert!(matches!(events.as_slice(), [RevealEvent::Reverse { .. }]));
        assert!(seq.refresh(VIEWPORT, ms(400)).is_empty());

        host.place("faq", 500.0, 700.0);
        assert_eq!(plays(&seq.refresh(VIEWPORT, ms(600))), vec!["faq"]);
    }

    #[test]
    fn toggle_stays_visible_when_scrolled_off_the_top() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("faq", 0, RevealPolicy::Toggle);
        host.place("faq", 500.0, 700.0);
        seq.refresh(VIEWPORT, ms(0));

        host.place("faq", -400.0, -200.0);
        assert!(seq.refresh(VIEWPORT, ms(200)).is_empty());
        assert!(seq.entry(&"faq").unwrap().visible);
    }

    #[test]
    fn scrub_progress_tracks_position_both_ways() {
        let range = ScrubRange {
            start: 0.8,
            end: 0.6,
        };
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("heading", 0, RevealPolicy::Scrub(range));

        host.place("heading", 900.0, 1100.0);
        assert!(seq.refresh(VIEWPORT, ms(0)).is_empty());

        host.place("heading", 600.0, 800.0);
        let events = seq.refresh(VIEWPORT, ms(200));
        match events.as_slice() {
            [RevealEvent::Progress { progress, pose, .. }] => {
                assert!((progress - 0.5).abs() < 1e-6);
                assert!((pose.opacity - 0.5).abs() < 1e-6);
            }
            other => panic!("unexpected events {other:?}"),
        }

        host.place("heading", 400.0, 600.0);
        seq.refresh(VIEWPORT, ms(400));
        assert_eq!(seq.entry(&"heading").unwrap().progress, 1.0);
        assert_eq!(seq.pose(&"heading"), Some(Pose::VISIBLE));

        // Scrolling back reverses progress rather than staying revealed.
        host.place("heading", 700.0, 900.0);
        seq.refresh(VIEWPORT, ms(600));
        let progress = seq.entry(&"heading").unwrap().progress;
        assert!((progress - 0.25).abs() < 1e-6);
        assert!(seq.entry(&"heading").unwrap().has_entered_once);
    }

    #[test]
    fn scrub_same_position_is_idempotent() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register(
            "heading",
            0,
            RevealPolicy::Scrub(ScrubRange {
                start: 0.8,
                end: 0.6,
            }),
        );
        host.place("heading", 600.0, 800.0);
        assert_eq!(seq.refresh(VIEWPORT, ms(0)).len(), 1);
        assert!(seq.refresh(VIEWPORT, ms(200)).is_empty());
    }

    #[test]
    fn scrub_range_without_span_is_a_step() {
        let range = ScrubRange {
            start: 0.2,
            end: 0.9,
        };
        let flat = Bounds {
            top: 100.0,
            bottom: 100.0,
        };
        assert_eq!(range.progress(flat, VIEWPORT), 1.0);
        let below = Bounds {
            top: 300.0,
            bottom: 300.0,
        };
        assert_eq!(range.progress(below, VIEWPORT), 0.0);
    }

    #[test]
    fn scroll_events_are_coalesced_by_throttle() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("tile", 0, RevealPolicy::OneShot);
        host.place("tile", 2000.0, 2200.0);

        seq.on_scroll(VIEWPORT, ms(0));
        assert_eq!(host.measure_calls(), 1);

        // Inside the throttle window: nothing is measured.
        host.place("tile", 500.0, 700.0);
        assert!(seq.on_scroll(VIEWPORT, ms(30)).is_empty());
        assert!(seq.on_scroll(VIEWPORT, ms(60)).is_empty());
        assert_eq!(host.measure_calls(), 1);

        // The trailing flush picks up the latest position once.
        assert_eq!(plays(&seq.flush(ms(70))), vec!["tile"]);
        assert!(seq.flush(ms(80)).is_empty());
        assert_eq!(host.measure_calls(), 2);
    }

    #[test]
    fn unmeasured_elements_are_skipped() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("tile", 0, RevealPolicy::OneShot);
        assert!(seq.refresh(VIEWPORT, ms(0)).is_empty());
        assert!(!seq.entry(&"tile").unwrap().has_entered_once);
    }

    #[test]
    fn registration_mirrors_host_observers() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("a", 0, RevealPolicy::OneShot);
        seq.register("a", 1, RevealPolicy::Toggle);
        seq.register("b", 1, RevealPolicy::OneShot);

        assert_eq!(host.observed(), vec!["a", "b"]);
        assert_eq!(host.observe_calls(), 2);
        assert!(host.listening());
        assert_eq!(seq.entry(&"a").unwrap().policy, RevealPolicy::Toggle);

        seq.unregister(&"a");
        assert_eq!(host.observed(), vec!["b"]);
        assert!(host.listening());
        seq.unregister(&"b");
        assert!(!host.listening());
        assert!(!seq.is_listening());
    }

    #[test]
    fn sync_keeps_survivor_state() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("a", 0, RevealPolicy::OneShot);
        seq.register("b", 1, RevealPolicy::OneShot);
        host.place("a", 100.0, 200.0);
        seq.refresh(VIEWPORT, ms(0));

        seq.sync([
            ("a", 0, RevealPolicy::OneShot),
            ("c", 1, RevealPolicy::OneShot),
        ]);
        assert_eq!(host.observed(), vec!["a", "c"]);
        assert!(seq.entry(&"a").unwrap().has_entered_once);
        assert!(seq.entry(&"b").is_none());
    }

    #[test]
    fn teardown_releases_everything() {
        let host = RecordingHost::new();
        let mut seq = sequencer(&host);
        seq.register("a", 0, RevealPolicy::OneShot);
        seq.register("b", 1, RevealPolicy::OneShot);
        seq.teardown();
        assert!(host.observed().is_empty());
        assert!(!host.listening());
        assert!(seq.is_empty());
    }

    #[test]
    fn drop_releases_everything() {
        let host = RecordingHost::new();
        {
            let mut seq = sequencer(&host);
            seq.register("a", 0, RevealPolicy::OneShot);
            assert!(host.listening());
        }
        assert!(host.observed().is_empty());
        assert!(!host.listening());
    }

    #[test]
    fn pose_lerp_clamps() {
        let hidden = RevealSettings::default().hidden_pose(0);
        assert_eq!(Pose::lerp(hidden, Pose::VISIBLE, 2.0), Pose::VISIBLE);
        assert_eq!(Pose::lerp(hidden, Pose::VISIBLE, -1.0), hidden);
    }
}
