//! Lightbox: the full-viewport image viewer.
//!
//! ## States
//!
//! ```text
//!             open(seq, i)
//!   Closed ──────────────────► Static ◄──── toggle_autoplay ────┐
//!     ▲                          │                              │
//!     │        close()           │ toggle_autoplay              │
//!     └──────────────────────────┤                              │
//!     │                          ▼                              │
//!     └──────── close() ────── Autoplaying ─────────────────────┘
//! ```
//!
//! `next`/`prev` wrap around in every open state and keep the autoplay state.
//! Each call moves exactly one step, so two quick presses always land on
//! `+2 mod len`.
//!
//! ## Snapshot Semantics
//!
//! `open` takes a snapshot of the sequence (the section the clicked item
//! belongs to). Later filter changes do not touch it, so the index can never
//! be invalidated under the viewer. Only [`LightboxController::retain`],
//! called when the underlying catalog itself is replaced, shrinks it; an
//! emptied snapshot force-closes the lightbox.
//!
//! ## Timers
//!
//! Autoplay is a repeating timer in the caller's [`TimerQueue`]. Closing the
//! lightbox removes that timer from the queue, whatever state it was in.

use crate::loader::LoadStatus;
use crate::timer::{TimerId, TimerQueue};
use crate::types::{ItemId, MediaItem};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LightboxError {
    #[error("cannot open the lightbox on an empty sequence")]
    EmptySequence,
    #[error("index {index} is out of range for a sequence of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxPhase {
    Closed,
    Static,
    Autoplaying,
}

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM-style `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Pointer input that tapped or clicked a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Click,
    Touch,
}

/// Which pointer input may open the lightbox from a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activation {
    /// Clicks and taps both open it.
    #[default]
    Any,
    /// Only taps open it; desktop clicks leave the grid alone.
    TouchOnly,
}

impl Activation {
    pub fn accepts(self, pointer: Pointer) -> bool {
        match self {
            Activation::Any => true,
            Activation::TouchOnly => pointer == Pointer::Touch,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Activation::Any => "any",
            Activation::TouchOnly => "touch-only",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightboxSettings {
    pub autoplay_interval: Duration,
    pub swipe_threshold: f32,
}

impl Default for LightboxSettings {
    fn default() -> Self {
        Self {
            autoplay_interval: Duration::from_millis(3000),
            swipe_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone)]
struct OpenLightbox {
    sequence: Rc<[MediaItem]>,
    index: usize,
    autoplay: Option<TimerId>,
    info_visible: bool,
    fullscreen: bool,
    image: LoadStatus,
}

impl OpenLightbox {
    fn move_to(&mut self, index: usize) {
        if index != self.index {
            self.index = index;
            self.image = LoadStatus::Loading;
        }
    }
}

#[derive(Debug, Default)]
pub struct LightboxController {
    settings: LightboxSettings,
    open: Option<OpenLightbox>,
}

impl LightboxController {
    pub fn new(settings: LightboxSettings) -> Self {
        Self {
            settings,
            open: None,
        }
    }

    /// Open on `sequence` at `index`. An already open lightbox is replaced.
    pub fn open(
        &mut self,
        sequence: impl Into<Rc<[MediaItem]>>,
        index: usize,
        timers: &mut TimerQueue,
    ) -> Result<(), LightboxError> {
        let sequence = sequence.into();
        if sequence.is_empty() {
            return Err(LightboxError::EmptySequence);
        }
        if index >= sequence.len() {
            return Err(LightboxError::IndexOutOfRange {
                index,
                len: sequence.len(),
            });
        }
        self.close(timers);
        tracing::debug!(index, len = sequence.len(), "lightbox opened");
        self.open = Some(OpenLightbox {
            sequence,
            index,
            autoplay: None,
            info_visible: false,
            fullscreen: false,
            image: LoadStatus::Loading,
        });
        Ok(())
    }

    /// Close and cancel autoplay. Closing a closed lightbox does nothing.
    pub fn close(&mut self, timers: &mut TimerQueue) {
        if let Some(open) = self.open.take() {
            if let Some(timer) = open.autoplay {
                timers.cancel(timer);
            }
            tracing::debug!("lightbox closed");
        }
    }

    pub fn next(&mut self) {
        if let Some(open) = self.open.as_mut() {
            let len = open.sequence.len();
            open.move_to((open.index + 1) % len);
        }
    }

    pub fn prev(&mut self) {
        if let Some(open) = self.open.as_mut() {
            let len = open.sequence.len();
            open.move_to((open.index + len - 1) % len);
        }
    }

    /// Jump straight to `index` (thumbnail strip).
    pub fn go_to(&mut self, index: usize) -> Result<(), LightboxError> {
        let Some(open) = self.open.as_mut() else {
            return Ok(());
        };
        let len = open.sequence.len();
        if index >= len {
            return Err(LightboxError::IndexOutOfRange { index, len });
        }
        open.move_to(index);
        Ok(())
    }

    /// Start or stop autoplay. `now` anchors the first step one interval ahead.
    pub fn toggle_autoplay(&mut self, timers: &mut TimerQueue, now: Duration) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        match open.autoplay.take() {
            Some(timer) => {
                timers.cancel(timer);
            }
            None => {
                open.autoplay =
                    Some(timers.schedule_repeating(now, self.settings.autoplay_interval));
            }
        }
    }

    pub fn toggle_info(&mut self) {
        if let Some(open) = self.open.as_mut() {
            open.info_visible = !open.info_visible;
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        if let Some(open) = self.open.as_mut() {
            open.fullscreen = !open.fullscreen;
        }
    }

    /// Handle a key press. Returns whether the lightbox consumed it.
    pub fn handle_key(&mut self, key: Key, timers: &mut TimerQueue) -> bool {
        if self.open.is_none() {
            return false;
        }
        match key {
            Key::Escape => self.close(timers),
            Key::ArrowLeft => self.prev(),
            Key::ArrowRight => self.next(),
            Key::Other => return false,
        }
        true
    }

    /// Handle a completed horizontal swipe of `dx` pixels.
    ///
    /// Swiping left (negative `dx`) shows the next image, like turning a page.
    pub fn handle_swipe(&mut self, dx: f32) -> bool {
        let short = !dx.is_finite() || dx.abs() < self.settings.swipe_threshold;
        if self.open.is_none() || short {
            return false;
        }
        if dx < 0.0 {
            self.next();
        } else {
            self.prev();
        }
        true
    }

    /// Deliver a fired timer. Returns whether it was this lightbox's autoplay.
    pub fn on_timer(&mut self, id: TimerId, timers: &mut TimerQueue) -> bool {
        let Some(open) = self.open.as_ref() else {
            return false;
        };
        if open.autoplay != Some(id) {
            return false;
        }
        if open.sequence.is_empty() {
            tracing::warn!("autoplay fired on an empty sequence; closing lightbox");
            self.close(timers);
            return true;
        }
        self.next();
        true
    }

    /// Drop snapshot items rejected by `keep` (the catalog changed underneath).
    ///
    /// The current item stays current when it survives; otherwise the index
    /// is clamped. An emptied sequence closes the lightbox.
    pub fn retain(&mut self, keep: impl Fn(&MediaItem) -> bool, timers: &mut TimerQueue) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        if open.sequence.iter().all(&keep) {
            return;
        }
        let current = open.sequence[open.index].id.clone();
        let remaining: Vec<MediaItem> = open
            .sequence
            .iter()
            .filter(|item| keep(*item))
            .cloned()
            .collect();

        if remaining.is_empty() {
            if open.autoplay.is_some() {
                tracing::warn!("lightbox sequence emptied while autoplaying; closing");
            }
            self.close(timers);
            return;
        }

        let index = remaining
            .iter()
            .position(|item| item.id == current)
            .unwrap_or_else(|| open.index.min(remaining.len() - 1));
        let current_survived = remaining[index].id == current;
        open.sequence = remaining.into();
        open.index = index;
        if !current_survived {
            open.image = LoadStatus::Loading;
        }
    }

    /// The displayed image finished loading.
    pub fn image_loaded(&mut self, id: &ItemId) {
        self.set_image_status(id, LoadStatus::Loaded);
    }

    /// The displayed image failed; a placeholder is shown, nothing else changes.
    pub fn image_failed(&mut self, id: &ItemId) {
        self.set_image_status(id, LoadStatus::Failed);
    }

    fn set_image_status(&mut self, id: &ItemId, status: LoadStatus) {
        if let Some(open) = self.open.as_mut() {
            if &open.sequence[open.index].id == id {
                open.image = status;
            }
        }
    }

    pub fn phase(&self) -> LightboxPhase {
        match &self.open {
            None => LightboxPhase::Closed,
            Some(open) if open.autoplay.is_some() => LightboxPhase::Autoplaying,
            Some(_) => LightboxPhase::Static,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.phase() == LightboxPhase::Autoplaying
    }

    pub fn is_info_visible(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.info_visible)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.open.as_ref().is_some_and(|o| o.fullscreen)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.open.as_ref().map(|o| o.index)
    }

    pub fn current_item(&self) -> Option<&MediaItem> {
        self.open.as_ref().map(|o| &o.sequence[o.index])
    }

    /// The snapshot being viewed; empty when closed.
    pub fn sequence(&self) -> &[MediaItem] {
        self.open.as_ref().map(|o| &o.sequence[..]).unwrap_or(&[])
    }

    pub fn image_status(&self) -> Option<LoadStatus> {
        self.open.as_ref().map(|o| o.image)
    }

    /// "Image 2 of 4", as shown in the info panel.
    pub fn position_label(&self) -> Option<String> {
        self.open
            .as_ref()
            .map(|o| format!("Image {} of {}", o.index + 1, o.sequence.len()))
    }
}
