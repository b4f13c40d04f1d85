//! # Gallery View
//!
//! A headless core for filterable media galleries: a catalog of titled
//! sections, live search and category filtering, a lightbox with autoplay,
//! and scroll-driven reveal animations. The host (a web page, a desktop
//! shell, a test) owns the pixels; this crate owns the state.
//!
//! # Architecture: State In, Events Out
//!
//! ```text
//! manifest ──► Catalog ──► filter(query) ──► FilteredResult ──► render_view()
//!                                │                  │
//!                                │       activate   ▼
//!                                │          LightboxController ◄── TimerQueue
//!                                ▼
//!                        RevealSequencer ◄── ObserverHost (scroll, layout)
//! ```
//!
//! [`view::GalleryView`] is the composition root. The host feeds it events
//! (text input, category choice, keys, swipes, clock ticks, scroll
//! positions, image load results) and reads back phase, results, lightbox
//! state and reveal events. Nothing here blocks, spawns, or reads a clock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `ItemId`, `MediaItem`, `Section`: the shared data model |
//! | [`catalog`] | Manifest loading (JSON/TOML), validation, lookup |
//! | [`filter`] | Pure text + category filtering over the catalog |
//! | [`lightbox`] | Fullscreen viewer state machine: navigation, autoplay, keys, swipes |
//! | [`reveal`] | Scroll-triggered entry animations with one-shot, toggle and scrub policies |
//! | [`timer`] | Cancellable repeating timers driven by a host-supplied clock |
//! | [`loader`] | Image load status tracking and a filesystem probe |
//! | [`masonry`] | Deterministic per-item tile heights |
//! | [`view`] | Composition root: owns query, lightbox, timers and reveal state |
//! | [`render`] | Maud markup for a view |
//! | [`feedback`] | Feedback form state around an opaque send service |
//! | [`config`] | `gallery.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Host-Supplied Time
//!
//! Autoplay and scroll throttling need a clock. Instead of threads or an
//! async runtime, every time-dependent call takes `now: Duration` from the
//! host. Tests advance time by passing bigger numbers; a browser host passes
//! `performance.now()`. Cancelled timers leave the [`timer::TimerQueue`]
//! immediately, so "nothing fires after close" is checkable with `pending()`.
//!
//! ## Lightbox Snapshots
//!
//! Opening the lightbox copies the item's filtered section into an
//! `Rc<[MediaItem]>`. Typing in the search box afterwards does not move or
//! shrink the open lightbox; only a catalog replacement prunes it.
//!
//! ## Observers Behind a Trait
//!
//! [`reveal::ObserverHost`] abstracts intersection observers, scroll
//! listeners and layout measurement. The sequencer registers each element
//! once, coalesces scroll bursts, and releases every observer on teardown
//! or drop. Headless use plugs in [`reveal::DetachedHost`].
//!
//! ## Maud Over Template Engines
//!
//! Markup is produced with [Maud](https://maud.lambda.xyz/): malformed HTML is
//! a build error, interpolation is escaped by default, and there are no
//! template files to ship.
//!
//! ## Deterministic Masonry
//!
//! Tile heights come from a SHA-256 of `(seed, item id)`, so a layout is
//! reproducible across renders and machines without storing heights.

pub mod catalog;
pub mod config;
pub mod feedback;
pub mod filter;
pub mod lightbox;
pub mod loader;
pub mod masonry;
pub mod output;
pub mod render;
pub mod reveal;
pub mod timer;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
