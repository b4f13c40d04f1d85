//! The gallery view: composition root and owner of all mutable UI state.
//!
//! ```text
//! Catalog ──► filter(query) ──► FilteredResult ──► reveal registrations
//!                                     │
//!                          activate(id)▼
//!                              LightboxController ◄── TimerQueue (autoplay)
//! ```
//!
//! The view owns the query, the loading flag, the lightbox and its timers,
//! the reveal sequencer and per-item image status. The host drives it with
//! events (input, keys, clock ticks, scroll, image results) and reads it back
//! through accessors or [`crate::render::render_view`].
//!
//! ## Lifecycle
//!
//! 1. [`GalleryView::mount`]: loading placeholder, nothing registered.
//! 2. [`GalleryView::resolve`]: catalog arrives, results computed, visible
//!    elements registered with the sequencer.
//! 3. Input events: filtering is recomputed synchronously on every change.
//! 4. [`GalleryView::unmount`] (route change, teardown): the lightbox closes,
//!    every timer is cancelled and every observer released.

use crate::catalog::Catalog;
use crate::config::GalleryConfig;
use crate::filter::{self, CategoryFilter, FilterQuery, FilteredResult};
use crate::lightbox::{Key, LightboxController, LightboxError, LightboxSettings, Pointer};
use crate::loader::{ImageLoadError, LoadStatus, LoadTracker};
use crate::masonry::TileHeights;
use crate::reveal::{
    DetachedHost, ObserverHost, RevealEvent, RevealPolicy, RevealSequencer, Viewport,
};
use crate::timer::TimerQueue;
use crate::types::{ItemId, MediaItem};
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("the gallery is still loading")]
    Loading,
    #[error("item '{0}' is not in the current results")]
    NotVisible(ItemId),
    #[error(transparent)]
    Lightbox(#[from] LightboxError),
}

/// Identity of a revealable element in the rendered gallery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    /// A section header, keyed by section title.
    Header(String),
    /// A grid tile.
    Item(ItemId),
}

/// What the view is showing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// Catalog not resolved yet: neutral placeholder.
    Loading,
    /// Filters matched nothing: "no results" with a clear-filters action.
    Empty,
    /// At least one section to show.
    Results,
}

pub struct GalleryView {
    config: GalleryConfig,
    catalog: Catalog,
    query: FilterQuery,
    result: FilteredResult,
    is_loading: bool,
    lightbox: LightboxController,
    timers: TimerQueue,
    reveal: RevealSequencer<ElementKey>,
    loads: LoadTracker,
}

impl GalleryView {
    pub fn new(config: GalleryConfig, host: Box<dyn ObserverHost<ElementKey>>) -> Self {
        let lightbox = LightboxController::new(LightboxSettings {
            autoplay_interval: config.lightbox.autoplay_interval(),
            swipe_threshold: config.lightbox.swipe_threshold,
        });
        let reveal = RevealSequencer::new(config.reveal.settings(), host);
        Self {
            config,
            catalog: Catalog::default(),
            query: FilterQuery::default(),
            result: FilteredResult::default(),
            is_loading: true,
            lightbox,
            timers: TimerQueue::new(),
            reveal,
            loads: LoadTracker::new(),
        }
    }

    /// A view with no observation host, for rendering outside a live page.
    pub fn headless(config: GalleryConfig) -> Self {
        Self::new(config, Box::new(DetachedHost))
    }

    /// Start loading: the grid is replaced by a placeholder until [`Self::resolve`].
    pub fn mount(&mut self) {
        self.is_loading = true;
        self.recompute();
    }

    /// The catalog is available.
    pub fn resolve(&mut self, catalog: Catalog) {
        tracing::debug!(items = catalog.item_count(), "gallery catalog resolved");
        self.catalog = catalog;
        self.is_loading = false;
        self.recompute();
    }

    /// Swap in new catalog data.
    ///
    /// An open lightbox keeps its snapshot minus items that disappeared, and
    /// closes if none are left.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.is_loading = false;
        self.loads.retain(|id| self.catalog.contains(id));
        self.lightbox
            .retain(|item| self.catalog.contains(&item.id), &mut self.timers);
        self.sync_lightbox_image();
        self.recompute();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
        self.recompute();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
        self.recompute();
    }

    pub fn set_query(&mut self, query: FilterQuery) {
        self.query = query;
        self.recompute();
    }

    /// The "clear filters" action of the empty state.
    pub fn clear_filters(&mut self) {
        self.set_query(FilterQuery::default());
    }

    fn recompute(&mut self) {
        if self.is_loading {
            self.result = FilteredResult::default();
        } else {
            self.result = filter::filter(&self.catalog, &self.query);
        }
        let wanted = self.reveal_registrations();
        self.reveal.sync(wanted);
    }

    fn reveal_registrations(&self) -> Vec<(ElementKey, usize, RevealPolicy)> {
        let header_policy = self.config.reveal.header_policy();
        let item_policy = self.config.reveal.item_policy();
        let mut wanted = Vec::with_capacity(self.result.item_count() + self.result.sections.len());
        for (section_idx, section) in self.result.sections.iter().enumerate() {
            wanted.push((
                ElementKey::Header(section.title.clone()),
                section_idx,
                header_policy,
            ));
            for (item_idx, item) in section.items.iter().enumerate() {
                wanted.push((ElementKey::Item(item.id.clone()), item_idx, item_policy));
            }
        }
        wanted
    }

    /// Open the lightbox on `id`, cycling within its (filtered) section.
    pub fn activate(&mut self, id: &ItemId) -> Result<(), ViewError> {
        if self.is_loading {
            return Err(ViewError::Loading);
        }
        let (sequence, index) = self
            .result
            .sections
            .iter()
            .find_map(|section| {
                section.position_of(id).map(|index| {
                    let sequence: Rc<[MediaItem]> = section.items.clone().into();
                    (sequence, index)
                })
            })
            .ok_or_else(|| ViewError::NotVisible(id.clone()))?;

        self.lightbox.open(sequence, index, &mut self.timers)?;
        self.sync_lightbox_image();
        Ok(())
    }

    /// A tile was clicked or tapped. Returns whether the configured
    /// activation mode let it open the lightbox.
    pub fn activate_with(&mut self, id: &ItemId, pointer: Pointer) -> Result<bool, ViewError> {
        if !self.config.lightbox.activation.accepts(pointer) {
            tracing::debug!(item = %id, ?pointer, "tile input ignored by activation mode");
            return Ok(false);
        }
        self.activate(id)?;
        Ok(true)
    }

    /// Carry a load result the grid already has over to the lightbox image.
    fn sync_lightbox_image(&mut self) {
        let Some(id) = self.lightbox.current_item().map(|item| item.id.clone()) else {
            return;
        };
        match self.loads.status(&id) {
            LoadStatus::Loaded => self.lightbox.image_loaded(&id),
            LoadStatus::Failed => self.lightbox.image_failed(&id),
            LoadStatus::Loading => {}
        }
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox.close(&mut self.timers);
    }

    pub fn next(&mut self) {
        self.lightbox.next();
        self.sync_lightbox_image();
    }

    pub fn prev(&mut self) {
        self.lightbox.prev();
        self.sync_lightbox_image();
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), ViewError> {
        self.lightbox.go_to(index)?;
        self.sync_lightbox_image();
        Ok(())
    }

    pub fn toggle_autoplay(&mut self, now: Duration) {
        self.lightbox.toggle_autoplay(&mut self.timers, now);
    }

    pub fn toggle_info(&mut self) {
        self.lightbox.toggle_info();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.lightbox.toggle_fullscreen();
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        let handled = self.lightbox.handle_key(key, &mut self.timers);
        self.sync_lightbox_image();
        handled
    }

    pub fn handle_swipe(&mut self, dx: f32) -> bool {
        let handled = self.lightbox.handle_swipe(dx);
        self.sync_lightbox_image();
        handled
    }

    /// Advance the clock and deliver due timers. Returns how many were handled.
    pub fn tick(&mut self, now: Duration) -> usize {
        let fired = self.timers.advance(now);
        let handled = fired
            .into_iter()
            .filter(|id| self.lightbox.on_timer(*id, &mut self.timers))
            .count();
        if handled > 0 {
            self.sync_lightbox_image();
        }
        handled
    }

    pub fn on_scroll(&mut self, viewport: Viewport, now: Duration) -> Vec<RevealEvent<ElementKey>> {
        self.reveal.on_scroll(viewport, now)
    }

    pub fn flush_reveal(&mut self, now: Duration) -> Vec<RevealEvent<ElementKey>> {
        self.reveal.flush(now)
    }

    /// Re-evaluate reveals right away, e.g. after the grid re-rendered.
    pub fn refresh_reveal(
        &mut self,
        viewport: Viewport,
        now: Duration,
    ) -> Vec<RevealEvent<ElementKey>> {
        self.reveal.refresh(viewport, now)
    }

    pub fn image_loaded(&mut self, id: &ItemId) {
        self.loads.mark_loaded(id);
        self.lightbox.image_loaded(id);
    }

    pub fn image_failed(&mut self, id: &ItemId, error: &ImageLoadError) {
        self.loads.mark_failed(id, error);
        self.lightbox.image_failed(id);
    }

    /// Tear down for a route change or component unmount.
    pub fn unmount(&mut self) {
        self.lightbox.close(&mut self.timers);
        self.timers.cancel_all();
        self.reveal.teardown();
        tracing::debug!("gallery view unmounted");
    }

    pub fn phase(&self) -> ViewPhase {
        if self.is_loading {
            ViewPhase::Loading
        } else if self.result.is_empty() {
            ViewPhase::Empty
        } else {
            ViewPhase::Results
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn result(&self) -> &FilteredResult {
        &self.result
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn lightbox(&self) -> &LightboxController {
        &self.lightbox
    }

    pub fn reveal(&self) -> &RevealSequencer<ElementKey> {
        &self.reveal
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn load_status(&self, id: &ItemId) -> LoadStatus {
        self.loads.status(id)
    }

    pub fn tiles(&self) -> Option<TileHeights> {
        self.config.masonry.tiles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightbox::LightboxPhase;
    use crate::test_helpers::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn view_with_host() -> (GalleryView, RecordingHost<ElementKey>) {
        let host = RecordingHost::new();
        let view = GalleryView::new(GalleryConfig::default(), Box::new(host.clone()));
        (view, host)
    }

    fn resolved_view() -> (GalleryView, RecordingHost<ElementKey>) {
        let (mut view, host) = view_with_host();
        view.mount();
        view.resolve(year_catalog());
        (view, host)
    }

    fn id(s: &str) -> ItemId {
        ItemId::new(s)
    }

    #[test]
    fn mount_shows_loading_until_resolved() {
        let (mut view, host) = view_with_host();
        view.mount();
        assert_eq!(view.phase(), ViewPhase::Loading);
        assert!(view.is_loading());
        assert!(view.result().is_empty());
        assert!(host.observed().is_empty());

        view.resolve(year_catalog());
        assert!(!view.is_loading());
        assert_eq!(view.phase(), ViewPhase::Results);
        assert_eq!(view.result().item_count(), 6);
    }

    #[test]
    fn new_view_is_loading_before_mount() {
        let (view, host) = view_with_host();
        assert_eq!(view.phase(), ViewPhase::Loading);
        assert!(view.result().is_empty());
        assert!(host.observed().is_empty());
    }

    #[test]
    fn activate_while_loading_is_rejected() {
        let (mut view, _) = view_with_host();
        view.mount();
        assert_eq!(view.activate(&id("2024-lecture")), Err(ViewError::Loading));
    }

    #[test]
    fn resolve_registers_headers_and_items() {
        let (view, host) = resolved_view();
        assert_eq!(view.reveal().len(), 8);
        assert!(host.observed().contains(&ElementKey::Header("2024".into())));
        assert!(host.observed().contains(&ElementKey::Item(id("2025-expo"))));
        assert!(host.listening());
    }

    #[test]
    fn search_updates_result_and_registrations() {
        let (mut view, host) = resolved_view();
        view.set_text("lecture");

        assert_eq!(section_titles(&view.result().sections), vec!["2024"]);
        assert_eq!(
            host.observed(),
            vec![
                ElementKey::Header("2024".into()),
                ElementKey::Item(id("2024-lecture")),
            ]
        );
    }

    #[test]
    fn no_results_then_clear_filters() {
        let (mut view, host) = resolved_view();
        view.set_text("zzz-no-match");
        assert_eq!(view.phase(), ViewPhase::Empty);
        assert!(host.observed().is_empty());
        assert!(!host.listening());

        view.clear_filters();
        assert_eq!(view.phase(), ViewPhase::Results);
        assert_eq!(view.query(), &FilterQuery::default());
        assert_eq!(view.result().item_count(), 6);
    }

    #[test]
    fn category_selection_filters() {
        let (mut view, _) = resolved_view();
        view.set_category(CategoryFilter::parse("works"));
        assert_eq!(view.result().item_count(), 3);
        view.set_category(CategoryFilter::All);
        assert_eq!(view.result().item_count(), 6);
    }

    #[test]
    fn activate_scopes_lightbox_to_section() {
        let (mut view, _) = resolved_view();
        view.activate(&id("2025-render")).unwrap();

        let lightbox = view.lightbox();
        assert_eq!(lightbox.phase(), LightboxPhase::Static);
        assert_eq!(lightbox.current_index(), Some(1));
        assert_eq!(lightbox.sequence().len(), 3);
        assert!(lightbox.sequence().iter().all(|i| i.section_label == "2025"));

        view.next();
        view.next();
        assert_eq!(view.lightbox().current_item().unwrap().id, id("2025-studio"));
    }

    #[test]
    fn activate_uses_filtered_section() {
        let (mut view, _) = resolved_view();
        view.set_category(CategoryFilter::parse("events"));
        view.activate(&id("2024-site")).unwrap();
        assert_eq!(view.lightbox().sequence().len(), 2);
        assert_eq!(view.lightbox().current_index(), Some(1));
    }

    #[test]
    fn touch_only_activation_ignores_clicks() {
        let mut config = GalleryConfig::default();
        config.lightbox.activation = crate::lightbox::Activation::TouchOnly;
        let mut view = GalleryView::headless(config);
        view.resolve(year_catalog());

        assert_eq!(view.activate_with(&id("2024-site"), Pointer::Click), Ok(false));
        assert!(!view.lightbox().is_open());
        assert_eq!(view.activate_with(&id("2024-site"), Pointer::Touch), Ok(true));
        assert_eq!(view.lightbox().current_index(), Some(2));
    }

    #[test]
    fn default_activation_accepts_clicks() {
        let (mut view, _) = resolved_view();
        assert_eq!(view.activate_with(&id("2025-expo"), Pointer::Click), Ok(true));
        assert!(view.lightbox().is_open());
    }

    #[test]
    fn activate_hidden_item_is_error() {
        let (mut view, _) = resolved_view();
        view.set_text("lecture");
        assert_eq!(
            view.activate(&id("2025-expo")),
            Err(ViewError::NotVisible(id("2025-expo")))
        );
        assert!(!view.lightbox().is_open());
    }

    #[test]
    fn filter_change_leaves_open_lightbox_untouched() {
        let (mut view, _) = resolved_view();
        view.activate(&id("2024-model")).unwrap();
        view.set_text("zzz-no-match");

        assert_eq!(view.phase(), ViewPhase::Empty);
        assert!(view.lightbox().is_open());
        assert_eq!(view.lightbox().sequence().len(), 3);
        assert_eq!(view.lightbox().current_index(), Some(1));
    }

    #[test]
    fn keyboard_drives_lightbox() {
        let (mut view, _) = resolved_view();
        assert!(!view.handle_key(Key::ArrowRight));

        view.activate(&id("2024-lecture")).unwrap();
        assert!(view.handle_key(Key::ArrowLeft));
        assert_eq!(view.lightbox().current_index(), Some(2));
        assert!(view.handle_key(Key::Escape));
        assert!(!view.lightbox().is_open());
    }

    #[test]
    fn autoplay_ticks_and_close_cancels() {
        let (mut view, _) = resolved_view();
        view.activate(&id("2024-lecture")).unwrap();
        view.toggle_autoplay(ms(1000));

        assert_eq!(view.tick(ms(4000)), 1);
        assert_eq!(view.lightbox().current_index(), Some(1));

        view.close_lightbox();
        assert_eq!(view.pending_timers(), 0);
        assert_eq!(view.tick(ms(60_000)), 0);
        assert_eq!(view.lightbox().phase(), LightboxPhase::Closed);
    }

    #[test]
    fn image_failure_is_isolated() {
        let (mut view, _) = resolved_view();
        let err = ImageLoadError::Host("404".into());
        view.image_failed(&id("2024-model"), &err);
        view.image_loaded(&id("2024-site"));

        assert_eq!(view.load_status(&id("2024-model")), LoadStatus::Failed);
        assert_eq!(view.load_status(&id("2024-site")), LoadStatus::Loaded);
        assert_eq!(view.load_status(&id("2024-lecture")), LoadStatus::Loading);
        assert_eq!(view.result().item_count(), 6);
    }

    #[test]
    fn lightbox_picks_up_known_load_status() {
        let (mut view, _) = resolved_view();
        view.image_loaded(&id("2024-site"));
        view.activate(&id("2024-site")).unwrap();
        assert_eq!(view.lightbox().image_status(), Some(LoadStatus::Loaded));
    }

    #[test]
    fn lightbox_navigation_reuses_grid_load_status() {
        let (mut view, _) = resolved_view();
        view.image_loaded(&id("2024-model"));
        view.activate(&id("2024-lecture")).unwrap();
        assert_eq!(view.lightbox().image_status(), Some(LoadStatus::Loading));

        view.next();
        assert_eq!(view.lightbox().image_status(), Some(LoadStatus::Loaded));
        assert!(view.handle_key(Key::ArrowRight));
        assert_eq!(view.lightbox().image_status(), Some(LoadStatus::Loading));
    }

    #[test]
    fn image_failure_in_lightbox_keeps_position() {
        let (mut view, _) = resolved_view();
        view.activate(&id("2024-model")).unwrap();
        view.image_failed(&id("2024-model"), &ImageLoadError::Host("timeout".into()));
        assert_eq!(view.lightbox().image_status(), Some(LoadStatus::Failed));
        assert_eq!(view.lightbox().current_index(), Some(1));
    }

    #[test]
    fn replace_catalog_closes_emptied_lightbox() {
        let (mut view, _) = resolved_view();
        view.activate(&id("2024-lecture")).unwrap();
        view.toggle_autoplay(ms(0));

        let only_2025 = Catalog::load(vec![year_catalog().sections()[1].clone()]);
        view.replace_catalog(only_2025);

        assert_eq!(view.lightbox().phase(), LightboxPhase::Closed);
        assert_eq!(view.pending_timers(), 0);
        assert_eq!(section_titles(&view.result().sections), vec!["2025"]);
    }

    #[test]
    fn replace_catalog_shrinks_lightbox_snapshot() {
        let (mut view, _) = resolved_view();
        view.activate(&id("2024-site")).unwrap();

        let mut sections = year_catalog().sections().to_vec();
        sections[0].items.retain(|i| i.id != id("2024-lecture"));
        view.replace_catalog(Catalog::load(sections));

        assert_eq!(view.lightbox().sequence().len(), 2);
        assert_eq!(view.lightbox().current_item().unwrap().id, id("2024-site"));
    }

    #[test]
    fn scroll_reveals_visible_items_once() {
        let (mut view, host) = resolved_view();
        host.place(ElementKey::Item(id("2024-lecture")), 100.0, 300.0);
        host.place(ElementKey::Item(id("2024-model")), 100.0, 300.0);
        let viewport = Viewport { height: 800.0 };

        let events = view.on_scroll(viewport, ms(0));
        let played: Vec<&ElementKey> = events
            .iter()
            .filter(|e| matches!(e, RevealEvent::Play { .. }))
            .map(|e| e.key())
            .collect();
        assert_eq!(played.len(), 2);
        assert!(view.refresh_reveal(viewport, ms(500)).is_empty());
    }

    #[test]
    fn repeated_section_titles_register_one_header_each() {
        let (mut view, host) = view_with_host();
        view.resolve(Catalog::load(vec![
            section("Events", vec![item("a", "a.jpg")]),
            section("Events", vec![item("b", "b.jpg")]),
        ]));

        assert_eq!(section_titles(&view.result().sections), vec!["Events"]);
        assert_eq!(view.reveal().len(), 3);
        assert_eq!(host.observed().len(), 3);
        let header = view.reveal().entry(&ElementKey::Header("Events".into()));
        assert_eq!(header.map(|entry| entry.order), Some(0));
    }

    #[test]
    fn reveal_stagger_follows_display_order_across_sections() {
        let (mut view, host) = view_with_host();
        view.resolve(Catalog::load(vec![
            section("Top", vec![item("zeta", "zeta.jpg")]),
            section("Bottom", vec![item("alpha", "alpha.jpg")]),
        ]));
        host.place(ElementKey::Item(id("zeta")), 100.0, 250.0);
        host.place(ElementKey::Item(id("alpha")), 300.0, 450.0);

        let events = view.on_scroll(Viewport { height: 1000.0 }, ms(0));
        let delays: Vec<(&str, Duration)> = events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::Play {
                    key: ElementKey::Item(item_id),
                    delay,
                    ..
                } => Some((item_id.as_str(), *delay)),
                _ => None,
            })
            .collect();
        assert_eq!(delays, vec![("zeta", ms(0)), ("alpha", ms(100))]);
    }

    #[test]
    fn unmount_releases_everything() {
        let (mut view, host) = resolved_view();
        view.activate(&id("2024-lecture")).unwrap();
        view.toggle_autoplay(ms(0));

        view.unmount();
        assert!(!view.lightbox().is_open());
        assert_eq!(view.pending_timers(), 0);
        assert!(host.observed().is_empty());
        assert!(!host.listening());
    }

    #[test]
    fn dropping_view_releases_observers() {
        let (view, host) = resolved_view();
        assert!(host.listening());
        drop(view);
        assert!(host.observed().is_empty());
        assert!(!host.listening());
    }
}
