//! Shared test utilities for the gallery-view test suite.
//!
//! Provides item/section builders, a canned two-year catalog, bulk
//! extractors, and a recording [`ObserverHost`] that stands in for the
//! page's intersection observers and layout.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let catalog = year_catalog();
//! assert_eq!(section_titles(catalog.sections()), vec!["2024", "2025"]);
//!
//! let host = RecordingHost::new();
//! let mut seq = RevealSequencer::new(RevealSettings::default(), Box::new(host.clone()));
//! seq.register("tile", 0, RevealPolicy::OneShot);
//! host.place("tile", 500.0, 700.0);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::rc::Rc;

use crate::catalog::Catalog;
use crate::reveal::{Bounds, ObserverHost};
use crate::types::{MediaItem, Section};

// =========================================================================
// Builders
// =========================================================================

pub fn item(id: &str, url: &str) -> MediaItem {
    MediaItem::new(id, url)
}

pub fn section(title: &str, items: Vec<MediaItem>) -> Section {
    Section::new(title, items)
}

/// Item with a category and a `{id}.jpg` source.
pub fn categorized(id: &str, category: &str) -> MediaItem {
    let mut item = MediaItem::new(id, format!("{id}.jpg"));
    item.category = Some(category.to_string());
    item
}

/// `n` plain items with ids `item-0`, `item-1`, ...
pub fn numbered_items(n: usize) -> Vec<MediaItem> {
    (0..n)
        .map(|i| MediaItem::new(format!("item-{i}"), format!("item-{i}.jpg")))
        .collect()
}

fn captioned(id: &str, caption: &str, category: &str) -> MediaItem {
    let mut item = categorized(id, category);
    item.caption = Some(caption.to_string());
    item
}

/// Two sections of three items each, categorized as `events` or `works`.
///
/// Only `2024-lecture` mentions "lecture", and no caption contains "work".
pub fn year_catalog() -> Catalog {
    Catalog::load(vec![
        section(
            "2024",
            vec![
                captioned("2024-lecture", "Guest lecture on sustainable housing", "events"),
                captioned("2024-model", "Scale model of the green city", "works"),
                captioned("2024-site", "Site visit to the riverfront", "events"),
            ],
        ),
        section(
            "2025",
            vec![
                captioned("2025-studio", "Studio critique night", "events"),
                captioned("2025-render", "Render of the sensory pavilion", "works"),
                captioned("2025-expo", "Final year exhibition", "works"),
            ],
        ),
    ])
}

// =========================================================================
// Extractors
// =========================================================================

pub fn section_titles(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.title.as_str()).collect()
}

pub fn item_ids(section: &Section) -> Vec<&str> {
    section.items.iter().map(|i| i.id.as_str()).collect()
}

// =========================================================================
// Recording observer host
// =========================================================================

#[derive(Debug)]
struct HostLog<K> {
    observed: BTreeSet<K>,
    observe_calls: usize,
    listening: bool,
    layout: HashMap<K, Bounds>,
}

/// In-memory observer host. Clones share state, so a test keeps one handle
/// while the sequencer owns another.
#[derive(Debug, Clone)]
pub struct RecordingHost<K> {
    log: Rc<RefCell<HostLog<K>>>,
    measure_calls: Rc<Cell<usize>>,
}

impl<K: Eq + Hash + Ord + Clone> RecordingHost<K> {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(HostLog {
                observed: BTreeSet::new(),
                observe_calls: 0,
                listening: false,
                layout: HashMap::new(),
            })),
            measure_calls: Rc::new(Cell::new(0)),
        }
    }

    /// Lay `key` out at the given viewport-relative position.
    pub fn place(&self, key: K, top: f32, bottom: f32) {
        self.log
            .borrow_mut()
            .layout
            .insert(key, Bounds { top, bottom });
    }

    pub fn measure_calls(&self) -> usize {
        self.measure_calls.get()
    }

    pub fn observe_calls(&self) -> usize {
        self.log.borrow().observe_calls
    }

    /// Currently observed keys, sorted.
    pub fn observed(&self) -> Vec<K> {
        self.log.borrow().observed.iter().cloned().collect()
    }

    pub fn listening(&self) -> bool {
        self.log.borrow().listening
    }
}

impl<K: Eq + Hash + Ord + Clone> ObserverHost<K> for RecordingHost<K> {
    fn observe(&mut self, key: &K) {
        let mut log = self.log.borrow_mut();
        log.observe_calls += 1;
        log.observed.insert(key.clone());
    }

    fn unobserve(&mut self, key: &K) {
        self.log.borrow_mut().observed.remove(key);
    }

    fn listen_scroll(&mut self) {
        self.log.borrow_mut().listening = true;
    }

    fn unlisten_scroll(&mut self) {
        self.log.borrow_mut().listening = false;
    }

    fn measure(&self, key: &K) -> Option<Bounds> {
        self.measure_calls.set(self.measure_calls.get() + 1);
        self.log.borrow().layout.get(key).copied()
    }
}
