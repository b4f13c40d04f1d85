//! Search and category filtering over a catalog.
//!
//! [`filter`] is a pure function: the same catalog and query always produce
//! the same result, and the catalog is never touched. The caller (the view)
//! owns the current query and re-runs the filter on every input event, so a
//! keystroke is reflected before the next paint.
//!
//! ## Matching Rules
//!
//! - **Text**: case-insensitive substring match against the item's caption,
//!   section label and category. A hit in any one field is enough. Empty (or
//!   whitespace-only) text matches everything.
//! - **Category**: exact match. [`CategoryFilter::All`] matches every item,
//!   including items without a category.
//! - An item is kept only when it passes both.
//!
//! Section order and item order are preserved, and a section whose items are
//! all filtered out is dropped from the result entirely.

use crate::catalog::Catalog;
use crate::types::{MediaItem, Section};

/// The category selector's sentinel that matches everything.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a selector value; `"all"` becomes [`CategoryFilter::All`].
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    pub fn matches(&self, item: &MediaItem) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => item.category.as_deref() == Some(wanted.as_str()),
        }
    }
}

/// Current search text plus category selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    pub text: String,
    pub category: CategoryFilter,
}

impl FilterQuery {
    pub fn new(text: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    /// Whether this query is the "show everything" default.
    pub fn is_match_all(&self) -> bool {
        self.text.trim().is_empty() && self.category == CategoryFilter::All
    }

    pub fn matches(&self, item: &MediaItem) -> bool {
        TextNeedle::new(&self.text).matches(item) && self.category.matches(item)
    }
}

/// Lowercased search text, computed once per filter run.
struct TextNeedle(Option<String>);

impl TextNeedle {
    fn new(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            TextNeedle(None)
        } else {
            TextNeedle(Some(trimmed.to_lowercase()))
        }
    }

    fn matches(&self, item: &MediaItem) -> bool {
        let Some(needle) = &self.0 else {
            return true;
        };
        let hit = |field: &str| field.to_lowercase().contains(needle.as_str());
        item.caption.as_deref().is_some_and(hit)
            || hit(&item.section_label)
            || item.category.as_deref().is_some_and(hit)
    }
}

/// Sections reduced to the items matching a query. Never holds an empty section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredResult {
    pub sections: Vec<Section>,
}

impl FilteredResult {
    /// No section survived the filter: the view shows its "no results" state.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Apply `query` to `catalog`, preserving section and item order.
pub fn filter(catalog: &Catalog, query: &FilterQuery) -> FilteredResult {
    let needle = TextNeedle::new(&query.text);
    let sections = catalog
        .sections()
        .iter()
        .filter_map(|section| {
            let items: Vec<MediaItem> = section
                .items
                .iter()
                .filter(|item| needle.matches(item) && query.category.matches(item))
                .cloned()
                .collect();
            (!items.is_empty()).then(|| Section {
                title: section.title.clone(),
                items,
            })
        })
        .collect();
    FilteredResult { sections }
}
