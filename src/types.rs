//! Shared data shapes for the gallery.
//!
//! These types are deserialized from catalog manifests and flow unchanged
//! through filtering, the lightbox and rendering. They are immutable once the
//! catalog is built: every transformation produces new values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identity of a media item within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single image plus its descriptive metadata.
///
/// Optional fields are genuinely optional: some items carry a date or a
/// photographer, others carry nothing but a URL. Only `category` takes part
/// in filtering decisions beyond free-text search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaItem {
    pub id: ItemId,
    pub source_url: String,
    /// Label of the owning section. Filled from the section title when a
    /// manifest leaves it out.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub section_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photographer: Option<String>,
}

impl MediaItem {
    pub fn new(id: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            source_url: source_url.into(),
            section_label: String::new(),
            caption: None,
            category: None,
            date_label: None,
            photographer: None,
        }
    }

    /// Text shown as the image's accessible description.
    pub fn alt_text(&self) -> String {
        match &self.caption {
            Some(caption) if !caption.is_empty() => caption.clone(),
            _ => format!("{} image {}", self.section_label, self.id),
        }
    }
}

/// A named, ordered group of media items (one event, one year, one project).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

impl Section {
    pub fn new(title: impl Into<String>, items: Vec<MediaItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    /// Position of an item within this section's display order.
    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}
