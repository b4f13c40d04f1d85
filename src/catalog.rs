//! The media catalog: an immutable, validated list of sections.
//!
//! A catalog is built once from host-supplied sections (usually a hand-written
//! manifest) and never mutated. Updating the gallery means building a new
//! catalog and handing it to the view.
//!
//! ## Validation
//!
//! Catalog data is presentation data, so bad entries never abort the page:
//!
//! - Items with an empty `id` or `source_url` are skipped.
//! - Items whose `id` was already seen anywhere in the catalog are skipped;
//!   the first occurrence wins.
//! - Sections left without any valid item are dropped.
//! - A section whose title was already used is merged into the first section
//!   with that title, so titles are unique within a catalog.
//!
//! Each skipped item or merged section produces a [`ValidationError`] that is
//! logged as a warning and kept in [`Catalog::rejected`] for reporting.
//!
//! ## Manifest Format
//!
//! ```json
//! {
//!   "sections": [
//!     {
//!       "title": "2024",
//!       "items": [
//!         { "id": "lecture", "source_url": "https://cdn.example/lecture.jpg",
//!           "caption": "Guest lecture", "category": "events" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! The same shape is accepted as TOML (`[[sections]]` / `[[sections.items]]`).

use crate::types::{ItemId, MediaItem, Section};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unsupported manifest format (expected .json or .toml): {0}")]
    UnsupportedFormat(PathBuf),
}

/// A catalog entry that was rejected while loading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("item in section '{section}' has an empty id")]
    EmptyId { section: String },
    #[error("item '{id}' in section '{section}' has an empty source url")]
    EmptySourceUrl { id: ItemId, section: String },
    #[error("duplicate item id '{id}' in section '{section}' (first seen in '{first_section}')")]
    DuplicateId {
        id: ItemId,
        section: String,
        first_section: String,
    },
    #[error("duplicate section title '{title}'; its items were merged into the first '{title}'")]
    DuplicateSection { title: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    sections: Vec<Section>,
}

/// Validated, read-only collection of gallery sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    sections: Vec<Section>,
    rejected: Vec<ValidationError>,
}

impl Catalog {
    /// Build a catalog, skipping (and logging) every invalid item.
    #[tracing::instrument(skip_all, fields(sections = sections.len()))]
    pub fn load(sections: Vec<Section>) -> Catalog {
        let mut seen: HashMap<ItemId, String> = HashMap::new();
        let mut rejected = Vec::new();
        let mut kept_sections: Vec<Section> = Vec::with_capacity(sections.len());
        let mut by_title: HashMap<String, usize> = HashMap::new();

        for section in sections {
            let title = section.title;
            let mut items = Vec::with_capacity(section.items.len());

            for mut item in section.items {
                if let Err(err) = validate_item(&item, &title, &seen) {
                    tracing::warn!(error = %err, "skipping catalog item");
                    rejected.push(err);
                    continue;
                }
                if item.section_label.is_empty() {
                    item.section_label = title.clone();
                }
                seen.insert(item.id.clone(), title.clone());
                items.push(item);
            }

            if items.is_empty() {
                tracing::debug!(section = %title, "dropping section without valid items");
                continue;
            }
            match by_title.get(&title).copied() {
                Some(first) => {
                    let err = ValidationError::DuplicateSection { title };
                    tracing::warn!(error = %err, "merging catalog section");
                    rejected.push(err);
                    kept_sections[first].items.extend(items);
                }
                None => {
                    by_title.insert(title.clone(), kept_sections.len());
                    kept_sections.push(Section { title, items });
                }
            }
        }

        Catalog {
            sections: kept_sections,
            rejected,
        }
    }

    /// Parse a JSON manifest and validate it.
    pub fn from_json_str(content: &str) -> Result<Catalog, CatalogError> {
        let manifest: ManifestFile = serde_json::from_str(content)?;
        Ok(Catalog::load(manifest.sections))
    }

    /// Parse a TOML manifest and validate it.
    pub fn from_toml_str(content: &str) -> Result<Catalog, CatalogError> {
        let manifest: ManifestFile = toml::from_str(content)?;
        Ok(Catalog::load(manifest.sections))
    }

    /// Load a manifest file, picking the format from its extension.
    pub fn load_file(path: &Path) -> Result<Catalog, CatalogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let parse: fn(&str) -> Result<Catalog, CatalogError> = match ext.as_deref() {
            Some("json") => Catalog::from_json_str,
            Some("toml") => Catalog::from_toml_str,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };
        let content = fs::read_to_string(path)?;
        parse(&content)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Items that were skipped while loading.
    pub fn rejected(&self) -> &[ValidationError] {
        &self.rejected
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Locate an item: `(section index, index within section, item)`.
    pub fn find(&self, id: &ItemId) -> Option<(usize, usize, &MediaItem)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section_idx, section)| {
                section
                    .items
                    .iter()
                    .enumerate()
                    .find(|(_, item)| &item.id == id)
                    .map(|(item_idx, item)| (section_idx, item_idx, item))
            })
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.find(id).is_some()
    }

    /// Distinct categories in first-seen order, for building a category picker.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter_map(|item| item.category.as_deref())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

fn validate_item(
    item: &MediaItem,
    section: &str,
    seen: &HashMap<ItemId, String>,
) -> Result<(), ValidationError> {
    if item.id.as_str().trim().is_empty() {
        return Err(ValidationError::EmptyId {
            section: section.to_string(),
        });
    }
    if item.source_url.trim().is_empty() {
        return Err(ValidationError::EmptySourceUrl {
            id: item.id.clone(),
            section: section.to_string(),
        });
    }
    if let Some(first_section) = seen.get(&item.id) {
        return Err(ValidationError::DuplicateId {
            id: item.id.clone(),
            section: section.to_string(),
            first_section: first_section.clone(),
        });
    }
    Ok(())
}
