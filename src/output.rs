//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **content-centric**: every section and item leads with its
//! positional index and human-readable identity (title, caption), with the
//! source url and category shown as indented context lines. The output reads
//! as an inventory of the gallery while still letting users trace entries
//! back to the manifest.
//!
//! # Entity Display Contract
//!
//! 1. **Header line**: positional index + title (+ item count for sections)
//! 2. **Context lines**: indented `Source:`, `Category:`, etc.
//!
//! Shared helpers ([`entity_header`], [`item_line`]) keep `check`, `filter`
//! and `render` output consistent for the same entities.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sections
//! 001 2024 (3 items)
//!     001 Guest lecture on sustainable housing
//!         Source: 2024-lecture.jpg
//!         Category: events
//!     002 (2024-model)
//!         Source: 2024-model.jpg
//!
//! Rejected
//!     duplicate item id 'a' in section '2025' (first seen in '2024')
//!
//! Images
//!     2024-model: image not found: photos/2024-model.jpg
//!     1 of 6 images failed
//! ```
//!
//! ## Filter
//!
//! ```text
//! Query: text "lecture", category all
//! 001 2024 (1 item)
//!     001 Guest lecture on sustainable housing
//!         Source: 2024-lecture.jpg
//!
//! 1 of 6 items in 1 section
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::{Catalog, ValidationError};
use crate::filter::{FilterQuery, FilteredResult};
use crate::loader::{ImageInfo, ImageLoadError};
use crate::types::{ItemId, Section};
use crate::view::GalleryView;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format a section header: positional index + title, with optional item count.
///
/// ```text
/// 001 2024 (3 items)
/// 002 2025
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({})", format_index(index), title, plural(n, "item")),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Format an item line: captioned items show the caption, others show the id in parens.
///
/// ```text
/// 001 Guest lecture on sustainable housing
/// 002 (2024-model)
/// ```
fn item_line(index: usize, caption: Option<&str>, id: &ItemId) -> String {
    match caption {
        Some(c) if !c.trim().is_empty() => {
            format!("{} {}", format_index(index), truncate_caption(c.trim(), 60))
        }
        _ => format!("{} ({})", format_index(index), id),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_caption(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Section tree lines shared by `check` and `filter`.
fn section_lines(sections: &[Section]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        lines.push(entity_header(i + 1, &section.title, Some(section.items.len())));
        for (j, item) in section.items.iter().enumerate() {
            lines.push(format!(
                "{}{}",
                indent(1),
                item_line(j + 1, item.caption.as_deref(), &item.id)
            ));
            lines.push(format!("{}Source: {}", indent(2), item.source_url));
            if let Some(category) = &item.category {
                lines.push(format!("{}Category: {}", indent(2), category));
            }
        }
    }
    lines
}

// ============================================================================
// check
// ============================================================================

/// Format `check` output: the catalog tree, rejected entries, and image probe failures.
///
/// `probes` is `None` when images were not probed.
pub fn format_check_output(
    catalog: &Catalog,
    probes: Option<&[(&ItemId, Result<ImageInfo, ImageLoadError>)]>,
) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];
    if catalog.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    lines.extend(section_lines(catalog.sections()));

    let rejected: &[ValidationError] = catalog.rejected();
    if !rejected.is_empty() {
        lines.push(String::new());
        lines.push("Rejected".to_string());
        for err in rejected {
            lines.push(format!("{}{}", indent(1), err));
        }
    }

    if let Some(probes) = probes {
        lines.push(String::new());
        lines.push("Images".to_string());
        let mut failed = 0;
        for (id, result) in probes {
            if let Err(err) = result {
                failed += 1;
                lines.push(format!("{}{}: {}", indent(1), id, err));
            }
        }
        lines.push(format!(
            "{}{} of {} failed",
            indent(1),
            failed,
            plural(probes.len(), "image")
        ));
    }

    lines
}

pub fn print_check_output(
    catalog: &Catalog,
    probes: Option<&[(&ItemId, Result<ImageInfo, ImageLoadError>)]>,
) {
    for line in format_check_output(catalog, probes) {
        println!("{}", line);
    }
}

// ============================================================================
// filter
// ============================================================================

fn format_query(query: &FilterQuery) -> String {
    let text = query.text.trim();
    if text.is_empty() {
        format!("Query: any text, category {}", query.category.as_str())
    } else {
        format!("Query: text \"{}\", category {}", text, query.category.as_str())
    }
}

/// Format `filter` output: the query, the surviving tree, and a total line.
pub fn format_filter_output(
    catalog: &Catalog,
    query: &FilterQuery,
    result: &FilteredResult,
) -> Vec<String> {
    let mut lines = vec![format_query(query)];
    if result.is_empty() {
        lines.push("No results".to_string());
        return lines;
    }
    lines.extend(section_lines(&result.sections));
    lines.push(String::new());
    lines.push(format!(
        "{} of {} in {}",
        result.item_count(),
        plural(catalog.item_count(), "item"),
        plural(result.sections.len(), "section")
    ));
    lines
}

pub fn print_filter_output(catalog: &Catalog, query: &FilterQuery, result: &FilteredResult) {
    for line in format_filter_output(catalog, query, result) {
        println!("{}", line);
    }
}

// ============================================================================
// render
// ============================================================================

/// Format `render` output: what was written, and where.
///
/// ```text
/// 2 sections, 6 items → gallery.html
/// Lightbox: Image 2 of 3 (2024-model)
/// ```
pub fn format_render_output(view: &GalleryView, out: &Path) -> Vec<String> {
    let result = view.result();
    let mut lines = vec![format!(
        "{}, {} → {}",
        plural(result.sections.len(), "section"),
        plural(result.item_count(), "item"),
        out.display()
    )];
    let lightbox = view.lightbox();
    if let (Some(label), Some(item)) = (lightbox.position_label(), lightbox.current_item()) {
        lines.push(format!("Lightbox: {} ({})", label, item.id));
    }
    lines
}

pub fn print_render_output(view: &GalleryView, out: &Path) {
    for line in format_render_output(view, out) {
        println!("{}", line);
    }
}
