//! HTML rendering of a [`GalleryView`] with maud.
//!
//! Rendering is a pure function of view state: the host re-renders after any
//! event and diffs or swaps the markup however it likes. Interactive elements
//! carry `data-action` attributes naming the [`GalleryView`] operation they
//! trigger; tiles and lightbox items carry `data-id`. The root carries
//! `data-activation` so the host knows which tile input to forward.
//!
//! ```text
//! main.gallery
//! ├── form.gallery-filters          search box + category select
//! ├── div.gallery-loading           phase = Loading
//! ├── div.gallery-empty             phase = Empty ("Clear filters")
//! ├── section.gallery-section ×N    phase = Results
//! │   ├── h2                        revealable header
//! │   └── div.gallery-grid > figure.tile ×M
//! └── div.lightbox                  when open
//! ```

use crate::filter::CategoryFilter;
use crate::lightbox::LightboxController;
use crate::loader::LoadStatus;
use crate::masonry::TileHeights;
use crate::types::{MediaItem, Section};
use crate::view::{GalleryView, ViewPhase};
use maud::{DOCTYPE, Markup, html};

const CSS: &str = include_str!("../static/gallery.css");

/// A complete standalone page around [`render_view`].
pub fn render_document(view: &GalleryView, title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (render_view(view))
            }
        }
    }
}

/// The gallery component: filters, the phase-dependent body, and the lightbox.
pub fn render_view(view: &GalleryView) -> Markup {
    html! {
        main.gallery data-activation=(view.config().lightbox.activation.as_str()) {
            (render_filters(view))
            @match view.phase() {
                ViewPhase::Loading => {
                    div.gallery-loading aria-busy="true" { "Loading gallery…" }
                }
                ViewPhase::Empty => {
                    div.gallery-empty {
                        p { "No results" }
                        button type="button" data-action="clear-filters" { "Clear filters" }
                    }
                }
                ViewPhase::Results => {
                    @let tiles = view.tiles();
                    @for section in &view.result().sections {
                        (render_section(view, section, tiles))
                    }
                }
            }
            @if view.lightbox().is_open() {
                (render_lightbox(view.lightbox()))
            }
        }
    }
}

fn render_filters(view: &GalleryView) -> Markup {
    let query = view.query();
    let categories = view.catalog().categories();

    html! {
        form.gallery-filters role="search" {
            input type="search" name="q" placeholder="Search" value=(query.text)
                data-action="set-text";
            select name="category" data-action="set-category" {
                option value=(CategoryFilter::All.as_str())
                    selected[query.category == CategoryFilter::All] { "All" }
                @for category in categories {
                    option value=(category)
                        selected[query.category.as_str() == category] { (category) }
                }
            }
        }
    }
}

fn render_section(view: &GalleryView, section: &Section, tiles: Option<TileHeights>) -> Markup {
    html! {
        section.gallery-section data-section=(section.title) {
            h2 { (section.title) }
            div.gallery-grid {
                @for item in &section.items {
                    (render_tile(item, view.load_status(&item.id), tiles))
                }
            }
        }
    }
}

fn render_tile(item: &MediaItem, status: LoadStatus, tiles: Option<TileHeights>) -> Markup {
    let style = tiles.map(|t| format!("--tile-height: {}px;", t.height(&item.id)));
    let alt = item.alt_text();

    html! {
        figure.tile data-id=(item.id.as_str()) data-action="activate" style=[style] tabindex="0" {
            @match status {
                LoadStatus::Failed => {
                    div.tile-placeholder.failed role="img" aria-label=(alt) { "Image unavailable" }
                }
                LoadStatus::Loading => {
                    div.tile-placeholder.loading aria-hidden="true" {}
                    img src=(item.source_url) alt=(alt) loading="lazy";
                }
                LoadStatus::Loaded => {
                    img src=(item.source_url) alt=(alt) loading="lazy";
                }
            }
            @if let Some(caption) = &item.caption {
                figcaption { (caption) }
            }
        }
    }
}

fn pressed(on: bool) -> &'static str {
    if on { "true" } else { "false" }
}

fn render_lightbox(lightbox: &LightboxController) -> Markup {
    let Some(item) = lightbox.current_item() else {
        return html! {};
    };
    let status = lightbox.image_status().unwrap_or_default();
    let alt = item.alt_text();
    let position = lightbox.position_label().unwrap_or_default();

    html! {
        div.lightbox.fullscreen[lightbox.is_fullscreen()] role="dialog" aria-modal="true"
            aria-label=(position) data-id=(item.id.as_str()) {
            button.lightbox-close type="button" data-action="close" aria-label="Close" { "×" }
            button.lightbox-prev type="button" data-action="prev" aria-label="Previous image" { "‹" }
            figure.lightbox-stage {
                @if status == LoadStatus::Failed {
                    div.lightbox-placeholder.failed role="img" aria-label=(alt) { "Image unavailable" }
                } @else {
                    img.loading[status == LoadStatus::Loading] src=(item.source_url) alt=(alt);
                }
            }
            button.lightbox-next type="button" data-action="next" aria-label="Next image" { "›" }
            div.lightbox-controls {
                button type="button" data-action="toggle-autoplay"
                    aria-pressed=(pressed(lightbox.is_autoplaying())) {
                    @if lightbox.is_autoplaying() { "Pause" } @else { "Play" }
                }
                button type="button" data-action="toggle-info"
                    aria-pressed=(pressed(lightbox.is_info_visible())) { "Info" }
                button type="button" data-action="toggle-fullscreen"
                    aria-pressed=(pressed(lightbox.is_fullscreen())) { "Fullscreen" }
            }
            @if lightbox.is_info_visible() {
                aside.lightbox-info {
                    p.lightbox-position { (position) }
                    @if let Some(caption) = &item.caption {
                        p.lightbox-caption { (caption) }
                    }
                    dl {
                        @if !item.section_label.is_empty() {
                            dt { "Section" } dd { (item.section_label) }
                        }
                        @if let Some(date) = &item.date_label {
                            dt { "Date" } dd { (date) }
                        }
                        @if let Some(photographer) = &item.photographer {
                            dt { "Photographer" } dd { (photographer) }
                        }
                        @if let Some(category) = &item.category {
                            dt { "Category" } dd { (category) }
                        }
                    }
                }
            }
        }
    }
}
