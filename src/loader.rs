//! Image loading status and the loader seam.
//!
//! Fetching image bytes belongs to the host (a browser `<img>`, an HTTP
//! client, a texture cache). The gallery only needs to know, per item,
//! whether the image is still loading, finished, or failed, so that it can
//! show a placeholder instead of a blank frame.
//!
//! [`FsImageLoader`] is a concrete loader for local catalogs: it resolves
//! relative and `file://` URLs under a root directory and reads the image
//! header with the `image` crate. It backs the `check --probe-images` CLI
//! command.

use crate::catalog::Catalog;
use crate::types::ItemId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("remote image must be fetched by the host: {0}")]
    Remote(String),
    #[error("image failed to load: {0}")]
    Host(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// Pixel dimensions reported by a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

pub trait ImageLoader {
    fn load(&self, url: &str) -> Result<ImageInfo, ImageLoadError>;
}

/// Loads images from a local directory tree.
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a catalog URL onto a path under the root, or `None` for remote URLs.
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return None;
        }
        let local = url.strip_prefix("file://").unwrap_or(url);
        let local = Path::new(local);
        if local.is_absolute() {
            Some(local.to_path_buf())
        } else {
            Some(self.root.join(local))
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, url: &str) -> Result<ImageInfo, ImageLoadError> {
        let path = self
            .resolve(url)
            .ok_or_else(|| ImageLoadError::Remote(url.to_string()))?;
        if !path.is_file() {
            return Err(ImageLoadError::NotFound(path));
        }
        let (width, height) =
            image::image_dimensions(&path).map_err(|source| ImageLoadError::Decode {
                path: path.clone(),
                source,
            })?;
        Ok(ImageInfo { width, height })
    }
}

/// Per-item load status for the rendered grid.
///
/// Items default to [`LoadStatus::Loading`] until the host reports a result.
/// A failure only affects its own item.
#[derive(Debug, Default)]
pub struct LoadTracker {
    statuses: HashMap<ItemId, LoadStatus>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, id: &ItemId) -> LoadStatus {
        self.statuses.get(id).copied().unwrap_or_default()
    }

    pub fn mark_loaded(&mut self, id: &ItemId) {
        self.statuses.insert(id.clone(), LoadStatus::Loaded);
    }

    pub fn mark_failed(&mut self, id: &ItemId, error: &ImageLoadError) {
        tracing::warn!(item = %id, %error, "image failed to load");
        self.statuses.insert(id.clone(), LoadStatus::Failed);
    }

    /// Forget statuses for items no longer in the catalog.
    pub fn retain(&mut self, keep: impl Fn(&ItemId) -> bool) {
        self.statuses.retain(|id, _| keep(id));
    }

    pub fn failed_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|s| **s == LoadStatus::Failed)
            .count()
    }
}

/// Run `loader` over every item in the catalog, in display order.
pub fn probe_catalog<'a>(
    catalog: &'a Catalog,
    loader: &dyn ImageLoader,
) -> Vec<(&'a ItemId, Result<ImageInfo, ImageLoadError>)> {
    catalog
        .sections()
        .iter()
        .flat_map(|s| s.items.iter())
        .map(|item| (&item.id, loader.load(&item.source_url)))
        .collect()
}
