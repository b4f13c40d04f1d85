//! Deterministic masonry tile heights.
//!
//! Varying tile heights give the grid its "masonry" look. Heights are derived
//! from a SHA-256 of the configured seed and the item id, so the same catalog
//! always lays out the same way and tests can pin exact values. Changing the
//! seed reshuffles every height.

use crate::types::ItemId;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHeights {
    seed: u64,
    min: u32,
    max: u32,
}

impl TileHeights {
    /// Bounds are inclusive; swapped bounds are put back in order.
    pub fn new(seed: u64, min: u32, max: u32) -> Self {
        Self {
            seed,
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Height in pixels for `id`, within `[min, max]`.
    pub fn height(&self, id: &ItemId) -> u32 {
        let mut hasher = Sha256::new();
        hasher.update(b"masonry\0");
        hasher.update(self.seed.to_le_bytes());
        hasher.update(id.as_str().as_bytes());
        let digest = hasher.finalize();

        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        let span = u64::from(self.max - self.min) + 1;
        self.min + (u64::from_le_bytes(word) % span) as u32
    }
}
