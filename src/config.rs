//! Gallery configuration.
//!
//! Handles loading, validating, and merging `gallery.toml`. Every key has a
//! default, so a config file only lists what it overrides. Pages that need a
//! different reveal or lightbox behaviour layer their own table on top of the
//! site-wide one with [`merge_toml`].
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [lightbox]
//! autoplay_interval_ms = 3000   # Time between autoplay steps
//! swipe_threshold = 50.0        # Horizontal swipe distance (px) that navigates
//! activation = "any"            # Tile input that opens it: any | touch-only
//!
//! [reveal]
//! trigger_line = 0.85           # One-shot/toggle reveal line (fraction of viewport height)
//! duration_ms = 600             # Reveal animation length
//! stagger_ms = 100              # Delay between elements revealed together
//! throttle_ms = 100             # Minimum time between processed scroll positions
//! offset_x = 200.0              # Horizontal start offset (px), side alternates by index
//! offset_y = 20.0               # Vertical start offset (px)
//! rotation = 10.0               # Start rotation (degrees)
//! direction = "even-from-right" # or "even-from-left"
//! headers = "scrub"             # Section header policy: one-shot | toggle | scrub
//! items = "one-shot"            # Grid item policy
//!
//! [reveal.scrub]
//! start = 0.8                   # Progress 0 when the element top reaches this line
//! end = 0.6                     # Progress 1 when the element bottom reaches this line
//!
//! [masonry]
//! enabled = false               # Vary tile heights
//! seed = 0                      # Changing the seed reshuffles heights
//! min_height = 240
//! max_height = 420
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::lightbox::Activation;
use crate::masonry::TileHeights;
use crate::reveal::{EntryDirection, RevealPolicy, RevealSettings, ScrubRange};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILE: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `gallery.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Lightbox navigation settings.
    pub lightbox: LightboxConfig,
    /// Scroll reveal settings.
    pub reveal: RevealConfig,
    /// Masonry tile height settings.
    pub masonry: MasonryConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lightbox.autoplay_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "lightbox.autoplay_interval_ms must be greater than 0".into(),
            ));
        }
        if !(self.lightbox.swipe_threshold.is_finite() && self.lightbox.swipe_threshold > 0.0) {
            return Err(ConfigError::Validation(
                "lightbox.swipe_threshold must be a positive number".into(),
            ));
        }
        for (name, value) in [
            ("reveal.trigger_line", self.reveal.trigger_line),
            ("reveal.scrub.start", self.reveal.scrub.start),
            ("reveal.scrub.end", self.reveal.scrub.end),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{name} must be 0.0-1.0")));
            }
        }
        if self.masonry.min_height > self.masonry.max_height {
            return Err(ConfigError::Validation(
                "masonry.min_height must not exceed masonry.max_height".into(),
            ));
        }
        Ok(())
    }
}

/// Lightbox navigation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    /// Milliseconds between autoplay steps.
    pub autoplay_interval_ms: u64,
    /// Minimum horizontal swipe distance in pixels.
    pub swipe_threshold: f32,
    /// Pointer input that opens the lightbox from a tile.
    pub activation: Activation,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: 3000,
            swipe_threshold: 50.0,
            activation: Activation::Any,
        }
    }
}

impl LightboxConfig {
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }
}

/// Which reveal policy a group of elements uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    OneShot,
    Toggle,
    Scrub,
}

/// Scroll reveal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub trigger_line: f32,
    pub duration_ms: u64,
    pub stagger_ms: u64,
    pub throttle_ms: u64,
    pub offset_x: f32,
    pub offset_y: f32,
    pub rotation: f32,
    pub direction: EntryDirection,
    /// Policy for section headers.
    pub headers: PolicyKind,
    /// Policy for grid items.
    pub items: PolicyKind,
    /// Lines used by the scrub policy.
    pub scrub: ScrubRange,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            trigger_line: 0.85,
            duration_ms: 600,
            stagger_ms: 100,
            throttle_ms: 100,
            offset_x: 200.0,
            offset_y: 20.0,
            rotation: 10.0,
            direction: EntryDirection::EvenFromRight,
            headers: PolicyKind::Scrub,
            items: PolicyKind::OneShot,
            scrub: ScrubRange {
                start: 0.8,
                end: 0.6,
            },
        }
    }
}

impl RevealConfig {
    pub fn settings(&self) -> RevealSettings {
        RevealSettings {
            trigger_line: self.trigger_line,
            duration: Duration::from_millis(self.duration_ms),
            stagger: Duration::from_millis(self.stagger_ms),
            throttle: Duration::from_millis(self.throttle_ms),
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            rotation: self.rotation,
            direction: self.direction,
        }
    }

    pub fn policy(&self, kind: PolicyKind) -> RevealPolicy {
        match kind {
            PolicyKind::OneShot => RevealPolicy::OneShot,
            PolicyKind::Toggle => RevealPolicy::Toggle,
            PolicyKind::Scrub => RevealPolicy::Scrub(self.scrub),
        }
    }

    pub fn header_policy(&self) -> RevealPolicy {
        self.policy(self.headers)
    }

    pub fn item_policy(&self) -> RevealPolicy {
        self.policy(self.items)
    }
}

/// Masonry tile height settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MasonryConfig {
    pub enabled: bool,
    pub seed: u64,
    pub min_height: u32,
    pub max_height: u32,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seed: 0,
            min_height: 240,
            max_height: 420,
        }
    }
}

impl MasonryConfig {
    /// Height generator, or `None` when masonry is off.
    pub fn tiles(&self) -> Option<TileHeights> {
        self.enabled
            .then(|| TileHeights::new(self.seed, self.min_height, self.max_height))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `gallery.toml` path, falling back to defaults when absent.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `gallery.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Lightbox
# ---------------------------------------------------------------------------
[lightbox]
# Milliseconds between steps while autoplay is on.
autoplay_interval_ms = 3000

# Horizontal swipe distance in pixels that counts as next/previous.
swipe_threshold = 50.0

# Which tile input opens the lightbox: "any" (click or tap) or "touch-only".
activation = "any"

# ---------------------------------------------------------------------------
# Scroll reveal
# ---------------------------------------------------------------------------
[reveal]
# One-shot and toggle reveals trigger when the element top rises above this
# line, given as a fraction of the viewport height from the top.
trigger_line = 0.85

# Reveal animation length, and delay between elements revealed together.
duration_ms = 600
stagger_ms = 100

# Scroll positions closer together than this are coalesced.
throttle_ms = 100

# Hidden pose: elements start offset and rotated, then settle in place.
offset_x = 200.0
offset_y = 20.0
rotation = 10.0

# Which side elements enter from, alternating by index:
# "even-from-right" or "even-from-left".
direction = "even-from-right"

# Reveal policy per element group: "one-shot", "toggle" or "scrub".
headers = "scrub"
items = "one-shot"

# Scrubbed reveals: progress 0 when the element top reaches `start`,
# progress 1 when its bottom reaches `end` (fractions of viewport height).
[reveal.scrub]
start = 0.8
end = 0.6

# ---------------------------------------------------------------------------
# Masonry
# ---------------------------------------------------------------------------
[masonry]
# Vary tile heights deterministically from the seed and item id.
enabled = false
seed = 0
min_height = 240
max_height = 420
"##
}
