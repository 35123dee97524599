//! Bar and application configuration.
//!
//! [`BarConfig`] is what a caller hands to
//! [`CoolBars::begin`](crate::bar::CoolBars::begin) every frame.  The
//! top-level [`Config`] wraps it together with the settings of the
//! `coolbar` binary and is loaded from a JSON file.
//!
//! # Example
//!
//! ```json
//! {
//!   "bar": {
//!     "anchor": [0.5, 1.0],
//!     "normal_size": 40.0,
//!     "hovered_size": 64.0,
//!     "mouse_smoothing_ms": 50.0,
//!     "rounding_override": 8.0
//!   },
//!   "orientation": "horizontal",
//!   "items": 7,
//!   "simulation": { "frames": 240, "dt_ms": 16.6 },
//!   "dock": { "width": 900, "height": 140 }
//! }
//! ```

use crate::geometry::Orientation;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-bar settings.
///
/// Every field has a default, so `{}` is a valid bar configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Where the bar sits in the viewport, as a fraction per axis.  The
    /// cross-axis component also anchors items inside the bar's thickness.
    pub anchor: Vec2,
    /// Item and bar thickness at rest.  Must be positive.
    pub normal_size: f32,
    /// Item and bar thickness at full hover.
    pub hovered_size: f32,
    /// Hover-scale change per frame when `anim_smoothing_ms <= 0`.
    pub anim_step: f32,
    /// Narrowness of the magnification bubble, in `[0, 1]`.
    pub effect_strength: f32,
    /// Half-life of the pointer filter.  `<= 0` passes the pointer through.
    pub mouse_smoothing_ms: f32,
    /// Half-life of the hover-scale ramp.  `<= 0` uses `anim_step`.
    pub anim_smoothing_ms: f32,
    /// Floor the window position to whole pixels.
    pub snap_window_to_pixels: bool,
    /// Floor item offsets to whole pixels.
    pub snap_items_to_pixels: bool,
    /// Force anti-aliased lines and fills while the bar is open.
    pub local_antialiasing: bool,
    /// Frame rounding to apply while the bar is open.
    pub rounding_override: Option<f32>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            anchor: Vec2::new(0.5, 1.0),
            normal_size: 40.0,
            hovered_size: 60.0,
            anim_step: 0.15,
            effect_strength: 0.5,
            mouse_smoothing_ms: 50.0,
            anim_smoothing_ms: 50.0,
            snap_window_to_pixels: true,
            snap_items_to_pixels: false,
            local_antialiasing: true,
            rounding_override: None,
        }
    }
}

impl BarConfig {
    /// Check the invariants the frame controller relies on.
    ///
    /// [`CoolBars::begin`](crate::bar::CoolBars::begin) asserts the
    /// non-recoverable ones; this lets configuration files fail cleanly
    /// instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.normal_size.is_finite() && self.normal_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "normal_size must be positive, got {}",
                self.normal_size
            )));
        }
        if !self.hovered_size.is_finite() || self.hovered_size < self.normal_size {
            return Err(ConfigError::Invalid(format!(
                "hovered_size ({}) must not be smaller than normal_size ({})",
                self.hovered_size, self.normal_size
            )));
        }
        if !(0.0..=1.0).contains(&self.effect_strength) {
            return Err(ConfigError::Invalid(format!(
                "effect_strength must be within [0, 1], got {}",
                self.effect_strength
            )));
        }
        if !(0.0..=1.0).contains(&self.anchor.x) || !(0.0..=1.0).contains(&self.anchor.y) {
            return Err(ConfigError::Invalid(format!(
                "anchor components must be within [0, 1], got [{}, {}]",
                self.anchor.x, self.anchor.y
            )));
        }
        if !(self.anim_step.is_finite() && self.anim_step >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "anim_step must be non-negative, got {}",
                self.anim_step
            )));
        }
        Ok(())
    }
}

//  Application config

/// Top-level configuration of the `coolbar` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bar: BarConfig,

    #[serde(default)]
    pub orientation: Orientation,

    /// Number of items in the demo bar.
    #[serde(default = "default_items")]
    pub items: usize,

    /// Headless simulation settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// GTK dock window settings.
    #[serde(default)]
    pub dock: DockConfig,
}

fn default_items() -> usize {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bar: BarConfig::default(),
            orientation: Orientation::default(),
            items: default_items(),
            simulation: SimulationConfig::default(),
            dock: DockConfig::default(),
        }
    }
}

/// Scripted pointer sweep for the headless simulation.
///
/// The pointer starts outside the bar, sweeps along its main axis from
/// `sweep_from` to `sweep_to` (viewport fractions), then leaves again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames to run.
    pub frames: u32,
    /// Frame duration in milliseconds.
    pub dt_ms: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    pub sweep_from: f32,
    pub sweep_to: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 180,
            dt_ms: 16.6,
            viewport: Vec2::new(1280.0, 720.0),
            sweep_from: 0.3,
            sweep_to: 0.7,
        }
    }
}

/// Size of the dock's layer-shell surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 140,
        }
    }
}

impl Config {
    /// Load and validate configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.bar.validate()?;
        Ok(config)
    }
}

/// Error from loading, parsing or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid bar config: {0}")]
    Invalid(String),
}
