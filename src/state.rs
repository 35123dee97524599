//! Per-bar state that survives from one frame to the next.
//!
//! Every bar label owns one [`BarState`] inside a [`BarRegistry`].  State is
//! created lazily the first time a label is opened and is never destroyed:
//! a bar that is not opened simply leaves its state dormant until the next
//! time it is.

use crate::geometry::Orientation;
use crate::smoothing::{HoverRamp, PointerFilter};
use std::collections::BTreeMap;

/// Everything the frame controller remembers about one bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarState {
    /// Orientation used by the most recent open.
    pub orientation: Option<Orientation>,
    /// Cross-axis anchor fraction, clamped to `[0, 1]`.
    pub anchor_cross: f32,
    pub normal_size: f32,
    pub hovered_size: f32,
    pub effect_strength: f32,
    pub snap_items: bool,
    /// Aggregate hover scale.
    pub hover: HoverRamp,
    /// Smoothed pointer coordinate along the main axis.
    pub pointer: PointerFilter,
    /// Items declared so far in the current frame.
    pub item_cursor: usize,
    /// Last committed size of each item, indexed by declaration order.
    pub item_sizes: Vec<f32>,
    /// Size of the most recently placed item.
    pub current_item_size: f32,
    /// `current_item_size / normal_size`.
    pub current_item_scale: f32,
}

impl BarState {
    pub fn hover_scale(&self) -> f32 {
        self.hover.scale()
    }

    /// Size committed for item `index` on a previous frame, or `None` when
    /// the item has never been placed.
    pub fn previous_item_size(&self, index: usize) -> Option<f32> {
        self.item_sizes.get(index).copied().filter(|s| *s > 0.0)
    }

    /// Record the size of item `index` for this frame.
    pub fn commit_item(&mut self, index: usize, size: f32) {
        if index >= self.item_sizes.len() {
            self.item_sizes.resize(index + 1, 0.0);
        }
        self.item_sizes[index] = size;
        self.current_item_size = size;
        self.current_item_scale = if self.normal_size > 0.0 {
            size / self.normal_size
        } else {
            0.0
        };
    }
}

/// Label-keyed store of [`BarState`]s.
///
/// A `BTreeMap` keeps iteration ordered by label, which keeps metrics output
/// stable between frames.
#[derive(Debug, Clone, Default)]
pub struct BarRegistry {
    bars: BTreeMap<String, BarState>,
}

impl BarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `label`, created with defaults if absent.
    pub fn entry(&mut self, label: &str) -> &mut BarState {
        self.bars.entry(label.to_owned()).or_insert_with(|| {
            log::debug!("creating state for bar {:?}", label);
            BarState::default()
        })
    }

    pub fn get(&self, label: &str) -> Option<&BarState> {
        self.bars.get(label)
    }

    /// Iterate over `(label, state)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BarState)> {
        self.bars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
