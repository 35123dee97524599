//! Read-only snapshot of every bar's state, for debugging.
//!
//! [`CoolBars::metrics`](crate::bar::CoolBars::metrics) returns one
//! [`BarMetrics`] per bar.  It serializes to JSON and also renders as a
//! two-column table through [`Display`](std::fmt::Display).

use crate::geometry::Orientation;
use crate::state::BarState;
use serde::Serialize;
use std::fmt;

/// Values of one bar's state as of its last frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarMetrics {
    pub label: String,
    pub orientation: Option<Orientation>,
    pub anchor: f32,
    pub hover_scale: f32,
    /// Items declared in the last frame.
    pub item_count: usize,
    pub normal_size: f32,
    pub hovered_size: f32,
    pub effect_strength: f32,
    pub item_current_size: f32,
    pub item_current_scale: f32,
    pub filtered_pointer: f32,
    pub pointer_initialized: bool,
    pub pointer_reseed_pending: bool,
    pub mouse_smoothing_ms: f32,
    pub mouse_smoothing_alpha: f32,
    pub anim_smoothing_ms: f32,
    pub anim_smoothing_alpha: f32,
    /// Committed size of each item of the last frame.
    pub item_sizes: Vec<f32>,
}

impl BarMetrics {
    pub fn from_state(label: &str, state: &BarState) -> Self {
        let count = state.item_cursor.min(state.item_sizes.len());
        Self {
            label: label.to_owned(),
            orientation: state.orientation,
            anchor: state.anchor_cross,
            hover_scale: state.hover_scale(),
            item_count: state.item_cursor,
            normal_size: state.normal_size,
            hovered_size: state.hovered_size,
            effect_strength: state.effect_strength,
            item_current_size: state.current_item_size,
            item_current_scale: state.current_item_scale,
            filtered_pointer: state.pointer.value(),
            pointer_initialized: state.pointer.is_initialized(),
            pointer_reseed_pending: state.pointer.is_reseed_pending(),
            mouse_smoothing_ms: state.pointer.half_life_ms(),
            mouse_smoothing_alpha: state.pointer.alpha(),
            anim_smoothing_ms: state.hover.half_life_ms(),
            anim_smoothing_alpha: state.hover.alpha(),
            item_sizes: state.item_sizes[..count].to_vec(),
        }
    }
}

impl fmt::Display for BarMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let orientation = self
            .orientation
            .map(|o| o.to_string())
            .unwrap_or_else(|| "none".into());

        writeln!(f, "CoolBar {}", self.label)?;
        writeln!(f, "  {:<22}{}", "Label", "Value")?;
        writeln!(f, "  {:<22}{}", "Orientation", orientation)?;
        writeln!(f, "  {:<22}{}", "MaxIdx", self.item_count)?;
        let rows = [
            ("Anchor", self.anchor),
            ("AnimScale", self.hover_scale),
            ("NormalSize", self.normal_size),
            ("HoveredSize", self.hovered_size),
            ("EffectStrength", self.effect_strength),
            ("ItemCurrentSize", self.item_current_size),
            ("ItemCurrentScale", self.item_current_scale),
            ("FilteredPointer", self.filtered_pointer),
            ("MouseSmoothingMs", self.mouse_smoothing_ms),
            ("MouseSmoothingAlpha", self.mouse_smoothing_alpha),
            ("AnimSmoothingMs", self.anim_smoothing_ms),
            ("AnimSmoothingAlpha", self.anim_smoothing_alpha),
        ];
        for (name, value) in rows {
            writeln!(f, "  {:<22}{:.6}", name, value)?;
        }
        for (idx, size) in self.item_sizes.iter().enumerate() {
            writeln!(f, "  {:<22}{:.6}", format!("Item {} Size", idx), size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::CoolBars;
    use crate::config::BarConfig;
    use crate::geometry::Rect;
    use crate::sim::{run_frame, SimHost};
    use glam::Vec2;

    fn bars_with_frames() -> CoolBars {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(Rect::from_pos_size(Vec2::ZERO, Vec2::new(800.0, 600.0)));
        host.set_pointer(Some(Vec2::new(400.0, 10.0)));
        for _ in 0..2 {
            run_frame(
                &mut bars,
                &mut host,
                "side",
                Orientation::Vertical,
                &BarConfig::default(),
                2,
            );
            run_frame(
                &mut bars,
                &mut host,
                "bottom",
                Orientation::Horizontal,
                &BarConfig::default(),
                3,
            );
        }
        bars
    }

    #[test]
    fn enumerates_every_bar_in_label_order() {
        let metrics = bars_with_frames().metrics();
        let labels: Vec<&str> = metrics.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["bottom", "side"]);
        assert_eq!(metrics[0].item_count, 3);
        assert_eq!(metrics[0].item_sizes.len(), 3);
        assert_eq!(metrics[1].orientation, Some(Orientation::Vertical));
        assert_eq!(metrics[1].item_sizes, vec![40.0, 40.0]);
    }

    #[test]
    fn reports_filter_parameters() {
        let metrics = bars_with_frames().metrics();
        let bottom = &metrics[0];
        assert_eq!(bottom.mouse_smoothing_ms, 50.0);
        assert_eq!(bottom.anim_smoothing_ms, 50.0);
        assert!(bottom.pointer_initialized);
        assert!(!bottom.pointer_reseed_pending);
        assert_eq!(bottom.filtered_pointer, 400.0);
    }

    #[test]
    fn table_lists_each_item() {
        let metrics = bars_with_frames().metrics();
        let table = metrics[0].to_string();
        assert!(table.starts_with("CoolBar bottom\n"));
        assert!(table.contains("Orientation"));
        assert!(table.contains("horizontal"));
        assert!(table.contains("Item 2 Size"));
        assert!(!table.contains("Item 3 Size"));
    }

    #[test]
    fn serializes_to_json() {
        let metrics = bars_with_frames().metrics();
        let json = serde_json::to_value(&metrics[1]).unwrap();
        assert_eq!(json["label"], "side");
        assert_eq!(json["orientation"], "vertical");
        assert_eq!(json["item_count"], 2);
    }
}
