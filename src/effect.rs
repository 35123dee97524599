//! Pure sizing functions behind the magnifying-dock effect.
//!
//! Nothing here holds state; the frame controller calls these every frame
//! with the current hover scale and pointer position.

use crate::geometry::{Orientation, Rect};
use glam::Vec2;
use std::f32::consts::PI;

/// Exponent shaping the bubble's falloff.
const BUBBLE_EXPONENT: i32 = 12;

/// Size multiplier in `[0, 1]` for an item at normalized signed distance `x`
/// from the pointer.
///
/// `cos(x·π·strength)^12` inside the main lobe (`|x·strength| < 0.5`), `0`
/// outside it.  `bubble(0, s) == 1` and `bubble(x, 0) == 1`.
pub fn bubble(x: f32, strength: f32) -> f32 {
    let phase = x * strength;
    if phase.is_nan() || phase.abs() >= 0.5 {
        return 0.0;
    }
    (phase * PI).cos().powi(BUBBLE_EXPONENT).clamp(0.0, 1.0)
}

/// Item size for a normalized pointer distance `x`.
///
/// The bubble is scaled by the bar's hover scale so the whole effect fades
/// in and out with the bar.  Always within `[normal, hovered]`.
pub fn hover_size(x: f32, normal: f32, hovered: f32, strength: f32, scale: f32) -> f32 {
    let size = normal + (hovered - normal) * bubble(x, strength) * scale.clamp(0.0, 1.0);
    size.max(normal).min(hovered.max(normal))
}

/// Cross-axis thickness of the bar at hover scale `scale`.
pub fn bar_thickness(normal: f32, hovered: f32, scale: f32) -> f32 {
    normal + (hovered - normal) * scale
}

/// Normalized signed distance between the pointer and an item center along
/// the main axis.
///
/// Returns `None` for a degenerate bar length, which callers treat as "far
/// away".
pub fn normalized_distance(pointer: f32, item_center: f32, bar_length: f32) -> Option<f32> {
    if bar_length > 0.0 {
        Some((pointer - item_center) / bar_length)
    } else {
        None
    }
}

/// Top-left corner of the bar's window for this frame.
///
/// The bounding box uses the host's main-axis `content` size and the
/// animated `thickness` on the cross axis, each padded on both sides.
pub fn bar_window_pos(
    viewport: Rect,
    content: Vec2,
    padding: Vec2,
    thickness: f32,
    orientation: Orientation,
    anchor: Vec2,
) -> Vec2 {
    let pad = padding * 2.0;
    let bar_size = orientation.compose(
        orientation.main(content) + orientation.main(pad),
        thickness + orientation.cross(pad),
    );
    viewport.min + (viewport.size() - bar_size) * anchor
}

/// Cross-axis cursor offset that anchors an item within the bar's thickness.
pub fn item_cross_offset(thickness: f32, item_size: f32, anchor_cross: f32, padding: f32) -> f32 {
    (thickness - item_size) * anchor_cross + padding
}

/// Floor to the pixel grid when `enabled`.
pub fn snap(value: f32, enabled: bool) -> f32 {
    if enabled {
        value.floor()
    } else {
        value
    }
}

/// Component-wise [`snap`].
pub fn snap_vec(v: Vec2, enabled: bool) -> Vec2 {
    if enabled {
        v.floor()
    } else {
        v
    }
}
