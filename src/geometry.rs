//! Screen-space geometry shared by the engine and the hosts.
//!
//! Points and sizes are [`glam::Vec2`].  A bar lays its items out along one
//! *main* axis; the perpendicular *cross* axis carries the animated
//! thickness.  [`Orientation`] maps between the two views so the layout code
//! can be written once for both horizontal and vertical bars.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two screen axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component of `v` along this axis.
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Return `v` with the component along this axis replaced by `value`.
    pub fn with(self, v: Vec2, value: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(value, v.y),
            Axis::Y => Vec2::new(v.x, value),
        }
    }
}

/// Direction in which a bar lays out its items.
///
/// Exactly one orientation is active per bar; the enum makes any other
/// combination unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Items flow left → right; thickness is the bar's height.
    #[default]
    Horizontal,
    /// Items flow top → bottom; thickness is the bar's width.
    Vertical,
}

impl Orientation {
    /// The axis items are laid out along.
    pub fn main_axis(self) -> Axis {
        match self {
            Orientation::Horizontal => Axis::X,
            Orientation::Vertical => Axis::Y,
        }
    }

    /// The axis carrying the bar's thickness.
    pub fn cross_axis(self) -> Axis {
        match self {
            Orientation::Horizontal => Axis::Y,
            Orientation::Vertical => Axis::X,
        }
    }

    /// Main-axis component of `v`.
    pub fn main(self, v: Vec2) -> f32 {
        self.main_axis().of(v)
    }

    /// Cross-axis component of `v`.
    pub fn cross(self, v: Vec2) -> f32 {
        self.cross_axis().of(v)
    }

    /// Build a vector from main/cross components.
    pub fn compose(self, main: f32, cross: f32) -> Vec2 {
        match self {
            Orientation::Horizontal => Vec2::new(main, cross),
            Orientation::Vertical => Vec2::new(cross, main),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// An axis-aligned rectangle given by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle from its top-left corner and size.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether `p` lies inside the rectangle (max edges exclusive).
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_main_is_x() {
        let v = Vec2::new(3.0, 7.0);
        assert_eq!(Orientation::Horizontal.main(v), 3.0);
        assert_eq!(Orientation::Horizontal.cross(v), 7.0);
    }

    #[test]
    fn vertical_swaps_roles() {
        let v = Vec2::new(3.0, 7.0);
        assert_eq!(Orientation::Vertical.main(v), 7.0);
        assert_eq!(Orientation::Vertical.cross(v), 3.0);
    }

    #[test]
    fn compose_inverts_split() {
        for o in [Orientation::Horizontal, Orientation::Vertical] {
            let v = o.compose(10.0, 20.0);
            assert_eq!(o.main(v), 10.0);
            assert_eq!(o.cross(v), 20.0);
        }
    }

    #[test]
    fn axis_with_replaces_one_component() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(Axis::X.with(v, 5.0), Vec2::new(5.0, 2.0));
        assert_eq!(Axis::Y.with(v, 5.0), Vec2::new(1.0, 5.0));
    }

    #[test]
    fn rect_contains_excludes_max_edge() {
        let r = Rect::from_pos_size(Vec2::new(10.0, 10.0), Vec2::new(20.0, 5.0));
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(29.9, 14.9)));
        assert!(!r.contains(Vec2::new(30.0, 12.0)));
        assert!(!r.contains(Vec2::new(15.0, 9.0)));
        assert_eq!(r.size(), Vec2::new(20.0, 5.0));
        assert_eq!(r.center(), Vec2::new(20.0, 12.5));
    }

    #[test]
    fn orientation_deserializes_lowercase() {
        let o: Orientation = serde_json::from_str("\"vertical\"").unwrap();
        assert_eq!(o, Orientation::Vertical);
        assert_eq!(o.to_string(), "vertical");
    }
}
