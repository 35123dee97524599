//! The seam between the bar engine and the immediate-mode GUI that hosts it.
//!
//! The engine never draws anything itself.  Everything it needs from the GUI
//! (pointer, frame time, window geometry, cursor placement and scoped style
//! overrides) goes through [`Host`], so the same
//! [`CoolBars`](crate::bar::CoolBars) drives a real toolkit, the in-memory
//! [`SimHost`](crate::sim::SimHost) or a test double.

use crate::geometry::{Axis, Rect};
use bitflags::bitflags;
use glam::Vec2;

bitflags! {
    /// Options for the window that hosts a bar.
    ///
    /// Callers may pass their own flags to
    /// [`CoolBars::begin`](crate::bar::CoolBars::begin); the bar always adds
    /// [`WindowFlags::BAR`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        const NO_TITLE_BAR         = 1 << 0;
        const NO_SCROLLBAR         = 1 << 1;
        const ALWAYS_AUTO_RESIZE   = 1 << 2;
        const NO_COLLAPSE          = 1 << 3;
        const NO_MOVE              = 1 << 4;
        const NO_SAVED_SETTINGS    = 1 << 5;
        const NO_BACKGROUND        = 1 << 6;
        const NO_FOCUS_ON_APPEARING = 1 << 7;
        const NO_DOCKING           = 1 << 8;

        /// The set every bar window is opened with.
        const BAR = Self::NO_TITLE_BAR.bits()
            | Self::NO_SCROLLBAR.bits()
            | Self::ALWAYS_AUTO_RESIZE.bits()
            | Self::NO_COLLAPSE.bits()
            | Self::NO_MOVE.bits()
            | Self::NO_SAVED_SETTINGS.bits()
            | Self::NO_BACKGROUND.bits()
            | Self::NO_FOCUS_ON_APPEARING.bits()
            | Self::NO_DOCKING.bits();
    }
}

/// Anti-aliasing switches of the current window's draw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AntiAliasing {
    pub lines: bool,
    pub fill: bool,
}

impl AntiAliasing {
    pub const ALL: Self = Self {
        lines: true,
        fill: true,
    };
}

/// Services an immediate-mode GUI provides to the bar engine.
///
/// All methods refer to the *current* window, i.e. the one most recently
/// opened with [`begin_window`](Host::begin_window) and not yet closed.
pub trait Host {
    /// Pointer position in screen space, or `None` when the host has no
    /// valid position (e.g. the pointer left the application).
    fn pointer(&self) -> Option<Vec2>;

    /// Whether the application lost input focus since the previous frame.
    fn focus_lost(&self) -> bool;

    /// Elapsed time of the current frame in milliseconds.
    fn delta_time_ms(&self) -> f32;

    /// Screen rectangle available to bars.
    fn viewport(&self) -> Rect;

    /// Open (or re-open) the window identified by `label`.
    ///
    /// Returns `false` when the window will not be drawn this frame.
    /// [`end_window`](Host::end_window) must be called either way.
    fn begin_window(&mut self, label: &str, flags: WindowFlags) -> bool;

    /// Close the current window.
    fn end_window(&mut self);

    /// Screen rectangle of the current window as laid out last frame.
    fn window_rect(&self) -> Rect;

    /// Size of the current window's content as measured last frame.
    fn content_size(&self) -> Vec2;

    /// Inner padding of the current window, per side.
    fn window_padding(&self) -> Vec2;

    fn set_window_pos(&mut self, pos: Vec2);

    /// Screen position where the next item will be placed.
    fn cursor_screen_pos(&self) -> Vec2;

    /// Set the window-local cursor coordinate along `axis`.
    fn set_cursor_pos(&mut self, axis: Axis, value: f32);

    /// Keep the next item on the same line as the previous one.
    fn same_line(&mut self);

    /// Whether items of the current window are being clipped away.
    fn skip_items(&self) -> bool;

    fn antialiasing(&self) -> AntiAliasing;

    fn set_antialiasing(&mut self, aa: AntiAliasing);

    fn push_frame_rounding(&mut self, rounding: f32);

    fn pop_frame_rounding(&mut self);
}
