//! An in-memory [`Host`] that lays out windows the way an immediate-mode
//! GUI does.
//!
//! [`SimHost`] is enough of a GUI to drive the bar engine without one:
//!
//! * windows keep their position and size across frames and auto-resize to
//!   their content when closed;
//! * items are placed at a cursor that advances to the next line after each
//!   item, unless [`same_line`](Host::same_line) was requested;
//! * pointer, focus and frame time are plain setters.
//!
//! The headless simulation of the `coolbar` binary, the GTK dock and the
//! tests all run on it.

use crate::bar::CoolBars;
use crate::config::{BarConfig, Config};
use crate::geometry::{Axis, Orientation, Rect};
use crate::traits::{AntiAliasing, Host, WindowFlags};
use glam::Vec2;
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Window padding per side, matching common immediate-mode defaults.
const DEFAULT_PADDING: Vec2 = Vec2::new(8.0, 8.0);
/// Gap between consecutive items.
const DEFAULT_ITEM_SPACING: Vec2 = Vec2::new(8.0, 4.0);
const DEFAULT_FRAME_ROUNDING: f32 = 0.0;

/// One simulated window.
#[derive(Debug, Clone, Default)]
pub struct SimWindow {
    pub pos: Vec2,
    pub size: Vec2,
    /// Content extent measured when the window was last closed.
    pub content: Vec2,
    pub flags: WindowFlags,
    pub antialiasing: AntiAliasing,
    visible: bool,
    /// Window-local cursor.
    cursor: Vec2,
    line_bottom: f32,
    same_line_pending: bool,
    last_item: Option<Rect>,
    max_extent: Vec2,
    /// Screen rects of the items placed since the window was opened.
    items: Vec<Rect>,
}

impl SimWindow {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn items(&self) -> &[Rect] {
        &self.items
    }
}

/// In-memory immediate-mode host.
#[derive(Debug, Clone)]
pub struct SimHost {
    viewport: Rect,
    padding: Vec2,
    item_spacing: Vec2,
    pointer: Option<Vec2>,
    focus_lost: bool,
    dt_ms: f32,
    windows: BTreeMap<String, SimWindow>,
    hidden: BTreeSet<String>,
    current: Option<String>,
    base_rounding: f32,
    rounding_stack: Vec<f32>,
}

impl SimHost {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            padding: DEFAULT_PADDING,
            item_spacing: DEFAULT_ITEM_SPACING,
            pointer: None,
            focus_lost: false,
            dt_ms: 16.0,
            windows: BTreeMap::new(),
            hidden: BTreeSet::new(),
            current: None,
            base_rounding: DEFAULT_FRAME_ROUNDING,
            rounding_stack: Vec::new(),
        }
    }

    //  Input

    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    pub fn set_focus_lost(&mut self, lost: bool) {
        self.focus_lost = lost;
    }

    pub fn set_delta_time_ms(&mut self, dt_ms: f32) {
        self.dt_ms = dt_ms;
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Report `label` as clipped: it opens invisible and skips its items.
    pub fn set_window_hidden(&mut self, label: &str, hidden: bool) {
        if hidden {
            self.hidden.insert(label.to_owned());
        } else {
            self.hidden.remove(label);
        }
    }

    //  Drawing

    /// Place an item of `size` at the cursor, like a button or a dummy
    /// widget, and return its screen rect.
    pub fn item(&mut self, size: Vec2) -> Rect {
        let spacing = self.item_spacing;
        let padding = self.padding;
        let Some(window) = self.current_window_mut() else {
            warn!("item placed outside of any window");
            return Rect::ZERO;
        };
        let local = Rect::from_pos_size(window.cursor, size);
        window.line_bottom = if window.same_line_pending {
            window.line_bottom.max(local.max.y)
        } else {
            local.max.y
        };
        window.same_line_pending = false;
        window.max_extent = window.max_extent.max(local.max);
        window.last_item = Some(local);
        window.cursor = Vec2::new(padding.x, window.line_bottom + spacing.y);

        let screen = Rect::new(local.min + window.pos, local.max + window.pos);
        window.items.push(screen);
        screen
    }

    //  Inspection

    pub fn window(&self, label: &str) -> Option<&SimWindow> {
        self.windows.get(label)
    }

    /// Items placed in `label` during its last open, in screen space.
    pub fn drawn_items(&self, label: &str) -> &[Rect] {
        self.windows.get(label).map(|w| w.items()).unwrap_or(&[])
    }

    pub fn padding(&self) -> Vec2 {
        self.padding
    }

    /// Frame rounding currently in effect.
    pub fn frame_rounding(&self) -> f32 {
        self.rounding_stack
            .last()
            .copied()
            .unwrap_or(self.base_rounding)
    }

    pub fn rounding_depth(&self) -> usize {
        self.rounding_stack.len()
    }

    /// Number of windows opened and not yet closed.
    pub fn open_windows(&self) -> usize {
        usize::from(self.current.is_some())
    }

    fn current_window(&self) -> Option<&SimWindow> {
        self.current.as_deref().and_then(|l| self.windows.get(l))
    }

    fn current_window_mut(&mut self) -> Option<&mut SimWindow> {
        let label = self.current.as_deref()?;
        self.windows.get_mut(label)
    }
}

impl Host for SimHost {
    fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    fn focus_lost(&self) -> bool {
        self.focus_lost
    }

    fn delta_time_ms(&self) -> f32 {
        self.dt_ms
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn begin_window(&mut self, label: &str, flags: WindowFlags) -> bool {
        if let Some(open) = &self.current {
            warn!("window {:?} opened while {:?} is still open", label, open);
        }
        let visible = !self.hidden.contains(label);
        let padding = self.padding;
        let window = self.windows.entry(label.to_owned()).or_default();
        window.flags = flags;
        window.visible = visible;
        window.cursor = padding;
        window.line_bottom = padding.y;
        window.same_line_pending = false;
        window.last_item = None;
        window.max_extent = padding;
        window.items.clear();
        self.current = Some(label.to_owned());
        visible
    }

    fn end_window(&mut self) {
        let padding = self.padding;
        if let Some(window) = self.current_window_mut() {
            if window.visible {
                window.content = (window.max_extent - padding).max(Vec2::ZERO);
                if window.flags.contains(WindowFlags::ALWAYS_AUTO_RESIZE) {
                    window.size = window.content + padding * 2.0;
                }
            }
        } else {
            warn!("end_window without an open window");
        }
        self.current = None;
    }

    fn window_rect(&self) -> Rect {
        self.current_window().map(SimWindow::rect).unwrap_or_default()
    }

    fn content_size(&self) -> Vec2 {
        self.current_window().map(|w| w.content).unwrap_or_default()
    }

    fn window_padding(&self) -> Vec2 {
        self.padding
    }

    fn set_window_pos(&mut self, pos: Vec2) {
        if let Some(window) = self.current_window_mut() {
            window.pos = pos;
        }
    }

    fn cursor_screen_pos(&self) -> Vec2 {
        self.current_window()
            .map(|w| w.pos + w.cursor)
            .unwrap_or_default()
    }

    fn set_cursor_pos(&mut self, axis: Axis, value: f32) {
        if let Some(window) = self.current_window_mut() {
            window.cursor = axis.with(window.cursor, value);
        }
    }

    fn same_line(&mut self) {
        let spacing = self.item_spacing;
        if let Some(window) = self.current_window_mut() {
            if let Some(last) = window.last_item {
                window.cursor = Vec2::new(last.max.x + spacing.x, last.min.y);
                window.same_line_pending = true;
            }
        }
    }

    fn skip_items(&self) -> bool {
        self.current_window().map_or(true, |w| !w.visible)
    }

    fn antialiasing(&self) -> AntiAliasing {
        self.current_window()
            .map(|w| w.antialiasing)
            .unwrap_or_default()
    }

    fn set_antialiasing(&mut self, aa: AntiAliasing) {
        if let Some(window) = self.current_window_mut() {
            window.antialiasing = aa;
        }
    }

    fn push_frame_rounding(&mut self, rounding: f32) {
        self.rounding_stack.push(rounding);
    }

    fn pop_frame_rounding(&mut self) {
        if self.rounding_stack.pop().is_none() {
            warn!("frame rounding popped more often than pushed");
        }
    }
}

//  Frame driver

/// Layout of one bar after a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u32,
    pub pointer: Option<[f32; 2]>,
    pub hover_scale: f32,
    /// Window rect as `[x, y, width, height]`.
    pub window: [f32; 4],
    pub items: Vec<f32>,
}

/// Run one frame of bar `label` with `items` square items.
///
/// Each item is drawn as large as the bar says it currently is.
pub fn run_frame(
    bars: &mut CoolBars,
    host: &mut SimHost,
    label: &str,
    orientation: Orientation,
    config: &BarConfig,
    items: usize,
) -> Vec<f32> {
    let mut sizes = Vec::with_capacity(items);
    let mut scope = bars.begin(host, label, orientation, config, WindowFlags::empty());
    for _ in 0..items {
        if !scope.item() {
            continue;
        }
        let size = scope.item_width();
        scope.host().item(Vec2::splat(size));
        sizes.push(size);
    }
    sizes
}

/// Scripted pointer position for frame `frame` of a sweep.
///
/// The pointer is absent for the first and last fifth of the run and sweeps
/// the bar's main axis in between, following the bar's cross-axis center.
pub fn sweep_pointer(config: &Config, frame: u32, bar: Rect) -> Option<Vec2> {
    let frames = config.simulation.frames.max(1) as f32;
    let t = frame as f32 / frames;
    if !(0.2..0.8).contains(&t) {
        return None;
    }
    let u = (t - 0.2) / 0.6;
    let sim = &config.simulation;
    let o = config.orientation;
    let fraction = sim.sweep_from + (sim.sweep_to - sim.sweep_from) * u;
    let main = o.main(sim.viewport) * fraction;
    Some(o.compose(main, o.cross(bar.center())))
}

/// Run the headless pointer sweep described by `config`.
pub fn simulate(config: &Config, label: &str) -> Vec<FrameRecord> {
    let viewport = Rect::from_pos_size(Vec2::ZERO, config.simulation.viewport);
    let mut host = SimHost::new(viewport);
    host.set_delta_time_ms(config.simulation.dt_ms);
    let mut bars = CoolBars::new();

    let records: Vec<FrameRecord> = (0..config.simulation.frames)
        .map(|frame| {
            let bar = host.window(label).map(SimWindow::rect).unwrap_or_default();
            let pointer = sweep_pointer(config, frame, bar);
            host.set_pointer(pointer);
            let items = run_frame(
                &mut bars,
                &mut host,
                label,
                config.orientation,
                &config.bar,
                config.items,
            );
            let rect = host.window(label).map(SimWindow::rect).unwrap_or_default();
            FrameRecord {
                frame,
                pointer: pointer.map(|p| p.to_array()),
                hover_scale: bars.state(label).map_or(0.0, |s| s.hover_scale()),
                window: [rect.min.x, rect.min.y, rect.size().x, rect.size().y],
                items,
            }
        })
        .collect();

    for metrics in bars.metrics() {
        info!("{}", metrics);
    }
    records
}
