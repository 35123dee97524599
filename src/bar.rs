//! The frame controller: the begin / item / end protocol of a bar.
//!
//! # Per-frame flow
//!
//! ```text
//! CoolBars::begin ──► BarScope ──► item() × N ──► drop / end()
//!   open host window     │            size + cross offset      restore style
//!   push style overrides │            commit item size         close window
//!   pointer filter       │
//!   hover ramp           │
//!   window position      │
//! ```
//!
//! [`CoolBars::begin`] finalizes the hover scale and the filtered pointer
//! before any item is placed, so every item of a frame sees the same values.
//! The returned [`BarScope`] borrows both the host and the bar's
//! [`BarState`]; dropping it restores any style overrides and closes the host
//! window, on every exit path including early returns.
//!
//! # Example
//!
//! ```ignore
//! let mut scope = bars.begin(&mut host, "dock", Orientation::Horizontal, &config, WindowFlags::empty());
//! for icon in &icons {
//!     if scope.item() {
//!         let size = scope.item_width();
//!         scope.host().draw_icon(icon, size);
//!     }
//! }
//! // `scope` dropped here: overrides restored, window closed.
//! ```

use crate::config::BarConfig;
use crate::effect::{
    bar_thickness, bar_window_pos, hover_size, item_cross_offset, normalized_distance, snap,
    snap_vec,
};
use crate::geometry::Orientation;
use crate::metrics::BarMetrics;
use crate::state::{BarRegistry, BarState};
use crate::traits::{AntiAliasing, Host, WindowFlags};
use glam::Vec2;
use log::{debug, trace};

/// Owner of every bar's cross-frame state.
///
/// Keep one `CoolBars` alive for as long as the host GUI runs and open each
/// bar through it once per frame.
#[derive(Debug, Default)]
pub struct CoolBars {
    registry: BarRegistry,
}

impl CoolBars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the bar `label` for this frame.
    ///
    /// Opens a host window with `flags` plus [`WindowFlags::BAR`].  If the
    /// host reports the window as not visible the scope is inert:
    /// [`BarScope::is_open`] is `false`, no state is touched and items are
    /// skipped, but dropping the scope still closes the window.
    ///
    /// # Panics
    ///
    /// If `config.normal_size` is not positive.
    pub fn begin<'a, H: Host>(
        &'a mut self,
        host: &'a mut H,
        label: &str,
        orientation: Orientation,
        config: &BarConfig,
        flags: WindowFlags,
    ) -> BarScope<'a, H> {
        assert!(
            config.normal_size > 0.0,
            "cool bar {:?}: normal_size must be positive, got {}",
            label,
            config.normal_size
        );

        let open = host.begin_window(label, flags | WindowFlags::BAR);
        let mut scope = BarScope {
            host,
            state: self.registry.entry(label),
            orientation,
            open,
            overrides: StyleOverrides::default(),
        };
        if !open {
            trace!("bar {:?} not visible this frame", label);
            return scope;
        }

        scope.overrides = StyleOverrides::push(&mut *scope.host, config);
        scope.advance(config);
        scope
    }

    /// The state of bar `label`, if it was ever opened.
    pub fn state(&self, label: &str) -> Option<&BarState> {
        self.registry.get(label)
    }

    pub fn registry(&self) -> &BarRegistry {
        &self.registry
    }

    /// Snapshot of every bar opened so far, ordered by label.
    pub fn metrics(&self) -> Vec<BarMetrics> {
        self.registry
            .iter()
            .map(|(label, state)| BarMetrics::from_state(label, state))
            .collect()
    }
}

//  Style overrides

/// Style values changed for the lifetime of one open bar.
#[derive(Debug, Default)]
struct StyleOverrides {
    previous_aa: Option<AntiAliasing>,
    pushed_rounding: bool,
}

impl StyleOverrides {
    fn push<H: Host>(host: &mut H, config: &BarConfig) -> Self {
        let mut overrides = Self::default();
        if config.local_antialiasing {
            overrides.previous_aa = Some(host.antialiasing());
            host.set_antialiasing(AntiAliasing::ALL);
        }
        if let Some(rounding) = config.rounding_override.filter(|r| *r >= 0.0) {
            host.push_frame_rounding(rounding);
            overrides.pushed_rounding = true;
        }
        overrides
    }

    /// Undo whatever [`push`](Self::push) changed.  A second call is a no-op.
    fn restore<H: Host>(&mut self, host: &mut H) {
        if let Some(aa) = self.previous_aa.take() {
            host.set_antialiasing(aa);
        }
        if std::mem::take(&mut self.pushed_rounding) {
            host.pop_frame_rounding();
        }
    }
}

//  Scope

/// One bar, open for the current frame.
///
/// Created by [`CoolBars::begin`]; closes the bar when dropped.
pub struct BarScope<'a, H: Host> {
    host: &'a mut H,
    state: &'a mut BarState,
    orientation: Orientation,
    open: bool,
    overrides: StyleOverrides,
}

impl<'a, H: Host> BarScope<'a, H> {
    /// Whether the bar produced a visible surface this frame.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The host, for drawing the content of the item just placed.
    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }

    /// Current aggregate hover scale of the bar.
    pub fn hover_scale(&self) -> f32 {
        self.state.hover_scale()
    }

    /// Declare the next item.
    ///
    /// Sizes the item from the filtered pointer and the bar's hover scale,
    /// moves the host cursor to the item's cross-axis offset and records the
    /// size.  Returns `false` when items are being skipped this frame; the
    /// caller should then not draw the item's content.
    pub fn item(&mut self) -> bool {
        if !self.open || self.host.skip_items() {
            return false;
        }
        let o = self.orientation;
        let state = &mut *self.state;
        let host = &mut *self.host;

        let index = state.item_cursor;
        state.item_cursor += 1;
        if o == Orientation::Horizontal && index > 0 {
            host.same_line();
        }

        let normal = state.normal_size;
        let scale = state.hover_scale();
        let previous = state.previous_item_size(index).unwrap_or(normal);
        let item_center = o.main(host.cursor_screen_pos()) + previous * 0.5;
        let bar_length = o.main(host.window_rect().size());

        let size = match normalized_distance(state.pointer.value(), item_center, bar_length) {
            Some(x) => hover_size(x, normal, state.hovered_size, state.effect_strength, scale),
            None => normal,
        };

        let thickness = bar_thickness(normal, state.hovered_size, scale);
        let padding = o.cross(host.window_padding());
        let offset = item_cross_offset(thickness, size, state.anchor_cross, padding);
        host.set_cursor_pos(o.cross_axis(), snap(offset, state.snap_items));

        state.commit_item(index, size);
        true
    }

    /// Size of the item placed by the last [`item`](Self::item) call, or
    /// `0.0` when items are skipped.
    pub fn item_width(&self) -> f32 {
        if !self.open || self.host.skip_items() {
            return 0.0;
        }
        self.state.current_item_size
    }

    /// [`item_width`](Self::item_width) relative to the bar's normal size.
    pub fn item_scale(&self) -> f32 {
        if !self.open || self.host.skip_items() {
            return 0.0;
        }
        self.state.current_item_scale
    }

    /// Close the bar now.  Equivalent to dropping the scope.
    pub fn end(self) {}

    /// Once-per-frame update run by [`CoolBars::begin`].
    fn advance(&mut self, config: &BarConfig) {
        let o = self.orientation;
        let state = &mut *self.state;
        let host = &mut *self.host;
        let anchor = config.anchor.clamp(Vec2::ZERO, Vec2::ONE);

        if state.orientation != Some(o) {
            if let Some(previous) = state.orientation {
                debug!("bar switched from {} to {}", previous, o);
                // The stored coordinate belongs to the other axis.
                state.pointer.invalidate();
            }
            state.orientation = Some(o);
        }
        state.anchor_cross = o.cross(anchor);
        state.normal_size = config.normal_size;
        state.hovered_size = config.hovered_size;
        state.effect_strength = config.effect_strength;
        state.snap_items = config.snap_items_to_pixels;
        state.item_cursor = 0;

        let dt_ms = host.delta_time_ms();
        let pointer = host.pointer();

        if host.focus_lost() || pointer.is_none() {
            if !state.pointer.is_reseed_pending() {
                trace!("pointer unavailable, filter will reseed");
            }
            state.pointer.invalidate();
        }
        if let Some(p) = pointer {
            state
                .pointer
                .update(o.main(p), dt_ms, config.mouse_smoothing_ms);
        }

        let hovered = pointer.is_some_and(|p| host.window_rect().contains(p));
        let scale = state
            .hover
            .update(hovered, dt_ms, config.anim_smoothing_ms, config.anim_step);

        let thickness = bar_thickness(config.normal_size, config.hovered_size, scale);
        let pos = bar_window_pos(
            host.viewport(),
            host.content_size(),
            host.window_padding(),
            thickness,
            o,
            anchor,
        );
        host.set_window_pos(snap_vec(pos, config.snap_window_to_pixels));
    }
}

impl<H: Host> Drop for BarScope<'_, H> {
    fn drop(&mut self) {
        self.overrides.restore(&mut *self.host);
        self.host.end_window();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Axis, Rect};
    use crate::sim::{run_frame, SimHost};
    use std::cell::RefCell;

    const LABEL: &str = "dock";

    fn viewport() -> Rect {
        Rect::from_pos_size(Vec2::ZERO, Vec2::new(1000.0, 800.0))
    }

    fn config() -> BarConfig {
        BarConfig {
            anchor: Vec2::new(0.5, 1.0),
            normal_size: 40.0,
            hovered_size: 60.0,
            effect_strength: 0.5,
            snap_window_to_pixels: false,
            ..BarConfig::default()
        }
    }

    fn frame(
        bars: &mut CoolBars,
        host: &mut SimHost,
        orientation: Orientation,
        cfg: &BarConfig,
        items: usize,
    ) -> Vec<f32> {
        run_frame(bars, host, LABEL, orientation, cfg, items)
    }

    //  Recording host

    /// A host double that only records the calls made to it.
    #[derive(Debug, Default)]
    struct RecordingHost {
        log: RefCell<Vec<String>>,
        visible: bool,
        aa: AntiAliasing,
        rounding_depth: usize,
    }

    impl RecordingHost {
        fn visible() -> Self {
            Self {
                visible: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        fn record(&self, call: &str) {
            self.log.borrow_mut().push(call.to_owned());
        }
    }

    impl Host for RecordingHost {
        fn pointer(&self) -> Option<Vec2> {
            None
        }
        fn focus_lost(&self) -> bool {
            false
        }
        fn delta_time_ms(&self) -> f32 {
            16.0
        }
        fn viewport(&self) -> Rect {
            viewport()
        }
        fn begin_window(&mut self, _label: &str, flags: WindowFlags) -> bool {
            assert!(flags.contains(WindowFlags::BAR));
            self.record("begin");
            self.visible
        }
        fn end_window(&mut self) {
            self.record("end");
        }
        fn window_rect(&self) -> Rect {
            Rect::ZERO
        }
        fn content_size(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn window_padding(&self) -> Vec2 {
            Vec2::splat(8.0)
        }
        fn set_window_pos(&mut self, _pos: Vec2) {
            self.record("set_window_pos");
        }
        fn cursor_screen_pos(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn set_cursor_pos(&mut self, axis: Axis, _value: f32) {
            self.record(&format!("set_cursor_{:?}", axis));
        }
        fn same_line(&mut self) {
            self.record("same_line");
        }
        fn skip_items(&self) -> bool {
            !self.visible
        }
        fn antialiasing(&self) -> AntiAliasing {
            self.aa
        }
        fn set_antialiasing(&mut self, aa: AntiAliasing) {
            self.aa = aa;
        }
        fn push_frame_rounding(&mut self, _rounding: f32) {
            self.rounding_depth += 1;
            self.record("push_rounding");
        }
        fn pop_frame_rounding(&mut self) {
            self.rounding_depth -= 1;
            self.record("pop_rounding");
        }
    }

    //  Protocol

    #[test]
    fn begin_and_drop_pair_host_window_calls() {
        let mut bars = CoolBars::new();
        let mut host = RecordingHost::visible();
        let cfg = BarConfig {
            rounding_override: Some(4.0),
            ..config()
        };
        {
            let mut scope = bars.begin(&mut host, LABEL, Orientation::Horizontal, &cfg, WindowFlags::empty());
            assert!(scope.is_open());
            assert!(scope.item());
            assert!(scope.item());
        }
        assert_eq!(
            host.calls(),
            vec![
                "begin",
                "push_rounding",
                "set_window_pos",
                "set_cursor_Y",
                "same_line",
                "set_cursor_Y",
                "pop_rounding",
                "end",
            ]
        );
        assert_eq!(host.rounding_depth, 0);
    }

    #[test]
    fn invisible_bar_still_closes_window_once() {
        let mut bars = CoolBars::new();
        let mut host = RecordingHost::default();
        {
            let mut scope = bars.begin(&mut host, LABEL, Orientation::Vertical, &config(), WindowFlags::empty());
            assert!(!scope.is_open());
            assert!(!scope.item());
            assert_eq!(scope.item_width(), 0.0);
            assert_eq!(scope.item_scale(), 0.0);
        }
        assert_eq!(host.calls(), vec!["begin", "end"]);
        assert_eq!(bars.state(LABEL).unwrap().item_cursor, 0);
    }

    #[test]
    fn open_close_without_items_restores_style() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        let cfg = BarConfig {
            rounding_override: Some(12.0),
            local_antialiasing: true,
            ..config()
        };
        frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 3);
        let sizes_before = bars.state(LABEL).unwrap().item_sizes.clone();
        let aa_before = host.window(LABEL).unwrap().antialiasing;
        let rounding_before = host.frame_rounding();

        bars.begin(&mut host, LABEL, Orientation::Horizontal, &cfg, WindowFlags::empty())
            .end();

        assert_eq!(bars.state(LABEL).unwrap().item_sizes, sizes_before);
        assert_eq!(host.window(LABEL).unwrap().antialiasing, aa_before);
        assert_eq!(host.frame_rounding(), rounding_before);
        assert_eq!(host.rounding_depth(), 0);
        assert_eq!(host.open_windows(), 0);
    }

    #[test]
    fn antialiasing_is_forced_only_while_open() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        {
            let scope = bars.begin(&mut host, LABEL, Orientation::Horizontal, &config(), WindowFlags::empty());
            assert_eq!(scope.host.antialiasing(), AntiAliasing::ALL);
        }
        assert_eq!(host.window(LABEL).unwrap().antialiasing, AntiAliasing::default());
    }

    #[test]
    #[should_panic(expected = "normal_size must be positive")]
    fn zero_normal_size_is_fatal() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        let cfg = BarConfig {
            normal_size: 0.0,
            ..config()
        };
        let _scope = bars.begin(&mut host, LABEL, Orientation::Horizontal, &cfg, WindowFlags::empty());
    }

    #[test]
    fn item_cursor_resets_every_frame() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 4);
        assert_eq!(bars.state(LABEL).unwrap().item_cursor, 4);
        frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 2);
        assert_eq!(bars.state(LABEL).unwrap().item_cursor, 2);
        assert_eq!(bars.state(LABEL).unwrap().item_sizes.len(), 4);
    }

    //  Animation

    #[test]
    fn untouched_bar_keeps_normal_sizes() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        for _ in 0..5 {
            let sizes = frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 3);
            assert_eq!(sizes, vec![40.0; 3]);
        }
        assert_eq!(bars.state(LABEL).unwrap().hover_scale(), 0.0);
    }

    #[test]
    fn pointer_on_item_center_reaches_hovered_size() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        let cfg = BarConfig {
            mouse_smoothing_ms: 0.0,
            anim_smoothing_ms: 0.0,
            anim_step: 1.0,
            ..config()
        };
        // Settle the layout at rest.
        for _ in 0..3 {
            frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 3);
        }
        let middle = host.drawn_items(LABEL)[1];
        host.set_pointer(Some(middle.center()));

        let sizes = frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 3);
        assert_eq!(bars.state(LABEL).unwrap().hover_scale(), 1.0);
        // The first item grows too and pushes the middle one slightly off
        // the pointer, so the peak lands just under the hovered size.
        assert!(sizes[1] > 59.0 && sizes[1] <= 60.0, "sizes: {sizes:?}");
        assert!(sizes[0] > 40.0 && sizes[0] < sizes[1], "sizes: {sizes:?}");
        assert!(sizes[2] >= 40.0 && sizes[2] < sizes[1], "sizes: {sizes:?}");
    }

    #[test]
    fn item_scale_is_size_over_normal() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        let cfg = BarConfig {
            mouse_smoothing_ms: 0.0,
            anim_smoothing_ms: 0.0,
            anim_step: 1.0,
            ..config()
        };
        for _ in 0..3 {
            frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 1);
        }
        let only = host.drawn_items(LABEL)[0];
        host.set_pointer(Some(only.center()));

        let mut scope = bars.begin(&mut host, LABEL, Orientation::Horizontal, &cfg, WindowFlags::empty());
        assert!(scope.item());
        assert!((scope.item_width() - 60.0).abs() < 1e-3);
        assert!((scope.item_scale() - 1.5).abs() < 1e-4);
    }

    #[test]
    fn hover_scale_decays_monotonically_outside_bar() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        host.set_delta_time_ms(16.6);
        let cfg = BarConfig {
            anim_smoothing_ms: 50.0,
            ..config()
        };
        for _ in 0..3 {
            frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 3);
        }
        let inside = host.window(LABEL).unwrap().rect().center();
        host.set_pointer(Some(inside));
        for _ in 0..60 {
            frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 3);
        }
        let mut prev = bars.state(LABEL).unwrap().hover_scale();
        assert!(prev > 0.9);

        host.set_pointer(Some(Vec2::new(5.0, 5.0)));
        for _ in 0..120 {
            frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 3);
            let s = bars.state(LABEL).unwrap().hover_scale();
            assert!(s <= prev && s >= 0.0);
            prev = s;
        }
        assert!(prev < 1e-3);
    }

    #[test]
    fn pass_through_pointer_matches_raw() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        let cfg = BarConfig {
            mouse_smoothing_ms: 0.0,
            ..config()
        };
        for x in [100.0, 350.0, 20.0, 990.0] {
            host.set_pointer(Some(Vec2::new(x, 700.0)));
            frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 2);
            assert_eq!(bars.state(LABEL).unwrap().pointer.value(), x);
        }
    }

    #[test]
    fn lost_pointer_reseeds_on_next_sample() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        host.set_pointer(Some(Vec2::new(100.0, 700.0)));
        frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 2);
        host.set_pointer(Some(Vec2::new(200.0, 700.0)));
        frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 2);
        let blended = bars.state(LABEL).unwrap().pointer.value();
        assert!(blended > 100.0 && blended < 200.0);

        host.set_pointer(None);
        frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 2);
        assert!(bars.state(LABEL).unwrap().pointer.is_reseed_pending());

        host.set_pointer(Some(Vec2::new(640.0, 700.0)));
        frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 2);
        let state = bars.state(LABEL).unwrap();
        assert_eq!(state.pointer.value(), 640.0);
        assert!(!state.pointer.is_reseed_pending());
    }

    #[test]
    fn focus_loss_reseeds_with_current_sample() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        host.set_pointer(Some(Vec2::new(100.0, 700.0)));
        frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 1);
        host.set_pointer(Some(Vec2::new(500.0, 700.0)));
        host.set_focus_lost(true);
        frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 1);
        assert_eq!(bars.state(LABEL).unwrap().pointer.value(), 500.0);
    }

    //  Layout

    #[test]
    fn window_is_anchored_bottom_center() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        for _ in 0..3 {
            frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 3);
        }
        let rect = host.window(LABEL).unwrap().rect();
        assert!((rect.max.y - 800.0).abs() < 1e-3, "rect: {rect:?}");
        assert!((rect.center().x - 500.0).abs() < 1e-3, "rect: {rect:?}");
        // Thickness at rest plus padding on both sides.
        assert!((rect.size().y - (40.0 + 2.0 * host.padding().y)).abs() < 1e-3);
    }

    #[test]
    fn toggling_orientation_swaps_axes() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        let pad = host.padding();
        for _ in 0..3 {
            frame(&mut bars, &mut host, Orientation::Horizontal, &config(), 3);
        }
        let rect = host.window(LABEL).unwrap().rect();
        assert!(rect.size().x > rect.size().y);

        let vertical = BarConfig {
            anchor: Vec2::new(0.0, 0.5),
            ..config()
        };
        for _ in 0..3 {
            let sizes = frame(&mut bars, &mut host, Orientation::Vertical, &vertical, 3);
            assert_eq!(sizes.len(), 3);
        }
        let rect = host.window(LABEL).unwrap().rect();
        assert!(rect.size().y > rect.size().x);
        assert!((rect.size().x - (40.0 + 2.0 * pad.x)).abs() < 1e-3);
        assert_eq!(rect.min.x, 0.0);
        assert_eq!(
            bars.state(LABEL).unwrap().orientation,
            Some(Orientation::Vertical)
        );
    }

    #[test]
    fn items_are_anchored_to_bar_edge() {
        let mut bars = CoolBars::new();
        let mut host = SimHost::new(viewport());
        let cfg = BarConfig {
            mouse_smoothing_ms: 0.0,
            anim_smoothing_ms: 0.0,
            anim_step: 1.0,
            ..config()
        };
        for _ in 0..3 {
            frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 3);
        }
        let first = host.drawn_items(LABEL)[0];
        host.set_pointer(Some(first.center()));
        frame(&mut bars, &mut host, Orientation::Horizontal, &cfg, 3);

        // Anchor y = 1: every item's bottom sits on the same line.
        let bottoms: Vec<f32> = host.drawn_items(LABEL).iter().map(|r| r.max.y).collect();
        for b in &bottoms {
            assert!((b - bottoms[0]).abs() < 1e-3, "bottoms: {bottoms:?}");
        }
    }
}
