//! GTK4 + layer-shell dock that runs on the **main thread**.
//!
//! The dock is a single `DrawingArea` in a transparent layer-shell surface
//! anchored to the bottom edge of the screen.  Layout is not done by GTK:
//! every tick runs one frame of the bar engine on a [`SimHost`] whose
//! viewport is the drawing area, then paints the resulting rects with cairo.
//!
//! ```text
//! window                  (layer-shell, transparent, bottom edge)
//! └ DrawingArea           (viewport of the SimHost)
//!     ├ bar background    (window rect, rounded)
//!     └ items             (one rounded square per item)
//! ```

use crate::bar::CoolBars;
use crate::config::Config;
use crate::geometry::Rect;
use crate::sim::{run_frame, SimHost};
use glam::Vec2;
use gtk4::prelude::*;
use gtk4::{cairo, gdk, glib};
use gtk4_layer_shell::LayerShell;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const BAR_LABEL: &str = "dock";

const WINDOW_CSS: &str = r#"
window,
window.background {
    background-color: transparent;
    background: none;
}
"#;

const BAR_RGBA: (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 0.6);
const ITEM_RGBA: (f64, f64, f64, f64) = (1.0, 1.0, 1.0, 0.85);
const BAR_ROUNDING: f64 = 14.0;

/// Everything the tick and draw callbacks share.
struct DockState {
    host: SimHost,
    bars: CoolBars,
    config: Config,
    last_tick: Instant,
}

impl DockState {
    fn tick(&mut self, size: Vec2) {
        let now = Instant::now();
        let dt_ms = now.duration_since(self.last_tick).as_secs_f32() * 1000.0;
        self.last_tick = now;

        self.host.set_delta_time_ms(dt_ms);
        self.host.set_viewport(Rect::from_pos_size(Vec2::ZERO, size));
        run_frame(
            &mut self.bars,
            &mut self.host,
            BAR_LABEL,
            self.config.orientation,
            &self.config.bar,
            self.config.items,
        );
    }

    fn draw(&self, cr: &cairo::Context) {
        let Some(window) = self.host.window(BAR_LABEL) else {
            return;
        };
        let item_rounding = self
            .config
            .bar
            .rounding_override
            .unwrap_or_else(|| self.host.frame_rounding()) as f64;

        rounded_rect(cr, window.rect(), BAR_ROUNDING);
        fill(cr, BAR_RGBA);
        for item in self.host.drawn_items(BAR_LABEL) {
            rounded_rect(cr, *item, item_rounding);
            fill(cr, ITEM_RGBA);
        }
    }
}

//  Cairo helpers

fn rounded_rect(cr: &cairo::Context, rect: Rect, radius: f64) {
    let (x, y) = (rect.min.x as f64, rect.min.y as f64);
    let size = rect.size();
    let (w, h) = (size.x as f64, size.y as f64);
    let r = radius.clamp(0.0, w.min(h) / 2.0);
    let quarter = std::f64::consts::FRAC_PI_2;

    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -quarter, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, quarter);
    cr.arc(x + r, y + h - r, r, quarter, 2.0 * quarter);
    cr.arc(x + r, y + r, r, 2.0 * quarter, 3.0 * quarter);
    cr.close_path();
}

fn fill(cr: &cairo::Context, (r, g, b, a): (f64, f64, f64, f64)) {
    cr.set_source_rgba(r, g, b, a);
    if let Err(e) = cr.fill() {
        warn!("cairo fill failed: {}", e);
    }
}

//  Public API

/// Run the dock on the **current** (main) thread until the GLib main loop
/// exits.
pub fn run_dock(config: Config) -> Result<(), glib::BoolError> {
    gtk4::init()?;
    info!("GTK4 initialised on main thread");

    load_css();

    //  Layer-shell dock window
    let window = gtk4::Window::new();
    window.init_layer_shell();
    window.set_layer(gtk4_layer_shell::Layer::Top);
    window.set_namespace("coolbar");
    window.set_anchor(gtk4_layer_shell::Edge::Bottom, true);
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::None);
    window.set_decorated(false);
    window.remove_css_class("background");

    let area = gtk4::DrawingArea::new();
    area.set_content_width(config.dock.width);
    area.set_content_height(config.dock.height);
    window.set_child(Some(&area));

    info!(
        "dock {}x{}: {} {} items, sizes {} -> {}",
        config.dock.width,
        config.dock.height,
        config.items,
        config.orientation,
        config.bar.normal_size,
        config.bar.hovered_size,
    );

    let state = Rc::new(RefCell::new(DockState {
        host: SimHost::new(Rect::ZERO),
        bars: CoolBars::new(),
        config,
        last_tick: Instant::now(),
    }));

    //  Pointer input
    let motion = gtk4::EventControllerMotion::new();
    {
        let state = Rc::clone(&state);
        motion.connect_motion(move |_, x, y| {
            state
                .borrow_mut()
                .host
                .set_pointer(Some(Vec2::new(x as f32, y as f32)));
        });
    }
    {
        let state = Rc::clone(&state);
        motion.connect_leave(move |_| {
            debug!("pointer left the dock");
            state.borrow_mut().host.set_pointer(None);
        });
    }
    area.add_controller(motion);

    //  Drawing
    {
        let state = Rc::clone(&state);
        area.set_draw_func(move |_, cr, _, _| {
            state.borrow().draw(cr);
        });
    }

    window.present();

    //  Frame loop (~60 fps)
    {
        let area = area.clone();
        glib::timeout_add_local(Duration::from_millis(16), move || {
            let size = Vec2::new(area.width() as f32, area.height() as f32);
            state.borrow_mut().tick(size);
            area.queue_draw();
            glib::ControlFlow::Continue
        });
    }

    info!("entering GLib main loop");
    let main_loop = glib::MainLoop::new(None, false);
    main_loop.run();
    info!("GLib main loop exited");
    Ok(())
}

//  CSS loading

fn load_css() {
    let provider = gtk4::CssProvider::new();
    #[allow(deprecated)]
    provider.load_from_data(WINDOW_CSS);

    if let Some(display) = gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        warn!("no GDK display, window background stays opaque");
    }
}
