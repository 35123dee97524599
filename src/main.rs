//! Entry point of the **coolbar** demo.
//!
//! * `--simulate` runs a scripted pointer sweep over a headless bar and
//!   prints one JSON object per frame on stdout, followed by the bar's
//!   metrics on the log.
//! * `--dock` shows an interactive dock in a layer-shell surface.  Requires
//!   the `dock-gtk` feature.
//! * `--config <path>` loads a configuration file instead of
//!   `$XDG_CONFIG_HOME/coolbar/config.json`.
//!
//! Without a mode flag the dock runs when the `dock-gtk` feature is enabled
//! and the simulation runs otherwise.

use coolbar::config::Config;
use coolbar::sim::simulate;
use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};

const SIM_LABEL: &str = "sim";

/// Resolve the config directory (`$XDG_CONFIG_HOME/coolbar`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("coolbar")
}

/// Load the config from `explicit` if given, otherwise from the config
/// directory, falling back to compiled-in defaults.
///
/// An explicitly requested file that cannot be loaded is fatal.
fn load_config(explicit: Option<&Path>) -> Config {
    if let Some(path) = explicit {
        return match Config::load(path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };
    }

    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Simulate,
    Dock,
}

fn main() {
    env_logger::init();

    let mut mode = None;
    let mut config_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--simulate" => mode = Some(Mode::Simulate),
            "--dock" => mode = Some(Mode::Dock),
            "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => {
                    error!("--config requires a path");
                    std::process::exit(2);
                }
            },
            other => {
                error!("unknown argument {:?}", other);
                std::process::exit(2);
            }
        }
    }

    let default_mode = if cfg!(feature = "dock-gtk") {
        Mode::Dock
    } else {
        Mode::Simulate
    };
    let config = load_config(config_path.as_deref());

    match mode.unwrap_or(default_mode) {
        Mode::Simulate => run_simulation(&config),
        Mode::Dock => run_dock(config),
    }
}

/// Headless sweep: frame records as JSON lines on stdout.
fn run_simulation(config: &Config) {
    info!(
        "simulating {} frames of a {} bar with {} items",
        config.simulation.frames, config.orientation, config.items
    );
    let records = simulate(config, SIM_LABEL);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                error!("failed to serialize frame {}: {}", record.frame, e);
                std::process::exit(1);
            }
        };
        if let Err(e) = writeln!(out, "{}", line) {
            error!("failed to write frame {}: {}", record.frame, e);
            std::process::exit(1);
        }
    }

    if let Some(last) = records.last() {
        info!(
            "final frame: hover scale {:.3}, window {:?}",
            last.hover_scale, last.window
        );
    }
}

/// Interactive GTK dock.
fn run_dock(config: Config) {
    #[cfg(not(feature = "dock-gtk"))]
    {
        let _ = config;
        error!("--dock requires the `dock-gtk` feature");
        std::process::exit(1);
    }

    #[cfg(feature = "dock-gtk")]
    {
        if let Err(e) = coolbar::visualizer::gtk::run_dock(config) {
            error!("failed to start the dock: {}", e);
            std::process::exit(1);
        }
    }
}
