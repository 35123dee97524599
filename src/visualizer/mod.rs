//! Interactive front-ends for the bar engine.
//!
//! When the `dock-gtk` feature is enabled, [`gtk::run_dock`] takes over the
//! main thread and shows a magnifying dock in a layer-shell surface, driven
//! by the real pointer.

#[cfg(feature = "dock-gtk")]
pub mod gtk;
