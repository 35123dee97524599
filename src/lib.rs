//! **coolbar**: an animated magnifying-dock item strip for immediate-mode
//! GUIs.
//!
//! A *cool bar* is a horizontal or vertical window of items that grow as the
//! pointer approaches them, like the dock of a desktop environment.  The bar
//! itself grows along its cross axis while hovered and is anchored to a
//! configurable point of the viewport.  Sizes are recomputed every frame
//! from a smoothed pointer position and a smoothed hover scale, so the
//! effect is frame-rate independent.
//!
//! # Architecture
//!
//! The crate is organised around one trait:
//!
//! * [`traits::Host`]: abstracts the immediate-mode GUI the bar is drawn
//!   in (pointer, frame time, window placement, layout cursor, style
//!   stack), so the sizing logic is not coupled to any specific toolkit.
//!
//! [`bar::CoolBars`] is the entry point: it owns the per-bar state and opens
//! a bar for one frame, returning an RAII [`bar::BarScope`] that places the
//! items.  [`sim::SimHost`] is an in-memory host used by the `coolbar`
//! binary's headless simulation, the optional GTK dock in [`visualizer`],
//! and the tests.

pub mod bar;
pub mod config;
pub mod effect;
pub mod geometry;
pub mod metrics;
pub mod sim;
pub mod smoothing;
pub mod state;
pub mod traits;
pub mod visualizer;

pub use bar::{BarScope, CoolBars};
pub use config::BarConfig;
pub use geometry::Orientation;
pub use traits::{Host, WindowFlags};
