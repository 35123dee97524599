//! Time-based exponential smoothing.
//!
//! Both animated channels of a bar run through the same primitive: an
//! exponential moving average whose per-frame blend factor is derived from a
//! half-life in milliseconds and the frame's elapsed time,
//!
//! ```text
//! alpha = 1 - exp(-ln 2 * dt_ms / half_life_ms)
//! ```
//!
//! so that the filtered value covers half the remaining distance to its
//! target every `half_life_ms`, independent of frame rate.
//!
//! * [`PointerFilter`] smooths the pointer's main-axis coordinate and knows
//!   how to re-seed itself after the pointer became invalid.
//! * [`HoverRamp`] drives the bar's aggregate hover scale toward `1.0`
//!   (hovered) or `0.0` (not hovered), either by EMA or by a fixed step.

use std::f32::consts::LN_2;

/// Upper bound for a single frame's elapsed time.
///
/// A stalled frame would otherwise produce an `alpha` close to `1.0` and make
/// the animation jump.
pub const MAX_FRAME_DT_MS: f32 = 100.0;

/// Clamp a frame delta to `[0, MAX_FRAME_DT_MS]`.
pub fn clamp_frame_dt(dt_ms: f32) -> f32 {
    if dt_ms.is_nan() {
        return 0.0;
    }
    dt_ms.clamp(0.0, MAX_FRAME_DT_MS)
}

/// EMA blend factor for a frame of `dt_ms` given a half-life.
///
/// A non-positive half-life disables smoothing and yields `1.0`.  The frame
/// delta is clamped with [`clamp_frame_dt`] first.
pub fn ema_alpha(dt_ms: f32, half_life_ms: f32) -> f32 {
    if half_life_ms <= 0.0 {
        return 1.0;
    }
    let dt_ms = clamp_frame_dt(dt_ms);
    (1.0 - (-LN_2 * (dt_ms / half_life_ms)).exp()).clamp(0.0, 1.0)
}

/// One EMA step from `current` toward `sample`.
pub fn ema_step(current: f32, sample: f32, alpha: f32) -> f32 {
    current + alpha * (sample - current)
}

//  Pointer filter

/// Exponential smoother for the pointer's main-axis coordinate.
///
/// The filter is *not* reset when the pointer leaves the bar:
/// motion across the hover boundary stays continuous.  It is only re-seeded
/// after [`invalidate`](Self::invalidate), which the frame controller calls
/// when the host reports no valid pointer position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerFilter {
    value: f32,
    initialized: bool,
    reseed_pending: bool,
    alpha: f32,
    half_life_ms: f32,
}

impl PointerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the current value as stale.  The next sample seeds the filter.
    pub fn invalidate(&mut self) {
        self.initialized = false;
        self.reseed_pending = true;
    }

    /// Feed a raw sample and return the filtered value.
    ///
    /// * `half_life_ms <= 0`: pass-through, the sample is returned verbatim
    ///   and becomes the new seed.
    /// * first sample, or first sample after [`invalidate`](Self::invalidate):
    ///   the filter is reset to the sample exactly.
    /// * otherwise: one EMA step.
    pub fn update(&mut self, sample: f32, dt_ms: f32, half_life_ms: f32) -> f32 {
        self.half_life_ms = half_life_ms;
        self.alpha = ema_alpha(dt_ms, half_life_ms);

        if half_life_ms <= 0.0 || self.needs_seed() {
            self.seed(sample);
        } else {
            self.value = ema_step(self.value, sample, self.alpha);
        }
        self.value
    }

    fn seed(&mut self, sample: f32) {
        self.value = sample;
        self.initialized = true;
        self.reseed_pending = false;
    }

    /// Whether the next sample will seed rather than blend.
    pub fn needs_seed(&self) -> bool {
        !self.initialized || self.reseed_pending
    }

    /// Last filtered value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Blend factor used by the last [`update`](Self::update).
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Half-life used by the last [`update`](Self::update).
    pub fn half_life_ms(&self) -> f32 {
        self.half_life_ms
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_reseed_pending(&self) -> bool {
        self.reseed_pending
    }
}

//  Hover ramp

/// Aggregate "how expanded is the bar" value in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverRamp {
    scale: f32,
    alpha: f32,
    half_life_ms: f32,
}

impl HoverRamp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame toward `1.0` when `hovered`, `0.0` otherwise.
    ///
    /// With a positive half-life the scale follows an EMA; otherwise it moves
    /// by `step` per frame.  The result is always clamped to `[0, 1]`.
    pub fn update(&mut self, hovered: bool, dt_ms: f32, half_life_ms: f32, step: f32) -> f32 {
        let target = if hovered { 1.0 } else { 0.0 };
        self.half_life_ms = half_life_ms;
        self.alpha = ema_alpha(dt_ms, half_life_ms);

        let next = if half_life_ms > 0.0 {
            ema_step(self.scale, target, self.alpha)
        } else if hovered {
            (self.scale + step).min(1.0)
        } else {
            (self.scale - step).max(0.0)
        };
        self.scale = next.clamp(0.0, 1.0);
        self.scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Blend factor used by the last update (`1.0` in step mode).
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn half_life_ms(&self) -> f32 {
        self.half_life_ms
    }
}
