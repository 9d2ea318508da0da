#![forbid(unsafe_code)]

//! Easing curves for cursor motion.
//!
//! Every curve is a pure function of the elapsed fraction: `f(0) = 0`,
//! `f(1) = 1`, monotonic non-decreasing in between, and inputs outside
//! `[0, 1]` are clamped. Curves never look at frame counts, so cursor motion
//! is identical at every playback speed.

/// Signature shared by all easing curves.
pub type EasingFn = fn(f64) -> f64;

#[inline]
fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Identity curve.
pub fn linear(t: f64) -> f64 {
    clamp_unit(t)
}

/// Quadratic ease-in.
pub fn ease_in(t: f64) -> f64 {
    let t = clamp_unit(t);
    t * t
}

/// Quadratic ease-out.
pub fn ease_out(t: f64) -> f64 {
    let t = clamp_unit(t);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
pub fn ease_in_out(t: f64) -> f64 {
    let t = clamp_unit(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out; snappy arrival used for pointer moves.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = clamp_unit(t);
    1.0 - (1.0 - t).powi(3)
}

/// Named easing curve, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    EaseOutCubic,
}

impl Easing {
    /// The curve function for this variant.
    pub const fn function(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
            Self::EaseOutCubic => ease_out_cubic,
        }
    }

    /// Evaluate the curve.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        (self.function())(t)
    }
}
