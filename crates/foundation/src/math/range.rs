//! Scalar range helpers.
//!
//! These mirror the usual creative-coding `map()`: linear and unclamped, so
//! inputs outside the source range extrapolate.

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Re-map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// A degenerate source range maps everything to `out_min`.
#[inline]
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    lerp(out_min, out_max, (value - in_min) / span)
}
