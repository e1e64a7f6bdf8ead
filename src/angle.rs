//! Periodic-angle primitives.
//!
//! Azimuths are always compared after folding into \([0, 2\pi)\). Folding uses a Euclidean
//! remainder, so arbitrarily large inputs cost O(1) and never recurse.

use core::f64::consts::{PI, TAU};
use ndarray::{Array1, ArrayView1};

/// Fold `x` into \([0, 2\pi)\).
///
/// Non-finite inputs propagate as NaN.
#[inline]
pub fn normalize_angle(x: f64) -> f64 {
    let r = x.rem_euclid(TAU);
    // Tiny negative inputs can round up to exactly 2π.
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Element-wise [`normalize_angle`]; order and length are preserved.
pub fn normalize_angles(xs: &ArrayView1<f64>) -> Array1<f64> {
    xs.mapv(normalize_angle)
}

/// Minimal angular separation \(\pi - |\pi - |a - b||\), in \([0, \pi]\).
#[inline]
pub fn periodic_distance(a: f64, b: f64) -> f64 {
    let d = (normalize_angle(a) - normalize_angle(b)).abs();
    PI - (PI - d).abs()
}
