//! Ring (1D azimuthal) reference events.

use crate::{Error, Result};
use core::f64::consts::TAU;
use ndarray::Array1;

/// Largest point set any generator will build (16M points).
pub const MAX_POINTS: usize = 1 << 24;

pub(crate) fn check_segments(segments: usize) -> Result<()> {
    if segments == 0 {
        return Err(Error::InvalidParameter("segment count must be positive"));
    }
    if segments > MAX_POINTS {
        return Err(Error::InvalidParameter("segment count exceeds MAX_POINTS"));
    }
    Ok(())
}

/// Draw one orientation offset in \([0, 2\pi / n)\).
pub(crate) fn random_offset(segments: usize, rng: &mut impl rand::Rng) -> f64 {
    let step = TAU / segments as f64;
    let u: f64 = rng.random();
    u * step
}

/// `segments` equally spaced azimuths offset by half a step: \(2\pi(j + \tfrac12)/n\).
pub fn ring_points(segments: usize) -> Result<Array1<f64>> {
    check_segments(segments)?;
    let n = segments as f64;
    Ok(Array1::from_shape_fn(segments, |j| TAU * (j as f64 + 0.5) / n))
}

/// A uniformly spaced ring at a random orientation: \(2\pi j/n + s\), one \(s \sim U[0, 2\pi/n)\).
///
/// Spacing is identical to [`ring_points`]; only the rotation differs.
pub fn ring_points_shifted(segments: usize, rng: &mut impl rand::Rng) -> Result<Array1<f64>> {
    check_segments(segments)?;
    let shift = random_offset(segments, rng);
    let n = segments as f64;
    Ok(Array1::from_shape_fn(segments, |j| TAU * j as f64 / n + shift))
}
