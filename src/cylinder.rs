//! Cylindrical (eta-phi grid) reference events.
//!
//! Points are rows `[eta, phi]` of an `n × 2` array, ordered phi-major: all rapidities of the
//! first azimuth, then all rapidities of the second, and so on.

use crate::ring::{check_segments, random_offset, MAX_POINTS};
use crate::{Error, Result};
use core::f64::consts::{PI, TAU};
use ndarray::Array2;

/// Number of rapidity slices for a grid with `phi_segments` azimuths up to `eta_max`.
///
/// Chosen so the grid spacing is roughly equal along both axes. Saturates at `usize::MAX`.
pub fn eta_segments(phi_segments: usize, eta_max: f64) -> usize {
    (eta_max * phi_segments as f64 / PI).floor() as usize
}

fn grid(phi_segments: usize, eta_max: f64, phi_of: impl Fn(usize) -> f64) -> Result<Array2<f64>> {
    check_segments(phi_segments)?;
    if !eta_max.is_finite() || eta_max <= 0.0 {
        return Err(Error::InvalidParameter("eta_max must be positive and finite"));
    }
    let n_eta = eta_segments(phi_segments, eta_max);
    if n_eta == 0 {
        return Err(Error::InvalidParameter(
            "eta_max * phi_segments / pi must be >= 1 (empty rapidity grid)",
        ));
    }

    let n_points = phi_segments
        .checked_mul(n_eta)
        .filter(|&n| n <= MAX_POINTS)
        .ok_or(Error::InvalidParameter("cylinder grid exceeds MAX_POINTS"))?;

    let mut out = Array2::<f64>::zeros((n_points, 2));
    for j in 0..phi_segments {
        let phi = phi_of(j);
        for i in 0..n_eta {
            let row = j * n_eta + i;
            out[[row, 0]] = -eta_max + 2.0 * eta_max * (i as f64 + 0.5) / n_eta as f64;
            out[[row, 1]] = phi;
        }
    }
    log::debug!("cylinder grid: {phi_segments} phi x {n_eta} eta (eta_max={eta_max})");
    Ok(out)
}

/// Uniform eta-phi grid with half-step offsets along both axes.
pub fn cylinder_points(phi_segments: usize, eta_max: f64) -> Result<Array2<f64>> {
    let n = phi_segments as f64;
    grid(phi_segments, eta_max, |j| TAU * (j as f64 + 0.5) / n)
}

/// Like [`cylinder_points`], but the azimuths are rotated by one random offset in
/// \([0, 2\pi/n)\) and carry no half-step.
pub fn cylinder_points_shifted(
    phi_segments: usize,
    eta_max: f64,
    rng: &mut impl rand::Rng,
) -> Result<Array2<f64>> {
    check_segments(phi_segments)?;
    let shift = random_offset(phi_segments, rng);
    let n = phi_segments as f64;
    grid(phi_segments, eta_max, |j| TAU * j as f64 / n + shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn oversized_grids_are_rejected() {
        assert!(matches!(
            cylinder_points(1_000_000, 1e300),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            cylinder_points(usize::MAX, 1e300),
            Err(Error::InvalidParameter(_))
        ));
        // 4096 azimuths x 4097 rapidities is one row past MAX_POINTS.
        let eta_max = 4097.5 * PI / 4096.0;
        assert_eq!(eta_segments(4096, eta_max), 4097);
        assert!(cylinder_points(4096, eta_max).is_err());
    }

    #[test]
    fn four_by_two_grid() {
        assert_eq!(eta_segments(4, 2.0), 2);
        let c = cylinder_points(4, 2.0).unwrap();
        assert_eq!(c.dim(), (8, 2));

        // phi-major: first two rows share the first azimuth.
        assert!((c[[0, 1]] - PI / 4.0).abs() < 1e-12);
        assert!((c[[1, 1]] - PI / 4.0).abs() < 1e-12);
        assert!((c[[2, 1]] - 3.0 * PI / 4.0).abs() < 1e-12);
        assert!((c[[0, 0]] + 1.0).abs() < 1e-12);
        assert!((c[[1, 0]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rapidities_stay_inside_the_bound() {
        let c = cylinder_points(16, 2.5).unwrap();
        assert_eq!(c.nrows(), 16 * eta_segments(16, 2.5));
        assert!(c.column(0).iter().all(|&y| y > -2.5 && y < 2.5));
        let mean: f64 = c.column(0).sum() / c.nrows() as f64;
        assert!(mean.abs() < 1e-12);
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        assert!(matches!(cylinder_points(0, 2.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(cylinder_points(4, 0.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(cylinder_points(4, -1.0), Err(Error::InvalidParameter(_))));
        assert!(matches!(cylinder_points(4, f64::NAN), Err(Error::InvalidParameter(_))));
        // 0.5 * 4 / pi < 1: no rapidity slices.
        assert!(matches!(cylinder_points(4, 0.5), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn shifted_cylinder_has_same_shape_and_rapidities() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let base = cylinder_points(8, 2.0).unwrap();
        let shifted = cylinder_points_shifted(8, 2.0, &mut rng).unwrap();
        assert_eq!(base.dim(), shifted.dim());
        assert_eq!(base.column(0), shifted.column(0));
        assert!(shifted[[0, 1]] >= 0.0 && shifted[[0, 1]] < TAU / 8.0);
    }
}
