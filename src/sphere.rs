//! Spherical reference events from the equal-area tiling.
//!
//! All point sets are `n × 3` arrays of unit vectors.

use crate::healpix::{HealpixRing, SphereTiling};
use crate::kinematics::pseudorapidity;
use crate::ring::MAX_POINTS;
use crate::{Error, Result};
use core::f64::consts::{PI, TAU};
use ndarray::{Array1, Array2};
use rand_distr::{Distribution, StandardNormal};

/// Pixel count of `level`, refusing tilings above [`MAX_POINTS`] (levels above 10).
fn point_count(t: &impl SphereTiling, level: u32) -> Result<u64> {
    let n = t.pixel_count(level)?;
    if n > MAX_POINTS as u64 {
        return Err(Error::InvalidParameter("sphere level too fine: tiling exceeds MAX_POINTS"));
    }
    Ok(n)
}

fn tiling(level: u32) -> Result<Vec<[f64; 3]>> {
    let t = HealpixRing;
    let n = point_count(&t, level)?;
    let mut out = Vec::with_capacity(n as usize);
    for p in 0..n {
        out.push(t.pixel_to_vector(level, p)?);
    }
    Ok(out)
}

fn to_array(points: &[[f64; 3]]) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), 3), |(i, k)| points[i][k])
}

/// All `12 · 4^level` pixel centres; with `eta_cut`, only those with \(|\eta| <\) `eta_cut`.
pub fn sphere_points(level: u32, eta_cut: Option<f64>) -> Result<Array2<f64>> {
    if let Some(cut) = eta_cut {
        if !(cut >= 0.0) {
            return Err(Error::InvalidParameter("eta cut must be non-negative"));
        }
    }
    let mut pts = tiling(level)?;
    if let Some(cut) = eta_cut {
        pts.retain(|v| pseudorapidity(v[0], v[1], v[2]).abs() < cut);
    }
    log::debug!("sphere level {level}: {} points", pts.len());
    Ok(to_array(&pts))
}

/// Polar-angle-only projection of the tiling onto the x–z half-planes:
/// `(sinθ, 0, cosθ)` for \(\phi > \pi\), `(−sinθ, 0, cosθ)` otherwise.
pub fn sphere_theta_points(level: u32) -> Result<Array2<f64>> {
    let t = HealpixRing;
    let n = point_count(&t, level)?;
    let mut pts = Vec::with_capacity(n as usize);
    for p in 0..n {
        let (theta, phi) = t.pixel_to_angles(level, p)?;
        let x = if phi > PI { theta.sin() } else { -theta.sin() };
        pts.push([x, 0.0, theta.cos()]);
    }
    Ok(to_array(&pts))
}

/// An isotropically distributed unit vector (normalized standard-normal triple).
pub fn random_unit_vector(rng: &mut impl rand::Rng) -> [f64; 3] {
    loop {
        let v: [f64; 3] = [
            StandardNormal.sample(rng),
            StandardNormal.sample(rng),
            StandardNormal.sample(rng),
        ];
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if norm > 1e-12 {
            return [v[0] / norm, v[1] / norm, v[2] / norm];
        }
    }
}

/// Rotation by `angle` about the unit `axis` (Rodrigues' formula), row-major.
pub fn rotation_matrix(axis: [f64; 3], angle: f64) -> [[f64; 3]; 3] {
    let [ux, uy, uz] = axis;
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    [
        [ux * ux * t + c, ux * uy * t - uz * s, ux * uz * t + uy * s],
        [ux * uy * t + uz * s, uy * uy * t + c, uy * uz * t - ux * s],
        [ux * uz * t - uy * s, uy * uz * t + ux * s, uz * uz * t + c],
    ]
}

fn rotate(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (i, row) in m.iter().enumerate() {
        out[i] = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
    }
    out
}

/// A dijet on top of a randomly oriented sphere tiling.
#[derive(Debug, Clone)]
pub struct DijetSphere {
    /// Rows 0 and 1 are the jets `(1,0,0)` and `(−1,0,0)`; the rest is the rotated tiling.
    pub points: Array2<f64>,
    /// Sums to 1; the two jets share `dijet_fraction`.
    pub weights: Array1<f64>,
}

/// Two antipodal jets plus the full tiling rotated by a random angle about a random axis.
///
/// The jets carry `dijet_fraction` of the total weight (half each); the sphere points share the
/// rest equally.
pub fn sphere_with_dijet_points(
    level: u32,
    dijet_fraction: f64,
    rng: &mut impl rand::Rng,
) -> Result<DijetSphere> {
    if !(0.0..=1.0).contains(&dijet_fraction) {
        return Err(Error::InvalidParameter("dijet fraction must be in [0, 1]"));
    }
    let sphere = tiling(level)?;

    let axis = random_unit_vector(rng);
    let u: f64 = rng.random();
    let rot = rotation_matrix(axis, u * TAU);

    let mut pts = Vec::with_capacity(sphere.len() + 2);
    pts.push([1.0, 0.0, 0.0]);
    pts.push([-1.0, 0.0, 0.0]);
    pts.extend(sphere.iter().map(|&v| rotate(&rot, v)));

    let n_sphere = sphere.len() as f64;
    let weights = Array1::from_shape_fn(pts.len(), |i| {
        if i < 2 {
            0.5 * dijet_fraction
        } else {
            (1.0 - dijet_fraction) / n_sphere
        }
    });

    Ok(DijetSphere {
        points: to_array(&pts),
        weights,
    })
}
