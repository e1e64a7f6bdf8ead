//! Per-particle kinematics from 3-momenta (`n × 3` arrays, rows `[px, py, pz]`).
//!
//! Particles are treated as massless: energy is \(|p|\).

use crate::angle::normalize_angle;
use crate::{Error, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

pub(crate) fn check_vec3(v: &ArrayView2<f64>) -> Result<()> {
    if v.ncols() != 3 {
        return Err(Error::InvalidFormat("expected an n x 3 array of 3-vectors"));
    }
    Ok(())
}

#[inline]
pub fn pt(px: f64, py: f64) -> f64 {
    px.hypot(py)
}

#[inline]
pub fn energy(px: f64, py: f64, pz: f64) -> f64 {
    (px * px + py * py + pz * pz).sqrt()
}

/// Pseudorapidity \(\operatorname{artanh}(p_z / |p|)\).
///
/// The ratio is clamped to \([-1, 1]\); a particle along the beam gives \(\pm\infty\) and a zero
/// vector gives NaN.
#[inline]
pub fn pseudorapidity(px: f64, py: f64, pz: f64) -> f64 {
    let r = (pz / energy(px, py, pz)).clamp(-1.0, 1.0);
    r.atanh()
}

/// Azimuth in \([0, 2\pi)\).
#[inline]
pub fn azimuth(px: f64, py: f64) -> f64 {
    normalize_angle(py.atan2(px))
}

fn map_rows(v: &ArrayView2<f64>, f: impl Fn(&ArrayView1<f64>) -> f64) -> Result<Array1<f64>> {
    check_vec3(v)?;
    Ok(v.rows().into_iter().map(|r| f(&r)).collect())
}

pub fn transverse_momenta(v: &ArrayView2<f64>) -> Result<Array1<f64>> {
    map_rows(v, |r| pt(r[0], r[1]))
}

pub fn pseudorapidities(v: &ArrayView2<f64>) -> Result<Array1<f64>> {
    map_rows(v, |r| pseudorapidity(r[0], r[1], r[2]))
}

/// Massless energies \(|p|\).
pub fn energies(v: &ArrayView2<f64>) -> Result<Array1<f64>> {
    map_rows(v, |r| energy(r[0], r[1], r[2]))
}

pub fn azimuths(v: &ArrayView2<f64>) -> Result<Array1<f64>> {
    map_rows(v, |r| azimuth(r[0], r[1]))
}
