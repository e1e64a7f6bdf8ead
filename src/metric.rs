//! Ground-distance cost matrices.
//!
//! Every function returns `M` with `M[[i, j]]` = distance between point `i` of `a` and point `j`
//! of `b`. Each metric is scaled so isotropy values have a comparable range across geometries.
//!
//! The spherical metrics round the dot product and the norm product to [`ROUND_DECIMALS`]
//! decimals before dividing, then clamp the ratio to \([-1, 1]\): floating-point noise can push
//! \(\hat a \cdot \hat b\) marginally outside the domain of `acos`.

use crate::angle::{normalize_angles, periodic_distance};
use crate::kinematics::check_vec3;
use crate::{Error, Result};
use core::f64::consts::PI;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Decimal places kept by the spherical precision guard.
pub const ROUND_DECIMALS: i32 = 5;

#[inline]
fn round_to(x: f64, decimals: i32) -> f64 {
    let s = 10f64.powi(decimals);
    (x * s).round() / s
}

fn phi_cost(a: &ArrayView1<f64>, b: &ArrayView1<f64>, f: impl Fn(f64) -> f64) -> Array2<f64> {
    let a = normalize_angles(a);
    let b = normalize_angles(b);
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| f(periodic_distance(a[i], b[j])))
}

/// \(\frac{4}{\pi}\Delta\phi\), in \([0, 4]\).
pub fn phi_linear_cost(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> Array2<f64> {
    phi_cost(a, b, |d| (4.0 / PI) * d)
}

/// \(\frac{\pi}{\pi - 2}(1 - \cos\Delta\phi)\).
pub fn phi_cosine_cost(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> Array2<f64> {
    phi_cost(a, b, |d| (PI / (PI - 2.0)) * (1.0 - d.cos()))
}

/// Normalization of [`cylindrical_cost`]: \(12 / (\pi^2 + 16 y_{max}^2)\).
#[inline]
pub fn cylindrical_norm(y_max: f64) -> f64 {
    12.0 / (PI * PI + 16.0 * y_max * y_max)
}

/// \(\frac{12}{\pi^2 + 16 y_{max}^2}(\Delta\phi^2 + \Delta y^2)\) between rows `[eta, phi]`.
///
/// `y_max` is the rapidity bound of the reference cylinder.
pub fn cylindrical_cost(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
    y_max: f64,
) -> Result<Array2<f64>> {
    if a.ncols() != 2 || b.ncols() != 2 {
        return Err(Error::InvalidFormat("expected n x 2 arrays of [eta, phi]"));
    }
    if !y_max.is_finite() || y_max <= 0.0 {
        return Err(Error::InvalidParameter("y_max must be positive and finite"));
    }
    let phi_a = normalize_angles(&a.column(1));
    let phi_b = normalize_angles(&b.column(1));
    let norm = cylindrical_norm(y_max);
    Ok(Array2::from_shape_fn((a.nrows(), b.nrows()), |(i, j)| {
        let dphi = periodic_distance(phi_a[i], phi_b[j]);
        let dy = a[[i, 0]] - b[[j, 0]];
        norm * (dphi * dphi + dy * dy)
    }))
}

fn norms(v: &ArrayView2<f64>) -> Result<Array1<f64>> {
    check_vec3(v)?;
    let n: Array1<f64> = v.rows().into_iter().map(|r| r.dot(&r).sqrt()).collect();
    if n.iter().any(|&x| !(x > 0.0) || !x.is_finite()) {
        return Err(Error::InvalidFormat("direction vectors must be finite and non-zero"));
    }
    Ok(n)
}

/// Precision-guarded cosine of the angle between every pair of rows.
fn guarded_cosines(a: &ArrayView2<f64>, b: &ArrayView2<f64>) -> Result<Array2<f64>> {
    let na = norms(a)?;
    let nb = norms(b)?;
    let dots = a.dot(&b.t());
    Ok(Array2::from_shape_fn(dots.dim(), |(i, j)| {
        let num = round_to(dots[[i, j]], ROUND_DECIMALS);
        let den = round_to(na[i] * nb[j], ROUND_DECIMALS);
        if den > 0.0 {
            (num / den).clamp(-1.0, 1.0)
        } else {
            // Both norms round to zero; only possible for vectors shorter than ~3e-3.
            (dots[[i, j]] / (na[i] * nb[j])).clamp(-1.0, 1.0)
        }
    }))
}

/// Angle between directions, \(\arccos(\hat a \cdot \hat b) \in [0, \pi]\).
pub fn spherical_angular_cost(a: &ArrayView2<f64>, b: &ArrayView2<f64>) -> Result<Array2<f64>> {
    Ok(guarded_cosines(a, b)?.mapv(f64::acos))
}

/// \(2(1 - \hat a \cdot \hat b) \in [0, 4]\).
pub fn spherical_cosine_cost(a: &ArrayView2<f64>, b: &ArrayView2<f64>) -> Result<Array2<f64>> {
    Ok(guarded_cosines(a, b)?.mapv(|c| 2.0 * (1.0 - c)))
}
