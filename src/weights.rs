//! Weight vectors (pT or energy per particle).
//!
//! Public invariant: we do **not** silently normalize in methods named like “validate”.
//! If we normalize, the function name says so (`normalize_*`).

use crate::{Error, Result};
use ndarray::{Array1, ArrayView1};

/// Check that `w` is usable as transport mass: non-empty, finite, nonnegative, positive total.
///
/// Returns the total mass.
pub fn validate_weights(w: &ArrayView1<f64>) -> Result<f64> {
    if w.is_empty() {
        return Err(Error::InvalidWeights("weight vector must be non-empty"));
    }
    if w.iter().any(|&x| !x.is_finite()) {
        return Err(Error::InvalidWeights("weight vector contains non-finite values"));
    }
    if w.iter().any(|&x| x < 0.0) {
        return Err(Error::InvalidWeights("weights must be nonnegative"));
    }
    let s = w.sum();
    if !(s > 0.0) || !s.is_finite() {
        return Err(Error::InvalidWeights("weights must have positive finite total"));
    }
    Ok(s)
}

/// Explicit normalization to unit total mass via `w_i / sum(w)`, with checks.
pub fn normalize_weights(w: &ArrayView1<f64>) -> Result<Array1<f64>> {
    let s = validate_weights(w)?;
    Ok(w.mapv(|x| x / s))
}

/// Equal weights (`1` each) for a reference event of `n` points.
pub fn uniform_weights(n: usize) -> Array1<f64> {
    Array1::from_elem(n, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn normalized_weights_sum_to_one() {
        let w = array![1.0, 3.0, 0.0, 4.0];
        let p = normalize_weights(&w.view()).unwrap();
        assert!((p.sum() - 1.0).abs() < 1e-12);
        assert_eq!(p[1], 3.0 / 8.0);
        assert_eq!(p[2], 0.0);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let cases = [
            Array1::<f64>::zeros(0),
            array![0.0, 0.0],
            array![1.0, -0.5],
            array![1.0, f64::NAN],
            array![f64::INFINITY],
        ];
        for w in cases {
            assert!(
                matches!(normalize_weights(&w.view()), Err(Error::InvalidWeights(_))),
                "{w:?} should be rejected"
            );
        }
    }
}
