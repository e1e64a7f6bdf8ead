//! [`TransportSolver`] adapter over `wass`'s log-domain Sinkhorn solver.
//!
//! Notes:
//! - This is **entropic** OT: the plan is slightly blurred, so the reported cost
//!   \(\langle C, P_\varepsilon\rangle\) sits a little above the exact EMD. Smaller `reg` is sharper
//!   but needs more iterations.
//! - `wass` works in `f32`; distributions and costs are narrowed on the way in, and the reported
//!   cost is re-accumulated in `f64` from the returned plan. With `max(C) / reg` in the hundreds
//!   the `f32` marginals can stall above `tol`.
//! - When a solve does not converge, `reg` is doubled and the solve retried (ε-scaling), until
//!   `reg` reaches the largest cost. The first converged plan is reported; the diagnostics carry a
//!   warning naming the `reg` actually used.
//! - Each attempt runs at most `min(max_iter, self.max_iter)` iterations. The engine-level
//!   default cap is sized for exact solvers and would be far too long here.

use crate::emd::{Diagnostics, Transport, TransportSolver};
use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Per-attempt iteration budget of [`SinkhornSolver::default`].
pub const DEFAULT_SINKHORN_MAX_ITER: usize = 100_000;

#[derive(Debug, Clone, Copy)]
pub struct SinkhornSolver {
    /// Initial entropic regularization `ε`, in cost units.
    pub reg: f32,
    /// Convergence tolerance on the marginal error.
    pub tol: f32,
    /// Iteration budget per attempt; the caller's `max_iter` can only lower it.
    pub max_iter: usize,
}

impl Default for SinkhornSolver {
    fn default() -> Self {
        Self {
            reg: 1e-2,
            tol: 1e-4,
            max_iter: DEFAULT_SINKHORN_MAX_ITER,
        }
    }
}

impl SinkhornSolver {
    pub fn new(reg: f32, tol: f32) -> Result<Self> {
        if !(reg > 0.0) || !reg.is_finite() {
            return Err(Error::InvalidParameter("reg must be positive and finite"));
        }
        if !(tol > 0.0) || !tol.is_finite() {
            return Err(Error::InvalidParameter("tol must be positive and finite"));
        }
        Ok(Self {
            reg,
            tol,
            ..Self::default()
        })
    }

    /// Same solver with a different per-attempt iteration budget.
    pub fn with_max_iter(self, max_iter: usize) -> Result<Self> {
        if max_iter == 0 {
            return Err(Error::InvalidParameter("max_iter must be >= 1"));
        }
        Ok(Self { max_iter, ..self })
    }

    /// One `wass` solve at `reg`: `Some((cost, iterations))` if it converged.
    fn attempt(
        &self,
        a: &Array1<f32>,
        b: &Array1<f32>,
        c32: &Array2<f32>,
        cost: &ArrayView2<f64>,
        reg: f32,
        max_iter: usize,
    ) -> Option<(f64, usize)> {
        let (plan, _dist, iters) =
            wass::sinkhorn_log_with_convergence(a, b, c32, reg, max_iter, self.tol).ok()?;
        let value: f64 = plan
            .iter()
            .zip(cost.iter())
            .map(|(&p, &c)| p as f64 * c)
            .sum();
        value.is_finite().then_some((value, iters))
    }
}

/// Cost of the product coupling `a ⊗ b`: the limit of the entropic plan as `reg` grows.
fn independent_coupling_cost(a: &ArrayView1<f64>, b: &ArrayView1<f64>, cost: &ArrayView2<f64>) -> f64 {
    a.dot(&cost.dot(b))
}

impl TransportSolver for SinkhornSolver {
    fn solve(
        &self,
        a: &ArrayView1<f64>,
        b: &ArrayView1<f64>,
        cost: &ArrayView2<f64>,
        max_iter: usize,
    ) -> Result<Transport> {
        if cost.dim() != (a.len(), b.len()) {
            return Err(Error::InvalidFormat("cost matrix shape must be a.len() x b.len()"));
        }
        let max_cost = cost.iter().fold(0.0f64, |m, &c| m.max(c));
        if max_cost == 0.0 {
            return Ok(Transport {
                cost: 0.0,
                diagnostics: Diagnostics::converged(0),
            });
        }
        let a32: Array1<f32> = a.mapv(|x| x as f32);
        let b32: Array1<f32> = b.mapv(|x| x as f32);
        let c32: Array2<f32> = cost.mapv(|x| x as f32);
        let budget = max_iter.min(self.max_iter).max(1);

        let mut reg = self.reg;
        let mut used = 0usize;
        loop {
            if let Some((value, iters)) = self.attempt(&a32, &b32, &c32, cost, reg, budget) {
                let warning = (reg > self.reg).then(|| {
                    format!(
                        "sinkhorn converged only after raising reg from {} to {reg}",
                        self.reg
                    )
                });
                return Ok(Transport {
                    cost: value,
                    diagnostics: Diagnostics {
                        warning,
                        converged: true,
                        iterations: used + iters,
                    },
                });
            }
            used += budget;
            if f64::from(reg) >= max_cost {
                break;
            }
            log::debug!("sinkhorn: no convergence at reg={reg} within {budget} iterations, doubling");
            reg *= 2.0;
        }

        Ok(Transport {
            cost: independent_coupling_cost(a, b, cost),
            diagnostics: Diagnostics {
                warning: Some(format!(
                    "sinkhorn did not reach tol={} for any reg in [{}, {reg}]; \
                     reporting the independent-coupling cost",
                    self.tol, self.reg
                )),
                converged: false,
                iterations: used,
            },
        })
    }
}
