//! The EMD engine: validated, normalized transport between two weighted point sets.
//!
//! The solver is an external collaborator reached through [`TransportSolver`]. This module owns
//! the contract around it:
//! - weights are validated and normalized here, never by the solver,
//! - solver diagnostics (non-convergence, zero-cost warnings) are logged and returned,
//! - the returned cost is dimensionless (unit total mass on both sides).

use crate::weights::normalize_weights;
use crate::{Error, Result};
use ndarray::{ArrayView1, ArrayView2};

/// Default engine-level iteration cap, sized for exact (network simplex) solvers.
///
/// Iterative solvers apply their own, smaller budget on top of it; see
/// [`SinkhornSolver::max_iter`](crate::sinkhorn::SinkhornSolver::max_iter).
pub const DEFAULT_MAX_ITER: usize = 100_000_000;

/// What a solver reports besides the cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// Solver-provided warning text, if any.
    pub warning: Option<String>,
    /// `false` when the solver stopped at its iteration cap.
    pub converged: bool,
    /// Iterations actually used (0 if the solver does not report it).
    pub iterations: usize,
}

impl Diagnostics {
    pub fn converged(iterations: usize) -> Self {
        Self {
            warning: None,
            converged: true,
            iterations,
        }
    }
}

/// Solver output: minimal transport cost plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub cost: f64,
    pub diagnostics: Diagnostics,
}

/// An optimal-transport solver between two discrete distributions.
///
/// Contract:
/// - `a` and `b` are nonnegative and each sums to 1,
/// - `cost` is `a.len() × b.len()`, finite and nonnegative,
/// - hitting `max_iter` is **not** an error: return the best solution found with
///   `converged = false`.
///
/// Any conforming exact (network simplex, auction) or approximate solver can be plugged in.
pub trait TransportSolver {
    fn solve(
        &self,
        a: &ArrayView1<f64>,
        b: &ArrayView1<f64>,
        cost: &ArrayView2<f64>,
        max_iter: usize,
    ) -> Result<Transport>;
}

impl<S: TransportSolver + ?Sized> TransportSolver for &S {
    fn solve(
        &self,
        a: &ArrayView1<f64>,
        b: &ArrayView1<f64>,
        cost: &ArrayView2<f64>,
        max_iter: usize,
    ) -> Result<Transport> {
        (**self).solve(a, b, cost, max_iter)
    }
}

/// EMD engine configuration.
#[derive(Debug, Clone)]
pub struct EmdConfig {
    /// Iteration cap handed to the solver.
    pub max_iter: usize,
}

impl Default for EmdConfig {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

/// A (normalized) EMD value with the solver's diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Emd {
    /// Transport cost between the unit-normalized distributions.
    pub cost: f64,
    pub diagnostics: Diagnostics,
}

impl Emd {
    /// The cost, or [`Error::SolverNonConvergence`] if the solver hit its cap.
    pub fn converged(&self) -> Result<f64> {
        if self.diagnostics.converged {
            Ok(self.cost)
        } else {
            Err(Error::SolverNonConvergence {
                iterations: self.diagnostics.iterations,
                cost: self.cost,
            })
        }
    }

    /// Rescale by an original total weight (e.g. event pT or energy) to get a dimensional value.
    pub fn dimensional(&self, total_weight: f64) -> f64 {
        self.cost * total_weight
    }
}

/// Compute the EMD between weights `a` (rows of `cost`) and `b` (columns of `cost`).
///
/// Weights may be unnormalized; both are divided by their sums before solving.
///
/// A zero cost is legitimate for identical distributions but is also what a failed solve can look
/// like, so it is logged (with the solver's warning, if any) rather than silently accepted.
pub fn compute_emd<S: TransportSolver + ?Sized>(
    solver: &S,
    a: &ArrayView1<f64>,
    b: &ArrayView1<f64>,
    cost: &ArrayView2<f64>,
    max_iter: usize,
) -> Result<Emd> {
    if a.len() != cost.nrows() {
        return Err(Error::InvalidWeights("first weight vector length must match cost rows"));
    }
    if b.len() != cost.ncols() {
        return Err(Error::InvalidWeights("second weight vector length must match cost columns"));
    }
    let a = normalize_weights(a)?;
    let b = normalize_weights(b)?;
    if cost.iter().any(|&c| !c.is_finite() || c < 0.0) {
        return Err(Error::InvalidParameter("cost matrix must be finite and nonnegative"));
    }
    if max_iter == 0 {
        return Err(Error::InvalidParameter("max_iter must be >= 1"));
    }

    let Transport { cost: value, diagnostics } =
        solver.solve(&a.view(), &b.view(), cost, max_iter)?;
    log::debug!(
        "emd {}x{}: cost={value} iterations={} converged={}",
        a.len(),
        b.len(),
        diagnostics.iterations,
        diagnostics.converged
    );

    if !value.is_finite() || value < 0.0 {
        return Err(Error::Solver(format!("solver returned invalid cost {value}")));
    }
    if diagnostics.converged {
        if let Some(w) = diagnostics.warning.as_deref() {
            log::info!("transport solver: {w}");
        }
    } else {
        log::warn!(
            "transport solver hit max_iter={max_iter} without converging; best cost {value}{}",
            diagnostics
                .warning
                .as_deref()
                .map(|w| format!(" ({w})"))
                .unwrap_or_default()
        );
    }
    if value == 0.0 {
        match diagnostics.warning.as_deref() {
            Some(w) => log::warn!("zero transport cost; solver warning: {w}"),
            None => log::warn!(
                "zero transport cost; expected only for identical distributions, check inputs"
            ),
        }
    }

    Ok(Emd {
        cost: value,
        diagnostics,
    })
}

/// [`compute_emd`] with an [`EmdConfig`].
pub fn compute_emd_with_config<S: TransportSolver + ?Sized>(
    solver: &S,
    a: &ArrayView1<f64>,
    b: &ArrayView1<f64>,
    cost: &ArrayView2<f64>,
    cfg: &EmdConfig,
) -> Result<Emd> {
    compute_emd(solver, a, b, cost, cfg.max_iter)
}
