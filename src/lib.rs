//! # event-isotropy
//!
//! Event isotropy for collider events, computed as an optimal-transport (Earth Mover's) distance
//! between an event's weighted particle directions and a quasi-uniform reference event.
//!
//! This crate is intentionally small:
//!
//! - it generates **reference geometries** (ring, cylinder, sphere) with explicit seeds,
//! - it builds the **ground-distance cost matrices** appropriate to each geometry,
//! - it calls an **external transport solver** through [`emd::TransportSolver`]; the bundled
//!   adapter ([`sinkhorn::SinkhornSolver`]) delegates to `wass`,
//! - it does not provide plotting or an experiment runner (see `demos/` for drivers).
//!
//! ## Public invariants (must not change)
//!
//! - **Angles are normalized before use**: every azimuth entering a metric is folded into
//!   \([0, 2\pi)\) first.
//! - **Weights are normalized by the engine**: [`emd::compute_emd`] divides both weight vectors by
//!   their sums; the returned cost is dimensionless. Use [`emd::Emd::dimensional`] to rescale.
//! - **Determinism knobs are explicit**: random orientations take a `&mut impl rand::Rng`.
//! - **Solver diagnostics are surfaced**: non-convergence and zero-cost results are logged and
//!   kept on the result, never swallowed.
//!
//! ## Metric ranges
//!
//! Each metric is scaled so isotropy values from different geometries are comparable:
//!
//! - ring, linear: \(\frac{4}{\pi}\Delta\phi \in [0, 4]\)
//! - ring, cosine: \(\frac{\pi}{\pi - 2}(1 - \cos\Delta\phi)\)
//! - cylinder: \(\frac{12}{\pi^2 + 16 y_{max}^2}(\Delta\phi^2 + \Delta y^2)\)
//! - sphere, angular: \(\arccos(\hat a \cdot \hat b)\); sphere, cosine: \(2(1 - \hat a \cdot \hat b)\)
//!
//! ## Module map
//!
//! - `angle`: periodic-angle normalization and distance
//! - `kinematics`: pT, pseudorapidity, energy and azimuth from 3-momenta
//! - `ring`, `cylinder`, `sphere`: reference geometries (+ random-orientation variants)
//! - `healpix`: equal-area sphere tiling (RING scheme pixel centres)
//! - `metric`: cost matrices for each geometry
//! - `weights`: weight validation and normalization
//! - `emd`: the EMD engine and the solver seam
//! - `sinkhorn`: `wass`-backed solver adapter
//! - `isotropy`: event → isotropy value in one call
//! - `event`: `<event>` text format reader and flat result dumps

pub mod angle;
pub mod cylinder;
pub mod emd;
pub mod event;
pub mod healpix;
pub mod isotropy;
pub mod kinematics;
pub mod metric;
pub mod ring;
pub mod sinkhorn;
pub mod sphere;
pub mod weights;

/// event-isotropy error variants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed geometry configuration (segment count, bound, resolution level, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// A point array does not have the expected shape.
    #[error("invalid format: {0}")]
    InvalidFormat(&'static str),
    /// Zero-sum, negative, non-finite or length-mismatched weights.
    #[error("invalid weights: {0}")]
    InvalidWeights(&'static str),
    /// The solver stopped at its iteration cap; `cost` is its best-effort value.
    #[error("transport solver did not converge after {iterations} iterations (best cost {cost})")]
    SolverNonConvergence { iterations: usize, cost: f64 },
    /// The solver returned something unusable (negative or non-finite cost).
    #[error("transport solver failed: {0}")]
    Solver(String),
    /// Malformed event file; `line` is 1-based, 0 for a block left open at end of input.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: &'static str },
    /// Reading events or writing dumps failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
