//! Analysis engines for Nodal.
//!
//! Three entry points, one per analysis:
//! - [`solve_circuit`] — DC / interactive operating point with fixed-point
//!   relinearization of nonlinear devices
//! - [`solve_ac_sweep`] — complex MNA over a log-spaced frequency grid
//! - [`solve_transient`] — Backward-Euler time stepping with companion
//!   models
//!
//! All three consume an immutable [`nodal_core::Circuit`] and return an
//! [`AnalysisReport`] that is well-formed even on failure (the `error`
//! field carries the diagnostic). The [`linear`] module provides the
//! underlying Gaussian-elimination solver with tolerant pivoting.

pub mod ac;
pub mod dc;
pub mod error;
pub mod linear;
pub mod report;
pub mod transient;

pub use ac::{SweepConfig, solve_ac_sweep};
pub use dc::{CONVERGENCE_TOLERANCE, MAX_ITERATIONS, solve_circuit};
pub use error::{Error, Result};
pub use linear::{LinearSolution, PIVOT_TOLERANCE, solve_complex, solve_real};
pub use report::{AnalysisReport, NodeSnapshot, Phasor, PlotPoint};
pub use transient::{TransientConfig, solve_transient};
