//! Dense Modified Nodal Analysis system assembly.
//!
//! An [`MnaSystem`] holds the conductance matrix `G` and right-hand side
//! `z` for `G·x = z`, sized `num_nodes + num_branches`. The first
//! `num_nodes` unknowns are node voltages (node `n` lives at row `n − 1`);
//! the rest are branch currents of elements that contribute an extra MNA
//! equation (sources, ammeters, op-amps, logic gates).
//!
//! Node arguments are `Option<usize>` matrix indices: `None` is the ground
//! rail, whose row and column do not exist, so its contributions are simply
//! dropped.

use nalgebra::{ComplexField, DMatrix, DVector};
use num_complex::Complex;
use num_traits::{One, Zero};

/// A dense MNA system over a real or complex scalar.
#[derive(Debug, Clone)]
pub struct MnaSystem<T: ComplexField + Copy> {
    num_nodes: usize,
    matrix: DMatrix<T>,
    rhs: DVector<T>,
}

/// Real-valued system for DC and transient assembly.
pub type RealMna = MnaSystem<f64>;

/// Complex-valued system for AC assembly.
pub type ComplexMna = MnaSystem<Complex<f64>>;

impl<T: ComplexField + Copy> MnaSystem<T> {
    /// Create a zeroed system with `num_nodes` node-voltage unknowns and
    /// `num_branches` branch-current unknowns.
    pub fn new(num_nodes: usize, num_branches: usize) -> Self {
        let size = num_nodes + num_branches;
        Self {
            num_nodes,
            matrix: DMatrix::from_element(size, size, T::zero()),
            rhs: DVector::from_element(size, T::zero()),
        }
    }

    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Matrix row of the `branch`-th extra unknown.
    pub fn branch_row(&self, branch: usize) -> usize {
        self.num_nodes + branch
    }

    pub fn matrix(&self) -> &DMatrix<T> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<T> {
        &self.rhs
    }

    /// Accumulate into a matrix entry.
    pub fn add(&mut self, row: usize, col: usize, value: T) {
        self.matrix[(row, col)] += value;
    }

    /// Accumulate into a right-hand-side entry.
    pub fn add_rhs(&mut self, row: usize, value: T) {
        self.rhs[row] += value;
    }

    /// Stamp an admittance `y` between two nodes: `+y` on both diagonals,
    /// `−y` on the off-diagonals. Ground terminals are dropped.
    pub fn stamp_conductance(&mut self, a: Option<usize>, b: Option<usize>, y: T) {
        if let Some(i) = a {
            self.matrix[(i, i)] += y;
        }
        if let Some(j) = b {
            self.matrix[(j, j)] += y;
        }
        if let (Some(i), Some(j)) = (a, b) {
            self.matrix[(i, j)] -= y;
            self.matrix[(j, i)] -= y;
        }
    }

    /// Stamp an independent current source driving `i` amperes from `from`
    /// into `to`.
    pub fn stamp_current_source(&mut self, from: Option<usize>, to: Option<usize>, i: T) {
        if let Some(n) = to {
            self.rhs[n] += i;
        }
        if let Some(n) = from {
            self.rhs[n] -= i;
        }
    }

    /// Stamp an independent voltage source `V(pos) − V(neg) = v` on the
    /// `branch`-th extra equation, coupling the branch current into the KCL
    /// rows of both terminals.
    pub fn stamp_voltage_source(
        &mut self,
        pos: Option<usize>,
        neg: Option<usize>,
        branch: usize,
        v: T,
    ) {
        let row = self.branch_row(branch);
        if let Some(p) = pos {
            self.matrix[(p, row)] += T::one();
            self.matrix[(row, p)] += T::one();
        }
        if let Some(n) = neg {
            self.matrix[(n, row)] -= T::one();
            self.matrix[(row, n)] -= T::one();
        }
        self.rhs[row] += v;
    }
}
