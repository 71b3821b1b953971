//! Linear system solvers.
//!
//! Both entry points run the same in-place Gaussian elimination with
//! partial pivoting on a working copy of `(A, b)`. A column whose best
//! pivot falls below [`PIVOT_TOLERANCE`] is marked deficient and skipped;
//! back-substitution leaves the corresponding unknown at zero. Circuits
//! with floating subnets therefore yield partial results instead of a hard
//! failure — callers inspect [`LinearSolution::deficient_columns`] to tell
//! a fully collapsed system from a tolerable one.

use nalgebra::{ComplexField, DMatrix, DVector};
use num_complex::Complex;
use num_traits::Zero;

use crate::error::{Error, Result};

/// Pivot magnitudes below this are treated as structurally zero.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Solution of `A·x = b` together with its rank deficiency.
#[derive(Debug, Clone)]
pub struct LinearSolution<T> {
    pub x: DVector<T>,
    /// Number of columns whose pivot fell below tolerance.
    pub deficient_columns: usize,
}

impl<T> LinearSolution<T> {
    /// True if every column was deficient in a non-empty system.
    pub fn is_singular(&self) -> bool {
        self.x.len() > 0 && self.deficient_columns == self.x.len()
    }
}

/// Solve a real linear system.
pub fn solve_real(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<LinearSolution<f64>> {
    eliminate(a, b)
}

/// Solve a complex linear system, pivoting on magnitude.
pub fn solve_complex(
    a: &DMatrix<Complex<f64>>,
    b: &DVector<Complex<f64>>,
) -> Result<LinearSolution<Complex<f64>>> {
    eliminate(a, b)
}

fn eliminate<T>(a: &DMatrix<T>, b: &DVector<T>) -> Result<LinearSolution<T>>
where
    T: ComplexField<RealField = f64> + Copy + Zero,
{
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    if a.nrows() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }

    let n = a.nrows();
    let mut m = a.clone_owned();
    let mut rhs = b.clone_owned();
    let mut deficient = vec![false; n];

    for i in 0..n {
        // Partial pivot: bring the largest-magnitude entry of the column up.
        let mut pivot_row = i;
        let mut pivot_mag = m[(i, i)].modulus();
        for r in (i + 1)..n {
            let mag = m[(r, i)].modulus();
            if mag > pivot_mag {
                pivot_mag = mag;
                pivot_row = r;
            }
        }

        if pivot_mag < PIVOT_TOLERANCE {
            deficient[i] = true;
            continue;
        }

        if pivot_row != i {
            m.swap_rows(i, pivot_row);
            rhs.swap_rows(i, pivot_row);
        }

        let pivot = m[(i, i)];
        for r in (i + 1)..n {
            let factor = m[(r, i)] / pivot;
            if factor.modulus() == 0.0 {
                continue;
            }
            for c in i..n {
                let v = m[(i, c)];
                m[(r, c)] -= factor * v;
            }
            let bv = rhs[i];
            rhs[r] -= factor * bv;
        }
    }

    // Back-substitution; deficient unknowns stay zero.
    let mut x = DVector::from_element(n, T::zero());
    for i in (0..n).rev() {
        if deficient[i] {
            continue;
        }
        let mut sum = rhs[i];
        for c in (i + 1)..n {
            sum -= m[(i, c)] * x[c];
        }
        x[i] = sum / m[(i, i)];
    }

    Ok(LinearSolution {
        x,
        deficient_columns: deficient.iter().filter(|d| **d).count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_solve_simple() {
        // 2x + y = 5
        // x + 3y = 6
        // Solution: x = 1.8, y = 1.4
        let a = dmatrix![2.0, 1.0; 1.0, 3.0];
        let b = dvector![5.0, 6.0];

        let sol = solve_real(&a, &b).unwrap();

        assert_eq!(sol.deficient_columns, 0);
        assert!((sol.x[0] - 1.8).abs() < 1e-10);
        assert!((sol.x[1] - 1.4).abs() < 1e-10);
    }

    #[test]
    fn test_pivoting_handles_zero_diagonal() {
        // Leading zero forces a row swap.
        let a = dmatrix![0.0, 1.0; 1.0, 0.0];
        let b = dvector![2.0, 3.0];

        let sol = solve_real(&a, &b).unwrap();
        assert!((sol.x[0] - 3.0).abs() < 1e-12);
        assert!((sol.x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_fully_singular_matrix() {
        let a = dmatrix![0.0, 0.0; 0.0, 0.0];
        let b = dvector![1.0, 2.0];

        let sol = solve_real(&a, &b).unwrap();
        assert!(sol.is_singular());
        assert_eq!(sol.x[0], 0.0);
        assert_eq!(sol.x[1], 0.0);
    }

    #[test]
    fn test_partial_deficiency_yields_partial_solution() {
        // Block-diagonal: a healthy 1x1 block and a dead one.
        let a = dmatrix![2.0, 0.0; 0.0, 0.0];
        let b = dvector![4.0, 1.0];

        let sol = solve_real(&a, &b).unwrap();
        assert_eq!(sol.deficient_columns, 1);
        assert!(!sol.is_singular());
        assert!((sol.x[0] - 2.0).abs() < 1e-12);
        assert_eq!(sol.x[1], 0.0); // the floating unknown is zeroed
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = dmatrix![1.0, 2.0; 3.0, 4.0];
        let b = dvector![1.0, 2.0, 3.0];

        let result = solve_real(&a, &b);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_solve_complex_simple() {
        // (2+i)x + y = 5+i
        // x + (3-i)y = 6
        let a = dmatrix![
            Complex::new(2.0, 1.0), Complex::new(1.0, 0.0);
            Complex::new(1.0, 0.0), Complex::new(3.0, -1.0)
        ];
        let b = dvector![Complex::new(5.0, 1.0), Complex::new(6.0, 0.0)];

        let sol = solve_complex(&a, &b).unwrap();

        // Verify by computing Ax and comparing to b.
        let ax0 = a[(0, 0)] * sol.x[0] + a[(0, 1)] * sol.x[1];
        let ax1 = a[(1, 0)] * sol.x[0] + a[(1, 1)] * sol.x[1];
        assert!((ax0 - b[0]).norm() < 1e-10, "Ax[0] mismatch");
        assert!((ax1 - b[1]).norm() < 1e-10, "Ax[1] mismatch");
    }

    #[test]
    fn test_residual_bound_on_well_conditioned_system() {
        // Diagonally dominant 20x20 system: ‖Ax − b‖ < 1e-9 · ‖b‖.
        let size = 20;
        let a = DMatrix::from_fn(size, size, |i, j| {
            if i == j {
                (size as f64) + 1.0
            } else {
                1.0 / ((i as f64 - j as f64).abs() + 1.0)
            }
        });
        let b = DVector::from_fn(size, |i, _| (i + 1) as f64);

        let sol = solve_real(&a, &b).unwrap();
        let residual = (&a * &sol.x - &b).norm();
        assert!(
            residual < 1e-9 * b.norm(),
            "residual {} too large",
            residual
        );
    }

    #[test]
    fn test_empty_system() {
        let a = DMatrix::<f64>::zeros(0, 0);
        let b = DVector::<f64>::zeros(0);
        let sol = solve_real(&a, &b).unwrap();
        assert_eq!(sol.x.len(), 0);
        assert!(!sol.is_singular());
    }
}
