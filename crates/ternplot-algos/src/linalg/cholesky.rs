//! Cholesky factorization of symmetric positive-definite matrices

use ndarray::{Array1, Array2, ArrayView1};

/// Pivots below this fraction of the largest diagonal entry count as zero
const RELATIVE_PIVOT_TOLERANCE: f64 = 1e-12;

/// Lower-triangular factor `L` with `A = L·Lᵀ`
#[derive(Debug, Clone)]
pub struct Cholesky {
    l: Array2<f64>,
}

impl Cholesky {
    /// Factorize `a`; `None` if it is not (numerically) positive definite
    pub fn new(a: &Array2<f64>) -> Option<Self> {
        let n = a.nrows();
        if n == 0 || a.ncols() != n {
            return None;
        }
        let scale = (0..n).map(|i| a[[i, i]].abs()).fold(0.0, f64::max);
        if !scale.is_finite() || scale == 0.0 {
            return None;
        }
        let tol = scale * RELATIVE_PIVOT_TOLERANCE;

        let mut l = Array2::<f64>::zeros((n, n));
        for j in 0..n {
            let mut d = a[[j, j]];
            for k in 0..j {
                d -= l[[j, k]] * l[[j, k]];
            }
            if d.is_nan() || d <= tol {
                return None;
            }
            let ljj = d.sqrt();
            l[[j, j]] = ljj;
            for i in (j + 1)..n {
                let mut s = a[[i, j]];
                for k in 0..j {
                    s -= l[[i, k]] * l[[j, k]];
                }
                l[[i, j]] = s / ljj;
            }
        }
        Some(Cholesky { l })
    }

    /// Lower-triangular factor
    pub fn factor(&self) -> &Array2<f64> {
        &self.l
    }

    /// `log(det(A))`
    pub fn log_det(&self) -> f64 {
        2.0 * self.l.diag().iter().map(|d| d.ln()).sum::<f64>()
    }

    /// Solve `L·x = b` by forward substitution
    pub fn solve_lower(&self, b: ArrayView1<f64>) -> Array1<f64> {
        let n = self.l.nrows();
        let mut x = Array1::<f64>::zeros(n);
        for i in 0..n {
            let mut s = b[i];
            for k in 0..i {
                s -= self.l[[i, k]] * x[k];
            }
            x[i] = s / self.l[[i, i]];
        }
        x
    }
}
