//! Symmetric eigen-decomposition by the cyclic Jacobi method
//!
//! Sized for the small covariance matrices of compositional data (2×2, 3×3,
//! occasionally a few more parts).

use ndarray::{Array1, Array2};

const MAX_SWEEPS: usize = 64;

/// Eigenvalues and eigenvectors of a symmetric matrix.
///
/// Returns `(values, vectors)` where column `j` of `vectors` is the unit
/// eigenvector for `values[j]`. Order is unspecified; see
/// [`crate::stats::eigsorted`] for the descending-order variant.
pub fn symmetric_eigen(m: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = m.nrows();
    let mut a = m.clone();
    let mut v = Array2::<f64>::eye(n);

    for _ in 0..MAX_SWEEPS {
        // Convergence: sum of squares of off-diagonal elements
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off < 1e-30 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[[p, q]].abs() < 1e-300 {
                    continue;
                }
                jacobi_rotate(&mut a, &mut v, p, q);
            }
        }
    }

    let values = Array1::from_iter((0..n).map(|i| a[[i, i]]));
    (values, v)
}

/// Apply a single Jacobi rotation to eliminate a[p][q].
fn jacobi_rotate(a: &mut Array2<f64>, v: &mut Array2<f64>, p: usize, q: usize) {
    let n = a.nrows();
    let app = a[[p, p]];
    let aqq = a[[q, q]];
    let apq = a[[p, q]];

    let (c, s) = if (app - aqq).abs() < 1e-300 {
        // Equal diagonal elements: rotate by 45°
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        (inv_sqrt2, if apq > 0.0 { inv_sqrt2 } else { -inv_sqrt2 })
    } else {
        let tau = (aqq - app) / (2.0 * apq);
        let t = if tau >= 0.0 {
            1.0 / (tau + (1.0 + tau * tau).sqrt())
        } else {
            -1.0 / (-tau + (1.0 + tau * tau).sqrt())
        };
        let c = 1.0 / (1.0 + t * t).sqrt();
        (c, t * c)
    };

    a[[p, p]] = c * c * app - 2.0 * s * c * apq + s * s * aqq;
    a[[q, q]] = s * s * app + 2.0 * s * c * apq + c * c * aqq;
    a[[p, q]] = 0.0;
    a[[q, p]] = 0.0;

    for r in (0..n).filter(|&r| r != p && r != q) {
        let arp = a[[r, p]];
        let arq = a[[r, q]];
        a[[r, p]] = c * arp - s * arq;
        a[[p, r]] = a[[r, p]];
        a[[r, q]] = s * arp + c * arq;
        a[[q, r]] = a[[r, q]];
    }

    // Accumulate eigenvectors: V' = V · G
    for i in 0..n {
        let vip = v[[i, p]];
        let viq = v[[i, q]];
        v[[i, p]] = c * vip - s * viq;
        v[[i, q]] = s * vip + c * viq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_decomposition(m: &Array2<f64>, tol: f64) {
        let (vals, vecs) = symmetric_eigen(m);
        for j in 0..m.nrows() {
            let col = vecs.column(j);
            let mv = m.dot(&col);
            for i in 0..m.nrows() {
                assert!(
                    (mv[i] - vals[j] * col[i]).abs() < tol,
                    "A·v != λ·v for eigenpair {j}: {} vs {}",
                    mv[i],
                    vals[j] * col[i]
                );
            }
            assert!((col.dot(&col) - 1.0).abs() < tol);
        }
    }

    #[test]
    fn test_diagonal() {
        let m = array![[3.0, 0.0], [0.0, 1.0]];
        let (vals, _) = symmetric_eigen(&m);
        let mut sorted = vals.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        assert_eq!(sorted, vec![3.0, 1.0]);
    }

    #[test]
    fn test_2x2_correlated() {
        let m = array![[2.0, 0.3], [0.3, 0.5]];
        assert_decomposition(&m, 1e-10);
        let (vals, _) = symmetric_eigen(&m);
        // trace and determinant are preserved
        assert!((vals.sum() - 2.5).abs() < 1e-10);
        assert!((vals[0] * vals[1] - (1.0 - 0.09)).abs() < 1e-10);
    }

    #[test]
    fn test_3x3_symmetric() {
        let m = array![[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        assert_decomposition(&m, 1e-9);
    }

    #[test]
    fn test_equal_diagonal() {
        let m = array![[1.0, -0.5], [-0.5, 1.0]];
        assert_decomposition(&m, 1e-10);
    }

    #[test]
    fn test_rank_deficient() {
        let m = array![[1.0, 1.0], [1.0, 1.0]];
        let (vals, _) = symmetric_eigen(&m);
        let mut sorted = vals.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        assert!((sorted[0] - 2.0).abs() < 1e-10);
        assert!(sorted[1].abs() < 1e-10);
    }
}
