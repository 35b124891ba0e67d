//! Compositional data transforms
//!
//! Rows are compositions, columns are parts. Closure rescales each row to sum
//! to one; the log-ratio transforms move closed compositions into
//! unconstrained Euclidean space and back. Zero or negative parts produce
//! non-finite log-ratios; they are passed through rather than rejected so
//! callers can filter them.

use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Normalize each row to sum to one.
///
/// Rows summing to zero become NaN.
pub fn close(data: ArrayView2<f64>) -> Array2<f64> {
    let mut out = data.to_owned();
    for mut row in out.rows_mut() {
        let total: f64 = row.sum();
        row.mapv_inplace(|v| v / total);
    }
    out
}

/// Centred log-ratio: `ln(x_i / g(x))` with `g` the geometric mean
pub fn clr(data: ArrayView2<f64>) -> Array2<f64> {
    let mut out = data.mapv(f64::ln);
    for mut row in out.rows_mut() {
        let mean = row.mean().unwrap_or(f64::NAN);
        row.mapv_inplace(|v| v - mean);
    }
    out
}

/// Inverse of [`clr`]
pub fn inverse_clr(data: ArrayView2<f64>) -> Array2<f64> {
    close(data.mapv(f64::exp).view())
}

/// Additive log-ratio against the last part: `ln(x_i / x_D)` for `i < D`
pub fn alr(data: ArrayView2<f64>) -> Array2<f64> {
    let d = data.ncols();
    if d == 0 {
        return Array2::zeros((data.nrows(), 0));
    }
    let mut out = Array2::zeros((data.nrows(), d - 1));
    for (src, mut dst) in data.rows().into_iter().zip(out.rows_mut()) {
        let denom = src[d - 1];
        for j in 0..d - 1 {
            dst[j] = (src[j] / denom).ln();
        }
    }
    out
}

/// Inverse of [`alr`]
pub fn inverse_alr(data: ArrayView2<f64>) -> Array2<f64> {
    let d = data.ncols() + 1;
    let mut out = Array2::ones((data.nrows(), d));
    for (src, mut dst) in data.rows().into_iter().zip(out.rows_mut()) {
        for j in 0..d - 1 {
            dst[j] = src[j].exp();
        }
    }
    close(out.view())
}

/// Orthonormal Helmert-type basis of the clr plane, `(D-1) × D`.
///
/// Row `i` contrasts the first `i + 1` parts against part `i + 1`.
pub fn ilr_basis(parts: usize) -> Array2<f64> {
    let dims = parts.saturating_sub(1);
    let mut basis = Array2::zeros((dims, parts));
    for i in 0..dims {
        let k = (i + 1) as f64;
        let norm = (k / (k + 1.0)).sqrt();
        for j in 0..=i {
            basis[[i, j]] = norm / k;
        }
        basis[[i, i + 1]] = -norm;
    }
    basis
}

/// Isometric log-ratio: clr coordinates projected onto [`ilr_basis`]
pub fn ilr(data: ArrayView2<f64>) -> Array2<f64> {
    let basis = ilr_basis(data.ncols());
    clr(data).dot(&basis.t())
}

/// Inverse of [`ilr`]
pub fn inverse_ilr(data: ArrayView2<f64>) -> Array2<f64> {
    let basis = ilr_basis(data.ncols() + 1);
    inverse_clr(data.dot(&basis).view())
}

/// Smallest strictly positive finite entry, if any
pub fn min_positive(data: ArrayView2<f64>) -> Option<f64> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
}

/// Row sums, mainly for closure checks
pub fn row_sums(data: ArrayView2<f64>) -> Array1<f64> {
    data.sum_axis(Axis(1))
}
