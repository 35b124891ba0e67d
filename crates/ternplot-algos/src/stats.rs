//! NaN-aware summary statistics and principal components

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::linalg::symmetric_eigen;
use crate::{PlotError, PlotResult};

/// Column means ignoring NaN; all-NaN columns give NaN
pub fn nanmean(data: ArrayView2<f64>) -> Array1<f64> {
    data.axis_iter(Axis(1))
        .map(|col| {
            let (sum, count) = col
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        })
        .collect()
}

/// Covariance over rows without any NaN (`n - 1` normalization)
pub fn nancov(data: ArrayView2<f64>) -> PlotResult<Array2<f64>> {
    let complete: Vec<usize> = data
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, row)| row.iter().all(|v| !v.is_nan()))
        .map(|(i, _)| i)
        .collect();
    if complete.len() < 2 {
        return Err(PlotError::InsufficientData(format!(
            "covariance needs at least 2 complete rows, got {}",
            complete.len()
        )));
    }
    let rows = data.select(Axis(0), &complete);
    let mean = rows.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(rows.ncols()));
    let centred = &rows - &mean;
    Ok(centred.t().dot(&centred) / (complete.len() as f64 - 1.0))
}

/// Eigen-decomposition of a symmetric matrix, eigenvalues descending.
///
/// Column `j` of the returned vectors pairs with value `j`.
pub fn eigsorted(cov: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let (vals, vecs) = symmetric_eigen(cov);
    let mut order: Vec<usize> = (0..vals.len()).collect();
    order.sort_by(|&a, &b| vals[b].total_cmp(&vals[a]));
    let sorted_vals = order.iter().map(|&i| vals[i]).collect();
    let sorted_vecs = vecs.select(Axis(1), &order);
    (sorted_vals, sorted_vecs)
}

/// Principal component fit
#[derive(Debug, Clone)]
pub struct Pca {
    pub mean: Array1<f64>,
    /// Variance along each component, descending
    pub explained_variance: Array1<f64>,
    /// One unit component per row
    pub components: Array2<f64>,
}

/// Fit the first `k` principal components of the complete rows of `data`.
///
/// Components are sign-normalized so their largest-magnitude entry is
/// positive.
pub fn pca(data: ArrayView2<f64>, k: usize) -> PlotResult<Pca> {
    let d = data.ncols();
    if k == 0 || k > d {
        return Err(PlotError::Config(format!(
            "cannot fit {k} components to {d}-dimensional data"
        )));
    }
    let cov = nancov(data)?;
    let mean = nanmean(data);
    let (vals, vecs) = eigsorted(&cov);

    let mut components = vecs.t().slice(ndarray::s![..k, ..]).to_owned();
    for mut row in components.rows_mut() {
        let pivot = row
            .iter()
            .copied()
            .fold(0.0_f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
        if pivot < 0.0 {
            row.mapv_inplace(|v| -v);
        }
    }
    Ok(Pca {
        mean,
        explained_variance: vals.slice(ndarray::s![..k]).to_owned(),
        components,
    })
}

/// Points along `vector` through `mu`, spanning `±spans` standard deviations.
///
/// Returns `expand * spans + 1` evenly spaced rows.
pub fn vector_to_line(
    mu: ArrayView1<f64>,
    vector: ArrayView1<f64>,
    variance: f64,
    spans: usize,
    expand: usize,
) -> PlotResult<Array2<f64>> {
    if mu.len() != vector.len() {
        return Err(PlotError::ShapeMismatch(format!(
            "mean has {} entries, vector has {}",
            mu.len(),
            vector.len()
        )));
    }
    let length = variance.sqrt();
    let s = spans as f64;
    let parts = Array1::linspace(-s, s, expand * spans + 1);
    let mut line = Array2::zeros((parts.len(), mu.len()));
    for (mut row, p) in line.rows_mut().into_iter().zip(parts.iter()) {
        row.assign(&(&vector * (length * p) + &mu));
    }
    Ok(line)
}
