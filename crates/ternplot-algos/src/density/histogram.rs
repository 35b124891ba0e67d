//! Fixed-edge histograms
//!
//! Bins are half-open `[e_i, e_{i+1})` except the last, which also includes
//! its right edge. Points that are non-finite or outside the outer edges are
//! dropped.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{PlotError, PlotResult};

/// Bin index of `v` within sorted `edges`
fn bin_index(edges: ArrayView1<f64>, v: f64) -> Option<usize> {
    let n = edges.len();
    if n < 2 || !v.is_finite() || v < edges[0] || v > edges[n - 1] {
        return None;
    }
    if v == edges[n - 1] {
        return Some(n - 2);
    }
    // first edge strictly greater than v
    let upper = edges
        .as_slice()
        .map(|s| s.partition_point(|e| *e <= v))
        .unwrap_or_else(|| edges.iter().take_while(|e| **e <= v).count());
    Some(upper.saturating_sub(1).min(n - 2))
}

/// Counts of `values` per bin
pub fn histogram1d(values: ArrayView1<f64>, edges: ArrayView1<f64>) -> Array1<f64> {
    let mut counts = Array1::zeros(edges.len().saturating_sub(1));
    for &v in values.iter() {
        if let Some(i) = bin_index(edges, v) {
            counts[i] += 1.0;
        }
    }
    counts
}

/// Counts of `n × 2` points per cell, indexed `[x bin, y bin]`
pub fn histogram2d(
    points: ArrayView2<f64>,
    xedges: ArrayView1<f64>,
    yedges: ArrayView1<f64>,
) -> PlotResult<Array2<f64>> {
    if points.ncols() != 2 {
        return Err(PlotError::shape(2, points.ncols()));
    }
    let mut counts = Array2::zeros((
        xedges.len().saturating_sub(1),
        yedges.len().saturating_sub(1),
    ));
    for p in points.rows() {
        if let (Some(i), Some(j)) = (bin_index(xedges, p[0]), bin_index(yedges, p[1])) {
            counts[[i, j]] += 1.0;
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_last_bin_closed() {
        let edges = array![0.0, 1.0, 2.0];
        let counts = histogram1d(array![0.0, 0.5, 1.0, 2.0, 2.5, -0.1].view(), edges.view());
        assert_eq!(counts.to_vec(), vec![2.0, 2.0]);
    }

    #[test]
    fn test_non_finite_dropped() {
        let edges = array![0.0, 1.0];
        let counts = histogram1d(array![f64::NAN, f64::INFINITY, 0.5].view(), edges.view());
        assert_eq!(counts.to_vec(), vec![1.0]);
    }

    #[test]
    fn test_histogram2d() {
        let pts = array![[0.1, 0.1], [0.9, 0.1], [0.9, 0.9], [0.9, 0.95], [f64::NAN, 0.5]];
        let edges = array![0.0, 0.5, 1.0];
        let h = histogram2d(pts.view(), edges.view(), edges.view()).unwrap();
        assert_eq!(h, array![[1.0, 0.0], [1.0, 2.0]]);
        assert_eq!(h.sum(), 4.0);
    }

    #[test]
    fn test_histogram2d_shape() {
        let pts = array![[0.1, 0.1, 0.1]];
        let edges = array![0.0, 1.0];
        assert!(histogram2d(pts.view(), edges.view(), edges.view()).is_err());
    }
}
