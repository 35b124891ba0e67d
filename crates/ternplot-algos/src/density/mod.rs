//! Density estimation over evaluation grids
//!
//! - [`histogram`] - fixed-edge 1D and 2D histograms
//! - [`kde`] - Gaussian kernel density estimation with a jittered fallback
//!   for degenerate samples

pub mod histogram;
pub mod kde;

pub use histogram::{histogram1d, histogram2d};
pub use kde::{GaussianKde, DEFAULT_JITTER_SEED};

use ndarray::{Array2, ArrayView2, Axis};
use ternplot_settings::DensityMode;

use crate::grid::{flatten_grid, EvalGrid};
use crate::{PlotError, PlotResult};

/// Scalar field over the centres of a 2D grid.
///
/// `points` are `n × 2` samples in grid space. The result has the shape of
/// the centre mesh, rows following the second axis.
pub fn estimate_field(
    mode: DensityMode,
    points: ArrayView2<f64>,
    grid: &EvalGrid,
) -> PlotResult<Array2<f64>> {
    if points.ncols() != 2 {
        return Err(PlotError::shape(2, points.ncols()));
    }
    match mode {
        DensityMode::Histogram => {
            let counts = histogram2d(points, grid.edges[0].view(), grid.edges[1].view())?;
            Ok(counts.reversed_axes())
        }
        DensityMode::Density => {
            let finite = finite_rows(points);
            let kde = GaussianKde::new(finite.view())?;
            let (cx, cy) = grid.centre_mesh();
            let shape = cx.dim();
            let values = kde.evaluate(flatten_grid(&[&cx, &cy]).view())?;
            values
                .into_shape_with_order(shape)
                .map_err(|e| PlotError::ShapeMismatch(e.to_string()))
        }
        other => Err(PlotError::UnsupportedMode {
            mode: other,
            context: "ternary heatmaps",
        }),
    }
}

/// Rows of `points` whose entries are all finite
pub fn finite_rows(points: ArrayView2<f64>) -> Array2<f64> {
    let keep: Vec<usize> = points
        .rows()
        .into_iter()
        .enumerate()
        .filter(|(_, r)| r.iter().all(|v| v.is_finite()))
        .map(|(i, _)| i)
        .collect();
    points.select(Axis(0), &keep)
}

/// Replace exactly-zero cells with NaN
pub fn suppress_background(field: &mut Array2<f64>) {
    field.mapv_inplace(|v| if v == 0.0 { f64::NAN } else { v });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn unit_grid(n: usize) -> EvalGrid {
        let bounds = array![[0.0, 0.0], [1.0, 1.0]];
        EvalGrid::from_bounds(bounds.view(), n).unwrap()
    }

    #[test]
    fn test_histogram_orientation() {
        let grid = unit_grid(2);
        // one point in the x=high, y=low cell
        let point = array![[0.9, 0.1]];
        let field = estimate_field(DensityMode::Histogram, point.view(), &grid).unwrap();
        assert_eq!(field, array![[0.0, 1.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_density_field_shape() {
        let grid = unit_grid(6);
        let pts = array![[0.2, 0.3], [0.5, 0.5], [0.7, 0.4], [0.4, 0.8], [f64::NAN, 0.1]];
        let field = estimate_field(DensityMode::Density, pts.view(), &grid).unwrap();
        assert_eq!(field.dim(), (6, 6));
        assert!(field.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn test_unsupported_modes() {
        let grid = unit_grid(3);
        let pts = array![[0.2, 0.3]];
        for mode in [DensityMode::Hexbin, DensityMode::ConditionalKde, DensityMode::BinKde] {
            assert!(matches!(
                estimate_field(mode, pts.view(), &grid),
                Err(PlotError::UnsupportedMode { .. })
            ));
        }
    }

    #[test]
    fn test_suppress_background() {
        let mut field = array![[0.0, 1.0], [2.0, 0.0]];
        suppress_background(&mut field);
        assert!(field[[0, 0]].is_nan() && field[[1, 1]].is_nan());
        assert_eq!(field[[0, 1]], 1.0);
    }

    #[test]
    fn test_finite_rows() {
        let pts = array![[1.0, 2.0], [f64::NAN, 1.0], [3.0, f64::NEG_INFINITY], [4.0, 5.0]];
        assert_eq!(finite_rows(pts.view()), array![[1.0, 2.0], [4.0, 5.0]]);
    }
}
