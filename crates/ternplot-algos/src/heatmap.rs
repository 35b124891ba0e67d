//! Ternary heatmaps
//!
//! Compositions are binned (or kernel-smoothed) in log-ratio space, where the
//! simplex is unbounded, and the grid is then mapped back into the triangle.
//! Grid extent comes from the inset boundary of the triangle rather than the
//! data so that the whole diagram is covered.

use ndarray::{Array2, ArrayView2};
use ternplot_settings::HeatmapSettings;

use crate::codata::close;
use crate::density::{estimate_field, suppress_background};
use crate::grid::{boundary_polygon, effective_margin, flatten_grid, perimeter_points, EvalGrid};
use crate::simplex::SimplexConverter;
use crate::transform::{LogRatioTransform, ResolvedTransform};
use crate::{PlotError, PlotResult};

/// Points sampled along the boundary to find the grid extent
const BOUNDARY_SAMPLES: usize = 10_000;

/// Heatmap in plot coordinates.
///
/// `xe`/`ye` are `(bins + 1) × (bins + 1)` edge meshes, `z` and the centre
/// meshes `xi`/`yi` are `bins × bins`.
#[derive(Debug, Clone)]
pub struct TernaryHeatmap {
    pub xe: Array2<f64>,
    pub ye: Array2<f64>,
    pub z: Array2<f64>,
    pub xi: Array2<f64>,
    pub yi: Array2<f64>,
}

/// Compute a ternary heatmap of `n × 3` compositions
pub fn ternary_heatmap(
    data: ArrayView2<f64>,
    settings: &HeatmapSettings,
    transform: &LogRatioTransform,
) -> PlotResult<TernaryHeatmap> {
    settings.validate()?;
    if data.ncols() != 3 {
        return Err(PlotError::shape(3, data.ncols()));
    }
    let tfm = transform.resolve();
    let conv = SimplexConverter::for_aspect(settings.aspect);

    let closed = close(data);
    let margin = effective_margin(closed.view(), settings.margin, settings.force_margin);
    log::debug!(
        "heatmap margin {margin} (requested {}, forced {})",
        settings.margin,
        settings.force_margin
    );

    // Boundary of the rendered region, sampled in the plane then taken into
    // transformed space
    let corners = conv.forward(boundary_polygon(margin).view())?;
    let outline = perimeter_points(corners.view(), BOUNDARY_SAMPLES);
    let bounds = tfm.forward(conv.inverse(outline.view())?.view());
    if bounds.ncols() != 2 {
        return Err(PlotError::shape(2, bounds.ncols()));
    }
    let grid = EvalGrid::from_bounds(bounds.view(), settings.bins)?;

    let transformed = tfm.forward(closed.view());
    let mut z = estimate_field(settings.mode, transformed.view(), &grid)?;

    let (ex, ey) = grid.edge_mesh();
    let (xe, ye) = to_plane(&tfm, &conv, &ex, &ey)?;
    let (cx, cy) = grid.centre_mesh();
    let (xi, yi) = to_plane(&tfm, &conv, &cx, &cy)?;

    if settings.remove_background {
        suppress_background(&mut z);
    }
    Ok(TernaryHeatmap { xe, ye, z, xi, yi })
}

/// Map a mesh in transformed space into plot coordinates, keeping its shape
fn to_plane(
    tfm: &ResolvedTransform,
    conv: &SimplexConverter,
    mx: &Array2<f64>,
    my: &Array2<f64>,
) -> PlotResult<(Array2<f64>, Array2<f64>)> {
    let shape = mx.dim();
    let abc = tfm.inverse(flatten_grid(&[mx, my]).view());
    let xy = conv.forward(abc.view())?;
    let reshape = |col: usize| {
        xy.column(col)
            .to_owned()
            .into_shape_with_order(shape)
            .map_err(|e| PlotError::ShapeMismatch(e.to_string()))
    };
    Ok((reshape(0)?, reshape(1)?))
}
