//! Evaluation grids, bin centre/edge conversion and margin handling

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::{PlotError, PlotResult};

/// `n` evenly spaced values over `[start, stop]`, inclusive
pub fn linspace(start: f64, stop: f64, n: usize) -> Array1<f64> {
    Array1::linspace(start, stop, n)
}

/// `n` logarithmically spaced values over `[start, stop]`, inclusive
pub fn logspace(start: f64, stop: f64, n: usize) -> PlotResult<Array1<f64>> {
    if !(start > 0.0 && stop > 0.0) {
        return Err(PlotError::Config(format!(
            "log spacing needs positive bounds, got [{start}, {stop}]"
        )));
    }
    Ok(linspace(start.log10(), stop.log10(), n).mapv(|e| 10f64.powf(e)))
}

/// Edges for evenly spaced bin centres.
///
/// Interior edges are midpoints; the outer edges extend half a step beyond
/// the first and last centre.
pub fn centres_to_edges(centres: ArrayView1<f64>) -> PlotResult<Array1<f64>> {
    let n = centres.len();
    if n < 2 {
        return Err(PlotError::InsufficientData(format!(
            "bin edges need at least 2 centres, got {n}"
        )));
    }
    let step = (centres[1] - centres[0]) / 2.0;
    let mut edges = Array1::zeros(n + 1);
    for (i, c) in centres.iter().enumerate() {
        edges[i] = c - step;
    }
    edges[n] = centres[n - 1] + step;
    Ok(edges)
}

/// Midpoints of consecutive edges
pub fn edges_to_centres(edges: ArrayView1<f64>) -> Array1<f64> {
    if edges.len() < 2 {
        return Array1::zeros(0);
    }
    let lo = edges.slice(s![..-1]);
    let hi = edges.slice(s![1..]);
    &lo + &((&hi - &lo) / 2.0)
}

/// Cell centres of a 2D edge mesh, taken along the diagonal of each cell
pub fn mesh_edges_to_centres(edges: ArrayView2<f64>) -> Array2<f64> {
    let (r, c) = edges.dim();
    if r < 2 || c < 2 {
        return Array2::zeros((r.saturating_sub(1), c.saturating_sub(1)));
    }
    let lo = edges.slice(s![..-1, ..-1]);
    let hi = edges.slice(s![1.., 1..]);
    &lo + &((&hi - &lo) / 2.0)
}

/// Coordinate meshes with `xy` indexing: both outputs are `(y.len(), x.len())`
pub fn meshgrid(x: ArrayView1<f64>, y: ArrayView1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (y.len(), x.len());
    let xx = Array2::from_shape_fn(shape, |(_, j)| x[j]);
    let yy = Array2::from_shape_fn(shape, |(i, _)| y[i]);
    (xx, yy)
}

/// Stack flattened meshes as columns of an `n × k` point array
pub fn flatten_grid(meshes: &[&Array2<f64>]) -> Array2<f64> {
    let n = meshes.first().map_or(0, |m| m.len());
    let mut out = Array2::zeros((n, meshes.len()));
    for (k, mesh) in meshes.iter().enumerate() {
        for (dst, v) in out.column_mut(k).iter_mut().zip(mesh.iter()) {
            *dst = *v;
        }
    }
    out
}

/// Minimum and maximum ignoring NaN; `None` when nothing is finite
pub fn nan_min_max(values: ArrayView1<f64>) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Two-dimensional evaluation grid: per-axis centres and edges
#[derive(Debug, Clone)]
pub struct EvalGrid {
    pub centres: [Array1<f64>; 2],
    pub edges: [Array1<f64>; 2],
}

impl EvalGrid {
    /// `nbins` centres per axis spanning the NaN-ignoring extent of each
    /// column of `bounds`.
    ///
    /// Fails when an axis has no values or reaches infinity, as happens when
    /// the boundary touches a log-ratio singularity.
    pub fn from_bounds(bounds: ArrayView2<f64>, nbins: usize) -> PlotResult<Self> {
        if bounds.ncols() != 2 {
            return Err(PlotError::shape(2, bounds.ncols()));
        }
        let axis = |dim: usize| -> PlotResult<(Array1<f64>, Array1<f64>)> {
            let (lo, hi) = nan_min_max(bounds.column(dim))
                .filter(|(lo, hi)| lo.is_finite() && hi.is_finite())
                .ok_or_else(|| {
                    PlotError::InsufficientData(format!("no finite grid bounds along axis {dim}"))
                })?;
            let centres = linspace(lo, hi, nbins);
            let edges = centres_to_edges(centres.view())?;
            Ok((centres, edges))
        };
        let (cx, ex) = axis(0)?;
        let (cy, ey) = axis(1)?;
        log::debug!(
            "evaluation grid: x [{:.4}, {:.4}], y [{:.4}, {:.4}], {} bins",
            cx[0],
            cx[cx.len() - 1],
            cy[0],
            cy[cy.len() - 1],
            nbins
        );
        Ok(EvalGrid {
            centres: [cx, cy],
            edges: [ex, ey],
        })
    }

    pub fn centre_mesh(&self) -> (Array2<f64>, Array2<f64>) {
        meshgrid(self.centres[0].view(), self.centres[1].view())
    }

    pub fn edge_mesh(&self) -> (Array2<f64>, Array2<f64>) {
        meshgrid(self.edges[0].view(), self.edges[1].view())
    }
}

/// Margin actually used around the triangle.
///
/// Unless forced, the margin shrinks to the smallest positive part of the
/// closed data so no sample falls outside the grid.
pub fn effective_margin(closed: ArrayView2<f64>, margin: f64, force: bool) -> f64 {
    if force {
        return margin;
    }
    match crate::codata::min_positive(closed) {
        Some(smallest) => margin.min(smallest),
        None => margin,
    }
}

/// Corners of the inset triangle at `margin` from each edge, as compositions
pub fn boundary_polygon(margin: f64) -> Array2<f64> {
    let inner = 1.0 - 2.0 * margin;
    ndarray::array![
        [margin, margin, inner],
        [margin, inner, margin],
        [inner, margin, margin],
    ]
}

/// `n` points spaced evenly by arc length around a polygon.
///
/// The polygon is closed implicitly. The first point is the first vertex and
/// every vertex is included; the remaining points are distributed over the
/// edges by length.
pub fn perimeter_points(polygon: ArrayView2<f64>, n: usize) -> Array2<f64> {
    let m = polygon.nrows();
    let d = polygon.ncols();
    if m == 0 || n == 0 {
        return Array2::zeros((0, d));
    }
    let lengths: Vec<f64> = (0..m)
        .map(|i| {
            let a = polygon.row(i);
            let b = polygon.row((i + 1) % m);
            (&b - &a).mapv(|v| v * v).sum().sqrt()
        })
        .collect();
    let total: f64 = lengths.iter().sum();
    if total == 0.0 || n <= m {
        return polygon.slice(s![..n.min(m), ..]).to_owned();
    }

    // Allocate the points between vertices proportionally to edge length
    let spare = n - m;
    let mut counts: Vec<usize> = lengths
        .iter()
        .map(|l| ((l / total) * spare as f64).floor() as usize)
        .collect();
    let mut assigned: usize = counts.iter().sum();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| lengths[b].total_cmp(&lengths[a]));
    for &i in order.iter().cycle() {
        if assigned >= spare {
            break;
        }
        counts[i] += 1;
        assigned += 1;
    }

    let mut out = Array2::zeros((n, d));
    let mut row = 0;
    for i in 0..m {
        let a = polygon.row(i);
        let b = polygon.row((i + 1) % m);
        let steps = counts[i] + 1;
        for k in 0..steps {
            let t = k as f64 / steps as f64;
            let p = &a + &((&b - &a) * t);
            out.row_mut(row).assign(&p);
            row += 1;
        }
    }
    out
}

/// Densify each row by inserting `n` linearly interpolated points between
/// consecutive samples
pub fn interpolate_lines(lines: ArrayView2<f64>, n: usize) -> Array2<f64> {
    let (rows, cols) = lines.dim();
    if n == 0 || cols < 2 {
        return lines.to_owned();
    }
    let new_cols = cols + (cols - 1) * n;
    let mut out = Array2::zeros((rows, new_cols));
    for (src, mut dst) in lines.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        for j in 0..cols - 1 {
            let (a, b) = (src[j], src[j + 1]);
            for k in 0..=n {
                let t = k as f64 / (n + 1) as f64;
                dst[j * (n + 1) + k] = a + (b - a) * t;
            }
        }
        dst[new_cols - 1] = src[cols - 1];
    }
    out
}
