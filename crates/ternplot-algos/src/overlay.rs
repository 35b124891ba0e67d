//! Overlay geometry drawn onto a caller-supplied canvas
//!
//! The routines here compute polylines, polygons and contour levels in plot
//! coordinates and hand them to a [`Canvas`]; rasterizing them is the
//! canvas's business. Each routine also returns the geometry it drew.

use std::f64::consts::PI;

use ahash::AHashMap;
use ndarray::{concatenate, Array1, Array2, ArrayView1, ArrayView2, Axis};
use ternplot_color::{Color, ColorRamp};
use ternplot_settings::{ContourSettings, OverlaySettings};

use crate::contour::{percentile_contour_values, ContourLevels};
use crate::density::histogram1d;
use crate::grid::{linspace, nan_min_max};
use crate::hull::convex_hull_2d;
use crate::simplex::SimplexConverter;
use crate::stats::{eigsorted, nancov, nanmean, pca, vector_to_line};
use crate::{PlotError, PlotResult};

/// Number of bins along each marginal in [`nan_marginals`]
const MARGINAL_BINS: usize = 50;

/// Optional map applied to overlay points before they are placed on the
/// diagram, e.g. an inverse log-ratio transform back onto the simplex
pub type PointTransform<'a> = Option<&'a dyn Fn(ArrayView2<f64>) -> Array2<f64>>;

/// Line and fill style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Edge color; `None` leaves the choice to the canvas
    pub color: Option<Color>,
    /// Fill color for closed shapes
    pub fill: Option<Color>,
    pub alpha: f32,
    pub width: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke {
            color: None,
            fill: None,
            alpha: 1.0,
            width: 1.0,
        }
    }
}

impl Stroke {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }
}

/// One contour level as handed to [`Canvas::contour`]
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLine {
    pub level: f64,
    pub label: String,
    pub color: Color,
}

/// Rendering backend for overlays
///
/// Points are `n × 2` arrays in plot coordinates.
pub trait Canvas {
    /// Draw an open polyline
    fn polyline(&mut self, points: ArrayView2<f64>, stroke: &Stroke);

    /// Draw a closed polygon; the last point connects back to the first
    fn polygon(&mut self, points: ArrayView2<f64>, stroke: &Stroke);

    /// Draw an arrow from `from` to `to`
    fn arrow(&mut self, from: [f64; 2], to: [f64; 2], stroke: &Stroke);

    /// Draw iso-lines of `zi` over the centre meshes `xi`/`yi`
    ///
    /// `extent` is `[xmin, xmax, ymin, ymax]`.
    fn contour(
        &mut self,
        xi: ArrayView2<f64>,
        yi: ArrayView2<f64>,
        zi: ArrayView2<f64>,
        extent: [f64; 4],
        lines: &[ContourLine],
    );
}

/// Bring overlay points into plot coordinates: apply the optional
/// transform, map 3-part compositions onto the equilateral diagram and scale
fn to_plot_coords(
    points: Array2<f64>,
    transform: PointTransform<'_>,
    scale: f64,
) -> PlotResult<Array2<f64>> {
    let points = match transform {
        Some(f) => f(points.view()),
        None => points,
    };
    let xy = match points.ncols() {
        3 => SimplexConverter::equilateral().forward(points.view())?,
        2 => points,
        other => return Err(PlotError::shape(2, other)),
    };
    Ok(xy * scale)
}

/// Covariance ellipses at `1..=nstds` standard deviations around the mean of
/// `n × 2` data.
///
/// Drawn outermost first with alpha `1/nstd`, a black edge and width 0.5;
/// the fill comes from `stroke`.
pub fn stdev_ellipses(
    canvas: &mut dyn Canvas,
    comp: ArrayView2<f64>,
    settings: &OverlaySettings,
    transform: PointTransform<'_>,
    stroke: &Stroke,
) -> PlotResult<Vec<Array2<f64>>> {
    settings.validate()?;
    if comp.ncols() != 2 {
        return Err(PlotError::shape(2, comp.ncols()));
    }
    let mean = nanmean(comp);
    let (vals, vecs) = eigsorted(&nancov(comp)?);
    let theta = vecs[[1, 0]].atan2(vecs[[0, 0]]);
    let (sin_t, cos_t) = theta.sin_cos();

    let res = settings.ellipse_resolution;
    let mut ellipses = Vec::with_capacity(settings.ellipse_nstds);
    for nstd in (1..=settings.ellipse_nstds).rev() {
        let a = nstd as f64 * vals[0].abs().sqrt();
        let b = nstd as f64 * vals[1].abs().sqrt();
        let points = Array2::from_shape_fn((res, 2), |(k, dim)| {
            let phi = 2.0 * PI * k as f64 / res as f64;
            let (u, v) = (a * phi.cos(), b * phi.sin());
            match dim {
                0 => mean[0] + u * cos_t - v * sin_t,
                _ => mean[1] + u * sin_t + v * cos_t,
            }
        });
        let xy = to_plot_coords(points, transform, settings.scale)?;
        let style = stroke
            .with_color(Color::BLACK)
            .with_alpha(1.0 / nstd as f32)
            .with_width(0.5);
        canvas.polygon(xy.view(), &style);
        ellipses.push(xy);
    }
    Ok(ellipses)
}

/// Lines along the first two principal components of `comp`, each spanning
/// `±pca_nstds` standard deviations
pub fn pca_vectors(
    canvas: &mut dyn Canvas,
    comp: ArrayView2<f64>,
    settings: &OverlaySettings,
    transform: PointTransform<'_>,
    stroke: &Stroke,
) -> PlotResult<Vec<Array2<f64>>> {
    settings.validate()?;
    let fit = pca(comp, 2)?;
    let mut lines = Vec::with_capacity(2);
    for (variance, component) in fit.explained_variance.iter().zip(fit.components.rows()) {
        let line = vector_to_line(fit.mean.view(), component, *variance, settings.pca_nstds, 10)?;
        let xy = to_plot_coords(line, transform, settings.scale)?;
        canvas.polyline(xy.view(), stroke);
        lines.push(xy);
    }
    Ok(lines)
}

/// Arrow from `v0` to `v1`
pub fn draw_vector(canvas: &mut dyn Canvas, v0: [f64; 2], v1: [f64; 2], stroke: &Stroke) {
    canvas.arrow(v0, v1, stroke);
}

/// Closed outline of the convex hull of `n × 2` points; the first vertex is
/// repeated at the end
pub fn plot_2dhull(
    canvas: &mut dyn Canvas,
    data: ArrayView2<f64>,
    stroke: &Stroke,
) -> PlotResult<Array2<f64>> {
    let hull = convex_hull_2d(data)?;
    let closed = concatenate(Axis(0), &[hull.view(), hull.slice(ndarray::s![..1, ..])])
        .map_err(|e| PlotError::ShapeMismatch(e.to_string()))?;
    canvas.polyline(closed.view(), stroke);
    Ok(closed)
}

/// `[xmin, xmax, ymin, ymax]` of the given meshes, ignoring NaN
pub fn extent(xi: ArrayView2<f64>, yi: ArrayView2<f64>) -> PlotResult<[f64; 4]> {
    let flat = |m: ArrayView2<f64>| Array1::from_iter(m.iter().copied());
    let (xmin, xmax) = nan_min_max(flat(xi).view())
        .ok_or_else(|| PlotError::InsufficientData("x mesh has no values".to_string()))?;
    let (ymin, ymax) = nan_min_max(flat(yi).view())
        .ok_or_else(|| PlotError::InsufficientData("y mesh has no values".to_string()))?;
    Ok([xmin, xmax, ymin, ymax])
}

/// Result of [`plot_z_percentiles`]
#[derive(Debug, Clone)]
pub struct PercentileContours {
    pub extent: [f64; 4],
    pub levels: ContourLevels,
    pub lines: Vec<ContourLine>,
}

/// Percentile contours of `zi` drawn over the centre meshes.
///
/// The extent defaults to the mesh range. Levels are colored along `ramp` in
/// order and labelled by percentile, or through `labels` keyed by the
/// percentile text (`"0.95"`).
#[allow(clippy::too_many_arguments)]
pub fn plot_z_percentiles(
    canvas: &mut dyn Canvas,
    xi: ArrayView2<f64>,
    yi: ArrayView2<f64>,
    zi: ArrayView2<f64>,
    extent_override: Option<[f64; 4]>,
    settings: &ContourSettings,
    ramp: &ColorRamp,
    labels: Option<&AHashMap<String, String>>,
) -> PlotResult<PercentileContours> {
    if xi.dim() != zi.dim() || yi.dim() != zi.dim() {
        return Err(PlotError::ShapeMismatch(format!(
            "x {:?}, y {:?} and z {:?} meshes differ",
            xi.dim(),
            yi.dim(),
            zi.dim()
        )));
    }
    let extent = match extent_override {
        Some(e) => e,
        None => extent(xi, yi)?,
    };
    let levels = percentile_contour_values(zi, settings)?;

    let n = levels.len();
    let lines: Vec<ContourLine> = levels
        .label_strings(labels)
        .into_iter()
        .zip(levels.thresholds.iter())
        .enumerate()
        .map(|(i, (label, &level))| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.5 };
            ContourLine {
                level,
                label,
                color: ramp.get_color(t),
            }
        })
        .collect();
    canvas.contour(xi, yi, zi, extent, &lines);
    Ok(PercentileContours {
        extent,
        levels,
        lines,
    })
}

/// Scatter data split by missingness, with marginal histograms of the points
/// missing their other coordinate
#[derive(Debug, Clone)]
pub struct NanMarginals {
    /// Rows where both coordinates are finite
    pub paired: Array2<f64>,
    /// Finite x values whose y is NaN
    pub x_only: Array1<f64>,
    /// Finite y values whose x is NaN
    pub y_only: Array1<f64>,
    pub x_bins: Array1<f64>,
    pub y_bins: Array1<f64>,
    pub x_counts: Array1<f64>,
    pub y_counts: Array1<f64>,
}

/// Prepare a scatter with marginals for partially missing data.
///
/// Bin edges span each variable's range plus one bin width.
pub fn nan_marginals(x: ArrayView1<f64>, y: ArrayView1<f64>) -> PlotResult<NanMarginals> {
    if x.len() != y.len() {
        return Err(PlotError::ShapeMismatch(format!(
            "x has {} values, y has {}",
            x.len(),
            y.len()
        )));
    }
    let pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let paired: Vec<f64> = pairs
        .iter()
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .flat_map(|&(a, b)| [a, b])
        .collect();
    let paired = Array2::from_shape_vec((paired.len() / 2, 2), paired)
        .map_err(|e| PlotError::ShapeMismatch(e.to_string()))?;
    let x_only: Array1<f64> = pairs
        .iter()
        .filter(|(a, b)| b.is_nan() && a.is_finite())
        .map(|&(a, _)| a)
        .collect();
    let y_only: Array1<f64> = pairs
        .iter()
        .filter(|(a, b)| a.is_nan() && b.is_finite())
        .map(|&(_, b)| b)
        .collect();

    let bins = |values: ArrayView1<f64>, name: &str| -> PlotResult<Array1<f64>> {
        let (lo, hi) = nan_min_max(values)
            .ok_or_else(|| PlotError::InsufficientData(format!("{name} has no values")))?;
        let width = (hi - lo) / MARGINAL_BINS as f64;
        Ok(linspace(lo, hi + width, MARGINAL_BINS))
    };
    let x_bins = bins(x, "x")?;
    let y_bins = bins(y, "y")?;
    let x_counts = histogram1d(x_only.view(), x_bins.view());
    let y_counts = histogram1d(y_only.view(), y_bins.view());

    Ok(NanMarginals {
        paired,
        x_only,
        y_only,
        x_bins,
        y_bins,
        x_counts,
        y_counts,
    })
}
