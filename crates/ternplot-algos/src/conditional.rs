//! Conditional probability density `P(y | x)` along a shared index
//!
//! Each row of `y` is a line sampled at the positions in `x` (for example a
//! normalized spider diagram). Lines are densified by linear interpolation,
//! then a density is estimated over a grid whose x centres are the line
//! positions themselves.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ternplot_settings::{ConditionalSettings, DensityMode};

use crate::density::{histogram2d, GaussianKde, DEFAULT_JITTER_SEED};
use crate::grid::{
    centres_to_edges, flatten_grid, interpolate_lines, linspace, logspace, meshgrid, nan_min_max,
};
use crate::{PlotError, PlotResult};

/// Independent variable for [`conditional_prob_density`]
#[derive(Debug, Clone, Copy)]
pub enum IndependentAxis<'a> {
    /// One position per column of `y`, shared by every row
    Index(ArrayView1<'a, f64>),
    /// Positions per sample, same shape as `y`
    Grid(ArrayView2<'a, f64>),
}

/// Conditional density on an `ybins × points` grid.
///
/// `xe`/`ye` are edge meshes, `xi`/`yi` centre meshes and `z` the density at
/// the centres.
#[derive(Debug, Clone)]
pub struct ConditionalDensity {
    pub xe: Array2<f64>,
    pub ye: Array2<f64>,
    pub z: Array2<f64>,
    pub xi: Array2<f64>,
    pub yi: Array2<f64>,
}

/// Estimate the density of `y` conditioned on `x`.
///
/// Without `x` the column index `0..points` is used.
pub fn conditional_prob_density(
    y: ArrayView2<f64>,
    x: Option<IndependentAxis>,
    settings: &ConditionalSettings,
) -> PlotResult<ConditionalDensity> {
    settings.validate()?;
    let (rows, cols) = y.dim();
    if rows == 0 || cols < 2 {
        return Err(PlotError::InsufficientData(format!(
            "need at least one line of two points, got {rows} × {cols}"
        )));
    }

    let x = match x {
        None => tile(Array1::from_iter((0..cols).map(|i| i as f64)).view(), rows),
        Some(IndependentAxis::Index(index)) if index.len() == cols => tile(index, rows),
        Some(IndependentAxis::Grid(grid)) if grid.dim() == y.dim() => grid.to_owned(),
        Some(IndependentAxis::Index(index)) => {
            return Err(PlotError::ShapeMismatch(format!(
                "x index has {} entries, y has {cols} columns",
                index.len()
            )))
        }
        Some(IndependentAxis::Grid(grid)) => {
            return Err(PlotError::ShapeMismatch(format!(
                "x is {:?}, y is {:?}; x must match y or index its columns",
                grid.dim(),
                y.dim()
            )))
        }
    };

    let x = interpolate_lines(x.view(), settings.resolution);
    let y = interpolate_lines(y, settings.resolution);

    let mut xx = x.row(0).to_vec();
    xx.sort_by(f64::total_cmp);
    let xx = Array1::from(xx);
    let flat = Array1::from_iter(y.iter().copied());
    let (ylo, yhi) = nan_min_max(flat.view())
        .ok_or_else(|| PlotError::InsufficientData("y has no finite values".to_string()))?;
    let yy = if settings.logy {
        logspace(ylo, yhi, settings.ybins)?
    } else {
        linspace(ylo, yhi, settings.ybins)
    };

    let (xi, yi) = meshgrid(xx.view(), yy.view());
    let xedges = centres_to_edges(xx.view())?;
    let yedges = centres_to_edges(yy.view())?;
    let (xe, ye) = meshgrid(xedges.view(), yedges.view());

    let mut z = match settings.mode {
        DensityMode::BinKde => bin_kde(&y, &yi)?,
        DensityMode::Density => joint_kde(&x, &y, &xx, &xi, &yi)?,
        DensityMode::Histogram => {
            let points = flatten_grid(&[&x, &y]);
            histogram2d(points.view(), xedges.view(), yedges.view())?.reversed_axes()
        }
        other => {
            return Err(PlotError::UnsupportedMode {
                mode: other,
                context: "conditional densities",
            })
        }
    };

    if settings.rescale {
        rescale_columns(&mut z);
    }
    Ok(ConditionalDensity { xe, ye, z, xi, yi })
}

fn tile(index: ArrayView1<f64>, rows: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, index.len()), |(_, j)| index[j])
}

/// One 1D kernel density estimate per column
fn bin_kde(y: &Array2<f64>, yi: &Array2<f64>) -> PlotResult<Array2<f64>> {
    let mut z = Array2::zeros(yi.dim());
    for (col, (samples, mut out)) in y
        .axis_iter(Axis(1))
        .zip(z.axis_iter_mut(Axis(1)))
        .enumerate()
    {
        let samples: Array1<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        let samples = samples.insert_axis(Axis(1));
        let kde = GaussianKde::new_perturbed(samples.view(), DEFAULT_JITTER_SEED)?;
        out.assign(&kde.evaluate_values(yi.column(col))?);
    }
    Ok(z)
}

/// Joint density of `(x, y)` divided by the marginal density of `x`
fn joint_kde(
    x: &Array2<f64>,
    y: &Array2<f64>,
    xx: &Array1<f64>,
    xi: &Array2<f64>,
    yi: &Array2<f64>,
) -> PlotResult<Array2<f64>> {
    let points = crate::density::finite_rows(flatten_grid(&[x, y]).view());
    // only the independent coordinate is perturbed on a singular fit
    let joint = GaussianKde::new_perturbed_columns(points.view(), &[0], DEFAULT_JITTER_SEED)?;
    let marginal =
        GaussianKde::new_perturbed(xx.view().insert_axis(Axis(1)), DEFAULT_JITTER_SEED)?;
    let xdens = marginal.evaluate_values(xx.view())?;

    let values = joint.evaluate(flatten_grid(&[xi, yi]).view())?;
    let mut z = values
        .into_shape_with_order(xi.dim())
        .map_err(|e| PlotError::ShapeMismatch(e.to_string()))?;
    z /= &xdens;
    Ok(z)
}

/// Scale each column so its maximum matches the global maximum.
///
/// Columns whose maximum is zero or NaN are left untouched.
pub(crate) fn rescale_columns(z: &mut Array2<f64>) {
    let colmax: Vec<f64> = z
        .axis_iter(Axis(1))
        .map(|c| c.iter().copied().filter(|v| !v.is_nan()).fold(f64::NAN, f64::max))
        .collect();
    let global = colmax.iter().copied().fold(f64::NAN, f64::max);
    if !global.is_finite() {
        return;
    }
    for (mut col, m) in z.axis_iter_mut(Axis(1)).zip(colmax) {
        if m.is_nan() || m == 0.0 {
            continue;
        }
        let factor = global / m;
        col.mapv_inplace(|v| v * factor);
    }
}
