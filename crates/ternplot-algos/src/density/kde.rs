//! Gaussian kernel density estimation
//!
//! Bandwidth follows Scott's rule, `n^(-1/(d+4))`, applied to the full sample
//! covariance. Points are whitened by the Cholesky factor of the kernel
//! covariance once at construction so each evaluation is a plain sum of
//! isotropic Gaussians.

use std::f64::consts::PI;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::linalg::Cholesky;
use crate::{PlotError, PlotResult};

/// Relative scale of the jitter added by [`GaussianKde::new_perturbed`]
const JITTER_SCALE: f64 = 1e-3;

/// Seed used when callers do not supply one
pub const DEFAULT_JITTER_SEED: u64 = 0x7e57_1a2b;

#[derive(Debug, Clone)]
pub struct GaussianKde {
    chol: Cholesky,
    whitened: Array2<f64>,
    norm: f64,
}

impl GaussianKde {
    /// Fit to `n × d` points (one point per row).
    ///
    /// Fails with [`PlotError::SingularCovariance`] when there are fewer than
    /// two points or the sample covariance is not positive definite.
    pub fn new(points: ArrayView2<f64>) -> PlotResult<Self> {
        let (n, d) = points.dim();
        if d == 0 {
            return Err(PlotError::InsufficientData("points have no dimensions".to_string()));
        }
        if n < 2 {
            return Err(PlotError::SingularCovariance(format!(
                "{n} point(s) in {d} dimension(s)"
            )));
        }

        let factor = (n as f64).powf(-1.0 / (d as f64 + 4.0));
        let cov = sample_covariance(points) * (factor * factor);
        let chol = Cholesky::new(&cov).ok_or_else(|| {
            PlotError::SingularCovariance(format!("{n} points in {d} dimensions"))
        })?;

        let mut whitened = Array2::zeros((n, d));
        for (src, mut dst) in points.rows().into_iter().zip(whitened.rows_mut()) {
            dst.assign(&chol.solve_lower(src));
        }
        let log_norm = 0.5 * (d as f64 * (2.0 * PI).ln() + chol.log_det()) + (n as f64).ln();
        Ok(GaussianKde {
            chol,
            whitened,
            norm: (-log_norm).exp(),
        })
    }

    /// Fit to one-dimensional samples
    pub fn from_values(values: ArrayView1<f64>) -> PlotResult<Self> {
        Self::new(values.insert_axis(Axis(1)))
    }

    /// Fit, retrying once with seeded Gaussian jitter if the covariance is
    /// singular.
    ///
    /// The jitter standard deviation is a small fraction of the largest
    /// per-dimension spread, so non-degenerate dimensions are left
    /// effectively unchanged.
    pub fn new_perturbed(points: ArrayView2<f64>, seed: u64) -> PlotResult<Self> {
        let all: Vec<usize> = (0..points.ncols()).collect();
        Self::new_perturbed_columns(points, &all, seed)
    }

    /// Like [`GaussianKde::new_perturbed`], but only `columns` receive
    /// jitter; the other dimensions keep their observed values
    pub fn new_perturbed_columns(
        points: ArrayView2<f64>,
        columns: &[usize],
        seed: u64,
    ) -> PlotResult<Self> {
        match Self::new(points) {
            Err(PlotError::SingularCovariance(reason)) => {
                log::warn!("Singular covariance ({reason}); retrying with jittered input");
                Self::new(jitter(points, columns, seed)?.view())
            }
            other => other,
        }
    }

    /// Number of dimensions
    pub fn dims(&self) -> usize {
        self.whitened.ncols()
    }

    /// Number of fitted points
    pub fn len(&self) -> usize {
        self.whitened.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.whitened.nrows() == 0
    }

    /// Density at each row of `queries` (`m × d`)
    pub fn evaluate(&self, queries: ArrayView2<f64>) -> PlotResult<Array1<f64>> {
        if queries.ncols() != self.dims() {
            return Err(PlotError::shape(self.dims(), queries.ncols()));
        }
        let mut out = Array1::zeros(queries.nrows());
        for (q, dst) in queries.rows().into_iter().zip(out.iter_mut()) {
            let wq = self.chol.solve_lower(q);
            let sum: f64 = self
                .whitened
                .rows()
                .into_iter()
                .map(|wi| {
                    let d2: f64 = wi.iter().zip(wq.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
                    (-0.5 * d2).exp()
                })
                .sum();
            *dst = sum * self.norm;
        }
        Ok(out)
    }

    /// Density at one-dimensional query values
    pub fn evaluate_values(&self, values: ArrayView1<f64>) -> PlotResult<Array1<f64>> {
        self.evaluate(values.insert_axis(Axis(1)))
    }
}

/// Covariance of the rows of `points` with `n - 1` normalization
fn sample_covariance(points: ArrayView2<f64>) -> Array2<f64> {
    let n = points.nrows();
    let mean = points.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(points.ncols()));
    let centred = &points - &mean;
    centred.t().dot(&centred) / (n as f64 - 1.0)
}

/// Copy of `points` with small seeded Gaussian noise on the given columns
fn jitter(points: ArrayView2<f64>, columns: &[usize], seed: u64) -> PlotResult<Array2<f64>> {
    let (n, d) = points.dim();
    if let Some(&bad) = columns.iter().find(|&&c| c >= d) {
        return Err(PlotError::Config(format!(
            "cannot jitter column {bad} of {d}-dimensional points"
        )));
    }
    let spread = columns
        .iter()
        .map(|&c| {
            if n < 2 {
                return 0.0;
            }
            let col = points.column(c);
            let mean = col.sum() / n as f64;
            (col.mapv(|v| (v - mean) * (v - mean)).sum() / (n as f64 - 1.0)).sqrt()
        })
        .filter(|s| s.is_finite())
        .fold(0.0, f64::max);
    let sd = if spread > 0.0 { spread * JITTER_SCALE } else { JITTER_SCALE };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = points.to_owned();
    for &c in columns {
        for v in out.column_mut(c) {
            let z: f64 = rng.sample(StandardNormal);
            *v += sd * z;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_gaussian_density() {
        // Two symmetric points: the estimate at the midpoint is the kernel
        // value at half the separation, from both points.
        let pts = array![[-1.0], [1.0]];
        let kde = GaussianKde::new(pts.view()).unwrap();
        // variance 2 (ddof 1), Scott factor 2^(-1/5)
        let bw2 = 2.0 * 2f64.powf(-2.0 / 5.0);
        let expected = (-0.5 / bw2).exp() / (2.0 * PI * bw2).sqrt();
        let at0 = kde.evaluate_values(array![0.0].view()).unwrap()[0];
        assert!((at0 - expected).abs() < 1e-12, "{at0} vs {expected}");
    }

    #[test]
    fn test_integrates_to_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = Array1::from_iter((0..200).map(|_| rng.sample::<f64, _>(StandardNormal)));
        let kde = GaussianKde::from_values(values.view()).unwrap();
        let xs = Array1::linspace(-8.0, 8.0, 4001);
        let dens = kde.evaluate_values(xs.view()).unwrap();
        let integral = dens.sum() * (16.0 / 4000.0);
        assert!((integral - 1.0).abs() < 1e-3, "{integral}");
    }

    #[test]
    fn test_bivariate_peak_at_centre() {
        let pts = array![[0.0, 0.0], [1.0, 0.2], [-1.0, -0.1], [0.2, 1.0], [-0.1, -1.0]];
        let kde = GaussianKde::new(pts.view()).unwrap();
        let d = kde.evaluate(array![[0.0, 0.0], [5.0, 5.0]].view()).unwrap();
        assert!(d[0] > d[1]);
        assert!(kde.evaluate(array![[0.0]].view()).is_err());
    }

    #[test]
    fn test_singular_input() {
        let collinear = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        let err = GaussianKde::new(collinear.view()).unwrap_err();
        assert!(err.is_numerical());
        assert!(GaussianKde::new(array![[1.0, 2.0]].view()).unwrap_err().is_numerical());
    }

    #[test]
    fn test_perturbed_fallback() {
        let collinear = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let kde = GaussianKde::new_perturbed(collinear.view(), DEFAULT_JITTER_SEED).unwrap();
        assert_eq!(kde.len(), 4);
        let d = kde.evaluate(array![[1.5, 1.5]].view()).unwrap();
        assert!(d[0].is_finite() && d[0] > 0.0);

        let constant = array![[2.0], [2.0], [2.0]];
        assert!(GaussianKde::new_perturbed(constant.view(), 1).is_ok());
    }

    #[test]
    fn test_jitter_is_seeded() {
        let pts = array![[0.0, 1.0], [2.0, 3.0]];
        let both = [0, 1];
        assert_eq!(jitter(pts.view(), &both, 3).unwrap(), jitter(pts.view(), &both, 3).unwrap());
        assert_ne!(jitter(pts.view(), &both, 3).unwrap(), pts);
        assert!(jitter(pts.view(), &[2], 3).is_err());
    }

    #[test]
    fn test_jitter_selected_columns_only() {
        let pts = array![[0.0, 1.0], [1.0, 2.0], [2.0, 3.0]];
        let out = jitter(pts.view(), &[0], DEFAULT_JITTER_SEED).unwrap();
        assert_eq!(out.column(1), pts.column(1));
        assert_ne!(out.column(0), pts.column(0));

        // collinear (x, y): jittering x alone is enough to fit
        let kde = GaussianKde::new_perturbed_columns(pts.view(), &[0], DEFAULT_JITTER_SEED);
        assert!(kde.is_ok());
        // constant y cannot be rescued by jittering x
        let flat = array![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]];
        assert!(GaussianKde::new_perturbed_columns(flat.view(), &[0], 1)
            .unwrap_err()
            .is_numerical());
    }
}
