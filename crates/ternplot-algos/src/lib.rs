//! Computational algorithms for ternary diagrams
//!
//! This crate provides the numeric pipeline behind ternary density plots of
//! compositional data:
//! - 2D affine maps and the simplex ↔ plane coordinate converter
//! - Log-ratio transforms (clr, alr, ilr) behind a pluggable adapter
//! - Evaluation grids, bin centre/edge conversion and margin handling
//! - Histogram and Gaussian kernel density estimation
//! - Percentile contour thresholds by numerical integration
//! - Covariance ellipse, principal component and hull overlays drawn onto a
//!   caller-supplied [`Canvas`]
//!
//! All routines are synchronous and side-effect free apart from `log`
//! records and the canvas they are handed.

pub mod codata;
mod conditional;
mod contour;
pub mod density;
pub mod grid;
mod heatmap;
mod hull;
pub mod linalg;
mod overlay;
mod simplex;
pub mod stats;
mod transform;

pub use conditional::{conditional_prob_density, ConditionalDensity, IndependentAxis};
pub use contour::{percentile_contour_values, ContourLabel, ContourLevels};
pub use heatmap::{ternary_heatmap, TernaryHeatmap};
pub use hull::convex_hull_2d;
pub use linalg::Affine2;
pub use overlay::{
    draw_vector, extent, nan_marginals, pca_vectors, plot_2dhull, plot_z_percentiles,
    stdev_ellipses, Canvas, ContourLine, NanMarginals, PercentileContours, PointTransform,
    Stroke,
};
pub use simplex::{plane_to_simplex, simplex_to_plane, SimplexConverter};
pub use transform::{
    CompositionalTransformer, IlrTransformer, LogRatioTransform, ResolvedTransform, TransformFn,
};

use ternplot_settings::{DensityMode, SettingError};

/// Errors from the coordinate and density pipeline
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("Expected trailing dimension of {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Mismatched shapes: {0}")]
    ShapeMismatch(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Settings(#[from] SettingError),

    #[error("Singular covariance matrix ({0}); perturb the input or reduce its dimensionality")]
    SingularCovariance(String),

    #[error("Not enough data: {0}")]
    InsufficientData(String),

    #[error("Mode '{mode}' is not implemented for {context}")]
    UnsupportedMode {
        mode: DensityMode,
        context: &'static str,
    },
}

impl PlotError {
    /// Trailing-dimension mismatch
    pub fn shape(expected: usize, actual: usize) -> Self {
        PlotError::Shape { expected, actual }
    }

    /// Whether the error comes from an ill-conditioned numerical input
    pub fn is_numerical(&self) -> bool {
        matches!(self, PlotError::SingularCovariance(_))
    }
}

/// Result type for pipeline operations
pub type PlotResult<T> = Result<T, PlotError>;
