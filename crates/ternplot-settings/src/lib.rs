//! Ternplot Settings
//!
//! Explicit configuration for the ternplot routines. Every estimation and
//! overlay call takes its settings as an argument; nothing here is global.
//!
//! - [`HeatmapSettings`] - bins, margin, background suppression, mode, aspect
//! - [`ConditionalSettings`] - conditional density grid and mode
//! - [`ContourSettings`] - percentiles and threshold resolution
//! - [`OverlaySettings`] - covariance ellipses and principal components
//! - [`ColormapSettings`] - named continuous and discrete colormaps
//!
//! # Example
//!
//! ```rust
//! use ternplot_settings::{Aspect, DensityMode, HeatmapSettings};
//!
//! let settings = HeatmapSettings::default()
//!     .with_bins(20)
//!     .with_mode("density".parse::<DensityMode>().unwrap())
//!     .with_aspect(Aspect::Unit);
//! assert!(settings.validate().is_ok());
//! ```

mod error;
mod mode;
mod settings;

pub use error::SettingError;
pub use mode::{Aspect, DensityMode};
pub use settings::{
    ColormapSettings, ConditionalSettings, ContourSettings, HeatmapSettings, OverlaySettings,
    PlotSettings,
};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::{
        Aspect, ConditionalSettings, ContourSettings, DensityMode, HeatmapSettings,
        PlotSettings, SettingError,
    };
}
