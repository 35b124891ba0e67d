//! Ternplot Color System
//!
//! This crate provides the colormaps used when rendering densities and
//! contours:
//! - Continuous color ramps (viridis, magma, grayscale, ...)
//! - Discrete categorical palettes (tab10, set1)
//! - A registry resolving the names held in [`ternplot_settings::ColormapSettings`]

mod color;
mod error;
mod palette;
mod ramp;

pub use color::Color;
pub use error::ColorError;
pub use palette::{Colormaps, Palette};
pub use ramp::{ColorRamp, RampType};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{Color, ColorRamp, Colormaps, Palette};
}
