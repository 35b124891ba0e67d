//! Ternary aspect and density estimation modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SettingError;

/// Aspect of the ternary diagram.
///
/// Controls the vertical scale applied when mapping compositions into the
/// plane: an equilateral triangle (`yscale = √3/2`) or a right triangle
/// inside the unit square (`yscale = 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// Triangle inscribed in the unit square.
    Unit,
    /// Equilateral triangle with unit base.
    #[default]
    Equilateral,
}

impl Aspect {
    /// Parse from a string alias (case-insensitive).
    pub fn from_str_alias(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unit" | "square" => Some(Aspect::Unit),
            "equilateral" | "eq" => Some(Aspect::Equilateral),
            _ => None,
        }
    }

    /// Horizontal scale of the simplex-to-plane map.
    pub fn xscale(&self) -> f64 {
        1.0
    }

    /// Vertical scale of the simplex-to-plane map.
    pub fn yscale(&self) -> f64 {
        match self {
            Aspect::Unit => 1.0,
            Aspect::Equilateral => 3.0_f64.sqrt() / 2.0,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Aspect::Unit => "unit",
            Aspect::Equilateral => "equilateral",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aspect {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aspect::from_str_alias(s).ok_or_else(|| SettingError::UnknownAspect(s.to_string()))
    }
}

/// Density estimation mode.
///
/// Not every estimator implements every mode; an estimator handed a mode it
/// does not support reports it as unsupported rather than ignoring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityMode {
    /// Counts per bin.
    #[default]
    Histogram,
    /// Gaussian kernel density estimate over the joint distribution.
    Density,
    /// One-dimensional kernel density estimate per independent-axis bin.
    BinKde,
    /// Conditional multivariate kernel density estimate.
    ConditionalKde,
    /// Hexagonal binning.
    Hexbin,
}

impl DensityMode {
    /// Parse from a string alias (case-insensitive).
    ///
    /// Any string containing `hist` selects [`DensityMode::Histogram`] and any
    /// string containing `hex` selects [`DensityMode::Hexbin`].
    pub fn from_str_alias(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "density" | "kde" => Some(DensityMode::Density),
            "binkde" => Some(DensityMode::BinKde),
            "ckde" => Some(DensityMode::ConditionalKde),
            other if other.contains("hist") => Some(DensityMode::Histogram),
            other if other.contains("hex") => Some(DensityMode::Hexbin),
            _ => None,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            DensityMode::Histogram => "histogram",
            DensityMode::Density => "density",
            DensityMode::BinKde => "binkde",
            DensityMode::ConditionalKde => "ckde",
            DensityMode::Hexbin => "hexbin",
        }
    }
}

impl fmt::Display for DensityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DensityMode {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DensityMode::from_str_alias(s).ok_or_else(|| SettingError::UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_aliases() {
        assert_eq!(Aspect::from_str_alias("unit"), Some(Aspect::Unit));
        assert_eq!(Aspect::from_str_alias("EQ"), Some(Aspect::Equilateral));
        assert_eq!(Aspect::from_str_alias("equilateral"), Some(Aspect::Equilateral));
        assert!("oblique".parse::<Aspect>().is_err());
    }

    #[test]
    fn test_aspect_scales() {
        assert_eq!(Aspect::Unit.yscale(), 1.0);
        assert!((Aspect::Equilateral.yscale() - 0.866_025_403_784).abs() < 1e-9);
        assert_eq!(Aspect::Equilateral.xscale(), 1.0);
    }

    #[test]
    fn test_density_mode_aliases() {
        assert_eq!(DensityMode::from_str_alias("histogram"), Some(DensityMode::Histogram));
        assert_eq!(DensityMode::from_str_alias("hist"), Some(DensityMode::Histogram));
        assert_eq!(DensityMode::from_str_alias("Hist2d"), Some(DensityMode::Histogram));
        assert_eq!(DensityMode::from_str_alias("density"), Some(DensityMode::Density));
        assert_eq!(DensityMode::from_str_alias("kde"), Some(DensityMode::Density));
        assert_eq!(DensityMode::from_str_alias("binkde"), Some(DensityMode::BinKde));
        assert_eq!(DensityMode::from_str_alias("hexbin"), Some(DensityMode::Hexbin));
        assert_eq!(DensityMode::from_str_alias("bogus"), None);
    }

    #[test]
    fn test_density_mode_from_str_error() {
        let err = "spline".parse::<DensityMode>().unwrap_err();
        assert_eq!(err, SettingError::UnknownMode("spline".into()));
    }
}
