//! Settings structs with defaults and validation

use serde::{Deserialize, Serialize};

use crate::error::SettingError;
use crate::mode::{Aspect, DensityMode};

/// Settings for the ternary heatmap pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapSettings {
    /// Number of bin centres per transformed dimension
    pub bins: usize,
    /// Margin around the simplex boundary used to build the grid, in (0, 1/3)
    pub margin: f64,
    /// Use `margin` as given instead of shrinking it to the data
    pub force_margin: bool,
    /// Replace empty cells with NaN so renderers skip them
    pub remove_background: bool,
    /// Estimation mode
    pub mode: DensityMode,
    /// Aspect of the ternary diagram
    pub aspect: Aspect,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        HeatmapSettings {
            bins: 10,
            margin: 0.01,
            force_margin: false,
            remove_background: true,
            mode: DensityMode::Histogram,
            aspect: Aspect::Equilateral,
        }
    }
}

impl HeatmapSettings {
    /// Set the bin count
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Set the estimation mode
    pub fn with_mode(mut self, mode: DensityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the ternary aspect
    pub fn with_aspect(mut self, aspect: Aspect) -> Self {
        self.aspect = aspect;
        self
    }

    /// Set the margin; `force` keeps it even when data lie closer to the boundary
    pub fn with_margin(mut self, margin: f64, force: bool) -> Self {
        self.margin = margin;
        self.force_margin = force;
        self
    }

    /// Keep or suppress empty cells
    pub fn with_background(mut self, remove: bool) -> Self {
        self.remove_background = remove;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), SettingError> {
        if self.bins < 2 {
            return Err(SettingError::invalid(
                "bins",
                format!("need at least 2 bins, got {}", self.bins),
            ));
        }
        if !(self.margin > 0.0 && self.margin < 1.0 / 3.0) {
            return Err(SettingError::invalid(
                "margin",
                format!("value {} is outside range (0, 1/3)", self.margin),
            ));
        }
        Ok(())
    }
}

/// Settings for conditional probability density estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalSettings {
    /// Logarithmic spacing of the dependent-variable grid
    pub logy: bool,
    /// Points inserted between consecutive samples along each line
    pub resolution: usize,
    /// Number of grid points along the dependent axis
    pub ybins: usize,
    /// Rescale each column to share the global maximum
    pub rescale: bool,
    /// Estimation mode
    pub mode: DensityMode,
}

impl Default for ConditionalSettings {
    fn default() -> Self {
        ConditionalSettings {
            logy: false,
            resolution: 5,
            ybins: 100,
            rescale: true,
            mode: DensityMode::BinKde,
        }
    }
}

impl ConditionalSettings {
    /// Set the estimation mode
    pub fn with_mode(mut self, mode: DensityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), SettingError> {
        if self.ybins < 2 {
            return Err(SettingError::invalid(
                "ybins",
                format!("need at least 2 bins, got {}", self.ybins),
            ));
        }
        Ok(())
    }
}

/// Settings for percentile contour extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourSettings {
    /// Fractions of total mass to enclose, each in (0, 1]
    pub percentiles: Vec<f64>,
    /// Number of thresholds between 0 and max(Z)
    pub resolution: usize,
}

impl Default for ContourSettings {
    fn default() -> Self {
        ContourSettings {
            percentiles: vec![0.95, 0.66, 0.33],
            resolution: 1000,
        }
    }
}

impl ContourSettings {
    /// Replace the requested percentiles
    pub fn with_percentiles(mut self, percentiles: impl Into<Vec<f64>>) -> Self {
        self.percentiles = percentiles.into();
        self
    }

    /// Set the threshold resolution
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), SettingError> {
        if self.percentiles.is_empty() {
            return Err(SettingError::invalid("percentiles", "no percentiles requested"));
        }
        if let Some(p) = self.percentiles.iter().find(|p| !(**p > 0.0 && **p <= 1.0)) {
            return Err(SettingError::invalid(
                "percentiles",
                format!("value {} is outside range (0, 1]", p),
            ));
        }
        if self.resolution < 2 {
            return Err(SettingError::invalid(
                "resolution",
                format!("need at least 2 thresholds, got {}", self.resolution),
            ));
        }
        Ok(())
    }
}

/// Settings for covariance-ellipse and principal-component overlays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Number of standard-deviation ellipses
    pub ellipse_nstds: usize,
    /// Length multiplier for principal component lines
    pub pca_nstds: usize,
    /// Scale applied to all plotted x-y points
    pub scale: f64,
    /// Vertices per ellipse
    pub ellipse_resolution: usize,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        OverlaySettings {
            ellipse_nstds: 4,
            pca_nstds: 2,
            scale: 100.0,
            ellipse_resolution: 1000,
        }
    }
}

impl OverlaySettings {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), SettingError> {
        if self.ellipse_resolution < 3 {
            return Err(SettingError::invalid(
                "ellipse_resolution",
                format!("need at least 3 vertices, got {}", self.ellipse_resolution),
            ));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SettingError::invalid(
                "scale",
                format!("value {} must be finite and positive", self.scale),
            ));
        }
        Ok(())
    }
}

/// Named colormaps used when a caller does not pass one explicitly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColormapSettings {
    /// Continuous colormap (densities, contour levels)
    pub continuous: String,
    /// Discrete palette (categories)
    pub discrete: String,
}

impl Default for ColormapSettings {
    fn default() -> Self {
        ColormapSettings {
            continuous: "viridis".to_string(),
            discrete: "tab10".to_string(),
        }
    }
}

/// All plotting settings in one place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub heatmap: HeatmapSettings,
    pub conditional: ConditionalSettings,
    pub contour: ContourSettings,
    pub overlay: OverlaySettings,
    pub colormaps: ColormapSettings,
}

impl PlotSettings {
    /// Validate every section
    pub fn validate(&self) -> Result<(), SettingError> {
        self.heatmap.validate()?;
        self.conditional.validate()?;
        self.contour.validate()?;
        self.overlay.validate()?;
        Ok(())
    }

    /// Serialize to a JSON preset
    pub fn to_json(&self) -> Result<String, SettingError> {
        serde_json::to_string_pretty(self).map_err(|e| SettingError::Serialization(e.to_string()))
    }

    /// Load and validate a JSON preset; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingError> {
        let settings: PlotSettings =
            serde_json::from_str(json).map_err(|e| SettingError::Deserialization(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}
