//! Color ramps for continuous coloring

use serde::{Deserialize, Serialize};

use crate::{Color, ColorError};

/// Type of color ramp interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RampType {
    /// Linear interpolation in RGB space
    Linear,
    /// Smooth step interpolation
    Smooth,
}

/// A color ramp for mapping values in [0, 1] to colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorRamp {
    /// Name of the ramp
    pub name: String,
    /// Control points: (value, color) pairs, sorted by value
    points: Vec<(f32, Color)>,
    /// Interpolation type
    pub ramp_type: RampType,
}

impl ColorRamp {
    /// Create a new, empty color ramp
    pub fn new(name: impl Into<String>) -> Self {
        ColorRamp {
            name: name.into(),
            points: Vec::new(),
            ramp_type: RampType::Linear,
        }
    }

    /// Build a ramp from `(value, rgb8)` stops
    pub fn from_stops(name: impl Into<String>, stops: &[(f32, [u8; 3])]) -> Self {
        let mut ramp = ColorRamp::new(name);
        for &(value, rgb) in stops {
            ramp.add_point(value, Color::from(rgb));
        }
        ramp
    }

    /// Add a control point
    pub fn add_point(&mut self, value: f32, color: Color) -> &mut Self {
        self.points.push((value, color));
        self.points.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }

    /// Set the interpolation type
    pub fn with_type(mut self, ramp_type: RampType) -> Self {
        self.ramp_type = ramp_type;
        self
    }

    /// Number of control points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the ramp has no control points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check that the ramp has at least two stops at finite positions
    pub fn validate(&self) -> Result<(), ColorError> {
        if self.points.len() < 2 {
            return Err(ColorError::InvalidRamp(format!(
                "'{}' needs at least 2 stops, has {}",
                self.name,
                self.points.len()
            )));
        }
        if let Some((v, _)) = self.points.iter().find(|(v, _)| !v.is_finite()) {
            return Err(ColorError::InvalidRamp(format!(
                "'{}' has a stop at {v}",
                self.name
            )));
        }
        Ok(())
    }

    /// Color at `value`; values outside the stops take the end colors and
    /// NaN takes the first
    pub fn get_color(&self, value: f32) -> Color {
        let (Some(&(lo, first)), Some(&(hi, last))) = (self.points.first(), self.points.last())
        else {
            return Color::WHITE;
        };
        if value.is_nan() || value <= lo {
            return first;
        }
        if value >= hi {
            return last;
        }
        let upper = self.points.partition_point(|(v, _)| *v < value);
        let (v0, c0) = self.points[upper - 1];
        let (v1, c1) = self.points[upper];
        let t = (value - v0) / (v1 - v0);
        let t = match self.ramp_type {
            RampType::Linear => t,
            RampType::Smooth => t * t * (3.0 - 2.0 * t),
        };
        c0.lerp(&c1, t)
    }

    /// `n` colors evenly spaced over [0, 1]
    pub fn sample(&self, n: usize) -> Vec<Color> {
        match n {
            0 => Vec::new(),
            1 => vec![self.get_color(0.0)],
            _ => (0..n)
                .map(|i| self.get_color(i as f32 / (n - 1) as f32))
                .collect(),
        }
    }

    /// Perceptually uniform blue-green-yellow ramp
    pub fn viridis() -> Self {
        ColorRamp::from_stops(
            "viridis",
            &[
                (0.000, [0x44, 0x01, 0x54]),
                (0.125, [0x48, 0x28, 0x78]),
                (0.250, [0x3e, 0x49, 0x89]),
                (0.375, [0x31, 0x68, 0x8e]),
                (0.500, [0x26, 0x82, 0x8e]),
                (0.625, [0x1f, 0x9e, 0x89]),
                (0.750, [0x35, 0xb7, 0x79]),
                (0.875, [0x6e, 0xce, 0x58]),
                (1.000, [0xfd, 0xe7, 0x25]),
            ],
        )
    }

    /// Perceptually uniform black-purple-cream ramp
    pub fn magma() -> Self {
        ColorRamp::from_stops(
            "magma",
            &[
                (0.000, [0x00, 0x00, 0x04]),
                (0.125, [0x1c, 0x10, 0x44]),
                (0.250, [0x4f, 0x12, 0x7b]),
                (0.375, [0x81, 0x25, 0x81]),
                (0.500, [0xb5, 0x36, 0x7a]),
                (0.625, [0xe5, 0x50, 0x64]),
                (0.750, [0xfb, 0x87, 0x61]),
                (0.875, [0xfe, 0xc2, 0x87]),
                (1.000, [0xfc, 0xfd, 0xbf]),
            ],
        )
    }

    /// Diverging blue-white-red ramp
    pub fn bwr() -> Self {
        ColorRamp::from_stops(
            "bwr",
            &[(0.0, [0x00, 0x00, 0xff]), (0.5, [0xff, 0xff, 0xff]), (1.0, [0xff, 0x00, 0x00])],
        )
    }

    /// Black to white
    pub fn grayscale() -> Self {
        ColorRamp::from_stops("grayscale", &[(0.0, [0, 0, 0]), (1.0, [0xff, 0xff, 0xff])])
    }

    /// Black through red and yellow to white
    pub fn hot() -> Self {
        ColorRamp::from_stops(
            "hot",
            &[
                (0.0, [0x0b, 0x00, 0x00]),
                (0.365, [0xff, 0x00, 0x00]),
                (0.746, [0xff, 0xff, 0x00]),
                (1.0, [0xff, 0xff, 0xff]),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bwr_stops() {
        let ramp = ColorRamp::bwr();

        assert_eq!(ramp.get_color(0.0), Color::BLUE);
        assert_eq!(ramp.get_color(1.0), Color::RED);
        assert_eq!(ramp.get_color(0.5), Color::WHITE);
    }

    #[test]
    fn test_viridis_endpoints() {
        let ramp = ColorRamp::viridis();
        assert_eq!(ramp.get_color(0.0).to_hex(), "#440154");
        assert_eq!(ramp.get_color(1.0).to_hex(), "#fde725");
        // Out of range values clamp to the end stops
        assert_eq!(ramp.get_color(-1.0), ramp.get_color(0.0));
        assert_eq!(ramp.get_color(3.0), ramp.get_color(1.0));
    }

    #[test]
    fn test_sample_counts() {
        let ramp = ColorRamp::grayscale();
        assert!(ramp.sample(0).is_empty());
        assert_eq!(ramp.sample(1), vec![Color::BLACK]);
        let five = ramp.sample(5);
        assert_eq!(five.len(), 5);
        assert_eq!(five[0], Color::BLACK);
        assert_eq!(five[4], Color::WHITE);
    }

    #[test]
    fn test_smooth_and_validation() {
        let smooth = ColorRamp::grayscale().with_type(RampType::Smooth);
        assert!((smooth.get_color(0.25).r - 0.15625).abs() < 1e-6);
        assert!(smooth.validate().is_ok());

        let mut single = ColorRamp::new("single");
        single.add_point(0.0, Color::RED);
        assert!(matches!(single.validate(), Err(ColorError::InvalidRamp(_))));
        assert_eq!(ColorRamp::new("empty").get_color(0.3), Color::WHITE);
    }
}
