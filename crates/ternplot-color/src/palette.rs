//! Discrete palettes and the named colormap registry

use ahash::AHashMap;
use ternplot_settings::ColormapSettings;

use crate::{Color, ColorError, ColorRamp};

/// Ordered set of categorical colors; indices wrap around
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: String,
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette from rgb8 triples
    pub fn from_rgb8(name: impl Into<String>, colors: &[[u8; 3]]) -> Self {
        Palette {
            name: name.into(),
            colors: colors.iter().copied().map(Color::from).collect(),
        }
    }

    /// Color for category `index`, cycling through the palette
    pub fn get(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return Color::BLACK;
        }
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Ten-color categorical palette
    pub fn tab10() -> Self {
        Palette::from_rgb8(
            "tab10",
            &[
                [0x1f, 0x77, 0xb4],
                [0xff, 0x7f, 0x0e],
                [0x2c, 0xa0, 0x2c],
                [0xd6, 0x27, 0x28],
                [0x94, 0x67, 0xbd],
                [0x8c, 0x56, 0x4b],
                [0xe3, 0x77, 0xc2],
                [0x7f, 0x7f, 0x7f],
                [0xbc, 0xbd, 0x22],
                [0x17, 0xbe, 0xcf],
            ],
        )
    }

    /// Nine-color qualitative palette
    pub fn set1() -> Self {
        Palette::from_rgb8(
            "set1",
            &[
                [0xe4, 0x1a, 0x1c],
                [0x37, 0x7e, 0xb8],
                [0x4d, 0xaf, 0x4a],
                [0x98, 0x4e, 0xa3],
                [0xff, 0x7f, 0x00],
                [0xff, 0xff, 0x33],
                [0xa6, 0x56, 0x28],
                [0xf7, 0x81, 0xbf],
                [0x99, 0x99, 0x99],
            ],
        )
    }
}

/// Registry of continuous ramps and discrete palettes by name
#[derive(Debug)]
pub struct Colormaps {
    ramps: AHashMap<String, ColorRamp>,
    palettes: AHashMap<String, Palette>,
}

impl Colormaps {
    /// Create a registry holding the built-in ramps and palettes
    pub fn new() -> Self {
        let mut registry = Colormaps {
            ramps: AHashMap::new(),
            palettes: AHashMap::new(),
        };
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        for ramp in [
            ColorRamp::viridis(),
            ColorRamp::magma(),
            ColorRamp::grayscale(),
            ColorRamp::hot(),
            ColorRamp::bwr(),
        ] {
            self.ramps.insert(ramp.name.to_lowercase(), ramp);
        }
        self.register_palette(Palette::tab10());
        self.register_palette(Palette::set1());
    }

    /// Register (or replace) a continuous ramp under its own name
    pub fn register_ramp(&mut self, ramp: ColorRamp) -> Result<(), ColorError> {
        ramp.validate()?;
        self.ramps.insert(ramp.name.to_lowercase(), ramp);
        Ok(())
    }

    /// Register (or replace) a discrete palette under its own name
    pub fn register_palette(&mut self, palette: Palette) {
        self.palettes.insert(palette.name.to_lowercase(), palette);
    }

    /// Look up a continuous ramp (case-insensitive)
    pub fn ramp(&self, name: &str) -> Result<&ColorRamp, ColorError> {
        self.ramps
            .get(&name.to_lowercase())
            .ok_or_else(|| ColorError::NotFound(name.to_string()))
    }

    /// Look up a discrete palette (case-insensitive)
    pub fn palette(&self, name: &str) -> Result<&Palette, ColorError> {
        self.palettes
            .get(&name.to_lowercase())
            .ok_or_else(|| ColorError::NotFound(name.to_string()))
    }

    /// Resolve the continuous ramp named in the settings
    pub fn continuous(&self, settings: &ColormapSettings) -> Result<&ColorRamp, ColorError> {
        self.ramp(&settings.continuous)
    }

    /// Resolve the discrete palette named in the settings
    pub fn discrete(&self, settings: &ColormapSettings) -> Result<&Palette, ColorError> {
        self.palette(&settings.discrete)
    }

    /// All registered ramp names, sorted
    pub fn ramp_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ramps.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl Default for Colormaps {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let tab10 = Palette::tab10();
        assert_eq!(tab10.len(), 10);
        assert_eq!(tab10.get(0), tab10.get(10));
        assert_eq!(tab10.get(3).to_hex(), "#d62728");
    }

    #[test]
    fn test_resolve_default_settings() {
        let maps = Colormaps::new();
        let settings = ColormapSettings::default();
        assert_eq!(maps.continuous(&settings).unwrap().name, "viridis");
        assert_eq!(maps.discrete(&settings).unwrap().name, "tab10");
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let maps = Colormaps::new();
        assert!(maps.ramp("Magma").is_ok());
        assert!(maps.palette("SET1").is_ok());
    }

    #[test]
    fn test_unknown_colormap() {
        let maps = Colormaps::new();
        let settings = ColormapSettings {
            continuous: "jet".into(),
            ..ColormapSettings::default()
        };
        assert_eq!(
            maps.continuous(&settings).unwrap_err(),
            ColorError::NotFound("jet".into())
        );
    }

    #[test]
    fn test_register_custom_ramp() {
        let mut maps = Colormaps::new();
        let ocean = ColorRamp::from_stops("Ocean", &[(0.0, [0, 0, 64]), (1.0, [0, 255, 255])]);
        maps.register_ramp(ocean).unwrap();
        assert!(maps.ramp_names().contains(&"ocean"));
        assert!(maps.register_ramp(ColorRamp::new("flat")).is_err());
        assert!(maps.ramp("flat").is_err());
    }
}
