//! Percentile contours of a scalar field
//!
//! The mass above a threshold `t` is the sum of `Z` over cells with `Z ≥ t`.
//! Sweeping `t` from zero to `max(Z)` gives a non-increasing curve, which is
//! inverted by linear interpolation to find the threshold enclosing a given
//! fraction of the total mass.

use std::fmt;

use ahash::AHashMap;
use ndarray::{Array1, ArrayView2};
use ternplot_settings::ContourSettings;

use crate::grid::linspace;
use crate::{PlotError, PlotResult};

/// Label of one contour level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContourLabel {
    /// Fraction of the total mass enclosed
    Percentile(f64),
    /// Coarsest level resolvable at the requested resolution
    Min,
}

impl fmt::Display for ContourLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContourLabel::Percentile(p) => write!(f, "{p}"),
            ContourLabel::Min => f.write_str("min"),
        }
    }
}

/// Contour levels, ordered by descending percentile
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevels {
    pub labels: Vec<ContourLabel>,
    pub thresholds: Vec<f64>,
}

impl ContourLevels {
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContourLabel, f64)> + '_ {
        self.labels.iter().zip(self.thresholds.iter().copied())
    }

    /// Whether the percentiles could not be resolved and a single `Min`
    /// level was returned instead
    pub fn is_fallback(&self) -> bool {
        matches!(self.labels.as_slice(), [ContourLabel::Min])
    }

    /// Text for each level, optionally renamed through `names` (keyed by the
    /// default label text, e.g. `"0.95"`)
    pub fn label_strings(&self, names: Option<&AHashMap<String, String>>) -> Vec<String> {
        self.labels
            .iter()
            .map(|label| {
                let text = label.to_string();
                names
                    .and_then(|m| m.get(&text).cloned())
                    .unwrap_or(text)
            })
            .collect()
    }
}

/// Thresholds of `z` enclosing the requested fractions of its total mass.
///
/// NaN cells count as zero. If any requested fraction is finer than the
/// threshold resolution can represent, a single [`ContourLabel::Min`] level
/// is returned and a warning is logged.
pub fn percentile_contour_values(
    z: ArrayView2<f64>,
    settings: &ContourSettings,
) -> PlotResult<ContourLevels> {
    settings.validate()?;

    let values: Vec<f64> = z.iter().map(|v| if v.is_nan() { 0.0 } else { *v }).collect();
    let total: f64 = values.iter().sum();
    let zmax = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(total.is_finite() && total > 0.0 && zmax > 0.0) {
        return Err(PlotError::InsufficientData(
            "field has no positive finite mass to contour".to_string(),
        ));
    }

    let mut percentiles = settings.percentiles.clone();
    percentiles.sort_by(|a, b| b.total_cmp(a));

    let t = linspace(0.0, zmax, settings.resolution);
    let integral: Array1<f64> = t
        .iter()
        .map(|&ti| values.iter().filter(|&&v| v >= ti).sum::<f64>())
        .collect();

    let targets: Vec<f64> = percentiles.iter().map(|p| p * total).collect();
    if let Some(thresholds) = targets
        .iter()
        .map(|&m| invert(&integral, &t, m))
        .collect::<Option<Vec<f64>>>()
    {
        return Ok(ContourLevels {
            labels: percentiles.into_iter().map(ContourLabel::Percentile).collect(),
            thresholds,
        });
    }

    log::warn!(
        "Percentile contour below minimum for resolution {}; returning minimum",
        settings.resolution
    );
    let fallback = integral
        .iter()
        .copied()
        .filter(|v| !is_close(*v, 1.0))
        .fold(f64::NAN, f64::max);
    let mass = if fallback.is_nan() { integral[0] } else { fallback };
    let threshold = invert(&integral, &t, mass).unwrap_or(0.0);
    Ok(ContourLevels {
        labels: vec![ContourLabel::Min],
        thresholds: vec![threshold],
    })
}

/// Threshold at which the non-increasing `integral` reaches `mass`, or
/// `None` outside its range
fn invert(integral: &Array1<f64>, t: &Array1<f64>, mass: f64) -> Option<f64> {
    let n = integral.len();
    let hi = integral[0];
    let lo = integral[n - 1];
    if !(mass <= hi && mass >= lo) {
        return None;
    }
    for k in 0..n - 1 {
        let (a, b) = (integral[k], integral[k + 1]);
        if b <= mass {
            if a == b {
                return Some(t[k]);
            }
            let frac = (a - mass) / (a - b);
            return Some(t[k] + frac * (t[k + 1] - t[k]));
        }
    }
    Some(t[n - 1])
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn gaussian_field(n: usize, sigma: f64) -> Array2<f64> {
        let axis = linspace(-1.0, 1.0, n);
        Array2::from_shape_fn((n, n), |(i, j)| {
            let (x, y) = (axis[j], axis[i]);
            (-(x * x + y * y) / (2.0 * sigma * sigma)).exp()
        })
    }

    #[test]
    fn test_monotone_thresholds() {
        let z = gaussian_field(60, 0.3);
        let levels = percentile_contour_values(z.view(), &ContourSettings::default()).unwrap();
        assert_eq!(levels.len(), 3);
        assert!(!levels.is_fallback());
        assert_eq!(
            levels.labels,
            vec![
                ContourLabel::Percentile(0.95),
                ContourLabel::Percentile(0.66),
                ContourLabel::Percentile(0.33)
            ]
        );
        let t = &levels.thresholds;
        assert!(t[0] <= t[1] && t[1] <= t[2]);
    }

    #[test]
    fn test_enclosed_mass() {
        let z = gaussian_field(80, 0.25);
        let total = z.sum();
        let levels = percentile_contour_values(z.view(), &ContourSettings::default()).unwrap();
        for (label, threshold) in levels.iter() {
            let ContourLabel::Percentile(p) = *label else {
                panic!("unexpected fallback");
            };
            let enclosed: f64 = z.iter().filter(|v| **v >= threshold).sum();
            assert!((enclosed / total - p).abs() < 0.02, "{p}: {}", enclosed / total);
        }
    }

    #[test]
    fn test_unsorted_percentiles_are_sorted() {
        let z = gaussian_field(30, 0.3);
        let settings = ContourSettings::default().with_percentiles(vec![0.33, 0.95, 0.66]);
        let levels = percentile_contour_values(z.view(), &settings).unwrap();
        assert_eq!(levels.labels[0], ContourLabel::Percentile(0.95));
        assert_eq!(levels.labels[2], ContourLabel::Percentile(0.33));
    }

    #[test]
    fn test_degenerate_percentile_falls_back() {
        let z = gaussian_field(40, 0.1);
        let settings = ContourSettings::default()
            .with_percentiles(vec![0.001])
            .with_resolution(10);
        let levels = percentile_contour_values(z.view(), &settings).unwrap();
        assert!(levels.is_fallback());
        assert_eq!(levels.len(), 1);
        assert!(levels.thresholds[0].is_finite());
        assert_eq!(levels.label_strings(None), vec!["min".to_string()]);
    }

    #[test]
    fn test_nan_cells_count_as_zero() {
        let mut z = gaussian_field(30, 0.3);
        let clean = percentile_contour_values(z.view(), &ContourSettings::default()).unwrap();
        z[[0, 0]] = f64::NAN;
        let with_nan = percentile_contour_values(z.view(), &ContourSettings::default()).unwrap();
        for (a, b) in clean.thresholds.iter().zip(with_nan.thresholds.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_field() {
        let z = Array2::<f64>::zeros((4, 4));
        assert!(percentile_contour_values(z.view(), &ContourSettings::default()).is_err());
        let bad = ContourSettings::default().with_percentiles(vec![1.5]);
        assert!(matches!(
            percentile_contour_values(array![[1.0]].view(), &bad),
            Err(PlotError::Settings(_))
        ));
    }

    #[test]
    fn test_label_strings() {
        let levels = ContourLevels {
            labels: vec![ContourLabel::Percentile(0.95), ContourLabel::Percentile(0.66)],
            thresholds: vec![0.1, 0.4],
        };
        let mut names = AHashMap::new();
        names.insert("0.95".to_string(), "95th".to_string());
        assert_eq!(
            levels.label_strings(Some(&names)),
            vec!["95th".to_string(), "0.66".to_string()]
        );
    }
}
