use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ternplot_algos::{
    conditional_prob_density, percentile_contour_values, plane_to_simplex, simplex_to_plane,
    ternary_heatmap, LogRatioTransform, PlotError,
};
use ternplot_settings::{Aspect, ConditionalSettings, ContourSettings, DensityMode, HeatmapSettings};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Uniform samples from the open simplex (Dirichlet(1, 1, 1))
fn random_compositions(n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array2::from_shape_fn((n, 3), |_| -(1.0 - rng.gen::<f64>()).ln());
    for mut row in data.axis_iter_mut(Axis(0)) {
        let total = row.sum();
        row.mapv_inplace(|v| v / total);
    }
    data
}

fn nansum(values: &Array2<f64>) -> f64 {
    values.iter().filter(|v| !v.is_nan()).sum()
}

#[test]
fn heatmap_histogram_counts_every_sample() {
    init_logging();
    let data = random_compositions(100, 42);
    let settings = HeatmapSettings::default().with_bins(10);
    let hm = ternary_heatmap(data.view(), &settings, &LogRatioTransform::default()).unwrap();

    assert_eq!(hm.z.dim(), (10, 10));
    assert_eq!(hm.xe.dim(), (11, 11));
    assert_eq!(hm.ye.dim(), (11, 11));
    assert_eq!(nansum(&hm.z), 100.0);
}

#[test]
fn heatmap_with_alr_function_pair() {
    let data = random_compositions(50, 3);
    let settings = HeatmapSettings::default()
        .with_bins(12)
        .with_aspect(Aspect::Unit);
    let hm = ternary_heatmap(data.view(), &settings, &LogRatioTransform::alr()).unwrap();
    assert_eq!(hm.z.dim(), (12, 12));
    assert_eq!(nansum(&hm.z), 50.0);
}

#[test]
fn heatmap_density_then_percentile_contours() {
    init_logging();
    let data = random_compositions(200, 7);
    let settings = HeatmapSettings::default()
        .with_bins(20)
        .with_mode(DensityMode::Density)
        .with_background(false);
    let hm = ternary_heatmap(data.view(), &settings, &LogRatioTransform::default()).unwrap();
    assert_eq!(hm.z.dim(), (20, 20));
    assert!(hm.z.iter().all(|v| v.is_finite() && *v >= 0.0));

    let levels = percentile_contour_values(hm.z.view(), &ContourSettings::default()).unwrap();
    assert_eq!(levels.len(), 3);
    let t = &levels.thresholds;
    assert!(t[0] <= t[1] && t[1] <= t[2]);
}

#[test]
fn degenerate_percentile_returns_min_level() {
    init_logging();
    let data = random_compositions(30, 11);
    let hm = ternary_heatmap(
        data.view(),
        &HeatmapSettings::default().with_background(false),
        &LogRatioTransform::default(),
    )
    .unwrap();
    let settings = ContourSettings::default()
        .with_percentiles(vec![0.001])
        .with_resolution(10);
    let levels = percentile_contour_values(hm.z.view(), &settings).unwrap();
    assert!(levels.is_fallback());
    assert_eq!(levels.label_strings(None), vec!["min".to_string()]);
}

#[test]
fn unsupported_heatmap_mode() {
    let data = random_compositions(10, 1);
    let settings = HeatmapSettings::default().with_mode("hexbin".parse().unwrap());
    let err = ternary_heatmap(data.view(), &settings, &LogRatioTransform::default()).unwrap_err();
    assert!(matches!(err, PlotError::UnsupportedMode { mode: DensityMode::Hexbin, .. }));
}

#[test]
fn simplex_plane_roundtrip() {
    let data = random_compositions(500, 5);
    for aspect in [Aspect::Unit, Aspect::Equilateral] {
        let xy = simplex_to_plane(data.view(), aspect.xscale(), aspect.yscale()).unwrap();
        let back = plane_to_simplex(xy.view(), aspect.xscale(), aspect.yscale()).unwrap();
        for (a, b) in back.iter().zip(data.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}

#[test]
fn conditional_density_on_degenerate_lines() {
    init_logging();
    // identical straight lines: every column is constant and (x, y) is collinear
    let y = Array2::from_shape_fn((4, 5), |(_, j)| j as f64 + 1.0);
    for mode in [DensityMode::BinKde, DensityMode::Density] {
        let settings = ConditionalSettings {
            ybins: 25,
            ..Default::default()
        }
        .with_mode(mode);
        let cd = conditional_prob_density(y.view(), None, &settings).unwrap();
        assert_eq!(cd.z.dim(), (25, 25));
        assert!(cd.z.iter().all(|v| v.is_finite()), "{mode}");
    }
}

#[test]
fn conditional_histogram_counts_interpolated_points() {
    let mut rng = StdRng::seed_from_u64(9);
    let y = Array2::from_shape_fn((20, 6), |(_, j)| j as f64 + rng.gen::<f64>());
    let settings = ConditionalSettings {
        resolution: 3,
        ybins: 15,
        rescale: false,
        mode: DensityMode::Histogram,
        ..Default::default()
    };
    let cd = conditional_prob_density(y.view(), None, &settings).unwrap();
    // 6 samples with 3 inserted per segment: 21 columns of 20 lines
    assert_eq!(cd.z.dim(), (15, 21));
    assert_eq!(cd.z.sum(), 20.0 * 21.0);
}
