//! Planar convex hull (Andrew's monotone chain)

use ndarray::{Array2, ArrayView2};

use crate::{PlotError, PlotResult};

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Vertices of the convex hull of `n × 2` points, counter-clockwise.
///
/// Non-finite points are ignored. Collinear points on the hull boundary are
/// dropped. Fails when fewer than three non-collinear points remain.
pub fn convex_hull_2d(points: ArrayView2<f64>) -> PlotResult<Array2<f64>> {
    if points.ncols() != 2 {
        return Err(PlotError::shape(2, points.ncols()));
    }
    let mut pts: Vec<[f64; 2]> = points
        .rows()
        .into_iter()
        .map(|r| [r[0], r[1]])
        .filter(|p| p[0].is_finite() && p[1].is_finite())
        .collect();
    pts.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    pts.dedup();

    let mut hull: Vec<[f64; 2]> = Vec::with_capacity(2 * pts.len());
    // lower hull
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // upper hull
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();

    if hull.len() < 3 {
        return Err(PlotError::InsufficientData(format!(
            "convex hull needs 3 non-collinear points, found {}",
            hull.len()
        )));
    }
    let mut out = Array2::zeros((hull.len(), 2));
    for (mut row, p) in out.rows_mut().into_iter().zip(hull) {
        row[0] = p[0];
        row[1] = p[1];
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_square_with_interior() {
        let pts = array![
            [0.0, 0.0],
            [1.0, 0.0],
            [0.5, 0.5],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.2, 0.8],
            [0.5, 0.0]
        ];
        let hull = convex_hull_2d(pts.view()).unwrap();
        assert_eq!(hull, array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_counter_clockwise() {
        let pts = array![[0.0, 0.0], [2.0, 1.0], [0.0, 3.0], [1.0, 1.0]];
        let hull = convex_hull_2d(pts.view()).unwrap();
        let n = hull.nrows();
        let area: f64 = (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                hull[[i, 0]] * hull[[j, 1]] - hull[[j, 0]] * hull[[i, 1]]
            })
            .sum();
        assert!(area > 0.0);
        assert_eq!(n, 3);
    }

    #[test]
    fn test_degenerate() {
        let line = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        assert!(convex_hull_2d(line.view()).is_err());
        let dup = array![[1.0, 1.0], [1.0, 1.0], [f64::NAN, 0.0]];
        assert!(convex_hull_2d(dup.view()).is_err());
    }
}
