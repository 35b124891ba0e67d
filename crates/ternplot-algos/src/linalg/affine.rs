//! 3×3 row-major homogeneous matrices for 2D affine maps
//!
//! Points are treated as column vectors `[x, y, 1]ᵗ`; only the first two rows
//! of the product are kept.

use ndarray::{Array2, ArrayView2};

use crate::{PlotError, PlotResult};

const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Immutable 2D affine map stored as a 3×3 row-major homogeneous matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    m: [f64; 9],
}

impl Affine2 {
    /// Build from a row-major matrix; the last row must be `[0, 0, 1]`
    pub fn from_matrix(m: [f64; 9]) -> PlotResult<Self> {
        if m[6] != 0.0 || m[7] != 0.0 || m[8] != 1.0 {
            return Err(PlotError::Config(format!(
                "not an affine matrix: last row is [{}, {}, {}]",
                m[6], m[7], m[8]
            )));
        }
        Ok(Affine2 { m })
    }

    pub fn identity() -> Self {
        Affine2 { m: IDENTITY }
    }

    /// Axis-aligned scale `[[sx,0,0],[0,sy,0],[0,0,1]]`
    pub fn scale(sx: f64, sy: f64) -> Self {
        Affine2 {
            m: [sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Horizontal shear `[[1,k,0],[0,1,0],[0,0,1]]`
    pub fn shear(k: f64) -> Self {
        Affine2 {
            m: [1.0, k, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Translation by `(tx, ty)`
    pub fn translate(tx: f64, ty: f64) -> Self {
        Affine2 {
            m: [1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0],
        }
    }

    /// Row-major matrix
    pub fn matrix(&self) -> &[f64; 9] {
        &self.m
    }

    /// Composition applying `self` first, then `next` (result = next · self)
    pub fn then(&self, next: &Affine2) -> Affine2 {
        let l = &next.m;
        let r = &self.m;
        let mut out = [0.0f64; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] =
                    l[row * 3] * r[col] + l[row * 3 + 1] * r[3 + col] + l[row * 3 + 2] * r[6 + col];
            }
        }
        Affine2 { m: out }
    }

    /// Transform a single point
    #[inline]
    pub fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        let m = &self.m;
        [
            m[0] * p[0] + m[1] * p[1] + m[2],
            m[3] * p[0] + m[4] * p[1] + m[5],
        ]
    }

    /// Transform every row of an `n × 2` (or `n × 3` homogeneous) array.
    ///
    /// Only the first two columns are read; the result is `n × 2`.
    pub fn apply_rows(&self, points: ArrayView2<f64>) -> PlotResult<Array2<f64>> {
        if points.ncols() < 2 {
            return Err(PlotError::shape(2, points.ncols()));
        }
        let mut out = Array2::zeros((points.nrows(), 2));
        for (src, mut dst) in points.rows().into_iter().zip(out.rows_mut()) {
            let [x, y] = self.apply([src[0], src[1]]);
            dst[0] = x;
            dst[1] = y;
        }
        Ok(out)
    }

    /// Inverse map by Cramer's rule; `None` if the matrix is singular
    pub fn inverse(&self) -> Option<Affine2> {
        let [a, b, c, d, e, f, g, h, i] = self.m;

        let det = a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g);
        if det.abs() < 1e-300 {
            return None;
        }
        let inv_det = 1.0 / det;

        Some(Affine2 {
            m: [
                (e * i - f * h) * inv_det,
                (c * h - b * i) * inv_det,
                (b * f - c * e) * inv_det,
                (f * g - d * i) * inv_det,
                (a * i - c * g) * inv_det,
                (c * d - a * f) * inv_det,
                (d * h - e * g) * inv_det,
                (b * g - a * h) * inv_det,
                (a * e - b * d) * inv_det,
            ],
        })
    }

    /// Check if approximately identity
    pub fn is_identity(&self) -> bool {
        self.m
            .iter()
            .zip(IDENTITY.iter())
            .all(|(a, b)| (a - b).abs() < 1e-12)
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_projective_matrix() {
        assert!(Affine2::from_matrix([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.1, 0.0, 1.0]).is_err());
        assert!(Affine2::from_matrix(IDENTITY).unwrap().is_identity());
    }

    #[test]
    fn test_shear_then_scale() {
        let tfm = Affine2::shear(0.5).then(&Affine2::scale(2.0, 3.0));
        let p = tfm.apply([1.0, 1.0]);
        assert!((p[0] - 3.0).abs() < 1e-12);
        assert!((p[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_composition_order() {
        // Translating then scaling differs from scaling then translating
        let a = Affine2::translate(1.0, 0.0).then(&Affine2::scale(2.0, 1.0));
        let b = Affine2::scale(2.0, 1.0).then(&Affine2::translate(1.0, 0.0));
        assert_eq!(a.apply([0.0, 0.0]), [2.0, 0.0]);
        assert_eq!(b.apply([0.0, 0.0]), [1.0, 0.0]);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let tfm = Affine2::shear(0.5)
            .then(&Affine2::scale(1.0, 3.0_f64.sqrt() / 2.0))
            .then(&Affine2::translate(0.2, -0.1));
        let inv = tfm.inverse().unwrap();
        assert!(tfm.then(&inv).is_identity());
        let p = inv.apply(tfm.apply([0.3, 0.6]));
        assert!((p[0] - 0.3).abs() < 1e-12);
        assert!((p[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Affine2::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_apply_rows_uses_first_two_columns() {
        let pts = array![[1.0, 2.0, 1.0], [0.0, 0.0, 1.0]];
        let out = Affine2::scale(2.0, 2.0).apply_rows(pts.view()).unwrap();
        assert_eq!(out, array![[2.0, 4.0], [0.0, 0.0]]);

        let bad = array![[1.0], [2.0]];
        assert!(Affine2::identity().apply_rows(bad.view()).is_err());
    }
}
