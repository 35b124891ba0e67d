//! Simplex ↔ plane coordinate conversion
//!
//! A closed composition `(a, b, c)` maps to `x = a + b/2`, `y = b`, followed
//! by the aspect scale. The third part is implied by closure and recovered
//! as `1 - x - y` on the way back.

use ndarray::{Array2, ArrayView2};
use ternplot_settings::Aspect;

use crate::codata::close;
use crate::linalg::Affine2;
use crate::{PlotError, PlotResult};

/// Map `n × 3` compositions into plot coordinates (`n × 2`)
pub fn simplex_to_plane(abc: ArrayView2<f64>, xscale: f64, yscale: f64) -> PlotResult<Array2<f64>> {
    if abc.ncols() != 3 {
        return Err(PlotError::shape(3, abc.ncols()));
    }
    let tfm = Affine2::shear(0.5).then(&Affine2::scale(xscale, yscale));
    tfm.apply_rows(close(abc).view())
}

/// Map `n × 2` plot coordinates back onto the simplex (`n × 3`)
pub fn plane_to_simplex(xy: ArrayView2<f64>, xscale: f64, yscale: f64) -> PlotResult<Array2<f64>> {
    if xy.ncols() != 2 {
        return Err(PlotError::shape(2, xy.ncols()));
    }
    let tfm = Affine2::scale(1.0 / xscale, 1.0 / yscale).then(&Affine2::shear(-0.5));
    let mut out = Array2::zeros((xy.nrows(), 3));
    for (src, mut dst) in xy.rows().into_iter().zip(out.rows_mut()) {
        let [a, b] = tfm.apply([src[0], src[1]]);
        dst[0] = a;
        dst[1] = b;
        dst[2] = 1.0 - (a + b);
    }
    Ok(out)
}

/// Converter bound to one diagram aspect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexConverter {
    pub xscale: f64,
    pub yscale: f64,
}

impl SimplexConverter {
    pub fn for_aspect(aspect: Aspect) -> Self {
        SimplexConverter {
            xscale: aspect.xscale(),
            yscale: aspect.yscale(),
        }
    }

    /// Equilateral triangle with unit base
    pub fn equilateral() -> Self {
        Self::for_aspect(Aspect::Equilateral)
    }

    pub fn forward(&self, abc: ArrayView2<f64>) -> PlotResult<Array2<f64>> {
        simplex_to_plane(abc, self.xscale, self.yscale)
    }

    pub fn inverse(&self, xy: ArrayView2<f64>) -> PlotResult<Array2<f64>> {
        plane_to_simplex(xy, self.xscale, self.yscale)
    }
}

impl Default for SimplexConverter {
    fn default() -> Self {
        Self::for_aspect(Aspect::default())
    }
}
