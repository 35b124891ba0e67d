//! Linear algebra utilities
//!
//! Small dense routines used across the crate:
//!
//! - [`affine`] - 3×3 homogeneous 2D affine maps (scale, shear, compose, invert)
//! - [`eigen`] - symmetric eigen-decomposition by cyclic Jacobi rotations
//! - [`cholesky`] - Cholesky factorization and triangular solves

pub mod affine;
pub mod cholesky;
pub mod eigen;

pub use affine::Affine2;
pub use cholesky::Cholesky;
pub use eigen::symmetric_eigen;
