//! Ternplot Mineral
//!
//! Static element and mineral tables for annotating ternary diagrams with
//! end-member compositions.
//!
//! - [`Element`] - symbols, names and standard atomic weights
//! - [`Formula`] - formula parsing, molecular weight, weight fractions
//! - [`Mineral`] - case-insensitive lookup of common rock-forming minerals
//!
//! # Example
//!
//! ```rust
//! use ternplot_mineral::Mineral;
//!
//! let fo = Mineral::lookup("Forsterite").unwrap();
//! let mw = fo.molecular_weight().unwrap();
//! assert!((mw - 140.691).abs() < 1e-6);
//! ```

mod element;
mod error;
mod formula;
mod mineral;

pub use element::Element;
pub use error::{MineralError, MineralResult};
pub use formula::Formula;
pub use mineral::{Mineral, MineralGroup};
