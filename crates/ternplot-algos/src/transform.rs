//! Pluggable log-ratio transforms
//!
//! Density estimation happens in an unconstrained space reached through a
//! forward/inverse transform pair. Callers hand in either two plain functions
//! or a transformer object; both are resolved once into a [`ResolvedTransform`]
//! before any data flows through.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, ArrayView2};

use crate::codata;
use crate::{PlotError, PlotResult};

/// Row-wise array transform
pub type TransformFn = Arc<dyn Fn(ArrayView2<f64>) -> Array2<f64> + Send + Sync>;

/// Object exposing a forward and an inverse compositional transform
pub trait CompositionalTransformer: Send + Sync {
    fn transform(&self, data: ArrayView2<f64>) -> Array2<f64>;

    fn inverse_transform(&self, data: ArrayView2<f64>) -> Array2<f64>;
}

/// Isometric log-ratio transformer
#[derive(Debug, Clone, Copy, Default)]
pub struct IlrTransformer;

impl CompositionalTransformer for IlrTransformer {
    fn transform(&self, data: ArrayView2<f64>) -> Array2<f64> {
        codata::ilr(data)
    }

    fn inverse_transform(&self, data: ArrayView2<f64>) -> Array2<f64> {
        codata::inverse_ilr(data)
    }
}

/// Transform configuration: a function pair or a transformer object
#[derive(Clone)]
pub enum LogRatioTransform {
    FunctionPair {
        forward: TransformFn,
        inverse: TransformFn,
    },
    Transformer(Arc<dyn CompositionalTransformer>),
}

impl LogRatioTransform {
    pub fn ilr() -> Self {
        LogRatioTransform::Transformer(Arc::new(IlrTransformer))
    }

    pub fn clr() -> Self {
        Self::from_pair(codata::clr, codata::inverse_clr)
    }

    pub fn alr() -> Self {
        Self::from_pair(codata::alr, codata::inverse_alr)
    }

    /// Build from a forward function and its inverse
    pub fn from_pair<F, I>(forward: F, inverse: I) -> Self
    where
        F: Fn(ArrayView2<f64>) -> Array2<f64> + Send + Sync + 'static,
        I: Fn(ArrayView2<f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        LogRatioTransform::FunctionPair {
            forward: Arc::new(forward),
            inverse: Arc::new(inverse),
        }
    }

    /// Build from optional functions.
    ///
    /// Both absent selects the ilr default; only one present is a
    /// configuration error since the result could not be mapped back.
    pub fn from_functions(
        forward: Option<TransformFn>,
        inverse: Option<TransformFn>,
    ) -> PlotResult<Self> {
        match (forward, inverse) {
            (Some(forward), Some(inverse)) => {
                Ok(LogRatioTransform::FunctionPair { forward, inverse })
            }
            (None, None) => Ok(Self::ilr()),
            (Some(_), None) => Err(PlotError::Config(
                "a forward transform requires an inverse transform".to_string(),
            )),
            (None, Some(_)) => Err(PlotError::Config(
                "an inverse transform was given without a forward transform".to_string(),
            )),
        }
    }

    pub fn from_transformer<T: CompositionalTransformer + 'static>(transformer: T) -> Self {
        LogRatioTransform::Transformer(Arc::new(transformer))
    }

    /// Canonical forward/inverse pair
    pub fn resolve(&self) -> ResolvedTransform {
        match self {
            LogRatioTransform::FunctionPair { forward, inverse } => ResolvedTransform {
                forward: Arc::clone(forward),
                inverse: Arc::clone(inverse),
            },
            LogRatioTransform::Transformer(t) => {
                let fwd = Arc::clone(t);
                let inv = Arc::clone(t);
                ResolvedTransform {
                    forward: Arc::new(move |data: ArrayView2<f64>| fwd.transform(data)),
                    inverse: Arc::new(move |data: ArrayView2<f64>| inv.inverse_transform(data)),
                }
            }
        }
    }
}

impl Default for LogRatioTransform {
    fn default() -> Self {
        Self::ilr()
    }
}

impl fmt::Debug for LogRatioTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogRatioTransform::FunctionPair { .. } => {
                f.write_str("LogRatioTransform::FunctionPair")
            }
            LogRatioTransform::Transformer(_) => f.write_str("LogRatioTransform::Transformer"),
        }
    }
}

/// Forward/inverse pair after resolution
#[derive(Clone)]
pub struct ResolvedTransform {
    forward: TransformFn,
    inverse: TransformFn,
}

impl ResolvedTransform {
    pub fn forward(&self, data: ArrayView2<f64>) -> Array2<f64> {
        (self.forward)(data)
    }

    pub fn inverse(&self, data: ArrayView2<f64>) -> Array2<f64> {
        (self.inverse)(data)
    }
}

impl fmt::Debug for ResolvedTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTransform").finish_non_exhaustive()
    }
}
