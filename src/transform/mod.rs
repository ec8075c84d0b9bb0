//! The transformation framework
//!
//! A [`Transformer`] maps a coordinate tuple of fixed dimensionality to
//! another one. Concrete stages live in the submodules:
//!
//! - [`rotater`]: rigid 3-D rotations built from Euler-angle sequences
//! - [`scaler`]: 2-D affine maps used for pixel scaling and image rotation
//! - [`distorter`]: nonlinear corrections on the plane or on the sphere
//! - [`converter`]: ordered chains of stages
//!
//! Stages hold only immutable parameters. Anything a stage needs while
//! transforming lives on the stack or in a caller-owned
//! [`Workspace`](converter::Workspace), so one stage can be used from many
//! threads at once.

pub mod converter;
pub mod distorter;
pub mod rotater;
pub mod scaler;

use crate::{Result, WcsError};
use std::fmt;

/// A map from `input_dimension()` to `output_dimension()` coordinates.
pub trait Transformer: fmt::Debug + Send + Sync {
    /// Short name of the stage, used in log and error messages
    fn name(&self) -> &str;

    /// Number of components accepted by [`Transformer::transform`]
    fn input_dimension(&self) -> usize;

    /// Number of components produced by [`Transformer::transform`]
    fn output_dimension(&self) -> usize;

    /// Transforms `input` into `output`.
    ///
    /// Both slices have already been checked against the declared
    /// dimensions, implementations may index them directly.
    fn apply(&self, input: &[f64], output: &mut [f64]);

    /// Returns the inverse stage, or [`WcsError::NotInvertible`].
    fn inverse(&self) -> Result<Box<dyn Transformer>>;

    /// Clones the stage behind a fresh box.
    fn boxed_clone(&self) -> Box<dyn Transformer>;

    /// Transforms a coordinate tuple after checking its dimension.
    fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_dimension(self.input_dimension(), input.len())?;
        let mut output = vec![0.0; self.output_dimension()];
        self.apply(input, &mut output);
        Ok(output)
    }
}

impl Clone for Box<dyn Transformer> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(WcsError::DimensionMismatch { expected, actual })
    }
}
