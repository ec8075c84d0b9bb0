//! Chains of transformation stages
//!
//! A [`Converter`] owns an ordered list of [`Transformer`] stages. The
//! forward transform feeds each stage's output into the next one; the inverse
//! converter holds the inverted stages in reverse order.
//!
//! Adding a converter to a converter splices its stages in, so chain
//! composition is associative and nesting is invisible to callers.

use super::{check_dimension, Transformer};
use crate::{Result, WcsError};
use log::trace;

/// Caller-owned scratch buffers for [`Converter::transform_into`]
///
/// A workspace can be reused across calls to avoid allocating per point.
/// Each thread needs its own workspace; converters themselves hold no
/// mutable state.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    front: Vec<f64>,
    back: Vec<f64>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ordered chain of transformation stages
#[derive(Debug, Clone, Default)]
pub struct Converter {
    stages: Vec<Box<dyn Transformer>>,
}

impl Converter {
    /// Creates an empty converter, which passes its input through unchanged
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stages in the chain
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stages in forward order
    pub fn stages(&self) -> &[Box<dyn Transformer>] {
        &self.stages
    }

    /// Appends a stage to the end of the chain.
    ///
    /// Fails with [`WcsError::ChainDimensionMismatch`] if the stage does not
    /// accept what the current last stage produces.
    pub fn add<T: Transformer + 'static>(&mut self, stage: T) -> Result<()> {
        self.add_boxed(Box::new(stage))
    }

    /// Appends a stage if there is one.
    pub fn add_optional<T: Transformer + 'static>(&mut self, stage: Option<T>) -> Result<()> {
        match stage {
            Some(stage) => self.add(stage),
            None => Ok(()),
        }
    }

    /// Appends a boxed stage to the end of the chain.
    pub fn add_boxed(&mut self, stage: Box<dyn Transformer>) -> Result<()> {
        if let Some(last) = self.stages.last() {
            if last.output_dimension() != stage.input_dimension() {
                return Err(WcsError::ChainDimensionMismatch {
                    stage: self.stages.len(),
                    expected: last.output_dimension(),
                    actual: stage.input_dimension(),
                });
            }
        }
        trace!(
            "Adding {} ({} -> {}) as stage {}",
            stage.name(),
            stage.input_dimension(),
            stage.output_dimension(),
            self.stages.len()
        );
        self.stages.push(stage);
        Ok(())
    }

    /// Appends all stages of another converter, flattening the chain.
    pub fn append(&mut self, other: Converter) -> Result<()> {
        for stage in other.stages {
            self.add_boxed(stage)?;
        }
        Ok(())
    }

    /// Transforms one coordinate tuple, allocating a fresh workspace.
    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut workspace = Workspace::new();
        Ok(self.transform_into(input, &mut workspace)?.to_vec())
    }

    /// Transforms one coordinate tuple using caller-owned scratch buffers.
    ///
    /// The returned slice borrows from `workspace` and is valid until its
    /// next use.
    pub fn transform_into<'w>(&self, input: &[f64], workspace: &'w mut Workspace) -> Result<&'w [f64]> {
        if let Some(first) = self.stages.first() {
            check_dimension(first.input_dimension(), input.len())?;
        }
        Ok(self.run(input, workspace))
    }

    /// Pushes `input` through every stage; its length must already match.
    fn run<'w>(&self, input: &[f64], workspace: &'w mut Workspace) -> &'w [f64] {
        let Workspace { front, back } = workspace;
        front.clear();
        front.extend_from_slice(input);

        for stage in &self.stages {
            back.clear();
            back.resize(stage.output_dimension(), 0.0);
            stage.apply(front, back);
            std::mem::swap(front, back);
        }
        front.as_slice()
    }

    /// The converter running the chain backwards.
    ///
    /// Every stage must be invertible, otherwise this fails with
    /// [`WcsError::NotInvertible`].
    pub fn inverse(&self) -> Result<Converter> {
        let mut stages = Vec::with_capacity(self.stages.len());
        for stage in self.stages.iter().rev() {
            let inverted = stage.inverse().map_err(|e| match e {
                WcsError::NotInvertible(msg) => {
                    WcsError::NotInvertible(format!("stage {}: {}", stage.name(), msg))
                }
                other => other,
            })?;
            stages.push(inverted);
        }
        trace!("Inverted converter with {} stages", stages.len());
        Ok(Converter { stages })
    }
}

impl Transformer for Converter {
    fn name(&self) -> &str {
        "Converter"
    }

    /// Dimension accepted by the first stage (0 for an empty converter)
    fn input_dimension(&self) -> usize {
        self.stages.first().map_or(0, |s| s.input_dimension())
    }

    /// Dimension produced by the last stage (0 for an empty converter)
    fn output_dimension(&self) -> usize {
        self.stages.last().map_or(0, |s| s.output_dimension())
    }

    fn apply(&self, input: &[f64], output: &mut [f64]) {
        debug_assert_eq!(input.len(), self.input_dimension());
        let mut workspace = Workspace::new();
        output.copy_from_slice(self.run(input, &mut workspace));
    }

    fn inverse(&self) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(Converter::inverse(self)?))
    }

    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        Converter::transform(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::rotater::Rotater;
    use crate::transform::scaler::Scaler;
    use crate::projection::{Projecter, ProjectionKind};
    use approx::assert_relative_eq;

    fn sky_chain() -> Converter {
        let mut c = Converter::new();
        c.add(Rotater::new("z", 0.4, 0.0, 0.0).unwrap()).unwrap();
        c.add(Projecter::new(ProjectionKind::Tan)).unwrap();
        c.add(Scaler::new(100.0, 50.0, -200.0, 0.0, 0.0, 200.0)).unwrap();
        c
    }

    #[test]
    fn test_empty_passes_through() {
        let c = Converter::new();
        assert_eq!(c.transform(&[1.0, 2.0]).unwrap(), vec![1.0, 2.0]);
        assert!(c.inverse().unwrap().is_empty());
    }

    #[test]
    fn test_chain_dimension_mismatch() {
        let mut c = Converter::new();
        c.add(Rotater::identity()).unwrap();
        let err = c.add(Scaler::new(0.0, 0.0, 1.0, 0.0, 0.0, 1.0));
        assert!(matches!(
            err,
            Err(WcsError::ChainDimensionMismatch {
                stage: 1,
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_input_dimension_checked() {
        let c = sky_chain();
        assert!(matches!(
            c.transform(&[0.0, 1.0]),
            Err(WcsError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let c = sky_chain();
        let v = [0.05, 0.1, (1.0f64 - 0.0125).sqrt()];
        let pixel = c.transform(&v).unwrap();
        assert_eq!(pixel.len(), 2);

        let inv = c.inverse().unwrap();
        assert_eq!(inv.input_dimension(), 2);
        assert_eq!(inv.output_dimension(), 3);
        let back = inv.transform(&pixel).unwrap();
        for i in 0..3 {
            assert_relative_eq!(back[i], v[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_not_invertible() {
        let mut c = sky_chain();
        c.add(Scaler::new(0.0, 0.0, 1.0, 1.0, 1.0, 1.0)).unwrap();
        assert!(matches!(c.inverse(), Err(WcsError::NotInvertible(_))));
    }

    #[test]
    fn test_append_is_associative() {
        let r1 = Rotater::new("x", 0.2, 0.0, 0.0).unwrap();
        let r2 = Rotater::new("y", -0.7, 0.0, 0.0).unwrap();
        let r3 = Rotater::new("z", 1.3, 0.0, 0.0).unwrap();

        let mut left = Converter::new();
        left.add(r1).unwrap();
        left.add(r2).unwrap();
        let mut left_all = left.clone();
        left_all.add(r3).unwrap();

        let mut right = Converter::new();
        right.add(r2).unwrap();
        right.add(r3).unwrap();
        let mut right_all = Converter::new();
        right_all.add(r1).unwrap();
        right_all.append(right).unwrap();

        assert_eq!(left_all.len(), 3);
        assert_eq!(right_all.len(), 3);

        let v = [0.6, 0.0, 0.8];
        let a = left_all.transform(&v).unwrap();
        let b = right_all.transform(&v).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_apply_through_trait() {
        let c = sky_chain();
        let mut out = vec![f64::NAN; c.output_dimension()];
        Transformer::apply(&c, &[0.0, 0.0, 1.0], &mut out);
        assert_eq!(out, c.transform(&[0.0, 0.0, 1.0]).unwrap());

        let boxed: Box<dyn Transformer> = Box::new(c.clone());
        assert_eq!(boxed.transform(&[0.0, 0.0, 1.0]).unwrap(), out);
    }

    #[test]
    #[should_panic]
    fn test_apply_rejects_wrong_length() {
        let c = sky_chain();
        let mut out = vec![0.0; c.output_dimension()];
        Transformer::apply(&c, &[0.0, 1.0], &mut out);
    }

    #[test]
    fn test_workspace_reuse() {
        let c = sky_chain();
        let mut ws = Workspace::new();
        let first = c.transform_into(&[0.0, 0.0, 1.0], &mut ws).unwrap().to_vec();
        let second = c.transform_into(&[0.0, 0.0, 1.0], &mut ws).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(first, c.transform(&[0.0, 0.0, 1.0]).unwrap());
    }
}
