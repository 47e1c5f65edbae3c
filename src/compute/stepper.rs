//! Common interface over the generation steppers.

use serde::{Deserialize, Serialize};

use super::{ConvolutionStepper, FftStepper, Grid, SpectrumCache, TraditionalStepper};
use crate::schema::{ConfigError, validate_size};

/// Advances a grid by one generation.
pub trait Stepper {
    /// Short label used in reports.
    fn name(&self) -> &'static str;

    /// Read `current`, overwrite every cell of `next`. `current` is untouched.
    fn step(&mut self, current: &Grid, next: &mut Grid) -> Result<(), StepError>;
}

/// Errors raised before a step runs.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("{stepper} is configured for {expected}x{expected} grids, got {actual}x{actual}")]
    ShapeMismatch {
        stepper: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Output grid is {next}x{next} but input is {current}x{current}")]
    BufferMismatch { current: usize, next: usize },
}

/// Reject mismatched double buffers.
#[inline]
pub(crate) fn check_buffers(current: &Grid, next: &Grid) -> Result<(), StepError> {
    if current.size() != next.size() {
        return Err(StepError::BufferMismatch {
            current: current.size(),
            next: next.size(),
        });
    }
    Ok(())
}

/// Selectable stepper implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepperKind {
    /// Per-cell neighbor count with the two-branch rule.
    Traditional,
    /// Integer weighted kernel with an exact band test.
    Convolution,
    /// Spectral convolution with a widened band test.
    Fft,
}

impl StepperKind {
    /// Whether this stepper only supports power-of-two sizes.
    #[inline]
    pub fn requires_power_of_two(self) -> bool {
        matches!(self, StepperKind::Fft)
    }

    /// Construct a stepper for `size x size` grids. Spectral steppers take
    /// their kernel spectrum from `cache`.
    pub fn build(
        self,
        size: usize,
        cache: &mut SpectrumCache,
    ) -> Result<Box<dyn Stepper>, ConfigError> {
        validate_size(size)?;
        Ok(match self {
            StepperKind::Traditional => Box::new(TraditionalStepper),
            StepperKind::Convolution => Box::new(ConvolutionStepper),
            StepperKind::Fft => Box::new(FftStepper::new(cache.get_or_build(size)?)?),
        })
    }
}
