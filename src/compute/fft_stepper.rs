//! Spectral stepper: the weighted kernel sum computed through the 2D FFT.
//!
//! One generation is a forward transform of the grid, a pointwise product
//! with the cached kernel spectrum, an inverse transform and a band test on
//! the normalized result. The inverse passes are unnormalized, so recovered
//! values carry a factor of `n * n` that is divided out before thresholding.

use std::sync::Arc;

use num_complex::Complex;

use super::stepper::check_buffers;
use super::{Grid, KernelSpectrum, SpectralPlan, StepError, Stepper, WeightedKernel};
use crate::schema::ConfigError;

/// FFT convolution stepper for one power-of-two grid size.
pub struct FftStepper {
    kernel: Arc<KernelSpectrum>,
    plan: SpectralPlan,
    /// Working spectrum, overwritten every step.
    spectrum: Vec<Complex<f64>>,
}

impl FftStepper {
    /// Create a stepper around a prebuilt kernel spectrum.
    pub fn new(kernel: Arc<KernelSpectrum>) -> Result<Self, ConfigError> {
        let plan = SpectralPlan::new(kernel.size())?;
        let spectrum = plan.new_spectrum();
        Ok(Self {
            kernel,
            plan,
            spectrum,
        })
    }

    /// Create a stepper that builds its own kernel spectrum.
    pub fn with_size(size: usize) -> Result<Self, ConfigError> {
        let mut plan = SpectralPlan::new(size)?;
        let kernel = Arc::new(KernelSpectrum::build_with(&mut plan));
        let spectrum = plan.new_spectrum();
        Ok(Self {
            kernel,
            plan,
            spectrum,
        })
    }

    /// Grid size this stepper accepts.
    #[inline]
    pub fn size(&self) -> usize {
        self.kernel.size()
    }

    /// Kernel spectrum in use.
    pub fn kernel(&self) -> &Arc<KernelSpectrum> {
        &self.kernel
    }

    /// Normalized weighted sums for every cell of `current`, row-major.
    ///
    /// Values are the exact integer sums up to floating-point noise.
    pub fn weighted_sums(&mut self, current: &Grid) -> Result<Vec<f64>, StepError> {
        self.check_size(current)?;
        let size = self.size();
        let scale = 1.0 / (size * size) as f64;
        let mut sums = vec![0.0; size * size];

        self.convolve(current);
        self.plan.inverse_with(&mut self.spectrum, |y, row| {
            for (out, &v) in sums[y * size..(y + 1) * size].iter_mut().zip(row) {
                *out = v * scale;
            }
        });

        Ok(sums)
    }

    fn check_size(&self, grid: &Grid) -> Result<(), StepError> {
        if grid.size() != self.size() {
            return Err(StepError::ShapeMismatch {
                stepper: "fft",
                expected: self.size(),
                actual: grid.size(),
            });
        }
        Ok(())
    }

    /// Forward transform of `grid` multiplied by the kernel spectrum, left in
    /// the working buffer.
    fn convolve(&mut self, grid: &Grid) {
        self.plan.forward_with(
            |y, row| {
                for (out, &alive) in row.iter_mut().zip(grid.row(y)) {
                    *out = if alive { 1.0 } else { 0.0 };
                }
            },
            &mut self.spectrum,
        );

        for (s, k) in self.spectrum.iter_mut().zip(self.kernel.data()) {
            *s *= *k;
        }
    }
}

impl Stepper for FftStepper {
    fn name(&self) -> &'static str {
        "fft"
    }

    fn step(&mut self, current: &Grid, next: &mut Grid) -> Result<(), StepError> {
        check_buffers(current, next)?;
        self.check_size(current)?;

        let size = self.size();
        let scale = 1.0 / (size * size) as f64;

        self.convolve(current);

        let cells = next.cells_mut();
        self.plan.inverse_with(&mut self.spectrum, |y, row| {
            for (cell, &v) in cells[y * size..(y + 1) * size].iter_mut().zip(row) {
                *cell = WeightedKernel::alive_approx(v * scale);
            }
        });

        Ok(())
    }
}
