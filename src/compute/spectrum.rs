//! Frequency-domain image of the weighted kernel.

use std::sync::Arc;

use log::debug;
use num_complex::Complex;

use super::{SpectralPlan, WeightedKernel};
use crate::schema::ConfigError;

/// Reduced spectrum of the weighted kernel embedded in an `n x n` torus.
///
/// The kernel's center tap sits at field coordinate (0, 0) and the eight
/// neighbor taps at the wrapped offsets around it, so that a pointwise
/// product with a grid's spectrum equals circular convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelSpectrum {
    size: usize,
    width: usize,
    data: Vec<Complex<f64>>,
}

impl KernelSpectrum {
    /// Build the kernel spectrum for an `n x n` grid.
    pub fn build(size: usize) -> Result<Self, ConfigError> {
        let mut plan = SpectralPlan::new(size)?;
        Ok(Self::build_with(&mut plan))
    }

    /// Build using an existing plan.
    pub fn build_with(plan: &mut SpectralPlan) -> Self {
        let size = plan.size();
        let field = kernel_field(size);
        let mut data = plan.new_spectrum();
        plan.forward(&field, &mut data);

        debug!("built {}x{} kernel spectrum", size, size);

        Self {
            size,
            width: plan.spectrum_width(),
            data,
        }
    }

    /// Grid side length this spectrum was built for.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Columns per spectrum row.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Row-major coefficients, `size` rows of `width`.
    #[inline]
    pub fn data(&self) -> &[Complex<f64>] {
        &self.data
    }
}

/// Kernel weights placed on an `n x n` real field around the origin.
///
/// On grids smaller than 3 several taps land on the same cell and add up,
/// which is what circular convolution on such a torus computes.
pub fn kernel_field(size: usize) -> Vec<f64> {
    let mut field = vec![0.0; size * size];
    let n = size as isize;
    for (dx, dy, weight) in WeightedKernel::taps() {
        let fx = dx.rem_euclid(n) as usize;
        let fy = dy.rem_euclid(n) as usize;
        field[fy * size + fx] += weight as f64;
    }
    field
}

/// Holds the kernel spectrum for the most recently requested grid size.
#[derive(Debug, Default)]
pub struct SpectrumCache {
    current: Option<Arc<KernelSpectrum>>,
}

impl SpectrumCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached spectrum for `size`, building it on first use or when the
    /// size changed since the last call.
    pub fn get_or_build(&mut self, size: usize) -> Result<Arc<KernelSpectrum>, ConfigError> {
        if let Some(spectrum) = &self.current {
            if spectrum.size() == size {
                return Ok(Arc::clone(spectrum));
            }
            debug!(
                "grid size changed from {} to {}, discarding kernel spectrum",
                spectrum.size(),
                size
            );
        }

        let spectrum = Arc::new(KernelSpectrum::build(size)?);
        self.current = Some(Arc::clone(&spectrum));
        Ok(spectrum)
    }

    /// Size of the cached spectrum, if any.
    pub fn cached_size(&self) -> Option<usize> {
        self.current.as_ref().map(|s| s.size())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_field_placement() {
        let size = 8;
        let field = kernel_field(size);
        assert_eq!(field[0], 1.0);
        assert_eq!(field[1], 2.0);
        assert_eq!(field[size - 1], 2.0);
        assert_eq!(field[(size - 1) * size + (size - 1)], 2.0);
        assert_eq!(field[size + 1], 2.0);
        assert_eq!(field[2], 0.0);
        assert_eq!(field.iter().sum::<f64>(), 17.0);
    }

    #[test]
    fn test_kernel_field_small_grids_accumulate() {
        assert_eq!(kernel_field(1), vec![17.0]);
        // On a 2x2 torus offsets -1 and 1 coincide
        assert_eq!(kernel_field(2), vec![1.0, 4.0, 4.0, 8.0]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = KernelSpectrum::build(32).unwrap();
        let mut cache = SpectrumCache::new();
        cache.get_or_build(16).unwrap();
        let b = KernelSpectrum::build(32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.data().len(), 32 * 17);
    }

    #[test]
    fn test_dc_coefficient_is_kernel_sum() {
        let spectrum = KernelSpectrum::build(16).unwrap();
        let dc = spectrum.data()[0];
        assert!((dc.re - 17.0).abs() < 1e-12);
        assert!(dc.im.abs() < 1e-12);
    }

    #[test]
    fn test_spectrum_is_real_for_symmetric_kernel() {
        let spectrum = KernelSpectrum::build(8).unwrap();
        for c in spectrum.data() {
            assert!(c.im.abs() < 1e-12, "imaginary part {}", c.im);
        }
    }

    #[test]
    fn test_invalid_size_fails_fast() {
        assert!(matches!(
            KernelSpectrum::build(24),
            Err(ConfigError::NotPowerOfTwo {
                size: 24,
                suggested: 32
            })
        ));
        assert!(matches!(
            KernelSpectrum::build(0),
            Err(ConfigError::InvalidSize)
        ));
    }

    #[test]
    fn test_cache_reuses_and_rebuilds() {
        let mut cache = SpectrumCache::new();
        assert_eq!(cache.cached_size(), None);

        let first = cache.get_or_build(16).unwrap();
        let again = cache.get_or_build(16).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let resized = cache.get_or_build(32).unwrap();
        assert_eq!(resized.size(), 32);
        assert_eq!(cache.cached_size(), Some(32));
        assert!(!Arc::ptr_eq(&first, &resized));

        cache.clear();
        assert_eq!(cache.cached_size(), None);
    }
}
