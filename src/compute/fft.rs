//! Separable 2D real-input FFT over square power-of-two grids.
//!
//! Rows go through a real-input transform that keeps only the `n / 2 + 1`
//! non-redundant coefficients; columns of that reduced spectrum then go
//! through a full complex transform. The inverse runs the same passes in
//! reverse order. Both inverse passes are unnormalized, so a round trip
//! scales values by `n * n`.

use std::f64::consts::PI;
use std::sync::Arc;

use log::debug;
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::schema::{ConfigError, validate_fft_size};

/// Number of retained columns in a reduced spectrum of width `n`.
#[inline]
pub fn reduced_width(n: usize) -> usize {
    n / 2 + 1
}

/// 1D real-input transform of even length built on a half-length complex FFT.
///
/// Even and odd samples are packed into the real and imaginary parts of an
/// `n / 2` point complex sequence; one complex FFT plus a twiddle pass then
/// yields the `n / 2 + 1` coefficients of the real signal.
pub struct RealFft {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    /// `exp(-2 pi i k / len)` for `k` in `0..=len / 2`.
    twiddles: Vec<Complex<f64>>,
    packed: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl RealFft {
    /// Plan a real transform of length `len`.
    pub fn new(len: usize, planner: &mut FftPlanner<f64>) -> Result<Self, ConfigError> {
        validate_fft_size(len)?;

        // Length 1 is handled without the packed sequence.
        let half = (len / 2).max(1);
        let forward = planner.plan_fft_forward(half);
        let inverse = planner.plan_fft_inverse(half);

        let twiddles = (0..=len / 2)
            .map(|k| Complex::from_polar(1.0, -2.0 * PI * k as f64 / len as f64))
            .collect();

        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(Self {
            len,
            forward,
            inverse,
            twiddles,
            packed: vec![Complex::new(0.0, 0.0); half],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        })
    }

    /// Transform length.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Real samples to `len / 2 + 1` complex coefficients.
    pub fn process_forward(&mut self, input: &[f64], output: &mut [Complex<f64>]) {
        assert_eq!(input.len(), self.len);
        assert_eq!(output.len(), reduced_width(self.len));

        if self.len == 1 {
            output[0] = Complex::new(input[0], 0.0);
            return;
        }

        let half = self.len / 2;
        for (m, z) in self.packed.iter_mut().enumerate() {
            *z = Complex::new(input[2 * m], input[2 * m + 1]);
        }
        self.forward
            .process_with_scratch(&mut self.packed, &mut self.scratch);

        let neg_half_i = Complex::new(0.0, -0.5);
        for (k, out) in output.iter_mut().enumerate() {
            let z = self.packed[k % half];
            let z_mirror = self.packed[(half - k % half) % half].conj();
            let even = (z + z_mirror) * 0.5;
            let odd = (z - z_mirror) * neg_half_i;
            *out = even + self.twiddles[k] * odd;
        }
    }

    /// `len / 2 + 1` coefficients back to `len` real samples, scaled by `len`.
    ///
    /// The imaginary parts of the DC and Nyquist coefficients are ignored.
    pub fn process_inverse(&mut self, input: &[Complex<f64>], output: &mut [f64]) {
        assert_eq!(input.len(), reduced_width(self.len));
        assert_eq!(output.len(), self.len);

        if self.len == 1 {
            output[0] = input[0].re;
            return;
        }

        let half = self.len / 2;
        let i = Complex::new(0.0, 1.0);
        for (k, z) in self.packed.iter_mut().enumerate() {
            let a = input[k];
            let b = input[half - k].conj();
            *z = (a + b) + i * (a - b) * self.twiddles[k].conj();
        }
        self.inverse
            .process_with_scratch(&mut self.packed, &mut self.scratch);

        for (m, z) in self.packed.iter().enumerate() {
            output[2 * m] = z.re;
            output[2 * m + 1] = z.im;
        }
    }
}

/// Cached plans and scratch space for 2D transforms of one grid size.
///
/// Spectra are stored row-major with `n` rows of `n / 2 + 1` columns.
pub struct SpectralPlan {
    size: usize,
    width: usize,
    rows: RealFft,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
    row_buffer: Vec<f64>,
    col_buffer: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl SpectralPlan {
    /// Plan transforms for an `n x n` grid. `n` must be a power of two.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        validate_fft_size(size)?;

        let mut planner = FftPlanner::new();
        let rows = RealFft::new(size, &mut planner)?;
        let col_forward = planner.plan_fft_forward(size);
        let col_inverse = planner.plan_fft_inverse(size);
        let scratch_len = col_forward
            .get_inplace_scratch_len()
            .max(col_inverse.get_inplace_scratch_len());

        debug!("planned {}x{} spectral transforms", size, size);

        Ok(Self {
            size,
            width: reduced_width(size),
            rows,
            col_forward,
            col_inverse,
            row_buffer: vec![0.0; size],
            col_buffer: vec![Complex::new(0.0, 0.0); size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        })
    }

    /// Grid side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Columns per spectrum row (`n / 2 + 1`).
    #[inline]
    pub fn spectrum_width(&self) -> usize {
        self.width
    }

    /// Total complex coefficients in a reduced spectrum.
    #[inline]
    pub fn spectrum_len(&self) -> usize {
        self.size * self.width
    }

    /// Zeroed spectrum buffer of the right shape.
    pub fn new_spectrum(&self) -> Vec<Complex<f64>> {
        vec![Complex::new(0.0, 0.0); self.spectrum_len()]
    }

    /// Forward 2D transform where `fill(y, row)` writes the real values of row `y`.
    pub fn forward_with<F>(&mut self, mut fill: F, spectrum: &mut [Complex<f64>])
    where
        F: FnMut(usize, &mut [f64]),
    {
        assert_eq!(spectrum.len(), self.spectrum_len());

        // Row-wise real FFT
        for (y, row) in spectrum.chunks_exact_mut(self.width).enumerate() {
            fill(y, &mut self.row_buffer);
            self.rows.process_forward(&self.row_buffer, row);
        }

        // Column-wise complex FFT over retained columns
        self.transform_columns(spectrum, true);
    }

    /// Forward 2D transform of a row-major real field.
    pub fn forward(&mut self, field: &[f64], spectrum: &mut [Complex<f64>]) {
        assert_eq!(field.len(), self.size * self.size);
        let size = self.size;
        self.forward_with(
            |y, row| row.copy_from_slice(&field[y * size..(y + 1) * size]),
            spectrum,
        );
    }

    /// Unnormalized inverse 2D transform; `sink(y, row)` receives each
    /// recovered row, scaled by `n * n`. The spectrum is overwritten.
    pub fn inverse_with<F>(&mut self, spectrum: &mut [Complex<f64>], mut sink: F)
    where
        F: FnMut(usize, &[f64]),
    {
        assert_eq!(spectrum.len(), self.spectrum_len());

        // Column-wise complex IFFT
        self.transform_columns(spectrum, false);

        // Row-wise complex-to-real IFFT
        for (y, row) in spectrum.chunks_exact(self.width).enumerate() {
            self.rows.process_inverse(row, &mut self.row_buffer);
            sink(y, &self.row_buffer);
        }
    }

    /// Normalized inverse 2D transform into a new real field.
    pub fn inverse(&mut self, spectrum: &mut [Complex<f64>]) -> Vec<f64> {
        let size = self.size;
        let scale = 1.0 / (size * size) as f64;
        let mut field = vec![0.0; size * size];
        self.inverse_with(spectrum, |y, row| {
            for (out, &v) in field[y * size..(y + 1) * size].iter_mut().zip(row) {
                *out = v * scale;
            }
        });
        field
    }

    /// Circular convolution of two real fields of the plan's size.
    pub fn convolve(&mut self, input: &[f64], kernel: &[f64]) -> Vec<f64> {
        let mut input_freq = self.new_spectrum();
        let mut kernel_freq = self.new_spectrum();
        self.forward(input, &mut input_freq);
        self.forward(kernel, &mut kernel_freq);

        for (a, b) in input_freq.iter_mut().zip(kernel_freq.iter()) {
            *a *= *b;
        }

        self.inverse(&mut input_freq)
    }

    fn transform_columns(&mut self, spectrum: &mut [Complex<f64>], forward: bool) {
        let fft = if forward {
            &self.col_forward
        } else {
            &self.col_inverse
        };

        for x in 0..self.width {
            // Extract column
            for y in 0..self.size {
                self.col_buffer[y] = spectrum[y * self.width + x];
            }

            fft.process_with_scratch(&mut self.col_buffer, &mut self.scratch);

            // Write back
            for y in 0..self.size {
                spectrum[y * self.width + x] = self.col_buffer[y];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dft(input: &[f64]) -> Vec<Complex<f64>> {
        let n = input.len();
        (0..n)
            .map(|k| {
                input
                    .iter()
                    .enumerate()
                    .map(|(t, &x)| {
                        Complex::from_polar(x, -2.0 * PI * (k * t) as f64 / n as f64)
                    })
                    .sum::<Complex<f64>>()
            })
            .collect()
    }

    fn pattern(len: usize) -> Vec<f64> {
        (0..len).map(|i| ((i * 17 + 3) % 10) as f64).collect()
    }

    #[test]
    fn test_real_fft_matches_naive_dft() {
        let mut planner = FftPlanner::new();
        for len in [1, 2, 4, 8, 16, 64] {
            let mut fft = RealFft::new(len, &mut planner).unwrap();
            let input = pattern(len);
            let mut output = vec![Complex::new(0.0, 0.0); reduced_width(len)];
            fft.process_forward(&input, &mut output);

            let expected = naive_dft(&input);
            for (k, (got, want)) in output.iter().zip(expected.iter()).enumerate() {
                assert!(
                    (got - want).norm() < 1e-9,
                    "len {} bin {}: {} vs {}",
                    len,
                    k,
                    got,
                    want
                );
            }
        }
    }

    #[test]
    fn test_real_fft_roundtrip_scales_by_len() {
        let mut planner = FftPlanner::new();
        for len in [1, 2, 4, 32] {
            let mut fft = RealFft::new(len, &mut planner).unwrap();
            let input = pattern(len);
            let mut freq = vec![Complex::new(0.0, 0.0); reduced_width(len)];
            let mut recovered = vec![0.0; len];
            fft.process_forward(&input, &mut freq);
            fft.process_inverse(&freq, &mut recovered);

            for (orig, rec) in input.iter().zip(recovered.iter()) {
                assert!((orig * len as f64 - rec).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let mut planner = FftPlanner::new();
        assert!(matches!(
            RealFft::new(12, &mut planner),
            Err(ConfigError::NotPowerOfTwo { suggested: 16, .. })
        ));
        assert!(matches!(SpectralPlan::new(0), Err(ConfigError::InvalidSize)));
    }

    #[test]
    fn test_fft2d_identity() {
        for size in [1, 2, 4, 8, 16, 32] {
            let mut plan = SpectralPlan::new(size).unwrap();
            let input = pattern(size * size);

            let mut freq = plan.new_spectrum();
            plan.forward(&input, &mut freq);
            let recovered = plan.inverse(&mut freq);

            for (orig, rec) in input.iter().zip(recovered.iter()) {
                assert!(
                    (orig - rec).abs() < 1e-9,
                    "FFT roundtrip failed for {}x{}: {} vs {}",
                    size,
                    size,
                    orig,
                    rec
                );
            }
        }
    }

    #[test]
    fn test_reduced_spectrum_shape() {
        let plan = SpectralPlan::new(16).unwrap();
        assert_eq!(plan.spectrum_width(), 9);
        assert_eq!(plan.spectrum_len(), 16 * 9);
    }

    #[test]
    fn test_convolution_with_delta() {
        let size = 16;
        let mut plan = SpectralPlan::new(size).unwrap();

        let input = pattern(size * size);
        let mut kernel = vec![0.0; size * size];
        kernel[0] = 1.0;

        let result = plan.convolve(&input, &kernel);

        for (inp, res) in input.iter().zip(result.iter()) {
            assert!((inp - res).abs() < 1e-9, "Mismatch: {} vs {}", inp, res);
        }
    }

    #[test]
    fn test_convolution_shift_wraps() {
        let size = 8;
        let mut plan = SpectralPlan::new(size).unwrap();

        let mut input = vec![0.0; size * size];
        input[6 * size + 7] = 1.0;

        // Delta at (3, 2) shifts every point by (3, 2) with wrapping
        let mut kernel = vec![0.0; size * size];
        kernel[2 * size + 3] = 1.0;

        let result = plan.convolve(&input, &kernel);

        let expected_x = (7 + 3) % size;
        let expected_y = (6 + 2) % size;
        for (i, &v) in result.iter().enumerate() {
            let want = if i == expected_y * size + expected_x { 1.0 } else { 0.0 };
            assert!((v - want).abs() < 1e-9, "index {}: {}", i, v);
        }
    }

    #[test]
    fn test_convolution_commutative() {
        let size = 16;
        let mut plan = SpectralPlan::new(size).unwrap();

        let pattern_a: Vec<f64> = (0..size * size)
            .map(|i| ((i * 17) % 100) as f64 / 100.0)
            .collect();
        let pattern_b: Vec<f64> = (0..size * size)
            .map(|i| ((i * 31 + 7) % 100) as f64 / 100.0)
            .collect();

        let result_ab = plan.convolve(&pattern_a, &pattern_b);
        let result_ba = plan.convolve(&pattern_b, &pattern_a);

        for i in 0..size * size {
            assert!(
                (result_ab[i] - result_ba[i]).abs() < 1e-9,
                "Convolution not commutative at {}: {} vs {}",
                i,
                result_ab[i],
                result_ba[i]
            );
        }
    }
}
