//! Spatial-domain steppers used as ground truth for the spectral path.
//!
//! Both work for any positive grid size. Rows are independent: each reads
//! the immutable current grid and writes its own slice of the next one, so
//! they run in parallel on the rayon pool.

use rayon::prelude::*;

use super::stepper::check_buffers;
use super::{Grid, StepError, Stepper, WeightedKernel, life_rule};

/// Count the eight toroidal neighbors and apply the two-branch rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraditionalStepper;

/// Weighted 3x3 sum in integer arithmetic followed by the `[5, 7]` band test.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvolutionStepper;

/// Live neighbors of `(x, y)`, excluding the cell itself.
#[inline]
pub fn live_neighbors(grid: &Grid, x: isize, y: isize) -> u32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if grid.get(x + dx, y + dy) {
                count += 1;
            }
        }
    }
    count
}

/// Kernel-weighted sum over the 3x3 neighborhood of `(x, y)`.
#[inline]
pub fn weighted_sum(grid: &Grid, x: isize, y: isize) -> i32 {
    WeightedKernel::taps()
        .filter(|&(dx, dy, _)| grid.get(x + dx, y + dy))
        .map(|(_, _, weight)| weight)
        .sum()
}

/// Fill `next` row by row from `rule(x, y)`.
fn step_rows<F>(current: &Grid, next: &mut Grid, rule: F)
where
    F: Fn(isize, isize) -> bool + Sync,
{
    let size = current.size();
    next.cells_mut()
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = rule(x as isize, y as isize);
            }
        });
}

impl Stepper for TraditionalStepper {
    fn name(&self) -> &'static str {
        "traditional"
    }

    fn step(&mut self, current: &Grid, next: &mut Grid) -> Result<(), StepError> {
        check_buffers(current, next)?;
        step_rows(current, next, |x, y| {
            life_rule(current.get(x, y), live_neighbors(current, x, y))
        });
        Ok(())
    }
}

impl Stepper for ConvolutionStepper {
    fn name(&self) -> &'static str {
        "convolution"
    }

    fn step(&mut self, current: &Grid, next: &mut Grid) -> Result<(), StepError> {
        check_buffers(current, next)?;
        step_rows(current, next, |x, y| {
            WeightedKernel::alive(weighted_sum(current, x, y))
        });
        Ok(())
    }
}
