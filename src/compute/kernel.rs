//! Weighted 3x3 kernel encoding the Life rule as one threshold test.
//!
//! Every neighbor weighs 2 and the cell itself weighs 1, so the weighted sum
//! is `2 * neighbors + self`. A cell is alive next generation exactly when
//! that sum lands in `[5, 7]`:
//!
//! - dead with 3 neighbors: 6
//! - alive with 2 or 3 neighbors: 5 or 7
//!
//! Every other combination falls outside the band.

/// Fixed 3x3 weights, indexed `[dy + 1][dx + 1]`.
pub const KERNEL_WEIGHTS: [[i32; 3]; 3] = [[2, 2, 2], [2, 1, 2], [2, 2, 2]];

/// The Life rule as a weighted kernel plus a band test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedKernel;

impl WeightedKernel {
    /// Inclusive lower bound of the exact integer band.
    pub const LOW: i32 = 5;
    /// Inclusive upper bound of the exact integer band.
    pub const HIGH: i32 = 7;
    /// Half an integer step; keeps the float band clear of 4 and 8.
    pub const TOLERANCE: f64 = 0.5;

    /// Weight at toroidal offset `(dx, dy)`, both in `-1..=1`.
    #[inline]
    pub fn weight(dx: isize, dy: isize) -> i32 {
        KERNEL_WEIGHTS[(dy + 1) as usize][(dx + 1) as usize]
    }

    /// Iterate `(dx, dy, weight)` over all nine taps.
    pub fn taps() -> impl Iterator<Item = (isize, isize, i32)> {
        (-1..=1isize).flat_map(|dy| (-1..=1isize).map(move |dx| (dx, dy, Self::weight(dx, dy))))
    }

    /// Exact integer band test.
    #[inline]
    pub fn alive(sum: i32) -> bool {
        (Self::LOW..=Self::HIGH).contains(&sum)
    }

    /// Band test on a floating-point sum, widened by [`Self::TOLERANCE`].
    #[inline]
    pub fn alive_approx(sum: f64) -> bool {
        sum >= Self::LOW as f64 - Self::TOLERANCE && sum <= Self::HIGH as f64 + Self::TOLERANCE
    }

    /// Weighted sum for a cell with `neighbors` live neighbors.
    #[inline]
    pub fn weighted_sum(alive: bool, neighbors: u32) -> i32 {
        2 * neighbors as i32 + alive as i32
    }
}

/// The two-branch Conway rule: survive on 2 or 3, birth on 3.
#[inline]
pub fn life_rule(alive: bool, neighbors: u32) -> bool {
    if alive {
        neighbors == 2 || neighbors == 3
    } else {
        neighbors == 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_matches_life_rule() {
        for neighbors in 0..=8 {
            for alive in [false, true] {
                let sum = WeightedKernel::weighted_sum(alive, neighbors);
                assert_eq!(
                    WeightedKernel::alive(sum),
                    life_rule(alive, neighbors),
                    "alive={} neighbors={} sum={}",
                    alive,
                    neighbors,
                    sum
                );
                assert_eq!(
                    WeightedKernel::alive_approx(sum as f64),
                    WeightedKernel::alive(sum)
                );
            }
        }
    }

    #[test]
    fn test_float_band_tolerates_drift_only() {
        assert!(WeightedKernel::alive_approx(4.5));
        assert!(WeightedKernel::alive_approx(7.5));
        assert!(WeightedKernel::alive_approx(5.0 - 1e-9));
        assert!(!WeightedKernel::alive_approx(4.0 + 1e-9));
        assert!(!WeightedKernel::alive_approx(8.0 - 1e-9));
    }

    #[test]
    fn test_taps() {
        let taps: Vec<_> = WeightedKernel::taps().collect();
        assert_eq!(taps.len(), 9);
        let total: i32 = taps.iter().map(|t| t.2).sum();
        assert_eq!(total, 17);
        assert_eq!(WeightedKernel::weight(0, 0), 1);
        assert_eq!(WeightedKernel::weight(-1, 1), 2);
    }
}
