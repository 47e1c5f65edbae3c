//! Toroidal boolean grid shared by every stepper.

use crate::schema::{ConfigError, validate_size};

/// Square grid of cells whose edges wrap around in both axes.
///
/// Cells are stored row-major: `(x, y)` lives at `y * size + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<bool>,
    size: usize,
}

impl Grid {
    /// Create an all-dead `size x size` grid.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        validate_size(size)?;
        Ok(Self {
            cells: vec![false; size * size],
            size,
        })
    }

    /// Wrap an existing row-major cell sequence of length `size * size`.
    pub fn from_cells(size: usize, cells: Vec<bool>) -> Result<Self, ConfigError> {
        validate_size(size)?;
        if cells.len() != size * size {
            return Err(ConfigError::CellCount {
                size,
                actual: cells.len(),
            });
        }
        Ok(Self { cells, size })
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat index for possibly out-of-range coordinates.
    #[inline]
    pub fn index(&self, x: isize, y: isize) -> usize {
        let n = self.size as isize;
        (y.rem_euclid(n) * n + x.rem_euclid(n)) as usize
    }

    #[inline]
    pub fn get(&self, x: isize, y: isize) -> bool {
        self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: isize, y: isize, alive: bool) {
        let idx = self.index(x, y);
        self.cells[idx] = alive;
    }

    /// Row-major cell slice.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// Cells of row `y`, which must be below `size`.
    #[inline]
    pub fn row(&self, y: usize) -> &[bool] {
        &self.cells[y * self.size..(y + 1) * self.size]
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Copy contents from another grid of the same size.
    ///
    /// # Panics
    /// Panics if the sizes differ.
    pub fn copy_from(&mut self, other: &Grid) {
        assert_eq!(self.size, other.size, "grid size mismatch");
        self.cells.copy_from_slice(&other.cells);
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Grid::new(0), Err(ConfigError::InvalidSize)));
    }

    #[test]
    fn test_toroidal_wrap() {
        for n in 1..=9usize {
            let mut grid = Grid::new(n).unwrap();
            let last = n as isize - 1;
            let size = n as isize;

            grid.set(-1, -1, true);
            assert!(grid.get(last, last), "n={}", n);
            assert!(grid.get(size + last, -1), "n={}", n);

            grid.clear();
            grid.set(size, 0, true);
            assert!(grid.get(0, 0), "n={}", n);

            for k in 0..3 * size {
                assert_eq!(grid.index(size + k, k), grid.index(k % size, k % size));
                assert_eq!(grid.index(-1, size), grid.index(last, 0));
            }
        }
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid = Grid::new(4).unwrap();
        grid.set(3, 1, true);
        assert!(grid.cells()[4 + 3]);
        assert_eq!(grid.row(1), &[false, false, false, true]);
    }

    #[test]
    fn test_from_cells_length_checked() {
        assert!(Grid::from_cells(3, vec![false; 9]).is_ok());
        assert!(matches!(
            Grid::from_cells(3, vec![false; 8]),
            Err(ConfigError::CellCount { size: 3, actual: 8 })
        ));
    }

    #[test]
    fn test_copy_from_is_independent() {
        let mut a = Grid::new(5).unwrap();
        a.set(2, 2, true);
        let mut b = Grid::new(5).unwrap();
        b.copy_from(&a);
        a.set(2, 2, false);
        assert!(b.get(2, 2));
        assert_eq!(b.live_count(), 1);
    }
}
