//! Exact cell-by-cell grid comparison.

use super::Grid;

/// A cell where two grids disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub x: usize,
    pub y: usize,
    /// Value in the reference grid.
    pub expected: bool,
    /// Value in the compared grid.
    pub actual: bool,
}

/// True iff both grids have the same size and identical cells.
pub fn grids_equal(a: &Grid, b: &Grid) -> bool {
    a.size() == b.size() && a.cells() == b.cells()
}

/// All disagreeing cells in row-major order. Grids must share a size.
pub fn mismatches(expected: &Grid, actual: &Grid) -> Vec<Mismatch> {
    assert_eq!(expected.size(), actual.size(), "grid size mismatch");
    let size = expected.size();

    expected
        .cells()
        .iter()
        .zip(actual.cells())
        .enumerate()
        .filter(|(_, (e, a))| e != a)
        .map(|(i, (&expected, &actual))| Mismatch {
            x: i % size,
            y: i / size,
            expected,
            actual,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_grids() {
        let mut a = Grid::new(4).unwrap();
        a.set(1, 2, true);
        let b = a.clone();
        assert!(grids_equal(&a, &b));
        assert!(mismatches(&a, &b).is_empty());
    }

    #[test]
    fn test_single_difference_located() {
        let a = Grid::new(4).unwrap();
        let mut b = a.clone();
        b.set(3, 2, true);

        assert!(!grids_equal(&a, &b));
        assert_eq!(
            mismatches(&a, &b),
            vec![Mismatch {
                x: 3,
                y: 2,
                expected: false,
                actual: true
            }]
        );
    }

    #[test]
    fn test_different_sizes_not_equal() {
        let a = Grid::new(4).unwrap();
        let b = Grid::new(8).unwrap();
        assert!(!grids_equal(&a, &b));
    }
}
