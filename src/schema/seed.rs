//! Seed types for initializing Game of Life grids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::compute::Grid;

/// Complete seed specification for grid initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Independent coin flip per cell.
    Random {
        /// Probability that a cell starts alive.
        density: f64,
        /// RNG seed. `None` draws from OS entropy.
        seed: Option<u64>,
    },
    /// Vertical three-cell oscillator with its top cell at (x, y).
    Blinker { x: isize, y: isize },
    /// Glider with its bounding box anchored at (x, y).
    Glider { x: isize, y: isize },
    /// Explicit live cells. Coordinates wrap.
    Custom { cells: Vec<(isize, isize)> },
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Random {
            density: 0.5,
            seed: None,
        }
    }
}

const GLIDER: [(isize, isize); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

impl Seed {
    /// Seed with a fixed RNG seed and the default density.
    pub fn random(seed: u64) -> Self {
        Self {
            pattern: Pattern::Random {
                density: 0.5,
                seed: Some(seed),
            },
        }
    }

    /// Generate an initial `size x size` grid.
    pub fn generate(&self, size: usize) -> Result<Grid, ConfigError> {
        let mut grid = Grid::new(size)?;

        match &self.pattern {
            Pattern::Random { density, seed } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(ConfigError::InvalidDensity(*density));
                }
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(*s),
                    None => StdRng::from_entropy(),
                };
                for cell in grid.cells_mut() {
                    *cell = rng.gen_bool(*density);
                }
            }
            Pattern::Blinker { x, y } => {
                for dy in 0..3 {
                    grid.set(*x, y + dy, true);
                }
            }
            Pattern::Glider { x, y } => {
                for &(dx, dy) in &GLIDER {
                    grid.set(x + dx, y + dy, true);
                }
            }
            Pattern::Custom { cells } => {
                for &(cx, cy) in cells {
                    grid.set(cx, cy, true);
                }
            }
        }

        Ok(grid)
    }
}
