//! Configuration types for Game of Life runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Seed;
use crate::compute::StepperKind;

fn default_frame_delay_ms() -> u64 {
    100
}

fn default_display_limit() -> usize {
    80
}

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeConfig {
    /// Grid side length in cells (the grid is `size x size`).
    pub size: usize,
    /// Steppers advanced in lockstep. The first one is the reference.
    pub steppers: Vec<StepperKind>,
    /// Initial state.
    #[serde(default)]
    pub seed: Seed,
    /// Number of generations in bench mode.
    pub iterations: usize,
    /// Delay between rendered frames in visual mode.
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u64,
    /// Maximum rows/columns drawn to the terminal.
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            size: 128,
            steppers: vec![StepperKind::Traditional, StepperKind::Fft],
            seed: Seed::default(),
            iterations: 100,
            frame_delay_ms: default_frame_delay_ms(),
            display_limit: default_display_limit(),
        }
    }
}

impl LifeConfig {
    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: LifeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file without validating it, so callers can
    /// adjust the size first.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Whether any configured stepper needs a power-of-two size.
    #[inline]
    pub fn uses_fft(&self) -> bool {
        self.steppers.iter().any(|k| k.requires_power_of_two())
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_size(self.size)?;
        if self.steppers.is_empty() {
            return Err(ConfigError::NoSteppers);
        }
        if self.uses_fft() {
            validate_fft_size(self.size)?;
        }
        if self.iterations == 0 {
            return Err(ConfigError::InvalidIterations);
        }
        Ok(())
    }
}

/// Reject empty grids.
pub fn validate_size(size: usize) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::InvalidSize);
    }
    Ok(())
}

/// Reject sizes the FFT path cannot transform, suggesting the next valid one.
pub fn validate_fft_size(size: usize) -> Result<(), ConfigError> {
    validate_size(size)?;
    if !size.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo {
            size,
            suggested: size.next_power_of_two(),
        });
    }
    Ok(())
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid size must be a positive integer")]
    InvalidSize,
    #[error("Grid size {size} is not a power of two (next power of two is {suggested})")]
    NotPowerOfTwo { size: usize, suggested: usize },
    #[error("At least one stepper must be configured")]
    NoSteppers,
    #[error("Iteration count must be non-zero")]
    InvalidIterations,
    #[error("Seed density {0} is outside [0, 1]")]
    InvalidDensity(f64),
    #[error("Cell count {actual} does not match a {size}x{size} grid")]
    CellCount { size: usize, actual: usize },
    #[error("Error reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error parsing config: {0}")]
    Parse(#[from] serde_json::Error),
}
