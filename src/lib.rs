//! Conway's Game of Life on a torus, computed three ways.
//!
//! The Life rule can be written as a single band test on a weighted 3x3 sum:
//! neighbors weigh 2, the cell itself weighs 1, and a cell is alive next
//! generation iff the sum is in `[5, 7]`. That turns a generation into a
//! circular convolution, which this crate evaluates with
//!
//! - a plain neighbor count (`TraditionalStepper`),
//! - a direct integer convolution (`ConvolutionStepper`),
//! - an FFT convolution against a cached kernel spectrum (`FftStepper`).
//!
//! # Architecture
//!
//! - `schema`: Run configuration and initial patterns
//! - `compute`: Grid, kernel, transforms, steppers and the lockstep driver
//! - `render`: Terminal output
//!
//! # Example
//!
//! ```rust,no_run
//! use conv_life::{
//!     compute::{Lockstep, StepperKind},
//!     schema::Seed,
//! };
//!
//! let grid = Seed::random(42).generate(256).unwrap();
//! let mut lockstep =
//!     Lockstep::new(&grid, &[StepperKind::Traditional, StepperKind::Fft]).unwrap();
//!
//! let report = lockstep.run(100).unwrap();
//! println!("match after 100 generations: {}", report.matched);
//! ```

pub mod compute;
pub mod render;
pub mod schema;

// Re-export commonly used types
pub use compute::{FftStepper, Grid, Lockstep, Stepper, StepperKind};
pub use schema::{LifeConfig, Pattern, Seed};
