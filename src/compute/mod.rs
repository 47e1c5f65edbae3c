//! Compute module - Grid storage and the generation steppers.

mod direct_convolution;
mod equivalence;
mod fft;
mod fft_stepper;
mod grid;
mod kernel;
mod lockstep;
mod spectrum;
mod stepper;

pub use direct_convolution::*;
pub use equivalence::*;
pub use fft::*;
pub use fft_stepper::*;
pub use grid::*;
pub use kernel::*;
pub use lockstep::*;
pub use spectrum::*;
pub use stepper::{StepError, Stepper, StepperKind};
