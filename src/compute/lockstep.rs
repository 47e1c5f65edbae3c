//! Lockstep driver - advances several steppers from one initial grid and
//! checks that they agree after every generation.

use std::time::{Duration, Instant};

use log::{info, warn};

use super::{Grid, Mismatch, SpectrumCache, StepError, Stepper, StepperKind, mismatches};
use crate::schema::ConfigError;

/// One stepper with its own pair of buffers.
struct Lane {
    stepper: Box<dyn Stepper>,
    current: Grid,
    next: Grid,
    elapsed: Duration,
}

/// Disagreement between a stepper and the reference after one generation.
#[derive(Debug, Clone)]
pub struct LaneMismatch {
    pub stepper: &'static str,
    pub cells: Vec<Mismatch>,
}

/// Outcome of a single lockstep generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Generation number reached (1 after the first step).
    pub generation: u64,
    /// Steppers that disagree with the reference.
    pub mismatches: Vec<LaneMismatch>,
}

impl GenerationReport {
    #[inline]
    pub fn matched(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Accumulated step time for one stepper.
#[derive(Debug, Clone)]
pub struct StepperTiming {
    pub name: &'static str,
    pub total: Duration,
}

impl StepperTiming {
    /// Mean milliseconds per generation.
    pub fn ms_per_iteration(&self, iterations: usize) -> f64 {
        self.total.as_secs_f64() * 1e3 / iterations.max(1) as f64
    }
}

/// Summary of a timed lockstep run.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub size: usize,
    pub iterations: usize,
    pub timings: Vec<StepperTiming>,
    /// Generations in which any stepper disagreed with the reference.
    pub mismatched_generations: usize,
    /// Whether all final grids agree.
    pub matched: bool,
}

/// Steppers advanced together from a shared initial grid.
///
/// The first stepper is the reference every other one is compared against.
pub struct Lockstep {
    lanes: Vec<Lane>,
    size: usize,
    generation: u64,
}

impl Lockstep {
    /// Build steppers of the given kinds for `initial`'s size.
    pub fn new(initial: &Grid, kinds: &[StepperKind]) -> Result<Self, ConfigError> {
        let mut cache = SpectrumCache::new();
        let steppers = kinds
            .iter()
            .map(|kind| kind.build(initial.size(), &mut cache))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_steppers(initial, steppers)
    }

    /// Wrap already constructed steppers.
    pub fn from_steppers(
        initial: &Grid,
        steppers: Vec<Box<dyn Stepper>>,
    ) -> Result<Self, ConfigError> {
        if steppers.is_empty() {
            return Err(ConfigError::NoSteppers);
        }
        let size = initial.size();
        let lanes = steppers
            .into_iter()
            .map(|stepper| -> Result<Lane, ConfigError> {
                Ok(Lane {
                    stepper,
                    current: initial.clone(),
                    next: Grid::new(size)?,
                    elapsed: Duration::ZERO,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            lanes,
            size,
            generation: 0,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Generations completed so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stepper names in lane order.
    pub fn names(&self) -> Vec<&'static str> {
        self.lanes.iter().map(|l| l.stepper.name()).collect()
    }

    /// Current grid of lane `index`.
    pub fn current(&self, index: usize) -> &Grid {
        &self.lanes[index].current
    }

    /// Current grid of the reference stepper.
    pub fn reference(&self) -> &Grid {
        &self.lanes[0].current
    }

    /// Whether every lane currently holds the reference grid.
    pub fn all_match(&self) -> bool {
        let reference = self.reference();
        self.lanes[1..].iter().all(|l| l.current == *reference)
    }

    /// Step every lane once, swap its buffers, then compare against the reference.
    pub fn advance(&mut self) -> Result<GenerationReport, StepError> {
        for lane in &mut self.lanes {
            let start = Instant::now();
            lane.stepper.step(&lane.current, &mut lane.next)?;
            lane.elapsed += start.elapsed();
            std::mem::swap(&mut lane.current, &mut lane.next);
        }
        self.generation += 1;

        let (reference, others) = self.lanes.split_at(1);
        let reference = &reference[0].current;
        let disagreements: Vec<LaneMismatch> = others
            .iter()
            .filter(|lane| lane.current != *reference)
            .map(|lane| LaneMismatch {
                stepper: lane.stepper.name(),
                cells: mismatches(reference, &lane.current),
            })
            .collect();

        for m in &disagreements {
            warn!(
                "generation {}: {} disagrees with {} on {} cells (first at {:?})",
                self.generation,
                m.stepper,
                self.lanes[0].stepper.name(),
                m.cells.len(),
                m.cells.first().map(|c| (c.x, c.y)),
            );
        }

        Ok(GenerationReport {
            generation: self.generation,
            mismatches: disagreements,
        })
    }

    /// Advance `iterations` generations, timing each stepper.
    pub fn run(&mut self, iterations: usize) -> Result<BenchReport, StepError> {
        for lane in &mut self.lanes {
            lane.elapsed = Duration::ZERO;
        }

        let mut mismatched_generations = 0;
        for _ in 0..iterations {
            if !self.advance()?.matched() {
                mismatched_generations += 1;
            }
        }

        let timings: Vec<StepperTiming> = self
            .lanes
            .iter()
            .map(|lane| StepperTiming {
                name: lane.stepper.name(),
                total: lane.elapsed,
            })
            .collect();

        for t in &timings {
            info!(
                "{}: {:?} ({:.3} ms/iter)",
                t.name,
                t.total,
                t.ms_per_iteration(iterations)
            );
        }

        Ok(BenchReport {
            size: self.size,
            iterations,
            timings,
            mismatched_generations,
            matched: self.all_match(),
        })
    }
}
