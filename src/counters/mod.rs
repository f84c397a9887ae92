//! Counters for benchmarking the stages of a simulation frame.

use std::fmt::{Display, Formatter, Result};

pub use self::neighborhood_counters::NeighborhoodCounters;
pub use self::stages_counters::StagesCounters;
pub use self::timer::Timer;

mod neighborhood_counters;
mod stages_counters;
mod timer;

/// Aggregation of all the performances counters tracked by the simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counters {
    /// Total number of frames simulated.
    pub nframes: usize,
    /// Timer for a whole frame.
    pub step_time: Timer,
    /// Timer used for debugging.
    pub custom: Timer,
    /// Counters of every stage of one frame.
    pub stages: StagesCounters,
    /// Counters of the neighborhood search.
    pub neighborhood: NeighborhoodCounters,
}

impl Counters {
    /// Create a new set of disabled counters initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to zero all the counters.
    pub fn reset(&mut self) {
        self.nframes = 0;
        self.step_time.reset();
        self.custom.reset();
        self.stages.reset();
        self.neighborhood.reset();
    }

    /// Enable all the counters.
    pub fn enable(&mut self) {
        self.step_time.enable();
        self.custom.enable();
        self.stages.enable();
        self.neighborhood.enable();
    }

    /// Disable all the counters.
    pub fn disable(&mut self) {
        self.step_time.disable();
        self.custom.disable();
        self.stages.disable();
        self.neighborhood.disable();
    }
}

impl Display for Counters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Total frame time: {}", self.step_time)?;
        writeln!(f, "Num frames: {}", self.nframes)?;
        self.stages.fmt(f)?;
        self.neighborhood.fmt(f)?;
        writeln!(f, "Custom timer: {}", self.custom)
    }
}
