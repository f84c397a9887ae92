use crate::counters::Timer;
use std::fmt::{Display, Formatter, Result};

/// Performance counters related to the neighborhood search.
#[derive(Default, Clone, Copy, Debug)]
pub struct NeighborhoodCounters {
    /// Number of interacting particle pairs found by the last force pass, self-pairs excluded.
    pub num_neighbor_pairs: usize,
    /// Number of particles outside of the domain during the last frame.
    pub num_excluded: usize,
    /// Time spent sorting the particle order by grid cell.
    pub sort_time: Timer,
    /// Time spent assigning particles to grid cells.
    pub binning_time: Timer,
}

impl NeighborhoodCounters {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the neighborhood timers.
    pub fn enable(&mut self) {
        self.sort_time.enable();
        self.binning_time.enable();
    }

    /// Disables the neighborhood timers.
    pub fn disable(&mut self) {
        self.sort_time.disable();
        self.binning_time.disable();
    }

    /// Resets all the neighborhood counters to zero.
    pub fn reset(&mut self) {
        self.num_neighbor_pairs = 0;
        self.num_excluded = 0;
        self.sort_time.reset();
        self.binning_time.reset();
    }
}

impl Display for NeighborhoodCounters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Number of neighbor pairs: {}", self.num_neighbor_pairs)?;
        writeln!(f, "Number of excluded particles: {}", self.num_excluded)?;
        writeln!(f, "Sort time: {}", self.sort_time)?;
        writeln!(f, "Binning time: {}", self.binning_time)
    }
}
