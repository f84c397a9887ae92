use crate::counters::Timer;
use std::fmt::{Display, Formatter, Result};

/// Performance counters related to each stage of a frame.
#[derive(Default, Clone, Copy, Debug)]
pub struct StagesCounters {
    /// Time spent adding new particles.
    pub emission_time: Timer,
    /// Time spent sorting and binning particles into the grid.
    pub neighborhood_time: Timer,
    /// Time spent computing densities and pressures.
    pub density_time: Timer,
    /// Time spent computing the fluid forces.
    pub forces_time: Timer,
    /// Time spent on wall collisions.
    pub collisions_time: Timer,
    /// Time spent integrating positions and velocities.
    pub integration_time: Timer,
    /// Time spent classifying surface particles.
    pub surface_time: Timer,
}

impl StagesCounters {
    /// Create a new counter initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn timers_mut(&mut self) -> [&mut Timer; 7] {
        [
            &mut self.emission_time,
            &mut self.neighborhood_time,
            &mut self.density_time,
            &mut self.forces_time,
            &mut self.collisions_time,
            &mut self.integration_time,
            &mut self.surface_time,
        ]
    }

    /// Enables all the counters for the simulation stages.
    pub fn enable(&mut self) {
        self.timers_mut().into_iter().for_each(Timer::enable);
    }

    /// Disables all the counters for the simulation stages.
    pub fn disable(&mut self) {
        self.timers_mut().into_iter().for_each(Timer::disable);
    }

    /// Resets to zero all the counters for the simulation stages.
    pub fn reset(&mut self) {
        self.timers_mut().into_iter().for_each(Timer::reset);
    }
}

impl Display for StagesCounters {
    fn fmt(&self, f: &mut Formatter) -> Result {
        writeln!(f, "Emission time: {}", self.emission_time)?;
        writeln!(f, "Neighborhood time: {}", self.neighborhood_time)?;
        writeln!(f, "Density time: {}", self.density_time)?;
        writeln!(f, "Forces time: {}", self.forces_time)?;
        writeln!(f, "Collisions time: {}", self.collisions_time)?;
        writeln!(f, "Integration time: {}", self.integration_time)?;
        writeln!(f, "Surface time: {}", self.surface_time)
    }
}
