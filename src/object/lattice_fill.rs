use itertools::iproduct;

use crate::geometry::Domain;
use crate::math::{Point, Real, Vector};
use crate::object::ParticleSystem;

/// Progressively fills a particle system up to its capacity with particles at rest, laid out on
/// a regular lattice spanning the central half of the domain.
///
/// Each call to [`LatticeFill::fill`] lays one full lattice, or as much of it as the remaining
/// capacity allows. A lattice holding fewer sites than the capacity thus produces successive
/// batches, one per frame, at the same sites.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LatticeFill {
    placed: usize,
}

impl LatticeFill {
    /// A fill that did not place any particle yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The total number of particles placed by this fill.
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Returns `true` if `particles` has no room left for this fill.
    pub fn is_complete(&self, particles: &ParticleSystem) -> bool {
        particles.is_full()
    }

    /// Places one lattice batch of particles spaced by `spacing` in the half-scale copy of
    /// `domain`, stopping as soon as `particles` is full.
    ///
    /// The lattice is scanned along `z` first, then `y`, then `x`. Returns the number of
    /// particles placed.
    pub fn fill(
        &mut self,
        domain: &Domain,
        spacing: Real,
        particles: &mut ParticleSystem,
    ) -> usize {
        if particles.is_full() || !(spacing > 0.0) {
            return 0;
        }

        let region = domain.scaled_about_center(0.5);
        let axis = |i: usize| {
            let min = region.mins()[i];
            let max = region.maxs()[i];
            (0..).map(move |k| min + k as Real * spacing).take_while(move |c| *c < max)
        };

        let mut num_placed = 0;

        for (x, y, z) in iproduct!(axis(0), axis(1), axis(2)) {
            if particles.spawn(Point::new(x, y, z), Vector::zeros()).is_none() {
                break;
            }

            num_placed += 1;
        }

        self.placed += num_placed;
        num_placed
    }
}
