use rand::Rng;

use crate::geometry::Domain;
use crate::math::Real;
use crate::object::{LatticeFill, ParticleSystem, PointEmitters};

/// How new particles enter the simulation.
#[derive(Clone, Debug)]
pub enum EmissionPolicy {
    /// No particle is ever added by the simulation itself.
    Disabled,
    /// Lattice batches placed in the central half of the domain until the capacity is reached.
    Fill(LatticeFill),
    /// Timed point sources.
    Points(PointEmitters),
}

impl Default for EmissionPolicy {
    fn default() -> Self {
        EmissionPolicy::Fill(LatticeFill::new())
    }
}

impl EmissionPolicy {
    /// Adds the particles due this frame and returns how many were added.
    pub fn emit(
        &mut self,
        domain: &Domain,
        fill_spacing: Real,
        dt: Real,
        particles: &mut ParticleSystem,
        rng: &mut impl Rng,
    ) -> usize {
        match self {
            EmissionPolicy::Disabled => 0,
            EmissionPolicy::Fill(fill) => fill.fill(domain, fill_spacing, particles),
            EmissionPolicy::Points(emitters) => emitters.emit(dt, particles, rng),
        }
    }

    /// The point emitters, if this policy uses them.
    pub fn point_emitters_mut(&mut self) -> Option<&mut PointEmitters> {
        match self {
            EmissionPolicy::Points(emitters) => Some(emitters),
            _ => None,
        }
    }
}
