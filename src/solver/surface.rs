#[cfg(feature = "parallel")]
use rayon::prelude::*;

use num::Zero;

use crate::geometry::SpatialGrid;
use crate::math::{Real, Vector};
use crate::object::ParticleSystem;
use crate::SimulationParams;

/// Flags the particles lying at the free surface of the fluid, and returns their number.
///
/// For each particle, the mass-weighted mean offset from the center of its grid cell to every
/// particle binned in the surrounding 3×3×3 block of cells is computed. The particle is at the
/// surface if the length of that offset exceeds `params.surface_threshold`: inside the bulk the
/// block is evenly populated and the offset stays small.
///
/// The particles must be binned against their current positions. Particles outside of the grid
/// domain are never at the surface.
pub fn extract_surface_particles(
    params: &SimulationParams,
    grid: &SpatialGrid,
    particles: &mut ParticleSystem,
) -> usize {
    let mass = params.particle_mass;
    let threshold = params.surface_threshold;
    let system = &*particles;

    let flags: Vec<bool> = par_iter!(system.particles())
        .enumerate()
        .map(|(i, particle)| {
            let center = match grid.cell_coords(&particle.position) {
                Some(coords) => grid.cell_center(&coords),
                None => return false,
            };

            let mut weighted_offset = Vector::zeros();
            let mut mass_sum: Real = 0.0;

            for j in system.block_members(grid, i) {
                weighted_offset += (center - system.particles()[j].position) * mass;
                mass_sum += mass;
            }

            !mass_sum.is_zero() && (weighted_offset / mass_sum).norm() > threshold
        })
        .collect();

    let mut num_at_surface = 0;

    for (particle, at_surface) in particles.particles_mut().iter_mut().zip(flags) {
        particle.at_surface = at_surface;
        num_at_surface += at_surface as usize;
    }

    num_at_surface
}
