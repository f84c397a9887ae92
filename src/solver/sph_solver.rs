#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geometry::SpatialGrid;
use crate::kernel::{Kernel, SmoothingKernels};
use crate::math::{Real, Vector};
use crate::object::ParticleSystem;
use crate::SimulationParams;

/// Pressure given by the Tait equation of state `k((ρ/ρ0)⁷ - 1)`.
///
/// The pressure is zero at the rest density and negative below it.
#[inline]
pub fn tait_pressure(density: Real, rest_density: Real, stiffness: Real) -> Real {
    stiffness * ((density / rest_density).powi(7) - 1.0)
}

#[derive(Copy, Clone, Debug, Default)]
struct FluidForces {
    acceleration: Vector<Real>,
    color_field_gradient_magnitude: Real,
    num_neighbors: usize,
}

/// Weakly compressible SPH solver computing densities, pressures and fluid accelerations.
///
/// Particles must be sorted and binned into the grid before each pass. Particles outside of
/// the grid domain have no neighbors: they get a zero density and pressure, and only gravity
/// accelerates them.
#[derive(Clone, Debug)]
pub struct SphSolver {
    kernels: SmoothingKernels,
    densities: Vec<Real>,
    forces: Vec<FluidForces>,
}

impl SphSolver {
    /// Creates a solver using kernels of radius `smoothing_radius`.
    pub fn new(smoothing_radius: Real) -> Self {
        Self {
            kernels: SmoothingKernels::new(smoothing_radius),
            densities: Vec::new(),
            forces: Vec::new(),
        }
    }

    /// The smoothing kernels used by this solver.
    pub fn kernels(&self) -> &SmoothingKernels {
        &self.kernels
    }

    /// Changes the smoothing radius, recomputing the kernel coefficients if needed.
    pub fn set_smoothing_radius(&mut self, smoothing_radius: Real) {
        self.kernels.set_radius(smoothing_radius)
    }

    /// Computes the density and the pressure of every particle.
    ///
    /// The density of a particle sums the poly6 kernel over every particle within the smoothing
    /// radius, itself included, times the particle mass.
    pub fn compute_densities(
        &mut self,
        params: &SimulationParams,
        grid: &SpatialGrid,
        particles: &mut ParticleSystem,
    ) {
        let h = self.kernels.radius();
        let poly6 = self.kernels.poly6;
        let mass = params.particle_mass;
        let system = &*particles;

        self.densities.resize(system.len(), 0.0);

        par_iter_mut!(self.densities)
            .enumerate()
            .for_each(|(i, density)| {
                *density = system
                    .neighbors(grid, i, h)
                    .map(|n| poly6.apply_squared(n.distance * n.distance))
                    .sum::<Real>()
                    * mass;
            });

        for (particle, density) in particles.particles_mut().iter_mut().zip(&self.densities) {
            particle.density = *density;
            particle.pressure = if *density > 0.0 {
                tait_pressure(*density, params.rest_density, params.gas_stiffness)
            } else {
                0.0
            };
        }
    }

    /// Computes the acceleration of every particle due to pressure, viscosity, surface tension
    /// and gravity.
    ///
    /// Also records each particle's color-field gradient magnitude and neighbor count. Returns
    /// the total number of neighbor pairs, self-pairs excluded, each pair being counted once
    /// per side.
    pub fn compute_forces(
        &mut self,
        params: &SimulationParams,
        grid: &SpatialGrid,
        particles: &mut ParticleSystem,
    ) -> usize {
        let h = self.kernels.radius();
        let kernels = self.kernels;
        let system = &*particles;
        let gravity = Vector::y() * params.gravity;

        self.forces.resize(system.len(), FluidForces::default());

        par_iter_mut!(self.forces)
            .enumerate()
            .for_each(|(i, forces)| {
                let particle_i = &system.particles()[i];

                if particle_i.density <= 0.0 {
                    *forces = FluidForces {
                        acceleration: gravity,
                        ..FluidForces::default()
                    };
                    return;
                }

                let mut color_field_gradient = Vector::zeros();
                let mut color_field_laplacian = 0.0;
                let mut pressure_force = Vector::zeros();
                let mut viscosity_force = Vector::zeros();
                let mut num_neighbors = 0;

                for neighbor in system.neighbors(grid, i, h) {
                    let particle_j = &system.particles()[neighbor.index];

                    if particle_j.density <= 0.0 {
                        continue;
                    }

                    let inv_density_j = 1.0 / particle_j.density;
                    let r = neighbor.distance;

                    color_field_laplacian += kernels.poly6.laplacian(r) * inv_density_j;
                    viscosity_force += (particle_j.velocity - particle_i.velocity)
                        * (kernels.viscosity.laplacian(r) * inv_density_j);

                    if neighbor.index == i {
                        continue;
                    }

                    num_neighbors += 1;

                    // Coincident particles have no defined direction.
                    if r <= Real::EPSILON {
                        continue;
                    }

                    color_field_gradient +=
                        neighbor.separation * (kernels.poly6.gradient_factor(r) * inv_density_j);
                    pressure_force += neighbor.separation
                        * (0.5 * (particle_j.pressure + particle_i.pressure)
                            * inv_density_j
                            * kernels.spiky.gradient_factor(r));
                }

                color_field_gradient *= params.particle_mass;
                color_field_laplacian *= params.particle_mass;

                let gradient_magnitude = color_field_gradient.norm();
                let threshold = params.surface_tension_threshold;
                let surface_tension_force = if gradient_magnitude > threshold {
                    color_field_gradient
                        * (-params.surface_tension * color_field_laplacian / gradient_magnitude)
                } else {
                    Vector::zeros()
                };

                pressure_force *= -params.particle_mass;
                viscosity_force *= params.particle_mass * params.viscosity;
                let external_force = gravity * particle_i.density;

                let total_force =
                    pressure_force + viscosity_force + surface_tension_force + external_force;

                *forces = FluidForces {
                    acceleration: total_force / particle_i.density,
                    color_field_gradient_magnitude: gradient_magnitude,
                    num_neighbors,
                };
            });

        let mut num_pairs = 0;

        for (particle, forces) in particles.particles_mut().iter_mut().zip(&self.forces) {
            particle.acceleration = forces.acceleration;
            particle.color_field_gradient_magnitude = forces.color_field_gradient_magnitude;
            particle.num_neighbors = forces.num_neighbors;
            num_pairs += forces.num_neighbors;
        }

        num_pairs
    }
}

#[cfg(test)]
mod test {
    use super::{tait_pressure, SphSolver};
    use crate::geometry::{Domain, SpatialGrid};
    use crate::kernel::Kernel;
    use crate::math::{Point, Vector};
    use crate::object::ParticleSystem;
    use crate::SimulationParams;
    use approx::assert_relative_eq;

    fn params() -> SimulationParams {
        SimulationParams {
            smoothing_radius: 0.1,
            gravity: 0.0,
            ..SimulationParams::default()
        }
    }

    fn binned(
        params: &SimulationParams,
        positions: &[Point<f32>],
    ) -> (SpatialGrid, ParticleSystem) {
        let domain = Domain::cube(1.0).unwrap();
        let mut grid = SpatialGrid::new(domain, params.smoothing_radius).unwrap();
        let mut particles = ParticleSystem::with_capacity(positions.len());

        for p in positions {
            let _ = particles.spawn(*p, Vector::zeros());
        }

        particles.sort_by_cell(&grid);
        let _ = particles.bin_into(&mut grid);
        (grid, particles)
    }

    #[test]
    fn pressure_vanishes_at_rest_density() {
        assert_eq!(tait_pressure(998.29, 998.29, 3.0), 0.0);
        assert!(tait_pressure(1100.0, 998.29, 3.0) > 0.0);
        assert!(tait_pressure(900.0, 998.29, 3.0) < 0.0);
    }

    #[test]
    fn isolated_particle_density_is_its_own_contribution() {
        let params = params();
        let (grid, mut particles) =
            binned(&params, &[Point::origin(), Point::new(0.5, 0.5, 0.5)]);
        let mut solver = SphSolver::new(params.smoothing_radius);

        solver.compute_densities(&params, &grid, &mut particles);

        let expected = params.particle_mass * solver.kernels().poly6.scalar_apply(0.0);

        for particle in particles.particles() {
            assert_relative_eq!(particle.density, expected);
        }
    }

    #[test]
    fn densities_are_never_negative() {
        let params = params();
        let positions: Vec<_> = (0..20)
            .map(|i| Point::new(i as f32 * 0.03 - 0.3, (i % 3) as f32 * 0.02, 0.0))
            .collect();
        let (grid, mut particles) = binned(&params, &positions);
        let mut solver = SphSolver::new(params.smoothing_radius);

        solver.compute_densities(&params, &grid, &mut particles);

        assert!(particles.particles().iter().all(|p| p.density >= 0.0));
    }

    #[test]
    fn isolated_particle_at_rest_stays_at_rest() {
        let params = params();
        let (grid, mut particles) = binned(&params, &[Point::new(0.1, 0.2, 0.3)]);
        let mut solver = SphSolver::new(params.smoothing_radius);

        solver.compute_densities(&params, &grid, &mut particles);
        let num_pairs = solver.compute_forces(&params, &grid, &mut particles);

        let particle = &particles.particles()[0];
        assert_eq!(num_pairs, 0);
        assert_eq!(particle.num_neighbors, 0);
        assert_eq!(particle.acceleration, Vector::zeros());
    }

    #[test]
    fn pressure_forces_are_opposite_for_a_symmetric_pair() {
        let params = SimulationParams {
            rest_density: 1.0,
            ..params()
        };
        let (grid, mut particles) = binned(
            &params,
            &[Point::new(-0.02, 0.0, 0.0), Point::new(0.02, 0.0, 0.0)],
        );
        let mut solver = SphSolver::new(params.smoothing_radius);

        solver.compute_densities(&params, &grid, &mut particles);
        let num_pairs = solver.compute_forces(&params, &grid, &mut particles);

        let a = &particles.particles()[0];
        let b = &particles.particles()[1];
        assert_eq!(num_pairs, 2);
        assert_eq!(a.num_neighbors, 1);
        // A compressed pair repels.
        assert!(a.acceleration.x < 0.0);
        assert_relative_eq!(a.acceleration, -b.acceleration, epsilon = 1.0e-4);
    }

    #[test]
    fn out_of_domain_particles_only_feel_gravity() {
        let params = SimulationParams {
            gravity: -9.82,
            ..params()
        };
        let (grid, mut particles) =
            binned(&params, &[Point::new(5.0, 0.0, 0.0), Point::origin()]);
        let mut solver = SphSolver::new(params.smoothing_radius);

        solver.compute_densities(&params, &grid, &mut particles);
        let _ = solver.compute_forces(&params, &grid, &mut particles);

        let outside = &particles.particles()[0];
        assert_eq!(outside.density, 0.0);
        assert_eq!(outside.pressure, 0.0);
        assert_eq!(outside.acceleration, Vector::new(0.0, -9.82, 0.0));

        let inside = &particles.particles()[1];
        assert_relative_eq!(inside.acceleration, Vector::new(0.0, -9.82, 0.0), epsilon = 1.0e-5);
    }

    #[test]
    fn viscosity_damps_relative_motion() {
        let params = SimulationParams {
            gas_stiffness: 0.0,
            surface_tension_threshold: f32::INFINITY,
            ..params()
        };
        let (grid, mut particles) = binned(
            &params,
            &[Point::new(-0.02, 0.0, 0.0), Point::new(0.02, 0.0, 0.0)],
        );
        particles.particles_mut()[0].velocity = Vector::y();
        particles.particles_mut()[1].velocity = -Vector::y();

        let mut solver = SphSolver::new(params.smoothing_radius);
        solver.compute_densities(&params, &grid, &mut particles);
        let _ = solver.compute_forces(&params, &grid, &mut particles);

        let a = particles.particles()[0].acceleration;
        let b = particles.particles()[1].acceleration;
        assert!(a.y < 0.0);
        assert!(b.y > 0.0);
        assert_relative_eq!(a.y, -b.y, epsilon = 1.0e-3);

        // The same pair without viscosity is not slowed down.
        let inviscid = SimulationParams {
            viscosity: 0.0,
            ..params
        };
        let _ = solver.compute_forces(&inviscid, &grid, &mut particles);
        assert_eq!(particles.particles()[0].acceleration.y, 0.0);
    }

    #[test]
    fn surface_tension_acts_along_the_color_field_gradient() {
        let without = SimulationParams {
            surface_tension_threshold: f32::INFINITY,
            ..params()
        };
        let with = SimulationParams {
            surface_tension_threshold: 0.0,
            ..without.clone()
        };
        let (grid, mut particles) = binned(
            &with,
            &[Point::new(-0.02, 0.0, 0.0), Point::new(0.02, 0.0, 0.0)],
        );
        let mut solver = SphSolver::new(with.smoothing_radius);
        solver.compute_densities(&with, &grid, &mut particles);

        let _ = solver.compute_forces(&without, &grid, &mut particles);
        let reference: Vec<_> = particles.particles().iter().map(|p| p.acceleration).collect();

        let _ = solver.compute_forces(&with, &grid, &mut particles);

        for (particle, reference) in particles.particles().iter().zip(&reference) {
            // The gradient of the color field is along the separation of the pair.
            let diff = particle.acceleration - reference;
            assert!(particle.color_field_gradient_magnitude > 0.0);
            assert!(diff.x.abs() > 1.0e-6);
            assert_eq!(diff.y, 0.0);
            assert_eq!(diff.z, 0.0);
        }

        let tension_a = particles.particles()[0].acceleration - reference[0];
        let tension_b = particles.particles()[1].acceleration - reference[1];
        assert_relative_eq!(tension_a, -tension_b, epsilon = 1.0e-4);
    }
}
