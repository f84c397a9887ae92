use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::counters::Counters;
use crate::error::SimulationError;
use crate::geometry::{Domain, SpatialGrid};
use crate::math::Real;
use crate::object::{Boundary, EmissionPolicy, ParticleSystem};
use crate::solver::{self, SphSolver};
use crate::SimulationParams;

/// A fluid simulation inside a bounded domain.
///
/// Each call to [`Simulation::step`] runs one frame: emission, neighborhood update, densities,
/// forces, wall collisions, integration and surface classification, in this order.
pub struct Simulation {
    /// Performance counters of the simulation. They are disabled by default.
    pub counters: Counters,
    params: SimulationParams,
    grid: SpatialGrid,
    particles: ParticleSystem,
    boundary: Boundary,
    emission: EmissionPolicy,
    solver: SphSolver,
    rng: StdRng,
    mechanical_energy: Real,
    frame: usize,
    num_excluded: usize,
}

impl Simulation {
    /// Creates an empty simulation in `domain`.
    ///
    /// The walls initially enclose the domain and particles are emitted by a lattice fill. Use
    /// [`Self::boundary_mut`] and [`Self::emission_mut`] to change either.
    pub fn new(params: SimulationParams, domain: Domain) -> Result<Self, SimulationError> {
        params.validate()?;
        let grid = SpatialGrid::new(domain, params.smoothing_radius)?;

        info!(
            "Creating a simulation of up to {} particles with smoothing radius {} over a {}×{}×{} grid.",
            params.capacity,
            params.smoothing_radius,
            grid.resolution().x,
            grid.resolution().y,
            grid.resolution().z,
        );

        Ok(Self {
            counters: Counters::new(),
            particles: ParticleSystem::with_capacity(params.capacity),
            boundary: Boundary::from_domain(&domain),
            emission: EmissionPolicy::default(),
            solver: SphSolver::new(params.smoothing_radius),
            rng: StdRng::seed_from_u64(params.seed),
            mechanical_energy: 0.0,
            frame: 0,
            num_excluded: 0,
            grid,
            params,
        })
    }

    /// Advances the simulation by one timestep of `params().dt`.
    pub fn step(&mut self) {
        let params = &self.params;

        self.counters.stages.reset();
        self.counters.neighborhood.reset();
        self.counters.step_time.start();
        self.counters.nframes += 1;

        self.counters.stages.emission_time.start();
        let num_emitted = self.emission.emit(
            self.grid.domain(),
            params.fill_spacing(),
            params.dt,
            &mut self.particles,
            &mut self.rng,
        );
        self.counters.stages.emission_time.pause();

        self.counters.stages.neighborhood_time.start();
        let num_excluded = self.update_neighborhood();
        self.counters.stages.neighborhood_time.pause();

        if num_excluded > self.num_excluded {
            warn!(
                "{} particle(s) left the simulation domain ({} in total).",
                num_excluded - self.num_excluded,
                num_excluded
            );
        }

        self.num_excluded = num_excluded;
        self.counters.neighborhood.num_excluded = num_excluded;

        let params = &self.params;

        self.counters.stages.density_time.start();
        self.solver.compute_densities(params, &self.grid, &mut self.particles);
        self.counters.stages.density_time.pause();

        self.counters.stages.forces_time.start();
        self.counters.neighborhood.num_neighbor_pairs =
            self.solver.compute_forces(params, &self.grid, &mut self.particles);
        self.counters.stages.forces_time.pause();

        self.counters.stages.collisions_time.start();
        solver::resolve_collisions(params, &self.boundary, self.particles.particles_mut());
        self.counters.stages.collisions_time.pause();

        self.counters.stages.integration_time.start();
        self.mechanical_energy = solver::integrate(
            params.dt,
            params.particle_mass,
            self.particles.particles_mut(),
        );
        self.counters.stages.integration_time.pause();

        // Particles moved: the surface pass needs a grid matching their new positions.
        self.counters.stages.surface_time.start();
        let _ = self.update_neighborhood();
        let num_at_surface =
            solver::extract_surface_particles(&self.params, &self.grid, &mut self.particles);
        self.counters.stages.surface_time.pause();

        self.frame += 1;
        self.counters.step_time.pause();

        debug!(
            "Frame {}: {} particles ({} emitted, {} outside of the domain, {} at the surface), mechanical energy {}.",
            self.frame,
            self.particles.len(),
            num_emitted,
            num_excluded,
            num_at_surface,
            self.mechanical_energy
        );
    }

    fn update_neighborhood(&mut self) -> usize {
        self.counters.neighborhood.sort_time.resume();
        self.particles.sort_by_cell(&self.grid);
        self.counters.neighborhood.sort_time.pause();

        self.counters.neighborhood.binning_time.resume();
        let num_excluded = self.particles.bin_into(&mut self.grid);
        self.counters.neighborhood.binning_time.pause();

        num_excluded
    }

    /// The parameters of this simulation.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Replaces the parameters of this simulation.
    ///
    /// A new smoothing radius rebuilds the grid and the kernels. A new seed restarts the random
    /// generator of the point emitters. Existing particles are kept, even beyond a reduced
    /// capacity. On error, the simulation is left unchanged.
    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), SimulationError> {
        params.validate()?;

        if params.smoothing_radius != self.params.smoothing_radius {
            self.grid = SpatialGrid::new(*self.grid.domain(), params.smoothing_radius)?;
            self.solver.set_smoothing_radius(params.smoothing_radius);
            info!(
                "Smoothing radius changed to {}; the grid now has {} cells.",
                params.smoothing_radius,
                self.grid.num_cells()
            );
        }

        if params.seed != self.params.seed {
            self.rng = StdRng::seed_from_u64(params.seed);
        }

        self.particles.set_capacity(params.capacity);
        self.params = params;
        Ok(())
    }

    /// The domain covered by the neighborhood grid.
    pub fn domain(&self) -> &Domain {
        self.grid.domain()
    }

    /// Moves or resizes the domain covered by the neighborhood grid.
    ///
    /// The walls are not affected. Particles outside of the new domain stop interacting with
    /// the others until they come back.
    pub fn set_domain(&mut self, domain: Domain) -> Result<(), SimulationError> {
        self.grid = SpatialGrid::new(domain, self.params.smoothing_radius)?;
        info!(
            "Simulation domain changed to [{}, {}]; the grid now has {} cells.",
            domain.mins(),
            domain.maxs(),
            self.grid.num_cells()
        );
        Ok(())
    }

    /// The grid as of the last frame.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// The walls containing the fluid.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// The walls containing the fluid. They may be edited between frames.
    pub fn boundary_mut(&mut self) -> &mut Boundary {
        &mut self.boundary
    }

    /// The fluid particles.
    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// The fluid particles.
    pub fn particles_mut(&mut self) -> &mut ParticleSystem {
        &mut self.particles
    }

    /// How particles are added at the start of every frame.
    pub fn emission(&self) -> &EmissionPolicy {
        &self.emission
    }

    /// How particles are added at the start of every frame.
    pub fn emission_mut(&mut self) -> &mut EmissionPolicy {
        &mut self.emission
    }

    /// The mechanical energy diagnostic of the last frame.
    pub fn mechanical_energy(&self) -> Real {
        self.mechanical_energy
    }

    /// The number of frames simulated so far.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The performance counters.
    pub fn counters(&self) -> &Counters {
        &self.counters
    }
}
