use crate::error::SimulationError;
use crate::math::Real;

/// Parameters controlling the SPH solver.
///
/// Defaults describe water at room temperature, following the values of Kelager's
/// "Lagrangian Fluid Dynamics Using Smoothed Particle Hydrodynamics".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SimulationParams {
    /// Maximum number of particles the simulation will ever hold.
    pub capacity: usize,
    /// The SPH kernel radius `H`. Also the width of a grid cell.
    pub smoothing_radius: Real,
    /// Mass of every particle.
    pub particle_mass: Real,
    /// Density at which the pressure vanishes.
    pub rest_density: Real,
    /// Stiffness `k` of the Tait equation of state.
    pub gas_stiffness: Real,
    /// Dynamic viscosity coefficient.
    pub viscosity: Real,
    /// Surface tension coefficient `σ`.
    pub surface_tension: Real,
    /// Minimum color-field gradient magnitude for surface tension to apply.
    pub surface_tension_threshold: Real,
    /// Vertical gravitational acceleration (negative points down).
    pub gravity: Real,
    /// Spring stiffness of the wall penalty.
    pub wall_stiffness: Real,
    /// Damping of the wall penalty, multiplied by the normal velocity.
    pub wall_damping: Real,
    /// Fixed timestep of one frame.
    pub dt: Real,
    /// Lattice spacing of the fill emitter, as a multiple of the smoothing radius.
    pub fill_spacing_factor: Real,
    /// Neighborhood centroid offset above which a particle is classified at the surface.
    pub surface_threshold: Real,
    /// Seed of the random generator used by point emitters.
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            capacity: 4096,
            smoothing_radius: 0.0457,
            particle_mass: 0.02,
            rest_density: 998.29,
            gas_stiffness: 3.0,
            viscosity: 3.5,
            surface_tension: 0.0728,
            surface_tension_threshold: 7.065,
            gravity: -9.82,
            wall_stiffness: 3000.0,
            wall_damping: -0.9,
            dt: 0.01,
            fill_spacing_factor: 0.5,
            surface_threshold: 0.015,
            seed: 0,
        }
    }
}

impl SimulationParams {
    /// Checks that these parameters define well-posed kernels and a usable timestep.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.capacity == 0 {
            return Err(SimulationError::ZeroCapacity);
        }

        if !(self.smoothing_radius > 0.0 && self.smoothing_radius.is_finite()) {
            return Err(SimulationError::InvalidSmoothingRadius(
                self.smoothing_radius,
            ));
        }

        if !(self.particle_mass > 0.0 && self.particle_mass.is_finite()) {
            return Err(SimulationError::InvalidParticleMass(self.particle_mass));
        }

        if !(self.rest_density > 0.0 && self.rest_density.is_finite()) {
            return Err(SimulationError::InvalidRestDensity(self.rest_density));
        }

        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SimulationError::InvalidTimestep(self.dt));
        }

        if !(self.fill_spacing_factor > 0.0 && self.fill_spacing_factor.is_finite()) {
            return Err(SimulationError::InvalidSpacingFactor(
                self.fill_spacing_factor,
            ));
        }

        // The surface tension threshold may be infinite to disable surface tension entirely.
        if self.surface_tension_threshold.is_nan() {
            return Err(SimulationError::NonFiniteParameter(
                "surface_tension_threshold",
            ));
        }

        let finite = [
            ("gas_stiffness", self.gas_stiffness),
            ("viscosity", self.viscosity),
            ("surface_tension", self.surface_tension),
            ("gravity", self.gravity),
            ("wall_stiffness", self.wall_stiffness),
            ("wall_damping", self.wall_damping),
            ("surface_threshold", self.surface_threshold),
        ];

        match finite.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, _)) => Err(SimulationError::NonFiniteParameter(*name)),
            None => Ok(()),
        }
    }

    /// The lattice spacing used by the fill emitter.
    pub fn fill_spacing(&self) -> Real {
        self.smoothing_radius * self.fill_spacing_factor
    }
}
