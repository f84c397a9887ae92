#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::math::Real;
use crate::object::{Boundary, Particle};
use crate::SimulationParams;

/// Penetrations below this depth do not trigger any penalty.
pub const PENETRATION_EPSILON: Real = 1.0e-5;

/// Adds the penalty accelerations of every wall of `boundary` to the particles.
///
/// A particle closer than one smoothing radius to a wall plane is pushed along the wall normal
/// by a spring-damper acceleration `(stiffness * penetration + damping * (normal · velocity))`.
/// The penalties of all the walls accumulate. Tangential motion is left untouched.
pub fn resolve_collisions(
    params: &SimulationParams,
    boundary: &Boundary,
    particles: &mut [Particle],
) {
    let h = params.smoothing_radius;
    let walls = boundary.walls();

    par_iter_mut!(particles).for_each(|particle| {
        for wall in walls {
            let penetration = h - wall.distance_to(&particle.position);

            if penetration > PENETRATION_EPSILON {
                let normal = wall.normal();
                let magnitude = params.wall_stiffness * penetration
                    + params.wall_damping * normal.dot(&particle.velocity);
                particle.acceleration += normal.into_inner() * magnitude;
            }
        }
    })
}
