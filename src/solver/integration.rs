#[cfg(feature = "parallel")]
use rayon::prelude::*;

use na::Vector2;

use crate::math::Real;
use crate::object::Particle;

/// Advances every particle by `dt` and returns the mechanical energy of the system.
///
/// Positions follow `x + v dt + a dt² / 2`, and velocities are then derived from the
/// displacement so that they always agree with the positions. The previous position is kept
/// on each particle.
///
/// The returned energy is `m Σ v_y² / 2 + m Σ y |a_y|`, evaluated after the update. It is a
/// diagnostic only.
pub fn integrate(dt: Real, particle_mass: Real, particles: &mut [Particle]) -> Real {
    let sums = par_reduce_sum!(
        Vector2::<Real>::zeros(),
        par_iter_mut!(particles).map(|particle| {
            let new_position = particle.position
                + particle.velocity * dt
                + particle.acceleration * (0.5 * dt * dt);
            let new_velocity = (new_position - particle.position) / dt;

            particle.previous_position = particle.position;
            particle.position = new_position;
            particle.velocity = new_velocity;

            Vector2::new(
                new_velocity.y * new_velocity.y,
                particle.position.y * particle.acceleration.y.abs(),
            )
        })
    );

    0.5 * particle_mass * sums.x + particle_mass * sums.y
}

#[cfg(test)]
mod test {
    use super::integrate;
    use crate::math::{Point, Vector};
    use crate::object::Particle;

    #[test]
    fn velocity_matches_the_displacement() {
        let dt = 0.01;
        let mut particles = vec![
            Particle::new(0, Point::new(0.1, 0.2, 0.3), Vector::new(1.0, -2.0, 0.5)),
            Particle::new(1, Point::new(-0.3, 0.0, 0.7), Vector::new(0.0, 0.25, -1.5)),
        ];
        particles[0].acceleration = Vector::new(0.0, -9.82, 3.0);
        particles[1].acceleration = Vector::new(120.0, 40.0, -7.0);

        let before: Vec<_> = particles.iter().map(|p| p.position).collect();
        let _ = integrate(dt, 0.02, &mut particles);

        for (particle, start) in particles.iter().zip(before) {
            assert_eq!(particle.previous_position, start);
            assert_eq!(particle.velocity, (particle.position - start) / dt);
        }
    }

    #[test]
    fn mechanical_energy_sums_vertical_terms() {
        let position = Point::new(3.0, 0.75, -1.0);
        let mut particles = vec![Particle::new(0, position, Vector::new(5.0, 1.0, 0.0))];
        particles[0].acceleration = Vector::new(0.0, -2.0, 0.0);

        // y' = 0.75 + 0.5 - 0.25 = 1.0 and v_y = 0.5.
        let energy = integrate(0.5, 2.0, &mut particles);

        assert_eq!(particles[0].position.y, 1.0);
        assert_eq!(particles[0].velocity.y, 0.5);
        assert_eq!(energy, 0.5 * 2.0 * 0.25 + 2.0 * 2.0);
    }
}
