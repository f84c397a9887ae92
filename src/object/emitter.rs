use log::trace;
use num::Zero;
use rand::Rng;

use crate::error::SimulationError;
use crate::math::{Point, Real, Vector};
use crate::object::{ContiguousArena, ContiguousArenaIndex, ParticleSystem};

/// A point source spawning particles at a fixed interval until its time-to-live runs out.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PointEmitter {
    origin: Point<Real>,
    velocity: Vector<Real>,
    time_to_live: Real,
    time_since_emission: Real,
    interval: Real,
    radius: Real,
}

impl PointEmitter {
    /// Creates an emitter spawning particles with `velocity` within `radius` of `origin`, once
    /// every `interval` seconds, for `time_to_live` seconds.
    pub fn new(
        origin: Point<Real>,
        velocity: Vector<Real>,
        time_to_live: Real,
        interval: Real,
        radius: Real,
    ) -> Result<Self, SimulationError> {
        if !(interval > 0.0 && interval.is_finite()) {
            return Err(SimulationError::InvalidEmitter("interval"));
        }

        if !(time_to_live > 0.0) {
            return Err(SimulationError::InvalidEmitter("time_to_live"));
        }

        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(SimulationError::InvalidEmitter("radius"));
        }

        if !origin.iter().chain(velocity.iter()).all(|e| e.is_finite()) {
            return Err(SimulationError::InvalidEmitter("origin"));
        }

        Ok(Self {
            origin,
            velocity,
            time_to_live,
            time_since_emission: 0.0,
            interval,
            radius,
        })
    }

    /// An emitter living 6 seconds, spawning one particle per frame within half a smoothing
    /// radius of `origin`.
    pub fn with_defaults(
        origin: Point<Real>,
        velocity: Vector<Real>,
        smoothing_radius: Real,
        dt: Real,
    ) -> Result<Self, SimulationError> {
        Self::new(origin, velocity, 6.0, dt, smoothing_radius * 0.5)
    }

    /// The center of the emission sphere.
    pub fn origin(&self) -> &Point<Real> {
        &self.origin
    }

    /// The velocity given to spawned particles.
    pub fn velocity(&self) -> &Vector<Real> {
        &self.velocity
    }

    /// The remaining lifetime of this emitter.
    pub fn time_to_live(&self) -> Real {
        self.time_to_live
    }

    /// The time between two emissions.
    pub fn interval(&self) -> Real {
        self.interval
    }

    /// The radius of the emission sphere.
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Whether this emitter will spawn particles again.
    pub fn is_alive(&self) -> bool {
        self.time_to_live > 0.0 && self.interval > 0.0 && self.radius >= 0.0
    }

    /// Advances this emitter by `dt`, spawning every particle due during that time.
    ///
    /// Returns the number of particles actually spawned, which may be less than the number due
    /// if `particles` is full.
    pub fn emit(&mut self, dt: Real, particles: &mut ParticleSystem, rng: &mut impl Rng) -> usize {
        if !self.is_alive() {
            return 0;
        }

        self.time_since_emission += dt;
        let num_due = (self.time_since_emission / self.interval).floor();
        // Emissions that do not fit in `particles` are dropped, not deferred.
        self.time_since_emission %= self.interval;
        self.time_to_live -= dt;

        let num_due = (num_due as usize).min(particles.remaining_capacity());
        let mut num_spawned = 0;

        while num_spawned < num_due {
            let position = self.origin + random_in_ball(self.radius, rng);

            if particles.spawn(position, self.velocity).is_none() {
                break;
            }

            num_spawned += 1;
        }

        num_spawned
    }
}

/// Rejection-samples a point uniformly distributed in the ball of the given radius.
fn random_in_ball(radius: Real, rng: &mut impl Rng) -> Vector<Real> {
    if radius.is_zero() {
        return Vector::zeros();
    }

    loop {
        let candidate = Vector::from_fn(|_, _| rng.random_range(-1.0..1.0));

        if candidate.norm_squared() <= 1.0 {
            return candidate * radius;
        }
    }
}

/// The handle of a point emitter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmitterHandle(ContiguousArenaIndex);

impl From<ContiguousArenaIndex> for EmitterHandle {
    #[inline]
    fn from(i: ContiguousArenaIndex) -> Self {
        EmitterHandle(i)
    }
}

impl From<EmitterHandle> for ContiguousArenaIndex {
    #[inline]
    fn from(handle: EmitterHandle) -> Self {
        handle.0
    }
}

/// The set of live point emitters.
///
/// Emitters are retired as soon as their time-to-live runs out.
#[derive(Clone, Debug, Default)]
pub struct PointEmitters {
    emitters: ContiguousArena<EmitterHandle, PointEmitter>,
}

impl PointEmitters {
    /// An empty set of emitters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an emitter to this set.
    pub fn add(&mut self, emitter: PointEmitter) -> EmitterHandle {
        self.emitters.insert(emitter)
    }

    /// Removes an emitter before it expires.
    pub fn remove(&mut self, handle: EmitterHandle) -> Option<PointEmitter> {
        self.emitters.remove(handle)
    }

    /// The emitter with the given handle, if it is still alive.
    pub fn get(&self, handle: EmitterHandle) -> Option<&PointEmitter> {
        self.emitters.get(handle)
    }

    /// The number of live emitters.
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    /// Returns `true` if there is no live emitter.
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Returns `true` if at least one emitter will spawn particles again.
    pub fn is_any_alive(&self) -> bool {
        self.emitters.values().any(|e| e.is_alive())
    }

    /// An iterator through the live emitters.
    pub fn iter(&self) -> impl Iterator<Item = &PointEmitter> {
        self.emitters.values()
    }

    /// Advances every emitter by `dt` and retires the expired ones.
    ///
    /// Returns the number of particles spawned.
    pub fn emit(&mut self, dt: Real, particles: &mut ParticleSystem, rng: &mut impl Rng) -> usize {
        let num_spawned = self
            .emitters
            .values_mut()
            .map(|emitter| emitter.emit(dt, particles, rng))
            .sum();

        for handle in self.emitters.retain(|e| e.is_alive()) {
            trace!("Retiring expired point emitter {:?}.", handle);
        }

        num_spawned
    }
}

#[cfg(test)]
mod test {
    use super::{PointEmitter, PointEmitters};
    use crate::math::{Point, Vector};
    use crate::object::ParticleSystem;
    use crate::SimulationError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn invalid_emitters_are_rejected() {
        let o = Point::origin();
        let v = Vector::zeros();

        assert_eq!(
            PointEmitter::new(o, v, 1.0, 0.0, 0.1),
            Err(SimulationError::InvalidEmitter("interval"))
        );
        assert_eq!(
            PointEmitter::new(o, v, -1.0, 0.1, 0.1),
            Err(SimulationError::InvalidEmitter("time_to_live"))
        );
        assert_eq!(
            PointEmitter::new(o, v, 1.0, 0.1, -0.1),
            Err(SimulationError::InvalidEmitter("radius"))
        );
        assert!(PointEmitter::new(o, v, 1.0, 0.1, 0.0).is_ok());
    }

    #[test]
    fn default_emitter_spawns_once_per_frame() {
        let emitter =
            PointEmitter::with_defaults(Point::origin(), Vector::x(), 0.1, 0.01).unwrap();

        assert_eq!(emitter.time_to_live(), 6.0);
        assert_eq!(emitter.interval(), 0.01);
        assert_eq!(emitter.radius(), 0.05);
    }

    #[test]
    fn emitted_particles_lie_in_the_emission_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut particles = ParticleSystem::with_capacity(100);
        let origin = Point::new(1.0, 2.0, 3.0);
        let velocity = Vector::new(0.0, -1.0, 0.0);
        let mut emitter = PointEmitter::new(origin, velocity, 10.0, 0.25, 0.5).unwrap();

        // Four intervals per unit of time.
        assert_eq!(emitter.emit(1.0, &mut particles, &mut rng), 4);
        assert_eq!(particles.len(), 4);

        for particle in particles.particles() {
            assert!((particle.position - origin).norm() <= 0.5);
            assert_eq!(particle.velocity, velocity);
            assert_eq!(particle.previous_position, particle.position);
        }
    }

    #[test]
    fn emitters_retire_when_their_time_runs_out() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut particles = ParticleSystem::with_capacity(1000);
        let mut emitters = PointEmitters::new();
        let dt = 0.125;
        let o = Point::origin();
        let short = emitters.add(PointEmitter::new(o, Vector::zeros(), 0.25, dt, 0.0).unwrap());
        let long = emitters.add(PointEmitter::new(o, Vector::zeros(), 10.0, dt, 0.0).unwrap());

        // Each frame completes exactly one interval for each emitter.
        assert_eq!(emitters.emit(dt, &mut particles, &mut rng), 2);
        assert!(emitters.get(short).is_some());

        assert_eq!(emitters.emit(dt, &mut particles, &mut rng), 2);
        assert!(emitters.get(short).is_none());
        assert!(emitters.get(long).is_some());
        assert_eq!(emitters.len(), 1);
        assert!(emitters.is_any_alive());

        assert_eq!(emitters.emit(dt, &mut particles, &mut rng), 1);
        assert!(emitters.remove(long).is_some());
        assert!(!emitters.is_any_alive());
        assert_eq!(particles.len(), 5);
    }

    #[test]
    fn emission_stops_at_capacity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut particles = ParticleSystem::with_capacity(3);
        let mut emitters = PointEmitters::new();
        let emitter = PointEmitter::new(Point::origin(), Vector::zeros(), 10.0, 0.1, 0.1).unwrap();
        let _ = emitters.add(emitter);

        assert_eq!(emitters.emit(0.5, &mut particles, &mut rng), 3);
        assert_eq!(emitters.emit(0.5, &mut particles, &mut rng), 0);
        assert_eq!(particles.len(), 3);
    }

    #[test]
    fn tiny_intervals_are_bounded_by_capacity() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut particles = ParticleSystem::with_capacity(10);
        let mut emitter =
            PointEmitter::new(Point::origin(), Vector::zeros(), 10.0, 1.0e-9, 0.0).unwrap();

        // `1.0 - 1.0e-9 == 1.0` in single precision.
        assert_eq!(emitter.emit(1.0, &mut particles, &mut rng), 10);
        assert_eq!(particles.len(), 10);
        assert!(emitter.time_since_emission < emitter.interval());
        assert_eq!(emitter.time_to_live(), 9.0);

        assert_eq!(emitter.emit(1.0, &mut particles, &mut rng), 0);
        assert_eq!(emitter.time_to_live(), 8.0);
    }
}
