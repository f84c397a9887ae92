//! Particles, walls and the emitters feeding the simulation.

pub use self::boundary::{Boundary, Wall};
pub(crate) use self::contiguous_arena::{ContiguousArena, ContiguousArenaIndex};
pub use self::emission::EmissionPolicy;
pub use self::emitter::{EmitterHandle, PointEmitter, PointEmitters};
pub use self::lattice_fill::LatticeFill;
pub use self::particle::Particle;
pub use self::particle_system::ParticleSystem;

mod boundary;
mod contiguous_arena;
mod emission;
mod emitter;
mod lattice_fill;
mod particle;
mod particle_system;
