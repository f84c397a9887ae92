//! The passes of a simulation frame: densities and fluid forces, wall collisions, integration
//! and surface classification.

pub use self::collisions::{resolve_collisions, PENETRATION_EPSILON};
pub use self::integration::integrate;
pub use self::sph_solver::{tait_pressure, SphSolver};
pub use self::surface::extract_surface_particles;

mod collisions;
mod integration;
mod sph_solver;
mod surface;
