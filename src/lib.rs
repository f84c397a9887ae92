/*!
**Gutta** is a 3-dimensional Smoothed Particle Hydrodynamics (SPH) solver for Newtonian fluids.
It uses [nalgebra](https://nalgebra.org) for vector math.

Particles carry mass and move under pressure, viscosity, surface tension and gravity. Every frame
runs the same ordered pipeline:

1. emission (lattice fill or point emitters),
2. sorting the particle indices by grid cell and binning them into a uniform grid,
3. density and pressure (Tait equation of state),
4. pressure, viscosity, surface-tension and gravity forces,
5. penalty collisions against planar walls,
6. second-order explicit integration,
7. surface-particle classification for rendering.

Windowing, cameras, bounding-box editors and rendering are left to the caller: they read the
particle positions, surface flags and color-field magnitudes produced by [`Simulation`].

## Features
- **Uniform grid** neighbor search over a bounded domain, rebuilt every frame.
- **Müller kernels:** poly6, spiky and viscosity.
- **Penalty walls** built from anchor points and normals.
- **Emission:** progressive lattice fill up to a capacity, or timed point emitters.
- Optional **parallel** per-particle passes with rayon.
*/
#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_qualifications)]
#![warn(missing_docs)]
#![deny(unused_results)]
#![allow(missing_copy_implementations)]

extern crate nalgebra as na;
extern crate num_traits as num;

macro_rules! par_iter {
    ($t: expr) => {{
        #[cfg(not(feature = "parallel"))]
        let it = $t.iter();

        #[cfg(feature = "parallel")]
        let it = $t.par_iter();
        it
    }};
}

macro_rules! par_iter_mut {
    ($t: expr) => {{
        #[cfg(not(feature = "parallel"))]
        let it = $t.iter_mut();

        #[cfg(feature = "parallel")]
        let it = $t.par_iter_mut();
        it
    }};
}

macro_rules! par_reduce_sum {
    ($identity: expr, $t: expr) => {{
        #[cfg(not(feature = "parallel"))]
        let res = $t.fold($identity, |a, b| a + b);
        #[cfg(feature = "parallel")]
        let res = $t.reduce(|| $identity, |a, b| a + b);
        res
    }};
}

pub mod counters;
mod error;
pub mod geometry;
pub mod kernel;
pub mod object;
mod params;
mod simulation;
pub mod solver;

pub use crate::error::SimulationError;
pub use crate::params::SimulationParams;
pub use crate::simulation::Simulation;

/// Aliases for the mathematical types used throughout the crate.
pub mod math {
    use na::{Point3, Vector3, Vector4};

    /// The number of dimensions of the simulation space.
    pub const DIM: usize = 3;

    /// The scalar type.
    pub type Real = f32;

    /// The point type.
    pub type Point<Real> = Point3<Real>;

    /// The vector type.
    pub type Vector<Real> = Vector3<Real>;

    /// A position packed together with one scalar field value, as consumed by renderers.
    pub type PositionField<Real> = Vector4<Real>;
}
