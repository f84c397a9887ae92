use crate::math::Real;
use thiserror::Error;

/// Configuration errors detected before a simulation frame runs.
///
/// Frames themselves never fail: out-of-domain particles and degenerate numeric cases are
/// handled in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The smoothing radius must be strictly positive and finite.
    #[error("invalid smoothing radius {0}: must be positive and finite")]
    InvalidSmoothingRadius(Real),

    /// The particle mass must be strictly positive and finite.
    #[error("invalid particle mass {0}: must be positive and finite")]
    InvalidParticleMass(Real),

    /// The rest density must be strictly positive and finite.
    #[error("invalid rest density {0}: must be positive and finite")]
    InvalidRestDensity(Real),

    /// The timestep must be strictly positive and finite.
    #[error("invalid timestep {0}: must be positive and finite")]
    InvalidTimestep(Real),

    /// The lattice spacing factor of the fill emitter must be strictly positive and finite.
    #[error("invalid lattice spacing factor {0}: must be positive and finite")]
    InvalidSpacingFactor(Real),

    /// The particle capacity must be at least one.
    #[error("the particle capacity must be at least one")]
    ZeroCapacity,

    /// A parameter that must be finite is NaN or infinite.
    #[error("parameter `{0}` must be finite")]
    NonFiniteParameter(&'static str),

    /// The domain bounds are not finite, or `mins >= maxs` along some axis.
    #[error("degenerate domain: every axis needs finite bounds with min < max")]
    DegenerateDomain,

    /// The grid covering the domain would need too many cells for the smoothing radius.
    #[error("a grid with cells of width {cell_width} would exceed {max_cells} cells")]
    GridTooLarge {
        /// The requested cell width.
        cell_width: Real,
        /// The maximum number of cells.
        max_cells: usize,
    },

    /// A wall normal cannot be normalized.
    #[error("a wall normal must have a non-zero, finite length")]
    DegenerateWallNormal,

    /// An emitter was configured with an unusable interval, lifetime or radius.
    #[error("invalid emitter: {0}")]
    InvalidEmitter(&'static str),
}
