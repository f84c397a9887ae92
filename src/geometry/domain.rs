use crate::error::SimulationError;
use crate::math::{Point, Real, Vector, DIM};

/// The axis-aligned region covered by the spatial grid.
///
/// Particles outside of the domain keep moving but are invisible to neighbor searches.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Domain {
    mins: Point<Real>,
    maxs: Point<Real>,
}

impl Domain {
    /// Creates a domain from its minimum and maximum corners.
    ///
    /// Fails if a bound is not finite or if `mins[i] >= maxs[i]` along some axis.
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Result<Self, SimulationError> {
        for i in 0..DIM {
            if !mins[i].is_finite() || !maxs[i].is_finite() || mins[i] >= maxs[i] {
                return Err(SimulationError::DegenerateDomain);
            }
        }

        Ok(Self { mins, maxs })
    }

    /// A cube centered at the origin with the given half-extent.
    pub fn cube(half_extent: Real) -> Result<Self, SimulationError> {
        let he = Vector::repeat(half_extent);
        Self::new(Point::from(-he), Point::from(he))
    }

    /// The minimum corner.
    pub fn mins(&self) -> &Point<Real> {
        &self.mins
    }

    /// The maximum corner.
    pub fn maxs(&self) -> &Point<Real> {
        &self.maxs
    }

    /// The center of this domain.
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The size of this domain along each axis.
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Tests if `point` lies in this domain.
    ///
    /// The lower bounds are inclusive and the upper bounds exclusive. Points with NaN
    /// coordinates are never contained.
    pub fn contains(&self, point: &Point<Real>) -> bool {
        (0..DIM).all(|i| point[i] >= self.mins[i] && point[i] < self.maxs[i])
    }

    /// A copy of this domain scaled by `factor` around its center.
    pub fn scaled_about_center(&self, factor: Real) -> Self {
        let center = self.center();
        let half = self.extents() * (factor * na::convert::<_, Real>(0.5));

        Self {
            mins: center - half,
            maxs: center + half,
        }
    }
}
