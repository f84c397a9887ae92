use crate::error::SimulationError;
use crate::geometry::Domain;
use crate::math::{Point, Real, Vector};
use na::Unit;

/// A planar wall of a [`Boundary`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Wall {
    anchor: Point<Real>,
    normal: Unit<Vector<Real>>,
}

impl Wall {
    /// Creates a wall passing through `anchor` with the given normal.
    ///
    /// The normal is the direction in which the wall pushes particles back, i.e., it faces the
    /// fluid. It is normalized here, and must have a non-zero finite length.
    pub fn new(anchor: Point<Real>, normal: Vector<Real>) -> Result<Self, SimulationError> {
        if !normal.iter().all(|e| e.is_finite()) {
            return Err(SimulationError::DegenerateWallNormal);
        }

        let normal = Unit::try_new(normal, Real::EPSILON)
            .ok_or(SimulationError::DegenerateWallNormal)?;

        Ok(Self { anchor, normal })
    }

    /// A point on the wall plane.
    pub fn anchor(&self) -> &Point<Real> {
        &self.anchor
    }

    /// The unit normal of the wall, facing the fluid.
    pub fn normal(&self) -> &Unit<Vector<Real>> {
        &self.normal
    }

    /// The unsigned distance from `point` to the wall plane.
    pub fn distance_to(&self, point: &Point<Real>) -> Real {
        self.normal.dot(&(self.anchor - point)).abs()
    }
}

/// A convex container made of planar walls, against which particles collide.
///
/// Walls may be edited between frames, e.g., by an interactive box editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Boundary {
    walls: Vec<Wall>,
}

impl Boundary {
    /// Creates a boundary from the given walls.
    pub fn new(walls: Vec<Wall>) -> Self {
        Self { walls }
    }

    /// The six walls of an axis-aligned box, with normals pointing inside the box.
    pub fn from_aabb(mins: &Point<Real>, maxs: &Point<Real>) -> Self {
        let mut walls = Vec::with_capacity(6);

        for i in 0..3 {
            let axis = Vector::ith_axis(i);
            walls.push(Wall {
                anchor: *mins,
                normal: axis,
            });
            walls.push(Wall {
                anchor: *maxs,
                normal: -axis,
            });
        }

        Self { walls }
    }

    /// The six walls enclosing `domain`.
    pub fn from_domain(domain: &Domain) -> Self {
        Self::from_aabb(domain.mins(), domain.maxs())
    }

    /// The walls of this boundary.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// The number of walls.
    pub fn num_walls(&self) -> usize {
        self.walls.len()
    }

    /// Adds a wall to this boundary.
    pub fn push_wall(&mut self, wall: Wall) {
        self.walls.push(wall)
    }

    /// Replaces every wall of this boundary.
    pub fn set_walls(&mut self, walls: Vec<Wall>) {
        self.walls = walls;
    }

    /// Removes every wall.
    pub fn clear(&mut self) {
        self.walls.clear()
    }
}

#[cfg(test)]
mod test {
    use super::{Boundary, Wall};
    use crate::math::{Point, Vector};
    use crate::SimulationError;
    use approx::assert_relative_eq;

    #[test]
    fn wall_normals_are_normalized() {
        let wall = Wall::new(Point::origin(), Vector::new(0.0, 2.0, 0.0)).unwrap();

        assert_relative_eq!(wall.normal().into_inner(), Vector::y());
        assert_relative_eq!(wall.distance_to(&Point::new(3.0, -0.25, 1.0)), 0.25);
    }

    #[test]
    fn degenerate_normals_are_rejected() {
        assert_eq!(
            Wall::new(Point::origin(), Vector::zeros()),
            Err(SimulationError::DegenerateWallNormal)
        );
        assert_eq!(
            Wall::new(Point::origin(), Vector::new(f32::NAN, 1.0, 0.0)),
            Err(SimulationError::DegenerateWallNormal)
        );
    }

    #[test]
    fn box_walls_face_inwards() {
        let boundary =
            Boundary::from_aabb(&Point::new(-1.0, -1.0, -1.0), &Point::new(1.0, 1.0, 1.0));
        let center = Point::origin();

        assert_eq!(boundary.num_walls(), 6);

        for wall in boundary.walls() {
            // The normal points from the wall toward the center of the box.
            assert!(wall.normal().dot(&(center - wall.anchor())) > 0.0);
        }
    }
}
