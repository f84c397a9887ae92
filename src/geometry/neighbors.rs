use std::ops::Range;

use crate::geometry::{BlockCells, SpatialGrid};
use crate::math::{Point, Real, Vector};
use crate::object::Particle;

/// Iterator through every particle binned in the 3×3×3 block of cells around a point.
///
/// Yields particle indices. Members are not filtered by distance. The iterator is lazy, finite,
/// and can be restarted by cloning it before use.
#[derive(Clone)]
pub struct BlockMembers<'a> {
    grid: &'a SpatialGrid,
    order: &'a [usize],
    cells: BlockCells<'a>,
    slots: Range<usize>,
}

impl<'a> BlockMembers<'a> {
    /// Iterates through the particles of the block around `point`.
    ///
    /// `order` is the cell-sorted particle order `grid` was binned from.
    pub fn new(grid: &'a SpatialGrid, order: &'a [usize], point: &Point<Real>) -> Self {
        Self {
            grid,
            order,
            cells: grid.block_cells(point),
            slots: 0..0,
        }
    }
}

impl<'a> Iterator for BlockMembers<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if let Some(slot) = self.slots.next() {
                return Some(self.order[slot]);
            }

            let cell = self.cells.next()?;
            self.slots = self.grid.cell_range(cell);
        }
    }
}

/// A particle within the smoothing radius of another one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor particle.
    pub index: usize,
    /// The vector `center - neighbor.position`.
    pub separation: Vector<Real>,
    /// The length of `separation`.
    pub distance: Real,
}

/// Iterator through the particles within a radius of a point.
///
/// Candidates come from the 3×3×3 block of cells around the point, so the radius must not
/// exceed the cell width. The particle sitting at the center, if any, is yielded too with a
/// zero distance.
#[derive(Clone)]
pub struct Neighbors<'a> {
    members: BlockMembers<'a>,
    particles: &'a [Particle],
    center: Point<Real>,
    radius_sq: Real,
}

impl<'a> Neighbors<'a> {
    /// Iterates through the particles of `particles` within `radius` of `center`.
    pub fn new(
        grid: &'a SpatialGrid,
        order: &'a [usize],
        particles: &'a [Particle],
        center: Point<Real>,
        radius: Real,
    ) -> Self {
        debug_assert!(radius <= grid.cell_width());

        Self {
            members: BlockMembers::new(grid, order, &center),
            particles,
            center,
            radius_sq: radius * radius,
        }
    }
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = Neighbor;

    fn next(&mut self) -> Option<Neighbor> {
        for index in &mut self.members {
            let separation = self.center - self.particles[index].position;
            let distance_sq = separation.norm_squared();

            if distance_sq <= self.radius_sq {
                return Some(Neighbor {
                    index,
                    separation,
                    distance: distance_sq.sqrt(),
                });
            }
        }

        None
    }
}
