use std::ops::Range;

use crate::error::SimulationError;
use crate::geometry::Domain;
use crate::math::{Point, Real, Vector, DIM};

/// The largest number of cells a [`SpatialGrid`] may allocate.
pub const MAX_GRID_CELLS: usize = 1 << 26;

/// One cell of the [`SpatialGrid`].
///
/// A cell does not own its particles: it designates the range `first..first + count` of the
/// cell-sorted particle order it was binned from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GridCell {
    /// Offset of the first member of this cell in the sorted particle order.
    pub first: usize,
    /// Number of particles in this cell.
    pub count: usize,
}

/// A uniform grid covering a bounded [`Domain`], with one cell per smoothing radius along each
/// axis.
///
/// The grid is rebuilt from scratch every frame: [`SpatialGrid::clear`], then
/// [`SpatialGrid::bin`] with the particle positions listed in increasing cell order.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialGrid {
    domain: Domain,
    cell_width: Real,
    resolution: Vector<i64>,
    cells: Vec<GridCell>,
}

impl SpatialGrid {
    /// Initialize a grid covering `domain` where each cell has the width `cell_width`.
    pub fn new(domain: Domain, cell_width: Real) -> Result<Self, SimulationError> {
        if !(cell_width > 0.0 && cell_width.is_finite()) {
            return Err(SimulationError::InvalidSmoothingRadius(cell_width));
        }

        let resolution = domain
            .extents()
            .map(|e| ((e / cell_width).ceil() as i64).max(1));
        let num_cells = resolution
            .iter()
            .try_fold(1i64, |acc, n| acc.checked_mul(*n))
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n <= MAX_GRID_CELLS)
            .ok_or(SimulationError::GridTooLarge {
                cell_width,
                max_cells: MAX_GRID_CELLS,
            })?;

        Ok(Self {
            domain,
            cell_width,
            resolution,
            cells: vec![GridCell::default(); num_cells],
        })
    }

    /// The domain covered by this grid.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The width of every cell.
    pub fn cell_width(&self) -> Real {
        self.cell_width
    }

    /// The number of cells along each axis.
    pub fn resolution(&self) -> &Vector<i64> {
        &self.resolution
    }

    /// The total number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Resets every cell count to zero. The grid keeps its size.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.count = 0;
        }
    }

    /// The integer coordinates of the cell containing `point`.
    ///
    /// Returns `None` if `point` lies outside of the domain, including NaN or infinite points.
    pub fn cell_coords(&self, point: &Point<Real>) -> Option<Point<i64>> {
        if !self.domain.contains(point) {
            return None;
        }

        let local = (point - self.domain.mins()) / self.cell_width;
        let mut coords = Point::origin();

        for i in 0..DIM {
            // Rounding may push points right below the upper bound into a missing cell.
            coords[i] = (local[i].floor() as i64).min(self.resolution[i] - 1);
        }

        Some(coords)
    }

    /// The linear index of the cell with the given integer coordinates.
    ///
    /// Returns `None` if these coordinates lie outside of the grid.
    pub fn linear_index(&self, coords: &Point<i64>) -> Option<usize> {
        if (0..DIM).any(|i| coords[i] < 0 || coords[i] >= self.resolution[i]) {
            return None;
        }

        let index = coords.x + self.resolution.x * (coords.y + self.resolution.y * coords.z);
        Some(index as usize)
    }

    /// The linear index of the cell containing `point`, or `None` outside of the domain.
    pub fn cell_of(&self, point: &Point<Real>) -> Option<usize> {
        self.cell_coords(point)
            .and_then(|coords| self.linear_index(&coords))
    }

    /// The world-space center of the cell with the given integer coordinates.
    pub fn cell_center(&self, coords: &Point<i64>) -> Point<Real> {
        let half = na::convert::<_, Real>(0.5);
        *self.domain.mins() + coords.coords.map(|c| (c as Real + half) * self.cell_width)
    }

    /// Assigns particles to cells.
    ///
    /// `positions` must list the particles in increasing cell order, so that the members of
    /// each cell are contiguous. The `k`-th position gets the slot `k`. Positions outside of the
    /// domain are skipped but still consume their slot.
    pub fn bin<'a>(&mut self, positions: impl IntoIterator<Item = &'a Point<Real>>) {
        for (slot, position) in positions.into_iter().enumerate() {
            if let Some(index) = self.cell_of(position) {
                let cell = &mut self.cells[index];

                if cell.count == 0 {
                    cell.first = slot;
                }

                debug_assert_eq!(
                    cell.first + cell.count,
                    slot,
                    "Particles must be sorted by cell index before binning."
                );
                cell.count += 1;
            }
        }
    }

    /// The cell with the given linear index.
    pub fn cell(&self, index: usize) -> GridCell {
        self.cells[index]
    }

    /// The range of sorted particle slots binned into the cell with the given linear index.
    pub fn cell_range(&self, index: usize) -> Range<usize> {
        let cell = self.cells[index];
        cell.first..cell.first + cell.count
    }

    /// An iterator through all the cells of the grid, with their linear index.
    pub fn cells(&self) -> impl Iterator<Item = (usize, &GridCell)> {
        self.cells.iter().enumerate()
    }

    /// An iterator through the linear indices of the 3×3×3 block of cells centered on the cell
    /// containing `point`.
    ///
    /// Cells falling outside of the grid are skipped. The iterator is empty if `point` lies
    /// outside of the domain.
    pub fn block_cells(&self, point: &Point<Real>) -> BlockCells<'_> {
        BlockCells {
            grid: self,
            range: self
                .cell_coords(point)
                .map(|center| CellRangeIterator::with_center(center, 1)),
        }
    }
}

/// Iterator through the in-grid cells of a 3×3×3 block. See [`SpatialGrid::block_cells`].
#[derive(Clone)]
pub struct BlockCells<'a> {
    grid: &'a SpatialGrid,
    range: Option<CellRangeIterator>,
}

impl<'a> Iterator for BlockCells<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let range = self.range.as_mut()?;

        for coords in range {
            if let Some(index) = self.grid.linear_index(&coords) {
                return Some(index);
            }
        }

        None
    }
}

#[derive(Clone)]
struct CellRangeIterator {
    start: Point<i64>,
    end: Point<i64>,
    curr: Point<i64>,
    done: bool,
}

impl CellRangeIterator {
    fn with_center(center: Point<i64>, radius: i64) -> Self {
        let start = center - Vector::repeat(radius);
        Self {
            start,
            end: center + Vector::repeat(radius),
            curr: start,
            done: false,
        }
    }
}

impl Iterator for CellRangeIterator {
    type Item = Point<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.curr == self.end {
            self.done = true;
            Some(self.curr)
        } else {
            let result = self.curr;

            for i in 0..DIM {
                self.curr[i] += 1;

                if self.curr[i] > self.end[i] {
                    self.curr[i] = self.start[i];
                } else {
                    break;
                }
            }

            Some(result)
        }
    }
}
