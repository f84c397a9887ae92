//! Spatial acceleration structures for neighbor searches.

pub use self::domain::Domain;
pub use self::neighbors::{BlockMembers, Neighbor, Neighbors};
pub use self::spatial_grid::{BlockCells, GridCell, SpatialGrid, MAX_GRID_CELLS};

mod domain;
mod neighbors;
mod spatial_grid;
