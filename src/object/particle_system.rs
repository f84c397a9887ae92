use crate::geometry::{BlockMembers, Neighbors, SpatialGrid};
use crate::math::{Point, PositionField, Real, Vector};
use crate::object::Particle;

/// The set of all fluid particles.
///
/// Particles are stored contiguously in creation order and never removed, so a particle's
/// index is also its id. Neighbor searches go through a separate permutation of the particle
/// indices sorted by grid cell, which is what the [`SpatialGrid`] cells point into.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    order: Vec<usize>,
    capacity: usize,
    next_id: usize,
}

impl ParticleSystem {
    /// Creates an empty particle system that will hold at most `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    /// The maximum number of particles of this system.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the maximum number of particles.
    ///
    /// Existing particles are kept even if they exceed the new capacity.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// The number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns `true` if there is no particle.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Returns `true` if no more particle can be spawned.
    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    /// The number of particles that can still be spawned.
    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.particles.len())
    }

    /// Adds a particle and returns its id, or `None` if the capacity is reached.
    pub fn spawn(&mut self, position: Point<Real>, velocity: Vector<Real>) -> Option<usize> {
        if self.is_full() {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.order.push(self.particles.len());
        self.particles.push(Particle::new(id, position, velocity));
        Some(id)
    }

    /// All the particles, in creation order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// All the particles, in creation order.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// The particle with the given id.
    pub fn get(&self, id: usize) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// The particle indices sorted by grid cell, as of the last [`Self::sort_by_cell`].
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Sorts the particle order by the cell index of each particle in `grid`.
    ///
    /// Particles outside of the domain are moved to the end. The sort is stable, so particles
    /// sharing a cell keep their relative order from one frame to the next.
    pub fn sort_by_cell(&mut self, grid: &SpatialGrid) {
        let particles = &self.particles;
        let cell = |i: &usize| grid.cell_of(&particles[*i].position).unwrap_or(usize::MAX);
        self.order.sort_by_cached_key(cell);
    }

    /// Clears `grid` and bins every particle into it, following the current order.
    ///
    /// Returns the number of particles excluded because they lie outside of the domain. The order
    /// must have been sorted against `grid` since the particles last moved.
    pub fn bin_into(&self, grid: &mut SpatialGrid) -> usize {
        grid.clear();
        grid.bin(self.order.iter().map(|i| &self.particles[*i].position));
        self.order
            .iter()
            .rev()
            .take_while(|i| grid.cell_of(&self.particles[**i].position).is_none())
            .count()
    }

    /// The particles within `radius` of the particle `i`, including `i` itself.
    pub fn neighbors<'a>(&'a self, grid: &'a SpatialGrid, i: usize, radius: Real) -> Neighbors<'a> {
        Neighbors::new(
            grid,
            &self.order,
            &self.particles,
            self.particles[i].position,
            radius,
        )
    }

    /// The particles binned in the 3×3×3 block of cells around the particle `i`.
    pub fn block_members<'a>(&'a self, grid: &'a SpatialGrid, i: usize) -> BlockMembers<'a> {
        BlockMembers::new(grid, &self.order, &self.particles[i].position)
    }

    /// The positions and color-field gradient magnitudes of every particle, in creation order.
    pub fn position_field_data(&self) -> Vec<PositionField<Real>> {
        self.particles
            .iter()
            .map(|p| p.position.coords.push(p.color_field_gradient_magnitude))
            .collect()
    }

    /// The positions of every particle, in creation order.
    pub fn positions(&self) -> impl Iterator<Item = &Point<Real>> {
        self.particles.iter().map(|p| &p.position)
    }

    /// The particles classified at the free surface by the last frame.
    pub fn surface_particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.at_surface)
    }
}

#[cfg(test)]
mod test {
    use super::ParticleSystem;
    use crate::geometry::{Domain, SpatialGrid};
    use crate::math::{Point, Vector};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grid() -> SpatialGrid {
        let domain = Domain::new(Point::origin(), Point::new(1.0, 1.0, 1.0)).unwrap();
        SpatialGrid::new(domain, 0.1).unwrap()
    }

    fn scattered_system() -> ParticleSystem {
        let mut rng = StdRng::seed_from_u64(7);
        let mut system = ParticleSystem::with_capacity(64);

        for _ in 0..40 {
            let p = Point::from(Vector::from_fn(|_, _| rng.random_range(0.0..1.0)));
            let _ = system.spawn(p, Vector::zeros());
        }

        let _ = system.spawn(Point::new(-0.5, 0.5, 0.5), Vector::zeros());
        let _ = system.spawn(Point::new(0.5, f32::NAN, 0.5), Vector::zeros());
        system
    }

    #[test]
    fn spawn_stops_at_capacity() {
        let mut system = ParticleSystem::with_capacity(2);

        assert_eq!(system.spawn(Point::origin(), Vector::zeros()), Some(0));
        assert_eq!(system.spawn(Point::origin(), Vector::zeros()), Some(1));
        assert_eq!(system.spawn(Point::origin(), Vector::zeros()), None);
        assert_eq!(system.len(), 2);
        assert!(system.is_full());
        assert_eq!(system.remaining_capacity(), 0);
    }

    #[test]
    fn every_in_domain_particle_is_in_exactly_one_cell() {
        let mut system = scattered_system();
        let mut grid = grid();

        system.sort_by_cell(&grid);
        let excluded = system.bin_into(&mut grid);
        assert_eq!(excluded, 2);

        let mut seen = vec![0; system.len()];

        for (index, cell) in grid.cells() {
            for slot in cell.first..cell.first + cell.count {
                let i = system.order()[slot];
                seen[i] += 1;
                // The grid assignment matches a recomputation from the raw position.
                assert_eq!(grid.cell_of(&system.particles()[i].position), Some(index));
            }
        }

        for (i, particle) in system.particles().iter().enumerate() {
            let expected = if grid.cell_of(&particle.position).is_some() {
                1
            } else {
                0
            };
            assert_eq!(seen[i], expected);
        }
    }

    #[test]
    fn neighbors_match_a_brute_force_search() {
        let mut system = scattered_system();
        let mut grid = grid();
        let h = 0.1;

        system.sort_by_cell(&grid);
        let _ = system.bin_into(&mut grid);

        for i in 0..40 {
            let mut found: Vec<_> = system.neighbors(&grid, i, h).map(|n| n.index).collect();
            let mut expected: Vec<_> = (0..system.len())
                .filter(|j| {
                    let pj = &system.particles()[*j].position;
                    grid.cell_of(pj).is_some()
                        && (system.particles()[i].position - pj).norm_squared() <= h * h
                })
                .collect();

            found.sort();
            expected.sort();
            assert_eq!(found, expected);
            assert!(found.contains(&i));
        }
    }

    #[test]
    fn neighbor_iterators_restart_by_cloning() {
        let mut system = scattered_system();
        let mut grid = grid();

        system.sort_by_cell(&grid);
        let _ = system.bin_into(&mut grid);

        let neighbors = system.neighbors(&grid, 0, 0.1);
        let first: Vec<_> = neighbors.clone().collect();
        let second: Vec<_> = neighbors.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_domain_particles_have_no_neighbors() {
        let mut system = scattered_system();
        let mut grid = grid();

        system.sort_by_cell(&grid);
        let _ = system.bin_into(&mut grid);

        assert_eq!(system.neighbors(&grid, 40, 0.1).count(), 0);
        assert_eq!(system.block_members(&grid, 41).count(), 0);
    }

    #[test]
    fn position_field_data_packs_the_color_field() {
        let mut system = ParticleSystem::with_capacity(1);
        let _ = system.spawn(Point::new(1.0, 2.0, 3.0), Vector::zeros());
        system.particles_mut()[0].color_field_gradient_magnitude = 4.0;

        let data = system.position_field_data();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0], na::Vector4::new(1.0, 2.0, 3.0, 4.0));
    }
}
