use crate::math::{Point, Real, Vector};

/// The physical state of one fluid particle.
///
/// `density` and `pressure` are only meaningful once the density pass of the current frame
/// completed, and `acceleration` once the force and collision passes did.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Stable identity, assigned at creation and never reused.
    pub id: usize,
    /// The world-space position.
    pub position: Point<Real>,
    /// The position before the last integration step.
    pub previous_position: Point<Real>,
    /// The velocity.
    pub velocity: Vector<Real>,
    /// The acceleration computed for the current frame.
    pub acceleration: Vector<Real>,
    /// Tracer quantity transported by the particle. It does not influence the dynamics.
    pub nutrient: Real,
    /// Staging slot for the next value of `nutrient`.
    pub new_nutrient: Real,
    /// SPH density estimate. Always non-negative.
    pub density: Real,
    /// Pressure from the equation of state. Negative below the rest density.
    pub pressure: Real,
    /// Magnitude of the color-field gradient, large near free surfaces.
    pub color_field_gradient_magnitude: Real,
    /// Number of other particles within the smoothing radius during the last force pass.
    pub num_neighbors: usize,
    /// Whether the last surface classification placed this particle on the free surface.
    pub at_surface: bool,
}

impl Particle {
    /// Creates a particle with zero acceleration, density and pressure.
    ///
    /// The previous position is initialized to `position`.
    pub fn new(id: usize, position: Point<Real>, velocity: Vector<Real>) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            velocity,
            acceleration: Vector::zeros(),
            nutrient: 0.0,
            new_nutrient: 0.0,
            density: 0.0,
            pressure: 0.0,
            color_field_gradient_magnitude: 0.0,
            num_neighbors: 0,
            at_surface: false,
        }
    }

    /// Adds `amount` to the nutrient carried by this particle.
    pub fn add_nutrient(&mut self, amount: Real) {
        self.nutrient += amount;
    }
}
