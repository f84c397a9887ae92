use crate::kernel::Kernel;
use crate::math::Real;
use na::RealField;

/// The poly6 smoothing kernel, used for densities and for the color field.
///
/// Refer to "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Poly6Kernel {
    h: Real,
    h_sq: Real,
    normalizer: Real,
    diff_normalizer: Real,
}

impl Poly6Kernel {
    /// Evaluates the kernel for the squared distance `r_sq`.
    ///
    /// This avoids a square root in the density summation.
    #[inline]
    pub fn apply_squared(&self, r_sq: Real) -> Real {
        if r_sq <= self.h_sq {
            self.normalizer * (self.h_sq - r_sq).powi(3)
        } else {
            na::zero::<Real>()
        }
    }
}

impl Kernel for Poly6Kernel {
    fn new(h: Real) -> Self {
        Self {
            h,
            h_sq: h * h,
            normalizer: na::convert::<_, Real>(315.0 / 64.0) / (Real::pi() * h.powi(9)),
            diff_normalizer: na::convert::<_, Real>(-945.0 / 32.0) / (Real::pi() * h.powi(9)),
        }
    }

    #[inline]
    fn radius(&self) -> Real {
        self.h
    }

    #[inline]
    fn scalar_apply(&self, r: Real) -> Real {
        assert!(r >= na::zero::<Real>());
        self.apply_squared(r * r)
    }

    #[inline]
    fn gradient_factor(&self, r: Real) -> Real {
        if r <= self.h {
            self.diff_normalizer * (self.h_sq - r * r).powi(2)
        } else {
            na::zero::<Real>()
        }
    }

    #[inline]
    fn laplacian(&self, r: Real) -> Real {
        if r <= self.h {
            let r_sq = r * r;
            self.diff_normalizer
                * (self.h_sq - r_sq)
                * (na::convert::<_, Real>(3.0) * self.h_sq - na::convert::<_, Real>(7.0) * r_sq)
        } else {
            na::zero::<Real>()
        }
    }
}

#[cfg(test)]
mod test {
    use super::Poly6Kernel;
    use crate::kernel::Kernel;
    use crate::math::{Real, Vector};
    use approx::assert_relative_eq;
    use na::RealField;

    #[test]
    fn poly6_value_at_origin() {
        let h = 0.5;
        let kernel = Poly6Kernel::new(h);
        let expected = 315.0 / (64.0 * Real::pi() * h.powi(9)) * h.powi(6);

        assert_relative_eq!(kernel.scalar_apply(0.0), expected, max_relative = 1.0e-5);
        assert_relative_eq!(kernel.apply_squared(0.0), expected, max_relative = 1.0e-5);
    }

    #[test]
    fn poly6_vanishes_outside_support() {
        let kernel = Poly6Kernel::new(0.1);

        assert_eq!(kernel.scalar_apply(0.1), 0.0);
        assert_eq!(kernel.scalar_apply(0.2), 0.0);
        assert_eq!(kernel.gradient_factor(0.2), 0.0);
        assert_eq!(kernel.laplacian(0.2), 0.0);
    }

    #[test]
    fn poly6_gradient_matches_finite_differences() {
        let kernel = Poly6Kernel::new(1.0);
        let v = Vector::new(0.3, -0.2, 0.1);
        let eps = 1.0e-3;
        let grad = kernel.apply_diff(&v);

        for i in 0..3 {
            let mut dv = Vector::zeros();
            dv[i] = eps;
            let fd = (kernel.apply(&(v + dv)) - kernel.apply(&(v - dv))) / (2.0 * eps);
            assert_relative_eq!(grad[i], fd, epsilon = 1.0e-2);
        }
    }

    #[test]
    fn poly6_gradient_points_inward() {
        let kernel = Poly6Kernel::new(1.0);
        let v = Vector::new(0.5, 0.0, 0.0);

        // The kernel decreases away from the origin.
        assert!(kernel.apply_diff(&v).x < 0.0);
    }
}
