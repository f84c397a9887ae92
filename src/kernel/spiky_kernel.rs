use crate::kernel::Kernel;
use crate::math::Real;
use na::RealField;

/// The spiky smoothing kernel, used for pressure forces.
///
/// Its gradient does not vanish near the origin, which keeps particles from clustering.
/// Refer to "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpikyKernel {
    h: Real,
    normalizer: Real,
    diff_normalizer: Real,
}

impl Kernel for SpikyKernel {
    fn new(h: Real) -> Self {
        Self {
            h,
            normalizer: na::convert::<_, Real>(15.0) / (Real::pi() * h.powi(6)),
            diff_normalizer: na::convert::<_, Real>(-45.0) / (Real::pi() * h.powi(6)),
        }
    }

    #[inline]
    fn radius(&self) -> Real {
        self.h
    }

    #[inline]
    fn scalar_apply(&self, r: Real) -> Real {
        assert!(r >= na::zero::<Real>());

        if r <= self.h {
            self.normalizer * (self.h - r).powi(3)
        } else {
            na::zero::<Real>()
        }
    }

    /// `-45 / (π h⁶) * (h - r)² / r`, or zero at `r = 0` where the direction is undefined.
    #[inline]
    fn gradient_factor(&self, r: Real) -> Real {
        if r > Real::EPSILON && r <= self.h {
            self.diff_normalizer * (self.h - r).powi(2) / r
        } else {
            na::zero::<Real>()
        }
    }

    #[inline]
    fn laplacian(&self, r: Real) -> Real {
        if r > Real::EPSILON && r <= self.h {
            let _2: Real = na::convert::<_, Real>(2.0);
            self.diff_normalizer * _2 * (self.h - r) * (self.h - _2 * r) / r
        } else {
            na::zero::<Real>()
        }
    }
}

#[cfg(test)]
mod test {
    use super::SpikyKernel;
    use crate::kernel::Kernel;
    use crate::math::{Real, Vector};
    use approx::assert_relative_eq;
    use na::RealField;

    #[test]
    fn spiky_gradient_coefficient() {
        let h = 0.2;
        let r = 0.05;
        let kernel = SpikyKernel::new(h);
        let expected = -45.0 / (Real::pi() * h.powi(6)) * (h - r).powi(2) / r;

        assert_relative_eq!(kernel.gradient_factor(r), expected, max_relative = 1.0e-5);
    }

    #[test]
    fn spiky_gradient_is_zero_at_origin() {
        let kernel = SpikyKernel::new(0.2);

        assert_eq!(kernel.gradient_factor(0.0), 0.0);
        assert_eq!(kernel.apply_diff(&Vector::zeros()), Vector::zeros());
        assert!(kernel.laplacian(0.0).is_finite());
    }

    #[test]
    fn spiky_gradient_matches_finite_differences() {
        let kernel = SpikyKernel::new(1.0);
        let v = Vector::new(0.2, 0.3, -0.25);
        let eps = 1.0e-3;
        let grad = kernel.apply_diff(&v);

        for i in 0..3 {
            let mut dv = Vector::zeros();
            dv[i] = eps;
            let fd = (kernel.apply(&(v + dv)) - kernel.apply(&(v - dv))) / (2.0 * eps);
            assert_relative_eq!(grad[i], fd, epsilon = 1.0e-2);
        }
    }
}
