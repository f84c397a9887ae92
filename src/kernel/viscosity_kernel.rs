use crate::kernel::Kernel;
use crate::math::Real;
use na::RealField;

/// The viscosity smoothing kernel.
///
/// Its Laplacian is positive everywhere inside the support, so viscous forces only ever smooth
/// velocity differences out.
/// Refer to "Particle-Based Fluid Simulation for Interactive Applications", Müller et al.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViscosityKernel {
    h: Real,
    normalizer: Real,
    laplacian_normalizer: Real,
}

impl Kernel for ViscosityKernel {
    fn new(h: Real) -> Self {
        let _2: Real = na::convert::<_, Real>(2.0);

        Self {
            h,
            normalizer: na::convert::<_, Real>(15.0) / (_2 * Real::pi() * h.powi(3)),
            laplacian_normalizer: na::convert::<_, Real>(45.0) / (Real::pi() * h.powi(6)),
        }
    }

    #[inline]
    fn radius(&self) -> Real {
        self.h
    }

    fn scalar_apply(&self, r: Real) -> Real {
        assert!(r >= na::zero::<Real>());

        let _2: Real = na::convert::<_, Real>(2.0);
        let h = self.h;

        if r > na::zero::<Real>() && r <= h {
            let rr_hh = r * r / (h * h);
            self.normalizer
                * (rr_hh * (na::one::<Real>() - r / (_2 * h)) + h / (_2 * r) - na::one::<Real>())
        } else {
            na::zero::<Real>()
        }
    }

    fn gradient_factor(&self, r: Real) -> Real {
        let _2: Real = na::convert::<_, Real>(2.0);
        let _3: Real = na::convert::<_, Real>(3.0);
        let h = self.h;

        if r > Real::EPSILON && r <= h {
            let rr = r * r;
            let hh = h * h;
            let hhh = hh * h;
            self.normalizer * (-_3 * rr / (_2 * hhh) + _2 * r / hh - h / (_2 * rr)) / r
        } else {
            na::zero::<Real>()
        }
    }

    /// `45 / (π h⁶) * (h - r)`.
    #[inline]
    fn laplacian(&self, r: Real) -> Real {
        if r <= self.h {
            self.laplacian_normalizer * (self.h - r)
        } else {
            na::zero::<Real>()
        }
    }
}
