use crate::kernel::{Kernel, Poly6Kernel, SpikyKernel, ViscosityKernel};
use crate::math::Real;

/// The three kernels of the solver, sharing one smoothing radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SmoothingKernels {
    /// Density and color-field kernel.
    pub poly6: Poly6Kernel,
    /// Pressure kernel.
    pub spiky: SpikyKernel,
    /// Viscosity kernel.
    pub viscosity: ViscosityKernel,
}

impl SmoothingKernels {
    /// Precomputes the coefficients of every kernel for the smoothing radius `h`.
    pub fn new(h: Real) -> Self {
        Self {
            poly6: Poly6Kernel::new(h),
            spiky: SpikyKernel::new(h),
            viscosity: ViscosityKernel::new(h),
        }
    }

    /// The shared smoothing radius.
    pub fn radius(&self) -> Real {
        self.poly6.radius()
    }

    /// Recomputes every coefficient if `h` differs from the current radius.
    pub fn set_radius(&mut self, h: Real) {
        if h != self.radius() {
            *self = Self::new(h);
        }
    }
}
