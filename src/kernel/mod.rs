//! SPH smoothing kernels and their derivatives.

pub use self::kernel::Kernel;
pub use self::poly6_kernel::Poly6Kernel;
pub use self::smoothing_kernels::SmoothingKernels;
pub use self::spiky_kernel::SpikyKernel;
pub use self::viscosity_kernel::ViscosityKernel;

mod kernel;
mod poly6_kernel;
mod smoothing_kernels;
mod spiky_kernel;
mod viscosity_kernel;
