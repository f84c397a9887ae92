use crate::math::{Real, Vector};

/// A radially symmetric smoothing kernel truncated at its radius `h`.
///
/// Kernels store their normalization coefficients, computed once for a given `h`. Build a new
/// kernel with [`Kernel::new`] whenever the smoothing radius changes.
pub trait Kernel: Copy + Send + Sync {
    /// Builds the kernel for the support radius `h`, precomputing its coefficients.
    fn new(h: Real) -> Self;

    /// The support radius `h` of this kernel.
    fn radius(&self) -> Real;

    /// Evaluates the kernel for the distance `r`.
    fn scalar_apply(&self, r: Real) -> Real;

    /// The factor `g(r)` such that the kernel gradient at the separation `v` is `g(|v|) * v`.
    ///
    /// Returns zero outside of the support and wherever the gradient is singular.
    fn gradient_factor(&self, r: Real) -> Real;

    /// Evaluates the Laplacian of the kernel for the distance `r`.
    fn laplacian(&self, r: Real) -> Real;

    /// Evaluates the kernel for the given separation vector.
    fn apply(&self, v: &Vector<Real>) -> Real {
        self.scalar_apply(v.norm())
    }

    /// Differential wrt. the coordinates of `v`.
    fn apply_diff(&self, v: &Vector<Real>) -> Vector<Real> {
        v * self.gradient_factor(v.norm())
    }
}
