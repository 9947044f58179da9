//! Element type accepted by every kernel and network operation.

use scirs2_core::ndarray_ext::ScalarOperand;
use scirs2_core::numeric::{Float, NumAssign, NumCast};
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Floating-point scalar usable in network cores.
///
/// Bundles the bounds required by `scirs2_linalg` decompositions and by
/// ndarray matrix products. Implemented for `f32` and `f64`.
pub trait TnScalar:
    Float + NumAssign + NumCast + Sum + Send + Sync + ScalarOperand + Debug + Display + 'static
{
    /// Convert an `f64` constant into this scalar type.
    fn from_f64_lossy(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(Self::nan)
    }

    /// Convert this scalar into `f64`.
    fn to_f64_lossy(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }
}

impl<T> TnScalar for T where
    T: Float
        + NumAssign
        + NumCast
        + Sum
        + Send
        + Sync
        + ScalarOperand
        + Debug
        + Display
        + 'static
{
}
