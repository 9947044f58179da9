//! Core-times-matrix products for three-way network cores
//!
//! A network core G has shape (r₀, n, r₁). The three products here contract a
//! matrix against exactly one of its axes:
//!
//! | function              | contraction                 | result         |
//! |-----------------------|-----------------------------|----------------|
//! | [`contract_free`]     | Σⱼ G\[i,j,k\] · M\[a,j\]    | (r₀, a, r₁)    |
//! | [`contract_rank_left`]| Σᵢ M\[a,i\] · G\[i,j,k\]    | (a, n, r₁)     |
//! | [`contract_rank_right`]| Σₖ G\[i,j,k\] · M\[k,a\]   | (r₀, n, a)     |
//!
//! All three are matrix products on an unfolding, delegated to ndarray's `dot`.

use crate::error::{KernelError, KernelResult};
use crate::scalar::TnScalar;
use crate::unfold::{fold_left, fold_right, left_unfolding, right_unfolding};
use scirs2_core::ndarray_ext::{Array3, ArrayView2, ArrayView3, Axis};

/// Contract the free (middle) axis of `core` with the columns of `matrix`.
///
/// `core` (r₀, n, r₁) and `matrix` (a, n) give (r₀, a, r₁). Applying a Tucker
/// factor U of shape (I, n) expands the core to its logical mode size I.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{array, Array3};
/// use tnrs_kernels::contract_free;
///
/// let core = Array3::<f64>::ones((1, 2, 1));
/// let factor = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let expanded = contract_free(&core.view(), &factor.view()).unwrap();
/// assert_eq!(expanded.shape(), &[1, 3, 1]);
/// assert_eq!(expanded[[0, 2, 0]], 2.0);
/// ```
pub fn contract_free<T: TnScalar>(
    core: &ArrayView3<T>,
    matrix: &ArrayView2<T>,
) -> KernelResult<Array3<T>> {
    let (r0, n, r1) = core.dim();
    let (a, cols) = matrix.dim();
    if cols != n {
        return Err(KernelError::incompatible_shapes(
            "contract_free",
            core.shape().to_vec(),
            matrix.shape().to_vec(),
            "matrix columns must equal the core's free dimension",
        ));
    }

    let mut result = Array3::<T>::zeros((r0, a, r1));
    for (slab, mut out) in core
        .axis_iter(Axis(0))
        .zip(result.axis_iter_mut(Axis(0)))
    {
        out.assign(&matrix.dot(&slab));
    }
    Ok(result)
}

/// Contract the leading rank axis of `core` with `matrix` from the left.
///
/// `matrix` (a, r₀) and `core` (r₀, n, r₁) give (a, n, r₁).
pub fn contract_rank_left<T: TnScalar>(
    matrix: &ArrayView2<T>,
    core: &ArrayView3<T>,
) -> KernelResult<Array3<T>> {
    let (r0, n, r1) = core.dim();
    if matrix.ncols() != r0 {
        return Err(KernelError::incompatible_shapes(
            "contract_rank_left",
            matrix.shape().to_vec(),
            core.shape().to_vec(),
            "matrix columns must equal the core's left rank",
        ));
    }
    let product = matrix.dot(&right_unfolding(core));
    fold_right(&product.view(), n, r1)
}

/// Contract the trailing rank axis of `core` with `matrix` from the right.
///
/// `core` (r₀, n, r₁) and `matrix` (r₁, a) give (r₀, n, a).
pub fn contract_rank_right<T: TnScalar>(
    core: &ArrayView3<T>,
    matrix: &ArrayView2<T>,
) -> KernelResult<Array3<T>> {
    let (r0, n, r1) = core.dim();
    if matrix.nrows() != r1 {
        return Err(KernelError::incompatible_shapes(
            "contract_rank_right",
            core.shape().to_vec(),
            matrix.shape().to_vec(),
            "matrix rows must equal the core's right rank",
        ));
    }
    let product = left_unfolding(core).dot(matrix);
    fold_left(&product.view(), r0, n)
}
