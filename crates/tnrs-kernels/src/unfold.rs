//! Unfoldings of three-way network cores
//!
//! A core G of shape (r₀, n, r₁) has two matrix views used by every sweep:
//!
//! - left unfolding  L(G) of shape (r₀·n, r₁)
//! - right unfolding R(G) of shape (r₀, n·r₁)
//!
//! Both use row-major (C) order, so `fold_left(left_unfolding(G), r₀, n) == G`.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{Array2, Array3, ArrayView2, ArrayView3};

/// Reshape a core (r₀, n, r₁) into the matrix (r₀·n, r₁).
pub fn left_unfolding<T: Clone>(core: &ArrayView3<T>) -> Array2<T> {
    let (r0, n, r1) = core.dim();
    Array2::from_shape_fn((r0 * n, r1), |(row, k)| core[[row / n, row % n, k]].clone())
}

/// Reshape a core (r₀, n, r₁) into the matrix (r₀, n·r₁).
pub fn right_unfolding<T: Clone>(core: &ArrayView3<T>) -> Array2<T> {
    let (r0, n, r1) = core.dim();
    Array2::from_shape_fn((r0, n * r1), |(i, col)| core[[i, col / r1, col % r1]].clone())
}

/// Inverse of [`left_unfolding`]: fold (r₀·n, r₁) back into (r₀, n, r₁).
pub fn fold_left<T: Clone>(matrix: &ArrayView2<T>, r0: usize, n: usize) -> KernelResult<Array3<T>> {
    let (rows, r1) = matrix.dim();
    if rows != r0 * n {
        return Err(KernelError::dimension_mismatch(
            "fold_left",
            vec![r0 * n, r1],
            vec![rows, r1],
            "rows must equal r_left * n",
        ));
    }
    let data: Vec<T> = matrix.iter().cloned().collect();
    Array3::from_shape_vec((r0, n, r1), data)
        .map_err(|e| KernelError::operation_error("fold_left", e.to_string()))
}

/// Inverse of [`right_unfolding`]: fold (r₀, n·r₁) back into (r₀, n, r₁).
pub fn fold_right<T: Clone>(matrix: &ArrayView2<T>, n: usize, r1: usize) -> KernelResult<Array3<T>> {
    let (r0, cols) = matrix.dim();
    if cols != n * r1 {
        return Err(KernelError::dimension_mismatch(
            "fold_right",
            vec![r0, n * r1],
            vec![r0, cols],
            "columns must equal n * r_right",
        ));
    }
    let data: Vec<T> = matrix.iter().cloned().collect();
    Array3::from_shape_vec((r0, n, r1), data)
        .map_err(|e| KernelError::operation_error("fold_right", e.to_string()))
}
