//! Row-wise Khatri-Rao product (face-splitting product)
//!
//! For Tucker factors U (I × S₁) and V (I × S₂) that share the row (mode) index,
//! the row-wise product W = U • V has size (I × S₁S₂) with
//! `W[i, a·S₂ + b] = U[i, a] · V[i, b]`. It pairs with [`crate::core_kron_full`]
//! when multiplying two Tucker-factored modes elementwise.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{Array2, ArrayView2, Axis};
use scirs2_core::numeric::Num;

/// Compute the row-wise Khatri-Rao product of two matrices with equal row counts
///
/// # Errors
///
/// Returns an error if the number of rows differs.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tnrs_kernels::row_khatri_rao;
///
/// let u = array![[1.0, 2.0], [3.0, 4.0]];
/// let v = array![[5.0, 6.0, 7.0], [8.0, 9.0, 10.0]];
/// let w = row_khatri_rao(&u.view(), &v.view()).unwrap();
/// assert_eq!(w.shape(), &[2, 6]);
/// assert_eq!(w[[0, 4]], 2.0 * 6.0);
/// ```
pub fn row_khatri_rao<T>(u: &ArrayView2<T>, v: &ArrayView2<T>) -> KernelResult<Array2<T>>
where
    T: Clone + Num,
{
    let (rows, s1) = u.dim();
    let (rows_v, s2) = v.dim();
    if rows != rows_v {
        return Err(KernelError::dimension_mismatch(
            "row_khatri_rao",
            vec![rows, s2],
            vec![rows_v, s2],
            "both factors must have the same number of rows",
        ));
    }

    let mut result = Array2::<T>::zeros((rows, s1 * s2));
    for ((row_u, row_v), mut out) in u
        .axis_iter(Axis(0))
        .zip(v.axis_iter(Axis(0)))
        .zip(result.axis_iter_mut(Axis(0)))
    {
        for (a, u_val) in row_u.iter().enumerate() {
            for (b, v_val) in row_v.iter().enumerate() {
                out[a * s2 + b] = u_val.clone() * v_val.clone();
            }
        }
    }
    Ok(result)
}
