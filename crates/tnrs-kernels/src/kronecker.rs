//! Kronecker products of matrices and network cores
//!
//! The Kronecker product constructs a block structure where each element of the
//! first operand scales a full copy of the second. For cores it is the building
//! block of elementwise (Hadamard) multiplication of networks: multiplying two
//! chains multiplies their ranks.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{Array2, Array3, ArrayView2, ArrayView3};
use scirs2_core::numeric::Num;

/// Compute the Kronecker product of two matrices
///
/// For matrices A (m×n) and B (p×q), the result C = A ⊗ B has size (mp×nq):
///
/// ```text
/// [ a11*B  a12*B  ...  a1n*B ]
/// [ a21*B  a22*B  ...  a2n*B ]
/// [  ...    ...   ...   ...  ]
/// [ am1*B  am2*B  ...  amn*B ]
/// ```
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tnrs_kernels::kronecker;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[5.0, 6.0], [7.0, 8.0]];
/// let c = kronecker(&a.view(), &b.view());
/// assert_eq!(c.shape(), &[4, 4]);
/// assert_eq!(c[[0, 0]], 5.0);
/// assert_eq!(c[[3, 3]], 32.0);
/// ```
pub fn kronecker<T>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> Array2<T>
where
    T: Clone + Num,
{
    let (m, n) = a.dim();
    let (p, q) = b.dim();

    let mut result = Array2::<T>::zeros((m * p, n * q));

    for ((i, j), a_val) in a.indexed_iter() {
        let block_row = i * p;
        let block_col = j * q;
        for ((bi, bj), b_val) in b.indexed_iter() {
            result[[block_row + bi, block_col + bj]] = a_val.clone() * b_val.clone();
        }
    }

    result
}

/// Kronecker product of two cores on their rank axes, elementwise on the free axis
///
/// For cores A (r₀, n, r₁) and B (s₀, n, s₁) returns C of shape (r₀s₀, n, r₁s₁)
/// with `C[i·s₀ + a, j, k·s₁ + c] = A[i, j, k] · B[a, j, c]`.
///
/// Contracting a chain of such cores evaluates the elementwise product of the
/// two networks.
///
/// # Errors
///
/// Returns an error when the free dimensions differ.
pub fn core_kron<T>(a: &ArrayView3<T>, b: &ArrayView3<T>) -> KernelResult<Array3<T>>
where
    T: Clone + Num,
{
    let (r0, n, r1) = a.dim();
    let (s0, nb, s1) = b.dim();
    if n != nb {
        return Err(KernelError::incompatible_shapes(
            "core_kron",
            a.shape().to_vec(),
            b.shape().to_vec(),
            "free dimensions must agree",
        ));
    }

    let mut result = Array3::<T>::zeros((r0 * s0, n, r1 * s1));
    for ((i, j, k), a_val) in a.indexed_iter() {
        for a_idx in 0..s0 {
            for c in 0..s1 {
                result[[i * s0 + a_idx, j, k * s1 + c]] = a_val.clone() * b[[a_idx, j, c]].clone();
            }
        }
    }
    Ok(result)
}

/// Kronecker product of two cores over all three axes
///
/// For cores A (r₀, n, r₁) and B (s₀, m, s₁) returns C of shape
/// (r₀s₀, n·m, r₁s₁) with `C[i·s₀ + a, j·m + b, k·s₁ + c] = A[i,j,k] · B[a,b,c]`.
///
/// Used when both operands of a product keep Tucker factors: the free axis
/// then indexes pairs of factor columns.
pub fn core_kron_full<T>(a: &ArrayView3<T>, b: &ArrayView3<T>) -> Array3<T>
where
    T: Clone + Num,
{
    let (r0, n, r1) = a.dim();
    let (s0, m, s1) = b.dim();

    let mut result = Array3::<T>::zeros((r0 * s0, n * m, r1 * s1));
    for ((i, j, k), a_val) in a.indexed_iter() {
        for ((a_idx, b_idx, c), b_val) in b.indexed_iter() {
            result[[i * s0 + a_idx, j * m + b_idx, k * s1 + c]] = a_val.clone() * b_val.clone();
        }
    }
    result
}
