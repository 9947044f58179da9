//! Thin QR and SVD on top of `scirs2_linalg`.
//!
//! The network algorithms only ever need the economy-size factors. QR slices
//! the `scirs2_linalg` result down to `k = min(m, n)`; the SVD reduces tall
//! input with that QR and diagonalizes the small square factor with one-sided
//! Jacobi rotations.

use crate::error::{KernelError, KernelResult};
use crate::scalar::TnScalar;
use scirs2_core::ndarray_ext::{s, Array1, Array2, ArrayView2};
use scirs2_linalg::qr;

/// Economy-size QR decomposition: `A = Q · R`.
///
/// For `A` of shape (m, n) with `k = min(m, n)`, returns `Q` of shape (m, k)
/// with orthonormal columns and upper-triangular (trapezoidal for wide input)
/// `R` of shape (k, n).
///
/// Wide matrices are handled by factoring the leading (m, m) block and
/// projecting the remaining columns onto its orthogonal `Q`.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tnrs_kernels::thin_qr;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
/// let (q, r) = thin_qr(&a.view()).unwrap();
/// assert_eq!(q.shape(), &[3, 2]);
/// assert_eq!(r.shape(), &[2, 2]);
/// ```
pub fn thin_qr<T: TnScalar>(matrix: &ArrayView2<T>) -> KernelResult<(Array2<T>, Array2<T>)> {
    let (m, n) = matrix.dim();
    if m == 0 || n == 0 {
        return Err(KernelError::empty_input("thin_qr", "matrix"));
    }

    if m >= n {
        let (q, r) = qr(matrix, None)
            .map_err(|e| KernelError::decomposition("QR", format!("{}", e)))?;
        let k = n.min(q.ncols()).min(r.nrows());
        return Ok((
            q.slice(s![.., ..k]).to_owned(),
            r.slice(s![..k, ..]).to_owned(),
        ));
    }

    // Wide: A = [A₁ | A₂] with A₁ square, A₁ = Q R₁ and R = Qᵀ A
    let block = matrix.slice(s![.., ..m]);
    let (q_full, _) = qr(&block, None)
        .map_err(|e| KernelError::decomposition("QR", format!("{}", e)))?;
    let q = q_full.slice(s![.., ..m]).to_owned();
    let r = q.t().dot(matrix);
    Ok((q, r))
}

/// Economy-size singular value decomposition: `A = U · diag(S) · Vᵀ`.
///
/// Returns `U` (m, k) with orthonormal columns, `S` (k) nonnegative and
/// descending, `Vᵀ` (k, n) with orthonormal rows, `k = min(m, n)`.
///
/// Tall inputs are first reduced with [`thin_qr`]; the square factor `R` is
/// then diagonalized by one-sided Jacobi rotations, which stay accurate for
/// repeated and zero singular values. Wide matrices are decomposed through
/// their transpose.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tnrs_kernels::thin_svd;
///
/// let a = array![[0.0, 1.0], [1.0, 0.0]];
/// let (u, s, vt) = thin_svd(&a.view()).unwrap();
/// assert!((s[0] - 1.0f64).abs() < 1e-12 && (s[1] - 1.0).abs() < 1e-12);
/// assert!((u.t().dot(&u)[[0, 1]]).abs() < 1e-12);
/// assert_eq!(vt.shape(), &[2, 2]);
/// ```
pub fn thin_svd<T: TnScalar>(
    matrix: &ArrayView2<T>,
) -> KernelResult<(Array2<T>, Array1<T>, Array2<T>)> {
    let (m, n) = matrix.dim();
    if m == 0 || n == 0 {
        return Err(KernelError::empty_input("thin_svd", "matrix"));
    }

    if m < n {
        let transposed = matrix.t().to_owned();
        let (u, s_vals, vt) = thin_svd(&transposed.view())?;
        return Ok((vt.t().to_owned(), s_vals, u.t().to_owned()));
    }

    if m > n {
        let (q, r) = thin_qr(matrix)?;
        let (u, s_vals, vt) = jacobi_svd(&r.view())?;
        return Ok((q.dot(&u), s_vals, vt));
    }

    jacobi_svd(matrix)
}

/// Upper bound on Jacobi sweeps; quadratic convergence needs far fewer
const MAX_JACOBI_SWEEPS: usize = 60;

/// One-sided Jacobi SVD of a tall or square matrix (m ≥ n).
fn jacobi_svd<T: TnScalar>(
    matrix: &ArrayView2<T>,
) -> KernelResult<(Array2<T>, Array1<T>, Array2<T>)> {
    let (m, n) = matrix.dim();
    let mut work = matrix.to_owned();
    let mut v = Array2::<T>::eye(n);
    let eps = T::epsilon();
    let tol = eps * T::from_f64_lossy(m as f64);
    let two = T::one() + T::one();

    let mut converged = false;
    for _ in 0..MAX_JACOBI_SWEEPS {
        let mut rotated = false;
        for p in 0..n {
            for q in (p + 1)..n {
                let (alpha, beta, gamma) = {
                    let cp = work.column(p);
                    let cq = work.column(q);
                    (cp.dot(&cp), cq.dot(&cq), cp.dot(&cq))
                };
                if gamma.abs() <= tol * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (two * gamma);
                let t = zeta.signum() / (zeta.abs() + (T::one() + zeta * zeta).sqrt());
                let c = (T::one() + t * t).sqrt().recip();
                let s = c * t;
                rotate_columns(&mut work, p, q, c, s);
                rotate_columns(&mut v, p, q, c, s);
            }
        }
        if !rotated {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(KernelError::decomposition(
            "SVD",
            format!("Jacobi sweeps did not converge for a {}x{} matrix", m, n),
        ));
    }

    // Column norms are the singular values; sort descending
    let norms: Vec<T> = work.columns().into_iter().map(|c| c.dot(&c).sqrt()).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        norms[b]
            .partial_cmp(&norms[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let largest = norms[order[0]];
    let negligible = largest * eps * T::from_f64_lossy(m.max(n) as f64);
    let mut u = Array2::<T>::zeros((m, n));
    let mut s_vals = Array1::<T>::zeros(n);
    let mut vt = Array2::<T>::zeros((n, n));
    let mut deficient = Vec::new();
    for (k, &j) in order.iter().enumerate() {
        s_vals[k] = norms[j];
        vt.row_mut(k).assign(&v.column(j));
        if norms[j] > negligible && norms[j] > T::zero() {
            u.column_mut(k).assign(&work.column(j).mapv(|x| x / norms[j]));
        } else {
            deficient.push(k);
        }
    }
    complete_orthonormal(&mut u, &deficient);
    Ok((u, s_vals, vt))
}

/// Apply the plane rotation `[c s; -s c]` to columns `p` and `q`.
fn rotate_columns<T: TnScalar>(a: &mut Array2<T>, p: usize, q: usize, c: T, s: T) {
    for mut row in a.rows_mut() {
        let (x, y) = (row[p], row[q]);
        row[p] = c * x - s * y;
        row[q] = s * x + c * y;
    }
}

/// Fill columns `missing` of `u` with unit vectors orthogonal to all others.
///
/// Candidates are the canonical basis vectors, orthogonalized twice by
/// Gram-Schmidt against the columns already in place.
fn complete_orthonormal<T: TnScalar>(u: &mut Array2<T>, missing: &[usize]) {
    let (m, n) = u.dim();
    let half = T::from_f64_lossy(0.5);
    let mut filled: Vec<usize> = (0..n).filter(|k| !missing.contains(k)).collect();
    let mut candidate = 0;
    for &k in missing {
        while candidate < m {
            let mut w = Array1::<T>::zeros(m);
            w[candidate] = T::one();
            candidate += 1;
            for _ in 0..2 {
                for &j in &filled {
                    let col = u.column(j);
                    let proj = col.dot(&w);
                    w.scaled_add(-proj, &col);
                }
            }
            let norm = w.dot(&w).sqrt();
            if norm > half {
                u.column_mut(k).assign(&w.mapv(|x| x / norm));
                filled.push(k);
                break;
            }
        }
    }
}

/// Frobenius norm of a matrix.
pub fn frobenius_norm<T: TnScalar>(matrix: &ArrayView2<T>) -> T {
    matrix.iter().map(|&x| x * x).sum::<T>().sqrt()
}
