//! Bounded low-rank factorization
//!
//! `truncated_svd` returns the minimal-rank pair `(L, R)` with `L · R ≈ M` such
//! that the Frobenius error stays within the requested budget and the rank
//! does not exceed an optional cap. By Eckart–Young the SVD truncation is
//! optimal whenever the cap is not the binding constraint.

use crate::error::KernelResult;
use crate::linalg::{frobenius_norm, thin_svd};
use crate::scalar::TnScalar;
use scirs2_core::ndarray_ext::{s, Array2, ArrayView1, ArrayView2, Axis};

/// Allowed Frobenius-norm error of a truncation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorBudget<T> {
    /// Absolute bound: ‖M - L·R‖_F ≤ delta
    Absolute(T),
    /// Bound relative to the input: ‖M - L·R‖_F ≤ eps · ‖M‖_F
    Relative(T),
}

impl<T: TnScalar> ErrorBudget<T> {
    /// Resolve the budget into an absolute threshold for `matrix`.
    ///
    /// Negative budgets are clamped to zero.
    pub fn absolute_for(&self, matrix: &ArrayView2<T>) -> T {
        let delta = match *self {
            ErrorBudget::Absolute(delta) => delta,
            ErrorBudget::Relative(eps) => eps * frobenius_norm(matrix),
        };
        if delta > T::zero() {
            delta
        } else {
            T::zero()
        }
    }
}

/// Which factor of a truncation carries orthonormal columns/rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrthoSide {
    /// `L` has orthonormal columns, singular values go into `R`
    Left,
    /// `R` has orthonormal rows, singular values go into `L`
    Right,
}

/// Smallest rank whose discarded tail satisfies `Σ_{i≥r} s_i² ≤ delta²`.
///
/// The result is at least 1 and at most `rmax` (when given) and `s.len()`.
pub fn truncation_rank<T: TnScalar>(singular_values: &ArrayView1<T>, delta: T, rmax: Option<usize>) -> usize {
    let n = singular_values.len();
    let threshold = delta * delta;

    let mut rank = n;
    let mut tail = T::zero();
    for i in (0..n).rev() {
        let sigma = singular_values[i];
        let candidate = tail + sigma * sigma;
        if candidate > threshold {
            break;
        }
        tail = candidate;
        rank = i;
    }

    let cap = rmax.unwrap_or(n).min(n);
    rank.min(cap).max(1)
}

/// Truncated SVD: `matrix ≈ left · right`.
///
/// Returns `left` of shape (m, r) and `right` of shape (r, n), where r is the
/// minimal rank satisfying `budget` capped at `rmax`. `side` selects which
/// factor is orthonormal.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use tnrs_kernels::{truncated_svd, ErrorBudget, OrthoSide};
///
/// // Rank-1 matrix
/// let m = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
/// let (l, r) = truncated_svd(&m.view(), ErrorBudget::Relative(1e-10), None, OrthoSide::Left).unwrap();
/// assert_eq!(l.ncols(), 1);
/// assert_eq!(r.nrows(), 1);
/// ```
pub fn truncated_svd<T: TnScalar>(
    matrix: &ArrayView2<T>,
    budget: ErrorBudget<T>,
    rmax: Option<usize>,
    side: OrthoSide,
) -> KernelResult<(Array2<T>, Array2<T>)> {
    let delta = budget.absolute_for(matrix);
    let (u, s_vals, vt) = thin_svd(matrix)?;
    let rank = truncation_rank(&s_vals.view(), delta, rmax);

    let mut u_r = u.slice(s![.., ..rank]).to_owned();
    let mut vt_r = vt.slice(s![..rank, ..]).to_owned();

    match side {
        OrthoSide::Left => {
            for (i, mut row) in vt_r.axis_iter_mut(Axis(0)).enumerate() {
                row *= s_vals[i];
            }
        }
        OrthoSide::Right => {
            for (j, mut col) in u_r.axis_iter_mut(Axis(1)).enumerate() {
                col *= s_vals[j];
            }
        }
    }

    log::trace!(
        "truncated_svd: {}x{} -> rank {} (delta {:e})",
        matrix.nrows(),
        matrix.ncols(),
        rank,
        delta.to_f64_lossy()
    );

    Ok((u_r, vt_r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_truncation_rank_zero_budget_keeps_nonzero() {
        let s_vals = array![3.0, 2.0, 0.0];
        assert_eq!(truncation_rank(&s_vals.view(), 0.0, None), 2);
    }

    #[test]
    fn test_truncation_rank_budget_drops_tail() {
        let s_vals = array![4.0, 1.0, 0.5];
        // tail energy 0.25 + 1.0 = 1.25 ≤ 1.2²
        assert_eq!(truncation_rank(&s_vals.view(), 1.2, None), 1);
        assert_eq!(truncation_rank(&s_vals.view(), 0.6, None), 2);
    }

    #[test]
    fn test_truncation_rank_respects_cap_and_floor() {
        let s_vals = array![4.0, 3.0, 2.0];
        assert_eq!(truncation_rank(&s_vals.view(), 0.0, Some(2)), 2);
        assert_eq!(truncation_rank(&s_vals.view(), 100.0, None), 1);
        assert_eq!(truncation_rank(&s_vals.view(), 0.0, Some(0)), 1);
    }

    #[test]
    fn test_truncated_svd_exact_reconstruction() {
        let m = array![[1.0, 0.0, 2.0], [0.0, 3.0, 1.0]];
        let (l, r) = truncated_svd(&m.view(), ErrorBudget::Absolute(0.0), None, OrthoSide::Right).unwrap();
        assert_eq!(l.ncols(), 2);
        assert!(max_abs_diff(&l.dot(&r), &m) < 1e-10);

        // Rows of the right factor are orthonormal
        let gram = r.dot(&r.t());
        assert!(max_abs_diff(&gram, &Array2::eye(2)) < 1e-10);
    }

    #[test]
    fn test_truncated_svd_left_orthonormal() {
        let m = array![[2.0, 1.0], [1.0, 2.0], [0.0, 1.0]];
        let (l, r) = truncated_svd(&m.view(), ErrorBudget::Relative(0.0), None, OrthoSide::Left).unwrap();
        let gram = l.t().dot(&l);
        assert!(max_abs_diff(&gram, &Array2::eye(l.ncols())) < 1e-10);
        assert!(max_abs_diff(&l.dot(&r), &m) < 1e-10);
    }

    #[test]
    fn test_truncated_svd_error_within_budget() {
        let m = array![[10.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.1]];
        let (l, r) = truncated_svd(&m.view(), ErrorBudget::Absolute(1.01), None, OrthoSide::Left).unwrap();
        assert_eq!(l.ncols(), 1);
        let err = frobenius_norm(&(&m - &l.dot(&r)).view());
        assert!(err <= 1.01);
    }

    #[test]
    fn test_negative_budget_clamped() {
        let m = array![[1.0, 0.0], [0.0, 1.0]];
        assert_eq!(ErrorBudget::Relative(-0.5).absolute_for(&m.view()), 0.0);
        let (l, _) = truncated_svd(&m.view(), ErrorBudget::Absolute(-1.0), None, OrthoSide::Left).unwrap();
        assert_eq!(l.ncols(), 2);
    }
}
