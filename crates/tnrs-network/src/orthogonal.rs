//! Orthogonalization sweeps
//!
//! A network is *mu-orthogonal* when every core left of `mu` is
//! left-orthogonal (its left unfolding has orthonormal columns), every core
//! right of `mu` is right-orthogonal (its right unfolding has orthonormal rows)
//! and every Tucker factor has orthonormal columns. Core `mu` then carries the
//! Frobenius norm of the whole tensor, which rounding uses for exact local
//! error control.
//!
//! CP cores touched by a sweep are promoted to TT form first.

use crate::core::Core;
use crate::error::{NetworkError, Result};
use crate::network::TensorNetwork;
use scirs2_core::ndarray_ext::Array2;
use tnrs_kernels::{
    contract_free, contract_rank_left, contract_rank_right, fold_left, fold_right, left_unfolding,
    right_unfolding, thin_qr, TnScalar,
};

impl<T: TnScalar> TensorNetwork<T> {
    /// Push the non-orthogonal part of factor `mu` into its core.
    ///
    /// With U = Q·R, the factor becomes Q and the core's free axis is
    /// multiplied by R. No-op when mode `mu` has no factor.
    pub fn factor_orthogonalize(&mut self, mu: usize) -> Result<()> {
        check_mode("factor_orthogonalize", mu, 0, self.ndim())?;
        let Some(u) = &self.factors[mu] else {
            return Ok(());
        };
        let (q, r) = thin_qr(&u.view())?;
        self.cores[mu] = match &self.cores[mu] {
            Core::Tt(core) => Core::Tt(contract_free(&core.view(), &r.view())?),
            Core::Cp(core) => Core::Cp(r.dot(core)),
        };
        self.factors[mu] = Some(q);
        Ok(())
    }

    /// Make core `mu` left-orthogonal and push the R factor into core `mu + 1`.
    ///
    /// Ranks may shrink. Returns R. Fails unless `mu < ndim - 1`.
    pub fn left_orthogonalize(&mut self, mu: usize) -> Result<Array2<T>> {
        let ndim = self.ndim();
        check_mode("left_orthogonalize", mu, 0, ndim.saturating_sub(1))?;
        self.cores[mu].promote(mu, ndim);
        self.cores[mu + 1].promote(mu + 1, ndim);
        self.factor_orthogonalize(mu)?;

        let core = self.tt_core_mut(mu);
        let (r0, n, _) = core.dim();
        let (q, r) = thin_qr(&left_unfolding(&core.view()).view())?;
        *core = fold_left(&q.view(), r0, n)?;

        let next = self.tt_core_mut(mu + 1);
        *next = contract_rank_left(&r.view(), &next.view())?;
        Ok(r)
    }

    /// Make core `mu` right-orthogonal and push the L factor into core `mu - 1`.
    ///
    /// Uses an RQ-style step: QR of the transposed right unfolding. Ranks may
    /// shrink. Returns L. Fails unless `1 <= mu < ndim`.
    pub fn right_orthogonalize(&mut self, mu: usize) -> Result<Array2<T>> {
        let ndim = self.ndim();
        check_mode("right_orthogonalize", mu, 1, ndim)?;
        self.cores[mu - 1].promote(mu - 1, ndim);
        self.cores[mu].promote(mu, ndim);
        self.factor_orthogonalize(mu)?;

        let core = self.tt_core_mut(mu);
        let (_, n, r1) = core.dim();
        let unfolded_t = right_unfolding(&core.view()).t().to_owned();
        let (q, r) = thin_qr(&unfolded_t.view())?;
        let l = r.t().to_owned();
        *core = fold_right(&q.t(), n, r1)?;

        let prev = self.tt_core_mut(mu - 1);
        *prev = contract_rank_right(&prev.view(), &l.view())?;
        Ok(l)
    }

    /// Make the network `mu`-orthogonal.
    ///
    /// Left-orthogonalizes modes `0..mu`, then right-orthogonalizes modes
    /// `ndim-1` down to `mu+1`. Returns the last R and L factors (1×1 identities
    /// when no step of that kind ran). Fails unless `mu < ndim`.
    pub fn orthogonalize(&mut self, mu: usize) -> Result<(Array2<T>, Array2<T>)> {
        let ndim = self.ndim();
        check_mode("orthogonalize", mu, 0, ndim)?;
        let mut r = Array2::<T>::eye(1);
        let mut l = Array2::<T>::eye(1);
        for i in 0..mu {
            r = self.left_orthogonalize(i)?;
        }
        for i in (mu + 1..ndim).rev() {
            l = self.right_orthogonalize(i)?;
        }
        Ok((r, l))
    }
}

/// Require `lo <= mu < hi`.
fn check_mode(operation: &str, mu: usize, lo: usize, hi: usize) -> Result<()> {
    if mu < lo || mu >= hi {
        return Err(NetworkError::InvalidShape(format!(
            "{}: mode {} out of range {}..{}",
            operation, mu, lo, hi
        )));
    }
    Ok(())
}
