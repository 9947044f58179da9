//! Scalar metrics computed by contraction, without materializing
//!
//! Tucker factors are handled pairwise: when both operands carry a factor on a
//! mode, only the small Gram matrix `U₁ᵀ U₂` is formed.

use crate::error::Result;
use crate::network::TensorNetwork;
use scirs2_core::ndarray_ext::{Array1, Array2, Axis};
use tnrs_kernels::{contract_free, contract_rank_right, right_unfolding, TnScalar};

impl<T: TnScalar> TensorNetwork<T> {
    /// Inner product ⟨self, other⟩ over all entries.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when the logical shapes differ.
    pub fn dot(&self, other: &Self) -> Result<T> {
        let product = self.partial_dot(other, self.ndim())?;
        Ok(product[[0, 0]])
    }

    /// Contract the trailing `k` modes of both networks.
    ///
    /// Returns the (R₁, R₂) matrix of left ranks at mode `ndim - k`; for
    /// `k == ndim` it is the 1×1 inner product.
    pub fn partial_dot(&self, other: &Self, k: usize) -> Result<Array2<T>> {
        self.ensure_same_shape(other)?;
        let ndim = self.ndim();
        let k = k.min(ndim);

        let mut acc = Array2::<T>::ones((1, 1));
        for mu in (ndim - k..ndim).rev() {
            let mut core1 = self.tt_core(mu);
            let mut core2 = other.tt_core(mu);
            match (&self.factors[mu], &other.factors[mu]) {
                (None, None) => {}
                (None, Some(u2)) => core1 = contract_free(&core1.view(), &u2.t())?,
                (Some(u1), None) => core2 = contract_free(&core2.view(), &u1.t())?,
                (Some(u1), Some(u2)) => {
                    let gram = u1.t().dot(u2);
                    core2 = contract_free(&core2.view(), &gram.view())?;
                }
            }
            let left = contract_rank_right(&core1.view(), &acc.view())?;
            acc = right_unfolding(&left.view()).dot(&right_unfolding(&core2.view()).t());
        }
        Ok(acc)
    }

    /// Squared Frobenius norm
    pub fn normsq(&self) -> Result<T> {
        self.dot(self)
    }

    /// Frobenius norm
    pub fn norm(&self) -> Result<T> {
        Ok(self.normsq()?.max(T::zero()).sqrt())
    }

    /// Euclidean distance ‖self - other‖ via inner products
    pub fn distance(&self, other: &Self) -> Result<T> {
        let d11 = self.dot(self)?;
        let d22 = other.dot(other)?;
        let d12 = self.dot(other)?;
        let two = T::one() + T::one();
        Ok((d11 + d22 - two * d12).max(T::zero()).sqrt())
    }

    /// Relative error ‖self - approx‖ / ‖self‖, with `self` as ground truth
    pub fn relative_error(&self, approx: &Self) -> Result<T> {
        let dgt = self.dot(self)?;
        let dapprox = approx.dot(approx)?;
        let cross = self.dot(approx)?;
        let two = T::one() + T::one();
        let diff = (dgt + dapprox - two * cross).max(T::zero()).sqrt();
        Ok(diff / dgt.max(T::zero()).sqrt())
    }

    /// Sum of all entries
    pub fn sum(&self) -> Result<T> {
        let mut acc = Array2::<T>::ones((1, 1));
        for mu in 0..self.ndim() {
            let core = self.tt_core(mu);
            let weights = match &self.factors[mu] {
                Some(u) => u.sum_axis(Axis(0)),
                None => Array1::ones(core.shape()[1]),
            };
            let (r0, _, r1) = core.dim();
            let mut reduced = Array2::<T>::zeros((r0, r1));
            for (j, &w) in weights.iter().enumerate() {
                reduced.scaled_add(w, &core.index_axis(Axis(1), j));
            }
            acc = acc.dot(&reduced);
        }
        Ok(acc[[0, 0]])
    }

    /// Mean of all entries
    pub fn mean(&self) -> Result<T> {
        Ok(self.sum()? / T::from_f64_lossy(self.size() as f64))
    }
}
