//! Rank-adaptive rounding (recompression)
//!
//! `round_tt` truncates the bonds between cores and `round_tucker` truncates
//! the Tucker factors. `round` runs both, spending the relative error budget
//! left over by the TT stage on the Tucker stage.
//!
//! # Error budgets
//!
//! The TT sweep performs N-1 truncations with absolute budget
//! `eps / sqrt(N-1) · ‖X‖` each, and the Tucker sweep N truncations with
//! relative budget `eps / sqrt(N)`. Errors of the individual steps are
//! orthogonal, so they add in quadrature and the total stays within `eps`.
//! Two sequential relative approximations compose multiplicatively, which is
//! why `round` hands `(1 + eps) / (1 + realized) - 1` to the Tucker stage.

use crate::error::{NetworkError, Result};
use crate::network::TensorNetwork;
use scirs2_core::ndarray_ext::{Array2, Array3};
use tnrs_kernels::{
    contract_free, contract_rank_right, fold_right, right_unfolding, thin_qr, truncated_svd,
    ErrorBudget, OrthoSide, TnScalar,
};

/// Options for [`TensorNetwork::round_with`]
#[derive(Debug, Clone, PartialEq)]
pub struct RoundingOptions {
    /// Relative error tolerance (eps ≥ 0). 0 keeps every nonzero direction
    pub eps: f64,

    /// Upper bounds on the N-1 TT bond ranks
    pub tt_rmax: Option<Vec<usize>>,

    /// Upper bounds on the N Tucker ranks
    pub tucker_rmax: Option<Vec<usize>>,
}

impl Default for RoundingOptions {
    fn default() -> Self {
        Self {
            eps: 0.0,
            tt_rmax: None,
            tucker_rmax: None,
        }
    }
}

impl RoundingOptions {
    /// Options with a relative error tolerance and no rank limits
    pub fn with_eps(eps: f64) -> Self {
        Self {
            eps,
            ..Default::default()
        }
    }

    /// Limit the TT bond ranks
    pub fn with_tt_rmax(mut self, rmax: Vec<usize>) -> Self {
        self.tt_rmax = Some(rmax);
        self
    }

    /// Limit the Tucker ranks
    pub fn with_tucker_rmax(mut self, rmax: Vec<usize>) -> Self {
        self.tucker_rmax = Some(rmax);
        self
    }
}

fn check_rmax(rmax: Option<&[usize]>, expected: usize, what: &str) -> Result<()> {
    match rmax {
        Some(limits) if limits.len() != expected => Err(NetworkError::InvalidShape(format!(
            "{} rank limits must have {} entries, got {}",
            what,
            expected,
            limits.len()
        ))),
        _ => Ok(()),
    }
}

impl<T: TnScalar> TensorNetwork<T> {
    /// Reduce TT ranks in place so that the relative error stays within `eps`.
    ///
    /// `rmax`, when given, holds one limit per bond (`ndim - 1` entries).
    /// CP cores are converted to TT form.
    pub fn round_tt(&mut self, eps: T, rmax: Option<&[usize]>) -> Result<()> {
        let ndim = self.ndim();
        check_rmax(rmax, ndim - 1, "TT")?;
        let before = self.ranks_tt();

        self.orthogonalize(ndim - 1)?;
        self.cores[ndim - 1].promote(ndim - 1, ndim);
        self.factor_orthogonalize(ndim - 1)?;

        let last_norm = self
            .tt_core(ndim - 1)
            .iter()
            .map(|&x| x * x)
            .sum::<T>()
            .sqrt();
        let splits = T::from_f64_lossy(((ndim - 1) as f64).sqrt().max(1.0));
        let delta = eps / splits * last_norm;

        for mu in (1..ndim).rev() {
            let core = self.tt_core_mut(mu);
            let (_, n, r1) = core.dim();
            let unfolded = right_unfolding(&core.view());
            let limit = rmax.map(|limits| limits[mu - 1]);
            let (left, right) = truncated_svd(
                &unfolded.view(),
                ErrorBudget::Absolute(delta),
                limit,
                OrthoSide::Right,
            )?;
            *core = fold_right(&right.view(), n, r1)?;

            let prev = self.tt_core_mut(mu - 1);
            *prev = contract_rank_right(&prev.view(), &left.view())?;
            log::trace!("round_tt: bond {} -> rank {}", mu, left.ncols());
        }

        log::debug!(
            "round_tt(eps={:e}): ranks {:?} -> {:?}",
            eps.to_f64_lossy(),
            before,
            self.ranks_tt()
        );
        Ok(())
    }

    /// Reduce Tucker ranks in place so that the relative error stays within `eps`.
    ///
    /// Modes without a factor get an identity factor first. `rmax`, when given,
    /// holds one limit per mode.
    pub fn round_tucker(&mut self, eps: T, rmax: Option<&[usize]>) -> Result<()> {
        let ndim = self.ndim();
        check_rmax(rmax, ndim, "Tucker")?;
        let before = self.ranks_tucker();

        self.orthogonalize(0)?;
        let per_mode = eps / T::from_f64_lossy((ndim as f64).sqrt());

        for mu in 0..ndim {
            self.cores[mu].promote(mu, ndim);
            let free = self.cores[mu].free_dim();
            let u = match self.factors[mu].take() {
                Some(u) => u,
                None => Array2::eye(free),
            };

            // Push the core's non-orthogonality on its free axis into the factor
            let core = self.tt_core_mut(mu);
            let (r0, _, r1) = core.dim();
            let permuted = Array2::from_shape_fn((r0 * r1, free), |(row, j)| {
                core[[row / r1, j, row % r1]]
            });
            let (q, r) = thin_qr(&permuted.view())?;
            let k = q.ncols();
            *core = Array3::from_shape_fn((r0, k, r1), |(i, j, l)| q[[i * r1 + l, j]]);
            let u = u.dot(&r.t());

            let limit = rmax.map(|limits| limits[mu]);
            let (left, right) = truncated_svd(
                &u.view(),
                ErrorBudget::Relative(per_mode),
                limit,
                OrthoSide::Left,
            )?;
            *core = contract_free(&core.view(), &right.view())?;
            self.factors[mu] = Some(left);
            log::trace!("round_tucker: mode {} -> rank {}", mu, self.cores[mu].free_dim());

            if mu + 1 < ndim {
                self.left_orthogonalize(mu)?;
            }
        }

        log::debug!(
            "round_tucker(eps={:e}): ranks {:?} -> {:?}",
            eps.to_f64_lossy(),
            before,
            self.ranks_tucker()
        );
        Ok(())
    }

    /// Recompress in place: TT rounding first, then Tucker rounding with the
    /// remaining budget.
    ///
    /// # Examples
    ///
    /// ```
    /// use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
    /// use tnrs_network::TensorNetwork;
    ///
    /// // Rank-1 tensor stored at full rank
    /// let dense = ArrayD::from_shape_fn(IxDyn(&[4, 4, 4]), |ix| {
    ///     ((ix[0] + 1) * (ix[1] + 2) * (ix[2] + 3)) as f64
    /// });
    /// let mut t = TensorNetwork::from_dense(&dense).unwrap();
    /// t.round(1e-6).unwrap();
    /// assert_eq!(t.ranks_tt(), vec![1, 1, 1, 1]);
    /// assert_eq!(t.ranks_tucker(), vec![1, 1, 1]);
    /// ```
    pub fn round(&mut self, eps: T) -> Result<()> {
        self.round_with(&RoundingOptions::with_eps(eps.to_f64_lossy()))
    }

    /// Recompress in place with explicit rank limits per stage.
    pub fn round_with(&mut self, options: &RoundingOptions) -> Result<()> {
        let eps = T::from_f64_lossy(options.eps);
        let original = self.clone();

        self.round_tt(eps, options.tt_rmax.as_deref())?;
        let realized = original.relative_error(self)?;
        log::debug!(
            "round: TT stage realized relative error {:e}",
            realized.to_f64_lossy()
        );

        // Explicit Tucker limits are honored even when the TT stage used the
        // whole budget
        if realized < eps || options.tucker_rmax.is_some() {
            let one = T::one();
            let budget = ((one + eps) / (one + realized) - one).max(T::zero());
            self.round_tucker(budget, options.tucker_rmax.as_deref())?;
        }
        Ok(())
    }

    /// Truncate TT bonds to at most `rmax` without an error tolerance.
    pub fn set_ranks_tt(&mut self, rmax: &[usize]) -> Result<()> {
        self.round_tt(T::zero(), Some(rmax))
    }

    /// Truncate Tucker ranks to at most `rmax` without an error tolerance.
    pub fn set_ranks_tucker(&mut self, rmax: &[usize]) -> Result<()> {
        self.round_tucker(T::zero(), Some(rmax))
    }
}
