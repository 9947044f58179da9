//! Decompression: Tucker factor expansion and full materialization
//!
//! Materializing costs memory proportional to the product of all mode sizes;
//! it is meant for small networks and verification.

use crate::core::Core;
use crate::error::{NetworkError, Result};
use crate::network::TensorNetwork;
use scirs2_core::ndarray_ext::{Array2, Array3, ArrayD, Axis, IxDyn};
use tnrs_kernels::{contract_free, right_unfolding, TnScalar};

impl<T: TnScalar> TensorNetwork<T> {
    /// Core `mode` in TT form with its Tucker factor contracted in.
    ///
    /// The result has the logical mode size on its free axis.
    pub(crate) fn expanded_core(&self, mode: usize) -> Array3<T> {
        let core = self.tt_core(mode);
        let Some(u) = &self.factors[mode] else {
            return core;
        };
        // Factor columns always match the free axis, so this cannot fail
        let (r0, _, r1) = core.dim();
        let mut expanded = Array3::<T>::zeros((r0, u.nrows(), r1));
        for (slab, mut out) in core.axis_iter(Axis(0)).zip(expanded.axis_iter_mut(Axis(0))) {
            out.assign(&u.dot(&slab));
        }
        expanded
    }

    /// Contract every Tucker factor into its core.
    ///
    /// CP cores stay CP (the factor is applied to their free axis) and TT cores
    /// stay TT. Labels are preserved.
    pub fn expand_factors(&self) -> Result<Self> {
        let mut cores = Vec::with_capacity(self.ndim());
        for (core, factor) in self.cores.iter().zip(self.factors.iter()) {
            let expanded = match (core, factor) {
                (Core::Tt(g), Some(u)) => Core::Tt(contract_free(&g.view(), &u.view())?),
                (Core::Cp(g), Some(u)) => Core::Cp(u.dot(g)),
                (core, None) => core.clone(),
            };
            cores.push(expanded);
        }
        TensorNetwork::from_cores(cores, None, Some(self.labels.clone()))
    }

    /// Contract the whole chain into a dense array of the logical shape.
    pub fn materialize(&self) -> Result<ArrayD<T>> {
        let shape = self.shape();
        let mut acc = Array2::<T>::ones((1, 1));

        for mode in 0..self.ndim() {
            let core = self.expanded_core(mode);
            let (_, n, r1) = core.dim();
            let product = acc.dot(&right_unfolding(&core.view()));
            let rows = product.nrows() * n;
            acc = Array2::from_shape_vec((rows, r1), product.iter().cloned().collect())
                .map_err(|e| NetworkError::InvalidShape(e.to_string()))?;
        }

        ArrayD::from_shape_vec(IxDyn(&shape), acc.iter().cloned().collect())
            .map_err(|e| NetworkError::InvalidShape(e.to_string()))
    }
}
