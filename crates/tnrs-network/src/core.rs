//! Network cores: TT (three-way) and CP (two-way) forms
//!
//! A CP core `A` of shape (F, R) stands for the TT core that is diagonal in its
//! two rank axes: `G[r, f, r] = A[f, r]`. At the chain boundaries the open rank
//! side is closed by summation, so the first core becomes (1, F, R), the last
//! (R, F, 1), and a single-core chain (1, F, 1).

use crate::error::{NetworkError, Result};
use scirs2_core::ndarray_ext::{Array2, Array3, ArrayD, Axis, Ix2, Ix3};
use tnrs_kernels::TnScalar;

/// One node of a tensor network
#[derive(Debug, Clone, PartialEq)]
pub enum Core<T> {
    /// Tensor-train core of shape (R_left, F, R_right)
    Tt(Array3<T>),
    /// CP core of shape (F, R)
    Cp(Array2<T>),
}

impl<T: TnScalar> Core<T> {
    /// Size of the free (physical or Tucker-compressed) axis
    pub fn free_dim(&self) -> usize {
        match self {
            Core::Tt(core) => core.shape()[1],
            Core::Cp(core) => core.shape()[0],
        }
    }

    /// Whether this is a CP core
    pub fn is_cp(&self) -> bool {
        matches!(self, Core::Cp(_))
    }

    /// Left rank as seen by the chain at `position`
    pub fn left_rank(&self, position: usize) -> usize {
        match self {
            Core::Tt(core) => core.shape()[0],
            Core::Cp(_) if position == 0 => 1,
            Core::Cp(core) => core.shape()[1],
        }
    }

    /// Right rank as seen by the chain at `position` of an `ndim`-core network
    pub fn right_rank(&self, position: usize, ndim: usize) -> usize {
        match self {
            Core::Tt(core) => core.shape()[2],
            Core::Cp(_) if position + 1 == ndim => 1,
            Core::Cp(core) => core.shape()[1],
        }
    }

    /// Number of stored elements
    pub fn numel(&self) -> usize {
        match self {
            Core::Tt(core) => core.len(),
            Core::Cp(core) => core.len(),
        }
    }

    /// Equivalent TT core for `position` in a chain of `ndim` cores
    pub fn to_tt(&self, position: usize, ndim: usize) -> Array3<T> {
        match self {
            Core::Tt(core) => core.clone(),
            Core::Cp(core) => cp_to_tt(core, position == 0, position + 1 == ndim),
        }
    }

    /// Promote a CP core to TT form in place
    pub fn promote(&mut self, position: usize, ndim: usize) {
        if let Core::Cp(core) = self {
            *self = Core::Tt(cp_to_tt(core, position == 0, position + 1 == ndim));
        }
    }

    /// Borrow the TT array, if this core is in TT form
    pub fn as_tt(&self) -> Option<&Array3<T>> {
        match self {
            Core::Tt(core) => Some(core),
            Core::Cp(_) => None,
        }
    }

    /// Mutably borrow the TT array, if this core is in TT form
    pub fn as_tt_mut(&mut self) -> Option<&mut Array3<T>> {
        match self {
            Core::Tt(core) => Some(core),
            Core::Cp(_) => None,
        }
    }
}

fn cp_to_tt<T: TnScalar>(core: &Array2<T>, first: bool, last: bool) -> Array3<T> {
    let (f, r) = core.dim();
    match (first, last) {
        (true, true) => {
            let summed = core.sum_axis(Axis(1));
            Array3::from_shape_fn((1, f, 1), |(_, j, _)| summed[j])
        }
        (true, false) => Array3::from_shape_fn((1, f, r), |(_, j, k)| core[[j, k]]),
        (false, true) => Array3::from_shape_fn((r, f, 1), |(i, j, _)| core[[j, i]]),
        (false, false) => {
            let mut tt = Array3::<T>::zeros((r, f, r));
            for ((j, k), &value) in core.indexed_iter() {
                tt[[k, j, k]] = value;
            }
            tt
        }
    }
}

impl<T> From<Array3<T>> for Core<T> {
    fn from(core: Array3<T>) -> Self {
        Core::Tt(core)
    }
}

impl<T> From<Array2<T>> for Core<T> {
    fn from(core: Array2<T>) -> Self {
        Core::Cp(core)
    }
}

impl<T> TryFrom<ArrayD<T>> for Core<T> {
    type Error = NetworkError;

    fn try_from(array: ArrayD<T>) -> Result<Self> {
        match array.ndim() {
            2 => array
                .into_dimensionality::<Ix2>()
                .map(Core::Cp)
                .map_err(|e| NetworkError::InvalidCoreStructure(e.to_string())),
            3 => array
                .into_dimensionality::<Ix3>()
                .map(Core::Tt)
                .map_err(|e| NetworkError::InvalidCoreStructure(e.to_string())),
            n => Err(NetworkError::InvalidCoreStructure(format!(
                "cores must have 2 (CP) or 3 (TT) axes, got {}",
                n
            ))),
        }
    }
}
