//! The compressed tensor: a chain of cores with optional Tucker factors
//!
//! A network over N modes holds N cores, N optional factor matrices and N
//! index-label vectors. Core n is either a TT core (R_{n-1}, F_n, R_n) or a CP
//! core (F_n, R); a factor U_n of shape (I_n, F_n) maps the core's free axis to
//! the logical mode size I_n.
//!
//! # Invariants
//!
//! - `cores.len() == factors.len() == labels.len() >= 1`
//! - adjacent ranks match and both boundary ranks are 1
//! - `U_n.ncols() == F_n` whenever U_n is present
//! - `labels[n].len() == I_n`
//!
//! Every constructor validates these, and every public operation preserves
//! them.

use crate::core::Core;
use crate::error::{NetworkError, Result};
use scirs2_core::ndarray_ext::{Array1, Array2, Array3, ArrayD};
use std::fmt;
use tnrs_kernels::TnScalar;

/// Tensor network in TT, TT-CP, TT-Tucker or TT-CP-Tucker format
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
/// use tnrs_network::TensorNetwork;
///
/// let dense = ArrayD::from_shape_fn(IxDyn(&[2, 3, 4]), |ix| (ix[0] + ix[1] * ix[2]) as f64);
/// let t = TensorNetwork::from_dense(&dense).unwrap();
/// assert_eq!(t.shape(), vec![2, 3, 4]);
/// assert_eq!(t.ranks_tt(), vec![1, 2, 4, 1]);
/// assert_eq!(t.materialize().unwrap(), dense);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TensorNetwork<T> {
    pub(crate) cores: Vec<Core<T>>,
    pub(crate) factors: Vec<Option<Array2<T>>>,
    pub(crate) labels: Vec<Array1<i64>>,
}

impl<T: TnScalar> TensorNetwork<T> {
    /// Build a lossless, uncompressed chain from a dense array.
    ///
    /// Each step takes the current left unfolding; if it is wider than tall an
    /// identity core is emitted and the data moves on unchanged, otherwise the
    /// data itself becomes the core and an identity is carried forward. The
    /// result reproduces `dense` exactly.
    pub fn from_dense(dense: &ArrayD<T>) -> Result<Self> {
        let shape = dense.shape().to_vec();
        let ndim = shape.len();
        if ndim == 0 {
            return Err(NetworkError::InvalidShape(
                "a network needs at least one mode".to_string(),
            ));
        }
        if shape.contains(&0) {
            return Err(NetworkError::InvalidShape(format!(
                "zero-sized modes are not supported: {:?}",
                shape
            )));
        }

        let total: usize = shape.iter().product();
        let mut data = reshape2(dense.iter().cloned().collect(), shape[0], total / shape[0])?;
        let mut cores = Vec::with_capacity(ndim);

        for n in 1..ndim {
            let (rows, cols) = data.dim();
            if rows < cols {
                let eye = Array2::<T>::eye(rows);
                cores.push(Core::Tt(reshape3(
                    eye.iter().cloned().collect(),
                    rows / shape[n - 1],
                    shape[n - 1],
                    rows,
                )?));
                data = reshape2(data.iter().cloned().collect(), rows * shape[n], cols / shape[n])?;
            } else {
                cores.push(Core::Tt(reshape3(
                    data.iter().cloned().collect(),
                    rows / shape[n - 1],
                    shape[n - 1],
                    cols,
                )?));
                let eye = Array2::<T>::eye(cols);
                data = reshape2(eye.iter().cloned().collect(), cols * shape[n], cols / shape[n])?;
            }
        }

        let rows = data.nrows();
        cores.push(Core::Tt(reshape3(
            data.iter().cloned().collect(),
            rows / shape[ndim - 1],
            shape[ndim - 1],
            1,
        )?));

        log::trace!("from_dense: shape {:?}", shape);
        Self::from_cores(cores, None, None)
    }

    /// Build a network from explicit cores with optional factors and labels.
    ///
    /// # Errors
    ///
    /// `InvalidCoreStructure` when the core list is empty, adjacent ranks or
    /// boundary ranks do not match, factor columns differ from the core's free
    /// dimension, or label lengths differ from the logical mode sizes.
    pub fn from_cores(
        cores: Vec<Core<T>>,
        factors: Option<Vec<Option<Array2<T>>>>,
        labels: Option<Vec<Array1<i64>>>,
    ) -> Result<Self> {
        let ndim = cores.len();
        if ndim == 0 {
            return Err(NetworkError::InvalidCoreStructure(
                "a network needs at least one core".to_string(),
            ));
        }

        if cores[0].left_rank(0) != 1 || cores[ndim - 1].right_rank(ndim - 1, ndim) != 1 {
            return Err(NetworkError::InvalidCoreStructure(format!(
                "boundary ranks must be 1, got {} and {}",
                cores[0].left_rank(0),
                cores[ndim - 1].right_rank(ndim - 1, ndim)
            )));
        }
        for n in 0..ndim.saturating_sub(1) {
            let right = cores[n].right_rank(n, ndim);
            let left = cores[n + 1].left_rank(n + 1);
            if right != left {
                return Err(NetworkError::InvalidCoreStructure(format!(
                    "core ranks do not match between modes {} and {}: {} vs {}",
                    n,
                    n + 1,
                    right,
                    left
                )));
            }
        }

        let factors = factors.unwrap_or_else(|| vec![None; ndim]);
        if factors.len() != ndim {
            return Err(NetworkError::InvalidCoreStructure(format!(
                "expected {} factor slots, got {}",
                ndim,
                factors.len()
            )));
        }
        for (n, (core, factor)) in cores.iter().zip(factors.iter()).enumerate() {
            if let Some(u) = factor {
                if u.ncols() != core.free_dim() {
                    return Err(NetworkError::InvalidCoreStructure(format!(
                        "factor {} has {} columns but its core has free dimension {}",
                        n,
                        u.ncols(),
                        core.free_dim()
                    )));
                }
            }
        }

        let mut network = TensorNetwork {
            cores,
            factors,
            labels: Vec::new(),
        };
        let shape = network.shape();
        network.labels = match labels {
            Some(labels) => {
                if labels.len() != ndim {
                    return Err(NetworkError::InvalidCoreStructure(format!(
                        "expected {} label vectors, got {}",
                        ndim,
                        labels.len()
                    )));
                }
                for (n, (l, &size)) in labels.iter().zip(shape.iter()).enumerate() {
                    if l.len() != size {
                        return Err(NetworkError::InvalidCoreStructure(format!(
                            "labels for mode {} have length {} but the mode has size {}",
                            n,
                            l.len(),
                            size
                        )));
                    }
                }
                labels
            }
            None => default_labels(&shape),
        };
        Ok(network)
    }

    /// Rank-1 network of all ones
    pub fn ones(shape: &[usize]) -> Result<Self> {
        Self::filled(shape, T::one())
    }

    /// Rank-1 network of all zeros
    pub fn zeros(shape: &[usize]) -> Result<Self> {
        Self::filled(shape, T::zero())
    }

    /// Rank-1 network whose first core holds `value` and the rest ones.
    pub(crate) fn filled(shape: &[usize], value: T) -> Result<Self> {
        if shape.is_empty() {
            return Err(NetworkError::InvalidShape(
                "a network needs at least one mode".to_string(),
            ));
        }
        let cores = shape
            .iter()
            .enumerate()
            .map(|(n, &size)| {
                let fill = if n == 0 { value } else { T::one() };
                Core::Tt(Array3::from_elem((1, size, 1), fill))
            })
            .collect();
        Self::from_cores(cores, None, None)
    }

    /// Logical shape: factor rows where a factor is present, free dimension otherwise
    pub fn shape(&self) -> Vec<usize> {
        self.cores
            .iter()
            .zip(self.factors.iter())
            .map(|(core, factor)| match factor {
                Some(u) => u.nrows(),
                None => core.free_dim(),
            })
            .collect()
    }

    /// Number of modes
    pub fn ndim(&self) -> usize {
        self.cores.len()
    }

    /// TT ranks, N+1 entries with both boundaries equal to 1
    pub fn ranks_tt(&self) -> Vec<usize> {
        let ndim = self.ndim();
        let mut ranks = Vec::with_capacity(ndim + 1);
        ranks.push(self.cores[0].left_rank(0));
        for (n, core) in self.cores.iter().enumerate() {
            ranks.push(core.right_rank(n, ndim));
        }
        ranks
    }

    /// Tucker ranks: the free dimension of every core
    pub fn ranks_tucker(&self) -> Vec<usize> {
        self.cores.iter().map(Core::free_dim).collect()
    }

    /// Stored element count over all cores and factors
    pub fn numel(&self) -> usize {
        let core_elems: usize = self.cores.iter().map(Core::numel).sum();
        let factor_elems: usize = self.factors.iter().flatten().map(|u| u.len()).sum();
        core_elems + factor_elems
    }

    /// Number of entries in the logical (dense) tensor
    pub fn size(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn cores(&self) -> &[Core<T>] {
        &self.cores
    }

    pub fn factors(&self) -> &[Option<Array2<T>>] {
        &self.factors
    }

    pub fn labels(&self) -> &[Array1<i64>] {
        &self.labels
    }

    pub fn core(&self, mode: usize) -> &Core<T> {
        &self.cores[mode]
    }

    pub fn factor(&self, mode: usize) -> Option<&Array2<T>> {
        self.factors[mode].as_ref()
    }

    /// Replace the index labels of one mode.
    pub fn set_labels(&mut self, mode: usize, labels: Array1<i64>) -> Result<()> {
        let size = self.shape()[mode];
        if labels.len() != size {
            return Err(NetworkError::InvalidShape(format!(
                "labels for mode {} must have length {}, got {}",
                mode,
                size,
                labels.len()
            )));
        }
        self.labels[mode] = labels;
        Ok(())
    }

    /// "TT", "TT-CP", "TT-Tucker" or "TT-CP-Tucker"
    pub fn format_name(&self) -> String {
        let mut name = String::from("TT");
        if self.cores.iter().any(Core::is_cp) {
            name.push_str("-CP");
        }
        if self.has_factors() {
            name.push_str("-Tucker");
        }
        name
    }

    pub(crate) fn has_factors(&self) -> bool {
        self.factors.iter().any(Option::is_some)
    }

    /// Core `mode` in TT form (CP cores are converted, the network is unchanged)
    pub(crate) fn tt_core(&self, mode: usize) -> Array3<T> {
        self.cores[mode].to_tt(mode, self.ndim())
    }

    /// Promote core `mode` to TT form in place and borrow it
    pub(crate) fn tt_core_mut(&mut self, mode: usize) -> &mut Array3<T> {
        let ndim = self.ndim();
        self.cores[mode].promote(mode, ndim);
        match &mut self.cores[mode] {
            Core::Tt(core) => core,
            Core::Cp(_) => unreachable!("core was promoted to TT form"),
        }
    }
}

pub(crate) fn default_labels(shape: &[usize]) -> Vec<Array1<i64>> {
    shape
        .iter()
        .map(|&size| Array1::from_iter(0..size as i64))
        .collect()
}

fn reshape2<T>(data: Vec<T>, rows: usize, cols: usize) -> Result<Array2<T>> {
    Array2::from_shape_vec((rows, cols), data).map_err(|e| NetworkError::InvalidShape(e.to_string()))
}

fn reshape3<T>(data: Vec<T>, r0: usize, n: usize, r1: usize) -> Result<Array3<T>> {
    Array3::from_shape_vec((r0, n, r1), data).map_err(|e| NetworkError::InvalidShape(e.to_string()))
}

/// Write `text` into `row` starting at `start`, growing the row when needed
fn place(row: &mut Vec<char>, start: isize, text: &str) {
    let start = start.max(0) as usize;
    for (offset, ch) in text.chars().enumerate() {
        let pos = start + offset;
        if pos >= row.len() {
            row.resize(pos + 1, ' ');
        }
        row[pos] = ch;
    }
}

fn centered(n: usize, text: &str) -> isize {
    (n * 4) as isize - (text.len() / 2) as isize + 2
}

impl<T: TnScalar> fmt::Display for TensorNetwork<T> {
    /// Chain diagram: Tucker shape/rank rows, `(n)` TT and `[n]` CP nodes, TT ranks
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ndim = self.ndim();
        let width = 4 * ndim - 1;
        let shape = self.shape();
        let tucker = self.ranks_tucker();
        let tt = self.ranks_tt();

        writeln!(f, "{}D {} tensor:", ndim, self.format_name())?;
        writeln!(f)?;

        if self.has_factors() {
            let mut row = vec![' '; width];
            for n in 0..ndim {
                if self.factors[n].is_some() {
                    let text = shape[n].to_string();
                    place(&mut row, centered(n, &text), &text);
                }
            }
            writeln!(f, "{}", row.iter().collect::<String>())?;
        }

        let mut row = vec![' '; width];
        for n in 0..ndim {
            if self.factors[n].is_none() {
                let text = tucker[n].to_string();
                place(&mut row, centered(n, &text), &text);
            } else {
                place(&mut row, (n * 4 + 2) as isize, "|");
            }
        }
        writeln!(f, "{}", row.iter().collect::<String>())?;

        let mut row = vec![' '; width];
        for n in 0..ndim {
            if self.factors[n].is_none() {
                place(&mut row, (n * 4 + 2) as isize, "|");
            } else {
                let text = tucker[n].to_string();
                place(&mut row, centered(n, &text), &text);
            }
        }
        writeln!(f, "{}", row.iter().collect::<String>())?;

        let mut row = vec![' '; width];
        for (n, core) in self.cores.iter().enumerate() {
            let node = if core.is_cp() {
                format!("[{}]", n)
            } else {
                format!("({})", n)
            };
            let start = ((n + 1) * 4) as isize - ((node.len() - 1) / 2) as isize;
            place(&mut row, start, &node);
        }
        writeln!(f, "{}", row.iter().skip(2).collect::<String>())?;

        writeln!(f, "{}", " / \\".repeat(ndim))?;

        let mut row = vec![' '; 4 * ndim];
        for (n, rank) in tt.iter().enumerate() {
            place(&mut row, (n * 4) as isize, &rank.to_string());
        }
        writeln!(f, "{}", row.iter().collect::<String>())
    }
}
