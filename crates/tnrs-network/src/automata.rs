//! Networks as finite automata over per-mode symbol alphabets
//!
//! A 0/1 network of shape (S₁, …, S_N) accepts the string `s` when
//! `t[s] == 1`. Counting networks (entries ≥ 0 integers) accept each string
//! with multiplicity.

use crate::core::Core;
use crate::error::{NetworkError, Result};
use crate::network::TensorNetwork;
use scirs2_core::ndarray_ext::{s, Array1, Array2, Array3, Axis};
use tnrs_kernels::TnScalar;

/// All strings accepted by `t`, one per row, in lexicographic order.
///
/// A string appears as many times as the (rounded) value of its entry.
///
/// # Examples
///
/// ```
/// use tnrs_network::{accepted_inputs, weight_mask};
///
/// let mask = weight_mask::<f64>(3, &[1], 2).unwrap();
/// let strings = accepted_inputs(&mask).unwrap();
/// assert_eq!(strings.nrows(), 3);
/// assert_eq!(strings.row(0).to_vec(), vec![0, 0, 1]);
/// assert_eq!(strings.row(2).to_vec(), vec![1, 0, 0]);
/// ```
pub fn accepted_inputs<T: TnScalar>(t: &TensorNetwork<T>) -> Result<Array2<usize>> {
    let ndim = t.ndim();
    let cores: Vec<Array3<T>> = (0..ndim).map(|n| t.expanded_core(n)).collect();

    // rights[mu]: contraction of cores mu.. with all-ones vectors
    let mut rights = vec![Array1::<T>::ones(1); ndim + 1];
    for mu in (0..ndim).rev() {
        rights[mu] = cores[mu].sum_axis(Axis(1)).dot(&rights[mu + 1]);
    }

    let total = count(rights[0][0]);
    let mut enumeration = Enumeration {
        cores: &cores,
        rights: &rights,
        strings: Array2::zeros((total, ndim)),
    };
    enumeration.descend(Array1::ones(1), 0, 0);
    Ok(enumeration.strings)
}

fn count<T: TnScalar>(value: T) -> usize {
    value.to_f64_lossy().round().max(0.0) as usize
}

struct Enumeration<'a, T> {
    cores: &'a [Array3<T>],
    rights: &'a [Array1<T>],
    strings: Array2<usize>,
}

impl<T: TnScalar> Enumeration<'_, T> {
    /// Fill rows `bound..` for all strings with the prefix encoded by `left`.
    fn descend(&mut self, left: Array1<T>, bound: usize, mu: usize) {
        if mu == self.cores.len() {
            return;
        }
        let core = &self.cores[mu];
        let rows = self.strings.nrows();
        let mut start = bound;
        for symbol in 0..core.shape()[1] {
            let slab = core.index_axis(Axis(1), symbol);
            let next = left.dot(&slab);
            let hits = count(next.dot(&self.rights[mu + 1]));
            if hits == 0 {
                continue;
            }
            let stop = (start + hits).min(rows);
            self.strings
                .slice_mut(s![start..stop, mu])
                .fill(symbol);
            self.descend(next, start, mu + 1);
            start = stop;
        }
    }
}

/// Automaton accepting the strings whose symbol total is one of `weights`.
///
/// With `nsymbols == 2` this is "exactly k ones" for each k in `weights`. The
/// result is rounded before it is returned.
pub fn weight_mask<T: TnScalar>(
    ndim: usize,
    weights: &[usize],
    nsymbols: usize,
) -> Result<TensorNetwork<T>> {
    let Some(&max_weight) = weights.iter().max() else {
        return Err(NetworkError::InvalidShape(
            "weight_mask needs at least one weight".to_string(),
        ));
    };
    if ndim == 0 {
        return Err(NetworkError::InvalidShape(
            "a network needs at least one mode".to_string(),
        ));
    }

    let r = max_weight + 1;
    let transition = Array3::from_shape_fn((r, nsymbols, r), |(i, symbol, j)| {
        if j == i + symbol {
            T::one()
        } else {
            T::zero()
        }
    });

    let mut cores = vec![transition; ndim];
    cores[0] = cores[0].slice(s![0..1, .., ..]).to_owned();
    let last = &cores[ndim - 1];
    let mut closed = Array3::<T>::zeros((last.shape()[0], nsymbols, 1));
    for &w in weights {
        let column = last.index_axis(Axis(2), w);
        let mut target = closed.index_axis_mut(Axis(2), 0);
        target += &column;
    }
    cores[ndim - 1] = closed;

    let mut mask = TensorNetwork::from_cores(cores.into_iter().map(Core::Tt).collect(), None, None)?;
    mask.round(T::zero())?;
    Ok(mask)
}

/// Network whose entry at each string is its symbol total (number of ones
/// for binary alphabets).
pub fn weight<T: TnScalar>(ndim: usize, nsymbols: usize) -> Result<TensorNetwork<T>> {
    if ndim == 0 {
        return Err(NetworkError::InvalidShape(
            "a network needs at least one mode".to_string(),
        ));
    }
    let counter = Array3::from_shape_fn((2, nsymbols, 2), |(i, symbol, k)| match (i, k) {
        (1, 0) => T::from_f64_lossy(symbol as f64),
        _ if i == k => T::one(),
        _ => T::zero(),
    });

    let mut cores = vec![counter; ndim];
    cores[0] = cores[0].slice(s![1..2, .., ..]).to_owned();
    cores[ndim - 1] = cores[ndim - 1].slice(s![.., .., 0..1]).to_owned();
    TensorNetwork::from_cores(cores.into_iter().map(Core::Tt).collect(), None, None)
}
