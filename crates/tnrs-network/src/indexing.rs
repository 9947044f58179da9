//! NumPy-style indexing and partial assignment on compressed networks
//!
//! A key is a sequence of [`KeyEntry`] values. After normalization (ellipsis
//! expansion, padding with full slices) it is reduced left to right with two
//! registers:
//!
//! - an *integer register* (a matrix) accumulating the product of row-selected
//!   cores for a run of integer entries, and
//! - a *fancy register* (a three-way core) fusing a run of index arrays
//!   elementwise into one new mode of length P.
//!
//! Slices and new axes flush both registers into the output chain. A trailing
//! integer run is contracted into the last emitted core, or returned as a bare
//! scalar when every mode was selected by an integer.
//!
//! Index arrays must be contiguous and of equal length; interleaving them with
//! slices would require transposing the chain.

use crate::automata::accepted_inputs;
use crate::core::Core;
use crate::error::{IndexingError, NetworkError, Result};
use crate::network::TensorNetwork;
use scirs2_core::ndarray_ext::{Array2, Array3, ArrayD, Axis};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use tnrs_kernels::{contract_free, contract_rank_left, contract_rank_right, TnScalar};

/// Tolerance on the total of a selection mask
pub const MASK_SUM_TOLERANCE: f64 = 1e-8;

/// `start:stop:step` with NumPy semantics (negative bounds count from the end)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl SliceSpec {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        SliceSpec { start, stop, step }
    }

    /// The `:` slice
    pub fn full() -> Self {
        SliceSpec::new(None, None, 1)
    }

    /// Positions selected along a mode of length `size`.
    pub fn positions(&self, size: usize) -> Result<Vec<usize>> {
        if self.step < 1 {
            return Err(IndexingError::InvalidStep(self.step).into());
        }
        let size = size as isize;
        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + size).max(0)
            } else {
                bound.min(size)
            }
        };
        let start = self.start.map_or(0, clamp);
        let stop = self.stop.map_or(size, clamp);
        Ok((start..stop)
            .step_by(self.step as usize)
            .map(|p| p as usize)
            .collect())
    }
}

/// One entry of an indexing key
#[derive(Debug, Clone, PartialEq)]
pub enum KeyEntry {
    /// Select one position and drop the mode
    Int(isize),
    /// Keep a strided range of positions
    Slice(SliceSpec),
    /// Insert a new mode of size 1
    NewAxis,
    /// Advanced (fancy) index array
    Indices(Vec<isize>),
    /// As many full slices as needed
    Ellipsis,
}

impl From<isize> for KeyEntry {
    fn from(index: isize) -> Self {
        KeyEntry::Int(index)
    }
}

impl From<SliceSpec> for KeyEntry {
    fn from(slice: SliceSpec) -> Self {
        KeyEntry::Slice(slice)
    }
}

impl From<Range<isize>> for KeyEntry {
    fn from(range: Range<isize>) -> Self {
        KeyEntry::Slice(SliceSpec::new(Some(range.start), Some(range.end), 1))
    }
}

impl From<RangeFrom<isize>> for KeyEntry {
    fn from(range: RangeFrom<isize>) -> Self {
        KeyEntry::Slice(SliceSpec::new(Some(range.start), None, 1))
    }
}

impl From<RangeTo<isize>> for KeyEntry {
    fn from(range: RangeTo<isize>) -> Self {
        KeyEntry::Slice(SliceSpec::new(None, Some(range.end), 1))
    }
}

impl From<RangeFull> for KeyEntry {
    fn from(_: RangeFull) -> Self {
        KeyEntry::Slice(SliceSpec::full())
    }
}

impl From<Vec<isize>> for KeyEntry {
    fn from(indices: Vec<isize>) -> Self {
        KeyEntry::Indices(indices)
    }
}

impl From<&[isize]> for KeyEntry {
    fn from(indices: &[isize]) -> Self {
        KeyEntry::Indices(indices.to_vec())
    }
}

/// Result of indexing: a scalar when every mode was selected by an integer
#[derive(Debug, Clone, PartialEq)]
pub enum Indexed<T> {
    Scalar(T),
    Network(TensorNetwork<T>),
}

impl<T> Indexed<T> {
    pub fn into_scalar(self) -> Option<T> {
        match self {
            Indexed::Scalar(value) => Some(value),
            Indexed::Network(_) => None,
        }
    }

    pub fn into_network(self) -> Option<TensorNetwork<T>> {
        match self {
            Indexed::Scalar(_) => None,
            Indexed::Network(network) => Some(network),
        }
    }
}

/// Right-hand side of [`TensorNetwork::assign`]
#[derive(Debug, Clone)]
pub enum Assigned<T> {
    Scalar(T),
    Dense(ArrayD<T>),
    Network(TensorNetwork<T>),
}

/// Normalized key entry: every consuming entry maps to exactly one mode
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Int(isize),
    Slice(SliceSpec),
    NewAxis,
    Indices(Vec<isize>),
}

/// Expand the ellipsis and pad with full slices.
fn normalize(key: &[KeyEntry], ndim: usize) -> Result<Vec<Step>> {
    let ellipses = key.iter().filter(|k| matches!(k, KeyEntry::Ellipsis)).count();
    if ellipses > 1 {
        return Err(IndexingError::MultipleEllipsis.into());
    }
    let new_axes = key.iter().filter(|k| matches!(k, KeyEntry::NewAxis)).count();
    let consuming = key.len() - ellipses - new_axes;
    if consuming > ndim {
        return Err(IndexingError::TooManyEntries {
            entries: consuming,
            ndim,
        }
        .into());
    }

    let fill = ndim - consuming;
    let mut steps = Vec::with_capacity(key.len() + fill);
    for entry in key {
        match entry {
            KeyEntry::Int(i) => steps.push(Step::Int(*i)),
            KeyEntry::Slice(slice) => steps.push(Step::Slice(*slice)),
            KeyEntry::NewAxis => steps.push(Step::NewAxis),
            KeyEntry::Indices(list) => steps.push(Step::Indices(list.clone())),
            KeyEntry::Ellipsis => {
                steps.extend(std::iter::repeat(Step::Slice(SliceSpec::full())).take(fill))
            }
        }
    }
    if ellipses == 0 {
        steps.extend(std::iter::repeat(Step::Slice(SliceSpec::full())).take(fill));
    }
    Ok(steps)
}

fn resolve(index: isize, mode: usize, size: usize) -> Result<usize> {
    let wrapped = if index < 0 {
        index + size as isize
    } else {
        index
    };
    if wrapped < 0 || wrapped >= size as isize {
        return Err(IndexingError::IndexOutOfBounds { mode, index, size }.into());
    }
    Ok(wrapped as usize)
}

fn resolve_all(indices: &[isize], mode: usize, size: usize) -> Result<Vec<usize>> {
    indices.iter().map(|&i| resolve(i, mode, size)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastStep {
    Int,
    Fancy,
    Other,
}

/// Left-to-right reducer over a normalized key
struct Reducer<'a, T> {
    source: &'a TensorNetwork<T>,
    int_acc: Option<Array2<T>>,
    fancy_acc: Option<Array3<T>>,
    fancy_done: bool,
    cores: Vec<Array3<T>>,
    factors: Vec<Option<Array2<T>>>,
}

impl<'a, T: TnScalar> Reducer<'a, T> {
    fn new(source: &'a TensorNetwork<T>) -> Self {
        Reducer {
            source,
            int_acc: None,
            fancy_acc: None,
            fancy_done: false,
            cores: Vec::new(),
            factors: Vec::new(),
        }
    }

    /// Push the fancy register (with any pending integer run) as a new core.
    fn flush(&mut self) -> Result<()> {
        if let Some(mut fancy) = self.fancy_acc.take() {
            if let Some(acc) = self.int_acc.take() {
                fancy = contract_rank_left(&acc.view(), &fancy.view())?;
            }
            self.cores.push(fancy);
            self.factors.push(None);
            self.fancy_done = true;
        }
        Ok(())
    }

    fn emit(&mut self, core: Array3<T>, factor: Option<Array2<T>>) -> Result<()> {
        self.flush()?;
        let core = match self.int_acc.take() {
            Some(acc) => contract_rank_left(&acc.view(), &core.view())?,
            None => core,
        };
        self.cores.push(core);
        self.factors.push(factor);
        Ok(())
    }

    /// Core `mode` restricted to `positions` on its free axis, factor applied
    fn select(&self, mode: usize, positions: &[usize]) -> Result<Array3<T>> {
        let core = self.source.tt_core(mode);
        match &self.source.factors[mode] {
            Some(u) => Ok(contract_free(&core.view(), &u.select(Axis(0), positions).view())?),
            None => Ok(core.select(Axis(1), positions)),
        }
    }

    /// Slice of core `mode` at one position, factor applied
    fn row(&self, mode: usize, position: usize) -> Array2<T> {
        let core = self.source.tt_core(mode);
        match &self.source.factors[mode] {
            Some(u) => {
                let (r0, _, r1) = core.dim();
                let mut slab = Array2::<T>::zeros((r0, r1));
                for (j, &w) in u.row(position).iter().enumerate() {
                    slab.scaled_add(w, &core.index_axis(Axis(1), j));
                }
                slab
            }
            None => core.index_axis(Axis(1), position).to_owned(),
        }
    }

    fn run(mut self, steps: &[Step]) -> Result<Indexed<T>> {
        let shape = self.source.shape();
        let ranks = self.source.ranks_tt();
        let mut mode = 0;
        let mut last = LastStep::Other;

        for step in steps {
            match step {
                Step::NewAxis => {
                    let r = ranks[mode];
                    let eye = Array2::<T>::eye(r).insert_axis(Axis(1));
                    self.emit(eye, None)?;
                    last = LastStep::Other;
                }
                Step::Slice(slice) => {
                    let positions = slice.positions(shape[mode])?;
                    let core = self.source.tt_core(mode);
                    match &self.source.factors[mode] {
                        Some(u) => self.emit(core, Some(u.select(Axis(0), &positions)))?,
                        None => self.emit(core.select(Axis(1), &positions), None)?,
                    }
                    mode += 1;
                    last = LastStep::Other;
                }
                Step::Indices(list) => {
                    if self.fancy_done {
                        return Err(IndexingError::NonContiguousFancy.into());
                    }
                    let positions = resolve_all(list, mode, shape[mode])?;
                    let block = self.select(mode, &positions)?;
                    self.fancy_acc = Some(match self.fancy_acc.take() {
                        None => block,
                        Some(prev) => {
                            if prev.shape()[1] != positions.len() {
                                return Err(IndexingError::FancyLengthMismatch {
                                    expected: prev.shape()[1],
                                    actual: positions.len(),
                                }
                                .into());
                            }
                            fuse(&prev, &block)
                        }
                    });
                    mode += 1;
                    last = LastStep::Fancy;
                }
                Step::Int(index) => {
                    if last == LastStep::Fancy {
                        self.flush()?;
                    }
                    let position = resolve(*index, mode, shape[mode])?;
                    let row = self.row(mode, position);
                    self.int_acc = Some(match self.int_acc.take() {
                        None => row,
                        Some(acc) => acc.dot(&row),
                    });
                    mode += 1;
                    last = LastStep::Int;
                }
            }
        }

        match last {
            LastStep::Fancy => self.flush()?,
            LastStep::Int => {
                let acc = self.int_acc.take().unwrap_or_else(|| Array2::eye(1));
                match self.cores.last_mut() {
                    Some(core) => *core = contract_rank_right(&core.view(), &acc.view())?,
                    None => return Ok(Indexed::Scalar(acc[[0, 0]])),
                }
            }
            LastStep::Other => {}
        }

        if self.cores.is_empty() {
            return Err(NetworkError::InvalidShape(
                "key selects no modes".to_string(),
            ));
        }
        let cores = self.cores.into_iter().map(Core::Tt).collect();
        Ok(Indexed::Network(TensorNetwork::from_cores(
            cores,
            Some(self.factors),
            None,
        )?))
    }
}

/// Elementwise fusion of two fancy blocks along their shared P axis:
/// `out[i, p, l] = Σ_k a[i, p, k] · b[k, p, l]`
fn fuse<T: TnScalar>(a: &Array3<T>, b: &Array3<T>) -> Array3<T> {
    let (r0, p, _) = a.dim();
    let r2 = b.shape()[2];
    let mut out = Array3::<T>::zeros((r0, p, r2));
    for q in 0..p {
        let product = a.index_axis(Axis(1), q).dot(&b.index_axis(Axis(1), q));
        out.index_axis_mut(Axis(1), q).assign(&product);
    }
    out
}

impl<T: TnScalar> TensorNetwork<T> {
    /// Evaluate a NumPy-style key without decompressing.
    ///
    /// # Examples
    ///
    /// ```
    /// use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
    /// use tnrs_network::{KeyEntry, TensorNetwork};
    ///
    /// let dense = ArrayD::from_shape_fn(IxDyn(&[3, 4, 5]), |ix| (ix[0] * 20 + ix[1] * 5 + ix[2]) as f64);
    /// let t = TensorNetwork::from_dense(&dense).unwrap();
    ///
    /// let value = t.index(&[1.into(), 2.into(), (-1).into()]).unwrap();
    /// assert_eq!(value.into_scalar(), Some(34.0));
    ///
    /// let sub = t.index(&[KeyEntry::Ellipsis, (1..3).into()]).unwrap().into_network().unwrap();
    /// assert_eq!(sub.shape(), vec![3, 4, 2]);
    /// ```
    pub fn index(&self, key: &[KeyEntry]) -> Result<Indexed<T>> {
        let steps = normalize(key, self.ndim())?;
        Reducer::new(self).run(&steps)
    }

    /// Evaluate many points at once.
    ///
    /// `points` has one row per point and one column per leading mode; each
    /// column acts as an index array, so the columns fuse into a single mode
    /// of length `points.nrows()`.
    pub fn index_points(&self, points: &Array2<usize>) -> Result<Indexed<T>> {
        let key: Vec<KeyEntry> = points
            .axis_iter(Axis(1))
            .map(|column| KeyEntry::Indices(column.iter().map(|&i| i as isize).collect()))
            .collect();
        self.index(&key)
    }

    /// Select the single configuration accepted by a 0/1 `mask`.
    ///
    /// The configuration is matched against this network's binarized index
    /// labels: one matching position selects that position (the mode is
    /// dropped), several select the range from the first to the last match.
    pub fn index_mask(&self, mask: &TensorNetwork<T>) -> Result<Indexed<T>> {
        if mask.ndim() != self.ndim() {
            return Err(IndexingError::MaskShapeMismatch {
                mask: mask.ndim(),
                tensor: self.ndim(),
            }
            .into());
        }
        let total = mask.sum()?.to_f64_lossy();
        if (total - 1.0).abs() > MASK_SUM_TOLERANCE {
            return Err(IndexingError::MaskNotSingular { sum: total }.into());
        }
        let accepted = accepted_inputs(mask)?;
        if accepted.nrows() == 0 {
            return Err(IndexingError::MaskNotSingular { sum: total }.into());
        }
        let symbols = accepted.row(0);

        let mut key = Vec::with_capacity(self.ndim());
        for (mode, labels) in self.labels.iter().enumerate() {
            let wanted = symbols[mode] as i64;
            let matches: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|&(_, &label)| label.min(1) == wanted)
                .map(|(position, _)| position)
                .collect();
            let entry = match matches.as_slice() {
                [] => return Err(IndexingError::EmptyMaskSelection { mode }.into()),
                [single] => KeyEntry::Int(*single as isize),
                [first, .., last] => {
                    if last - first + 1 != matches.len() {
                        log::warn!(
                            "mask selection along mode {} is not contiguous; taking {}..{}",
                            mode,
                            first,
                            last + 1
                        );
                    }
                    KeyEntry::Slice(SliceSpec::new(
                        Some(*first as isize),
                        Some(*last as isize + 1),
                        1,
                    ))
                }
            };
            key.push(entry);
        }
        self.index(&key)
    }

    /// Overwrite the entries selected by `key` with `value`.
    ///
    /// Integers select unit slices, so a network or dense value must have the
    /// same number of modes as `self` and exactly the selected box shape. The
    /// update is additive, `self - old box + new box`, so TT ranks grow; index
    /// labels are kept. Tucker factors are expanded.
    ///
    /// # Errors
    ///
    /// `UnsupportedAssignment` for keys with new axes and `ShapeMismatch`
    /// when the value does not fit the selected box.
    pub fn assign(&mut self, key: &[KeyEntry], value: Assigned<T>) -> Result<()> {
        let ndim = self.ndim();
        let shape = self.shape();
        let steps = normalize(key, ndim)?;
        if steps.contains(&Step::NewAxis) {
            return Err(NetworkError::UnsupportedAssignment(
                "new axes cannot appear in an assignment key".to_string(),
            ));
        }

        let mut selections = Vec::with_capacity(ndim);
        for (mode, step) in steps.iter().enumerate() {
            let positions = match step {
                Step::Int(index) => vec![resolve(*index, mode, shape[mode])?],
                Step::Slice(slice) => slice.positions(shape[mode])?,
                Step::Indices(list) => resolve_all(list, mode, shape[mode])?,
                Step::NewAxis => continue,
            };
            selections.push(positions);
        }
        let box_shape: Vec<usize> = selections.iter().map(Vec::len).collect();

        let (scalar, value) = match value {
            Assigned::Scalar(v) => (Some(v), None),
            Assigned::Dense(dense) => (None, Some(TensorNetwork::from_dense(&dense)?)),
            Assigned::Network(network) => (None, Some(network)),
        };
        if let Some(network) = &value {
            if network.shape() != box_shape {
                return Err(NetworkError::ShapeMismatch {
                    left: box_shape,
                    right: network.shape(),
                });
            }
        }

        let mut subtract = Vec::with_capacity(ndim);
        let mut add = Vec::with_capacity(ndim);
        for (mode, positions) in selections.iter().enumerate() {
            let core = self.expanded_core(mode);
            let mut restricted = Array3::<T>::zeros(core.dim());
            for &p in positions {
                restricted
                    .index_axis_mut(Axis(1), p)
                    .assign(&core.index_axis(Axis(1), p));
            }
            subtract.push(Core::Tt(restricted));

            let placed = match &value {
                Some(network) => {
                    let source = network.expanded_core(mode);
                    let (r0, _, r1) = source.dim();
                    let mut placed = Array3::<T>::zeros((r0, shape[mode], r1));
                    for (k, &p) in positions.iter().enumerate() {
                        placed
                            .index_axis_mut(Axis(1), p)
                            .assign(&source.index_axis(Axis(1), k));
                    }
                    placed
                }
                None => {
                    let mut placed = Array3::<T>::zeros((1, shape[mode], 1));
                    for &p in positions {
                        placed[[0, p, 0]] = T::one();
                    }
                    placed
                }
            };
            add.push(Core::Tt(placed));
        }

        let mut add = TensorNetwork::from_cores(add, None, None)?;
        if let Some(scalar) = scalar {
            add = add.scale(scalar);
        }
        let subtract = TensorNetwork::from_cores(subtract, None, None)?;
        let updated = self.sub_network(&subtract)?.add_network(&add)?;

        log::debug!(
            "assign: box {:?}, tt ranks {:?} -> {:?}",
            box_shape,
            self.ranks_tt(),
            updated.ranks_tt()
        );
        self.cores = updated.cores;
        self.factors = updated.factors;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::weight_mask;
    use scirs2_core::ndarray_ext::{array, IxDyn};

    fn ramp(shape: &[usize]) -> ArrayD<f64> {
        let total: usize = shape.iter().product();
        ArrayD::<f64>::from_shape_vec(IxDyn(shape), (0..total).map(|x| x as f64).collect()).unwrap()
    }

    fn dense_of(indexed: Indexed<f64>) -> ArrayD<f64> {
        indexed.into_network().unwrap().materialize().unwrap()
    }

    fn max_abs_diff(a: &ArrayD<f64>, b: &ArrayD<f64>) -> f64 {
        assert_eq!(a.shape(), b.shape());
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_normalize_ellipsis_and_padding() {
        let steps = normalize(&[KeyEntry::Int(0), KeyEntry::Ellipsis, KeyEntry::Int(1)], 4).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[1], Step::Slice(SliceSpec::full()));
        assert_eq!(steps[3], Step::Int(1));

        let padded = normalize(&[KeyEntry::NewAxis, KeyEntry::Int(0)], 3).unwrap();
        assert_eq!(padded.len(), 4);

        assert_eq!(
            normalize(&[KeyEntry::Ellipsis, KeyEntry::Ellipsis], 2),
            Err(NetworkError::Indexing(IndexingError::MultipleEllipsis))
        );
        assert_eq!(
            normalize(&[0.into(), 0.into(), 0.into()], 2),
            Err(NetworkError::Indexing(IndexingError::TooManyEntries { entries: 3, ndim: 2 }))
        );
    }

    #[test]
    fn test_slice_positions() {
        assert_eq!(SliceSpec::new(Some(1), None, 2).positions(6).unwrap(), vec![1, 3, 5]);
        assert_eq!(SliceSpec::new(Some(-2), None, 1).positions(5).unwrap(), vec![3, 4]);
        assert_eq!(SliceSpec::new(None, Some(100), 3).positions(5).unwrap(), vec![0, 3]);
        assert!(SliceSpec::new(Some(4), Some(2), 1).positions(5).unwrap().is_empty());
        assert!(SliceSpec::new(None, None, 0).positions(5).is_err());
    }

    #[test]
    fn test_all_ints_give_scalar() {
        let dense = ramp(&[3, 4, 5]);
        let t = TensorNetwork::from_dense(&dense).unwrap();
        for &(i, j, k) in &[(0, 0, 0), (2, 3, 4), (1, 2, 3)] {
            let value = t
                .index(&[(i as isize).into(), (j as isize).into(), (k as isize).into()])
                .unwrap()
                .into_scalar()
                .unwrap();
            assert!((value - dense[[i, j, k]]).abs() < 1e-10);
        }
        let negative = t.index(&[(-1).into(), (-1).into(), (-1).into()]).unwrap();
        assert!((negative.into_scalar().unwrap() - 59.0).abs() < 1e-10);
    }

    #[test]
    fn test_mixed_slices_and_ints() {
        let dense = ramp(&[3, 4, 5]);
        let t = TensorNetwork::from_dense(&dense).unwrap();

        let sub = dense_of(t.index(&[1.into(), (1..3).into()]).unwrap());
        let expected = ArrayD::from_shape_fn(IxDyn(&[2, 5]), |ix| dense[[1, ix[0] + 1, ix[1]]]);
        assert!(max_abs_diff(&sub, &expected) < 1e-10);

        let sub = dense_of(t.index(&[(..).into(), 2.into()]).unwrap());
        let expected = ArrayD::from_shape_fn(IxDyn(&[3, 5]), |ix| dense[[ix[0], 2, ix[1]]]);
        assert!(max_abs_diff(&sub, &expected) < 1e-10);

        // Trailing integer folds into the last emitted core
        let sub = dense_of(t.index(&[(0..2).into(), 1.into(), 4.into()]).unwrap());
        let expected = ArrayD::from_shape_fn(IxDyn(&[2]), |ix| dense[[ix[0], 1, 4]]);
        assert!(max_abs_diff(&sub, &expected) < 1e-10);
    }

    #[test]
    fn test_new_axis() {
        let dense = ramp(&[2, 3]);
        let t = TensorNetwork::from_dense(&dense).unwrap();
        let sub = t
            .index(&[KeyEntry::NewAxis, 1.into(), KeyEntry::NewAxis])
            .unwrap()
            .into_network()
            .unwrap();
        assert_eq!(sub.shape(), vec![1, 1, 3]);
        let values = sub.materialize().unwrap();
        for k in 0..3 {
            assert!((values[[0, 0, k]] - dense[[1, k]]).abs() < 1e-10);
        }

        let trailing = t.index(&[KeyEntry::Ellipsis, KeyEntry::NewAxis]).unwrap().into_network().unwrap();
        assert_eq!(trailing.shape(), vec![2, 3, 1]);
    }

    #[test]
    fn test_fancy_indices_fuse() {
        let dense = ramp(&[3, 4, 5]);
        let t = TensorNetwork::from_dense(&dense).unwrap();
        let sub = dense_of(
            t.index(&[vec![0, 2, 1].into(), vec![3, 0, 1].into()])
                .unwrap(),
        );
        assert_eq!(sub.shape(), &[3, 5]);
        for (p, &(i, j)) in [(0, 3), (2, 0), (1, 1)].iter().enumerate() {
            for k in 0..5 {
                assert!((sub[[p, k]] - dense[[i, j, k]]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_int_before_fancy() {
        let dense = ramp(&[3, 4, 5]);
        let t = TensorNetwork::from_dense(&dense).unwrap();
        let sub = dense_of(t.index(&[2.into(), vec![0, 3].into()]).unwrap());
        assert_eq!(sub.shape(), &[2, 5]);
        for k in 0..5 {
            assert!((sub[[1, k]] - dense[[2, 3, k]]).abs() < 1e-10);
        }

        let fancy_then_int = dense_of(t.index(&[vec![1, 2].into(), (..).into(), 4.into()]).unwrap());
        assert_eq!(fancy_then_int.shape(), &[2, 4]);
        assert!((fancy_then_int[[1, 3]] - dense[[2, 3, 4]]).abs() < 1e-10);
    }

    #[test]
    fn test_fancy_errors() {
        let t = TensorNetwork::from_dense(&ramp(&[3, 4, 5])).unwrap();
        assert_eq!(
            t.index(&[vec![0, 1].into(), vec![0].into()]),
            Err(NetworkError::Indexing(IndexingError::FancyLengthMismatch { expected: 2, actual: 1 }))
        );
        assert_eq!(
            t.index(&[vec![0].into(), (..).into(), vec![0].into()]),
            Err(NetworkError::Indexing(IndexingError::NonContiguousFancy))
        );
        assert_eq!(
            t.index(&[5.into()]),
            Err(NetworkError::Indexing(IndexingError::IndexOutOfBounds { mode: 0, index: 5, size: 3 }))
        );
        assert!(t.index(&[vec![0, -4].into()]).is_err());
    }

    #[test]
    fn test_index_through_tucker_factor() {
        let core = Array3::<f64>::from_shape_vec((1, 2, 1), vec![1.0, -1.0]).unwrap();
        let t = TensorNetwork::from_cores(
            vec![Core::Tt(core), Core::Tt(Array3::ones((1, 3, 1)))],
            Some(vec![Some(array![[1.0, 0.0], [0.0, 1.0], [2.0, 3.0], [1.0, 1.0]]), None]),
            None,
        )
        .unwrap();
        let dense = t.materialize().unwrap();

        let value = t.index(&[2.into(), 1.into()]).unwrap().into_scalar().unwrap();
        assert!((value - dense[[2, 1]]).abs() < 1e-12);

        let sliced = t.index(&[(1..4).into()]).unwrap().into_network().unwrap();
        assert!(sliced.factor(0).is_some());
        let expected = ArrayD::from_shape_fn(IxDyn(&[3, 3]), |ix| dense[[ix[0] + 1, ix[1]]]);
        assert!(max_abs_diff(&sliced.materialize().unwrap(), &expected) < 1e-12);

        let fancy = dense_of(t.index(&[vec![3, 0].into()]).unwrap());
        assert!((fancy[[0, 2]] - dense[[3, 2]]).abs() < 1e-12);
    }

    #[test]
    fn test_index_points() {
        let dense = ramp(&[3, 4, 5]);
        let t = TensorNetwork::from_dense(&dense).unwrap();
        let points = array![[0, 0, 0], [2, 3, 4], [1, 0, 2]];
        let values = dense_of(t.index_points(&points).unwrap());
        assert_eq!(values.shape(), &[3]);
        for (p, row) in points.outer_iter().enumerate() {
            assert!((values[[p]] - dense[[row[0], row[1], row[2]]]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_index_mask() {
        let dense = ramp(&[2, 2, 2]);
        let t = TensorNetwork::from_dense(&dense).unwrap();

        // Selects the string (0, 1, 0)
        let mut mask = weight_mask::<f64>(3, &[1], 2).unwrap();
        let middle_one = ArrayD::from_shape_fn(IxDyn(&[2, 2, 2]), |ix| ix[1] as f64);
        mask = (&mask * &TensorNetwork::from_dense(&middle_one).unwrap()).unwrap();
        let value = t.index_mask(&mask).unwrap().into_scalar().unwrap();
        assert!((value - dense[[0, 1, 0]]).abs() < 1e-10);

        let mut labelled = t.clone();
        labelled.set_labels(2, array![1, 5]).unwrap();
        // Both labels binarize to 1, so mode 2 becomes a slice
        let all_ones = weight_mask::<f64>(3, &[3], 2).unwrap();
        let sub = labelled.index_mask(&all_ones).unwrap().into_network().unwrap();
        assert_eq!(sub.shape(), vec![2]);

        let two = weight_mask::<f64>(3, &[1], 2).unwrap();
        assert!(matches!(
            t.index_mask(&two),
            Err(NetworkError::Indexing(IndexingError::MaskNotSingular { .. }))
        ));
        assert!(matches!(
            t.index_mask(&weight_mask::<f64>(2, &[2], 2).unwrap()),
            Err(NetworkError::Indexing(IndexingError::MaskShapeMismatch { .. }))
        ));
    }

    #[test]
    fn test_index_mask_empty_selection() {
        let mut t = TensorNetwork::from_dense(&ramp(&[2, 2])).unwrap();
        t.set_labels(0, array![1, 1]).unwrap();
        let mask = weight_mask::<f64>(2, &[0], 2).unwrap();
        assert_eq!(
            t.index_mask(&mask),
            Err(NetworkError::Indexing(IndexingError::EmptyMaskSelection { mode: 0 }))
        );
    }

    #[test]
    fn test_assign_scalar() {
        let dense = ramp(&[3, 4]);
        let mut t = TensorNetwork::from_dense(&dense).unwrap();
        t.set_labels(1, array![9, 8, 7, 6]).unwrap();
        t.assign(&[1.into(), (1..3).into()], Assigned::Scalar(-5.0)).unwrap();

        let mut expected = dense.clone();
        expected[[1, 1]] = -5.0;
        expected[[1, 2]] = -5.0;
        assert!(max_abs_diff(&t.materialize().unwrap(), &expected) < 1e-10);
        assert_eq!(t.labels()[1], array![9, 8, 7, 6]);
    }

    #[test]
    fn test_assign_dense_and_network() {
        let dense = ramp(&[3, 4]);
        let mut t = TensorNetwork::from_dense(&dense).unwrap();
        let block = ArrayD::<f64>::from_shape_vec(IxDyn(&[2, 1]), vec![100.0, 200.0]).unwrap();
        t.assign(&[(0..2).into(), 3.into()], Assigned::Dense(block)).unwrap();

        let mut expected = dense.clone();
        expected[[0, 3]] = 100.0;
        expected[[1, 3]] = 200.0;
        assert!(max_abs_diff(&t.materialize().unwrap(), &expected) < 1e-9);

        let ones = TensorNetwork::<f64>::ones(&[1, 4]).unwrap();
        t.assign(&[2.into()], Assigned::Network(ones)).unwrap();
        for j in 0..4 {
            expected[[2, j]] = 1.0;
        }
        assert!(max_abs_diff(&t.materialize().unwrap(), &expected) < 1e-9);
    }

    #[test]
    fn test_assign_errors() {
        let mut t = TensorNetwork::from_dense(&ramp(&[3, 4])).unwrap();
        let wrong = TensorNetwork::<f64>::ones(&[2, 2]).unwrap();
        assert!(matches!(
            t.assign(&[(0..2).into()], Assigned::Network(wrong)),
            Err(NetworkError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            t.assign(&[KeyEntry::NewAxis], Assigned::Scalar(1.0)),
            Err(NetworkError::UnsupportedAssignment(_))
        ));
    }
}
