//! Elementwise arithmetic on compressed networks
//!
//! Sums stack cores block-diagonally, so ranks add. Products take Kronecker
//! products of cores, so ranks multiply. Nothing here compresses; follow a
//! chain of operations with [`TensorNetwork::round`].
//!
//! # Examples
//!
//! ```
//! use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
//! use tnrs_network::TensorNetwork;
//!
//! let a = TensorNetwork::from_dense(&ArrayD::from_elem(IxDyn(&[2, 3]), 2.0)).unwrap();
//! let b = TensorNetwork::<f64>::ones(&[2, 3]).unwrap();
//!
//! let sum = (&a + &b).unwrap();
//! assert!(sum.materialize().unwrap().iter().all(|&x| x == 3.0));
//!
//! let scaled = 2.0 * &(&a * &b).unwrap();
//! assert!(scaled.materialize().unwrap().iter().all(|&x| x == 4.0));
//! ```

use crate::core::Core;
use crate::error::{NetworkError, Result};
use crate::network::{default_labels, TensorNetwork};
use scirs2_core::ndarray_ext::{s, Array2, Array3, ArrayD, Axis};
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};
use tnrs_kernels::{core_kron, core_kron_full, row_khatri_rao, TnScalar};

/// Right-hand side of an arithmetic operation
///
/// Scalars and dense arrays are promoted to networks of the receiver's shape
/// once, at the start of each call.
#[derive(Debug, Clone)]
pub enum Operand<T> {
    Scalar(T),
    Dense(ArrayD<T>),
    Network(TensorNetwork<T>),
}

impl<T: TnScalar> Operand<T> {
    /// Promote to a network. Scalars become a rank-1 constant of `shape`.
    pub fn into_network(self, shape: &[usize]) -> Result<TensorNetwork<T>> {
        match self {
            Operand::Scalar(value) => TensorNetwork::filled(shape, value),
            Operand::Dense(dense) => TensorNetwork::from_dense(&dense),
            Operand::Network(network) => Ok(network),
        }
    }
}

impl<T> From<TensorNetwork<T>> for Operand<T> {
    fn from(network: TensorNetwork<T>) -> Self {
        Operand::Network(network)
    }
}

impl<T> From<ArrayD<T>> for Operand<T> {
    fn from(dense: ArrayD<T>) -> Self {
        Operand::Dense(dense)
    }
}

impl From<f64> for Operand<f64> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl From<f32> for Operand<f32> {
    fn from(value: f32) -> Self {
        Operand::Scalar(value)
    }
}

impl<T: TnScalar> TensorNetwork<T> {
    pub(crate) fn ensure_same_shape(&self, other: &Self) -> Result<()> {
        let (left, right) = (self.shape(), other.shape());
        if left != right {
            return Err(NetworkError::ShapeMismatch { left, right });
        }
        Ok(())
    }

    /// Elementwise sum with a scalar, dense array or network.
    pub fn try_add(&self, other: impl Into<Operand<T>>) -> Result<Self> {
        match other.into() {
            Operand::Scalar(value) => Ok(self.add_scalar(value)),
            other => self.add_network(&other.into_network(&self.shape())?),
        }
    }

    /// Elementwise difference with a scalar, dense array or network.
    pub fn try_sub(&self, other: impl Into<Operand<T>>) -> Result<Self> {
        match other.into() {
            Operand::Scalar(value) => Ok(self.add_scalar(-value)),
            other => self.sub_network(&other.into_network(&self.shape())?),
        }
    }

    /// Elementwise product with a scalar, dense array or network.
    pub fn try_mul(&self, other: impl Into<Operand<T>>) -> Result<Self> {
        match other.into() {
            Operand::Scalar(value) => Ok(self.scale(value)),
            other => self.mul_network(&other.into_network(&self.shape())?),
        }
    }

    /// Elementwise sum of two networks of equal shape.
    ///
    /// Result ranks are the sums of the operand ranks (boundaries stay 1).
    pub fn add_network(&self, other: &Self) -> Result<Self> {
        self.ensure_same_shape(other)?;
        let sum = add_networks(self, other);
        log::debug!(
            "add: tt ranks {:?} + {:?} -> {:?}",
            self.ranks_tt(),
            other.ranks_tt(),
            sum.ranks_tt()
        );
        Ok(sum)
    }

    /// Elementwise difference `self - other`.
    pub fn sub_network(&self, other: &Self) -> Result<Self> {
        self.add_network(&other.scale(-T::one()))
    }

    /// Elementwise (Hadamard) product of two networks of equal shape.
    ///
    /// TT ranks multiply. A mode where both operands carry Tucker factors and
    /// the product of their Tucker ranks stays below the mode size keeps a
    /// factor (the row-wise Khatri-Rao product of both); every other mode is
    /// expanded first.
    pub fn mul_network(&self, other: &Self) -> Result<Self> {
        self.ensure_same_shape(other)?;
        let shape = self.shape();
        let mut cores = Vec::with_capacity(self.ndim());
        let mut factors = Vec::with_capacity(self.ndim());

        for n in 0..self.ndim() {
            match (&self.factors[n], &other.factors[n]) {
                (Some(ua), Some(ub)) if ua.ncols() * ub.ncols() < shape[n] => {
                    let (a, b) = (self.tt_core(n), other.tt_core(n));
                    cores.push(Core::Tt(core_kron_full(&a.view(), &b.view())));
                    factors.push(Some(row_khatri_rao(&ua.view(), &ub.view())?));
                }
                _ => {
                    let (a, b) = (self.expanded_core(n), other.expanded_core(n));
                    cores.push(Core::Tt(core_kron(&a.view(), &b.view())?));
                    factors.push(None);
                }
            }
        }

        let product = TensorNetwork::from_cores(cores, Some(factors), None)?;
        log::debug!(
            "mul: tt ranks {:?} * {:?} -> {:?}",
            self.ranks_tt(),
            other.ranks_tt(),
            product.ranks_tt()
        );
        Ok(product)
    }

    /// Multiply every entry by `factor`. Only the first core is touched.
    pub fn scale(&self, factor: T) -> Self {
        let mut scaled = self.clone();
        match &mut scaled.cores[0] {
            Core::Tt(core) => core.mapv_inplace(|x| x * factor),
            Core::Cp(core) => core.mapv_inplace(|x| x * factor),
        }
        scaled
    }

    /// Add `value` to every entry. TT ranks grow by one.
    pub fn add_scalar(&self, value: T) -> Self {
        add_networks(self, &constant(&self.shape(), value))
    }

    /// Logical AND of two 0/1 networks: `a * b`
    pub fn logical_and(&self, other: &Self) -> Result<Self> {
        self.mul_network(other)
    }

    /// Logical OR of two 0/1 networks: `a + b - a * b`
    pub fn logical_or(&self, other: &Self) -> Result<Self> {
        let both = self.mul_network(other)?;
        self.add_network(other)?.sub_network(&both)
    }

    /// Logical XOR of two 0/1 networks: `a + b - 2 a b`
    pub fn logical_xor(&self, other: &Self) -> Result<Self> {
        let two = T::one() + T::one();
        let both = self.mul_network(other)?.scale(two);
        self.add_network(other)?.sub_network(&both)
    }

    /// Logical NOT of a 0/1 network: `1 - a`
    pub fn logical_not(&self) -> Self {
        self.scale(-T::one()).add_scalar(T::one())
    }

    /// Whether ‖self - other‖ ≤ `tol`.
    pub fn approx_eq(&self, other: &Self, tol: T) -> Result<bool> {
        Ok(self.sub_network(other)?.norm()? <= tol)
    }
}

/// Rank-1 network holding `value` everywhere; `shape` must be non-empty.
fn constant<T: TnScalar>(shape: &[usize], value: T) -> TensorNetwork<T> {
    let cores = shape
        .iter()
        .enumerate()
        .map(|(n, &size)| {
            let fill = if n == 0 { value } else { T::one() };
            Core::Tt(Array3::from_elem((1, size, 1), fill))
        })
        .collect();
    TensorNetwork {
        cores,
        factors: vec![None; shape.len()],
        labels: default_labels(shape),
    }
}

/// Block sum of two networks of equal shape.
fn add_networks<T: TnScalar>(a: &TensorNetwork<T>, b: &TensorNetwork<T>) -> TensorNetwork<T> {
    let shape = a.shape();
    let ndim = a.ndim();
    if ndim == 1 {
        let core = a.expanded_core(0) + &b.expanded_core(0);
        return TensorNetwork {
            cores: vec![Core::Tt(core)],
            factors: vec![None],
            labels: default_labels(&shape),
        };
    }

    let mut cores = Vec::with_capacity(ndim);
    let mut factors = Vec::with_capacity(ndim);
    for n in 0..ndim {
        match (&a.factors[n], &b.factors[n]) {
            (Some(ua), Some(ub)) => {
                cores.push(block_diagonal(&a.tt_core(n), &b.tt_core(n), true));
                factors.push(Some(side_by_side(ua, ub)));
            }
            _ => {
                cores.push(block_diagonal(&a.expanded_core(n), &b.expanded_core(n), false));
                factors.push(None);
            }
        }
    }

    cores[0] = cores[0].sum_axis(Axis(0)).insert_axis(Axis(0));
    cores[ndim - 1] = cores[ndim - 1].sum_axis(Axis(2)).insert_axis(Axis(2));

    TensorNetwork {
        cores: cores.into_iter().map(Core::Tt).collect(),
        factors,
        labels: default_labels(&shape),
    }
}

/// Place `a` and `b` on the diagonal of a larger core.
///
/// With `stack_free` the free axes are stacked as well (Tucker modes, whose
/// factors get concatenated); otherwise they are shared and must agree.
fn block_diagonal<T: TnScalar>(a: &Array3<T>, b: &Array3<T>, stack_free: bool) -> Array3<T> {
    let (ra0, na, ra1) = a.dim();
    let (rb0, nb, rb1) = b.dim();
    let (n, offset) = if stack_free { (na + nb, na) } else { (na, 0) };

    let mut out = Array3::<T>::zeros((ra0 + rb0, n, ra1 + rb1));
    out.slice_mut(s![..ra0, ..na, ..ra1]).assign(a);
    out.slice_mut(s![ra0.., offset..offset + nb, ra1..]).assign(b);
    out
}

fn side_by_side<T: TnScalar>(u: &Array2<T>, v: &Array2<T>) -> Array2<T> {
    let (rows, su) = u.dim();
    let mut out = Array2::<T>::zeros((rows, su + v.ncols()));
    out.slice_mut(s![.., ..su]).assign(u);
    out.slice_mut(s![.., su..]).assign(v);
    out
}

impl<T: TnScalar> Add for &TensorNetwork<T> {
    type Output = Result<TensorNetwork<T>>;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_network(rhs)
    }
}

impl<T: TnScalar> Sub for &TensorNetwork<T> {
    type Output = Result<TensorNetwork<T>>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.sub_network(rhs)
    }
}

impl<T: TnScalar> Mul for &TensorNetwork<T> {
    type Output = Result<TensorNetwork<T>>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.mul_network(rhs)
    }
}

impl<T: TnScalar> BitAnd for &TensorNetwork<T> {
    type Output = Result<TensorNetwork<T>>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.logical_and(rhs)
    }
}

impl<T: TnScalar> BitOr for &TensorNetwork<T> {
    type Output = Result<TensorNetwork<T>>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.logical_or(rhs)
    }
}

impl<T: TnScalar> BitXor for &TensorNetwork<T> {
    type Output = Result<TensorNetwork<T>>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.logical_xor(rhs)
    }
}

impl<T: TnScalar> Neg for &TensorNetwork<T> {
    type Output = TensorNetwork<T>;

    fn neg(self) -> Self::Output {
        self.scale(-T::one())
    }
}

impl<T: TnScalar> Not for &TensorNetwork<T> {
    type Output = TensorNetwork<T>;

    fn not(self) -> Self::Output {
        self.logical_not()
    }
}

macro_rules! impl_scalar_ops {
    ($($t:ty),*) => {$(
        impl Add<$t> for &TensorNetwork<$t> {
            type Output = TensorNetwork<$t>;

            fn add(self, rhs: $t) -> Self::Output {
                self.add_scalar(rhs)
            }
        }

        impl Sub<$t> for &TensorNetwork<$t> {
            type Output = TensorNetwork<$t>;

            fn sub(self, rhs: $t) -> Self::Output {
                self.add_scalar(-rhs)
            }
        }

        impl Mul<$t> for &TensorNetwork<$t> {
            type Output = TensorNetwork<$t>;

            fn mul(self, rhs: $t) -> Self::Output {
                self.scale(rhs)
            }
        }

        impl Div<$t> for &TensorNetwork<$t> {
            type Output = TensorNetwork<$t>;

            fn div(self, rhs: $t) -> Self::Output {
                self.scale(1.0 / rhs)
            }
        }

        impl Add<&TensorNetwork<$t>> for $t {
            type Output = TensorNetwork<$t>;

            fn add(self, rhs: &TensorNetwork<$t>) -> Self::Output {
                rhs.add_scalar(self)
            }
        }

        impl Sub<&TensorNetwork<$t>> for $t {
            type Output = TensorNetwork<$t>;

            fn sub(self, rhs: &TensorNetwork<$t>) -> Self::Output {
                rhs.scale(-1.0).add_scalar(self)
            }
        }

        impl Mul<&TensorNetwork<$t>> for $t {
            type Output = TensorNetwork<$t>;

            fn mul(self, rhs: &TensorNetwork<$t>) -> Self::Output {
                rhs.scale(self)
            }
        }
    )*};
}

impl_scalar_ops!(f32, f64);
