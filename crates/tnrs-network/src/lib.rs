//! # tnrs-network - Compressed Tensor Networks
//!
//! A large N-dimensional array is held as a chain of small cores and operated
//! on without ever being expanded. Four formats share one type:
//!
//! ### Tensor Train (TT)
//!
//! ```text
//! X(i₁,...,iₙ) = G₁[i₁] × G₂[i₂] × ... × Gₙ[iₙ]
//! ```
//!
//! ### TT-CP
//!
//! Any core may be a CP core A (Fₙ × R), standing for the TT core that is
//! diagonal in its two rank axes. A chain of CP cores is a rank-R CP tensor.
//!
//! ### TT-Tucker and TT-CP-Tucker
//!
//! Any mode may carry a factor Uₙ (Iₙ × Fₙ) mapping a compressed core axis to
//! the full mode size:
//!
//! ```text
//! X = core chain ×₁ U₁ ×₂ U₂ ×₃ ... ×ₙ Uₙ
//! ```
//!
//! ## Operations
//!
//! - **Orthogonalization**: left/right sweeps that move the norm into one core
//! - **Rounding**: adaptive TT then Tucker truncation under a relative error
//!   budget ([`RoundingOptions`])
//! - **Arithmetic**: `+`, `-`, `*` (elementwise), scalar operators and a 0/1
//!   boolean algebra; ranks grow and [`TensorNetwork::round`] shrinks them
//! - **Indexing**: integers, slices, new axes, ellipsis and fused index arrays
//!   ([`KeyEntry`]), point evaluation, mask selection and partial assignment
//! - **Metrics**: dot products, norms, distances, sums by contraction
//! - **Automata**: weight masks and enumeration of accepted strings
//!
//! ## Quick Start
//!
//! ```
//! use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
//! use tnrs_network::{KeyEntry, TensorNetwork};
//!
//! // A rank-1 tensor stored at full rank
//! let dense = ArrayD::from_shape_fn(IxDyn(&[4, 5, 6]), |ix| {
//!     ((ix[0] + 1) * (ix[1] + 1) * (ix[2] + 1)) as f64
//! });
//! let mut t = TensorNetwork::from_dense(&dense)?;
//! assert_eq!(t.ranks_tt(), vec![1, 4, 6, 1]);
//!
//! t.round(1e-10)?;
//! assert_eq!(t.ranks_tt(), vec![1, 1, 1, 1]);
//!
//! let doubled = (&t + &t)?;
//! let value = doubled.index(&[3.into(), 4.into(), 5.into()])?.into_scalar();
//! assert!((value.unwrap_or_default() - 240.0).abs() < 1e-8);
//!
//! let slab = t.index(&[KeyEntry::Ellipsis, 0.into()])?.into_network();
//! assert_eq!(slab.map(|s| s.shape()), Some(vec![4, 5]));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## SciRS2 Integration
//!
//! Arrays come from `scirs2_core::ndarray_ext`; QR and SVD run through
//! `tnrs-kernels` on top of `scirs2_linalg`. Random test data uses
//! `scirs2_core::random`.
//!
//! ## References
//!
//! - Oseledets (2011), "Tensor-Train Decomposition"
//! - Kolda & Bader (2009), "Tensor Decompositions and Applications"
//! - Usvyatsov, Ballester-Ripoll et al., "tntorch: Tensor Network Learning with PyTorch"

pub mod arithmetic;
pub mod automata;
pub mod core;
pub mod decompress;
pub mod error;
pub mod indexing;
pub mod metrics;
pub mod network;
pub mod orthogonal;
pub mod rounding;

#[cfg(test)]
mod property_tests;

// Re-exports
pub use arithmetic::Operand;
pub use automata::{accepted_inputs, weight, weight_mask};
pub use crate::core::Core;
pub use error::{IndexingError, NetworkError, Result};
pub use indexing::{Assigned, Indexed, KeyEntry, SliceSpec, MASK_SUM_TOLERANCE};
pub use network::TensorNetwork;
pub use rounding::RoundingOptions;
