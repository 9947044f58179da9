//! # tnrs-kernels
//!
//! Dense numeric primitives for compressed tensor networks.
//!
//! The network crate treats everything here as a black box: it reshapes and
//! contracts small three-way cores, factorizes their unfoldings and combines
//! cores for network arithmetic.
//!
//! **Key Features:**
//! - **Thin QR / SVD** - Economy-size decompositions on top of `scirs2_linalg`
//! - **Bounded truncation** - Minimal-rank factor pairs under an absolute or
//!   relative Frobenius budget and an optional rank cap
//! - **Unfoldings** - Left (r₀·n × r₁) and right (r₀ × n·r₁) views of a core
//! - **Core contractions** - Core times matrix on the free or either rank axis
//! - **Kronecker products** - Matrix, rank-axis and full three-axis variants
//! - **Row-wise Khatri-Rao** - Pairing of Tucker factors sharing a mode index
//!
//! ## Quick Start
//!
//! ```rust
//! use scirs2_core::ndarray_ext::{array, Array3};
//! use tnrs_kernels::{contract_free, left_unfolding, truncated_svd, ErrorBudget, OrthoSide};
//!
//! // Expand a core through a Tucker factor
//! let core = Array3::<f64>::ones((1, 2, 3));
//! let factor = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 0.0]];
//! let expanded = contract_free(&core.view(), &factor.view()).unwrap();
//! assert_eq!(expanded.shape(), &[1, 4, 3]);
//!
//! // Compress the left unfolding of a core
//! let unfolded = left_unfolding(&expanded.view());
//! let (left, right) =
//!     truncated_svd(&unfolded.view(), ErrorBudget::Relative(1e-12), None, OrthoSide::Left).unwrap();
//! assert_eq!(left.ncols(), 1);
//! assert_eq!(right.shape(), &[1, 3]);
//! ```
//!
//! ## SciRS2 Integration
//!
//! This crate uses `scirs2-core` for all array operations and `scirs2-linalg`
//! for decompositions. Direct use of `ndarray` or `num-traits` is not permitted.

pub mod error;
pub mod khatri_rao;
pub mod kronecker;
pub mod linalg;
pub mod nmode;
pub mod scalar;
pub mod truncation;
pub mod unfold;


// Re-exports
pub use error::{KernelError, KernelResult};
pub use khatri_rao::*;
pub use kronecker::*;
pub use linalg::*;
pub use nmode::*;
pub use scalar::TnScalar;
pub use truncation::*;
pub use unfold::*;
