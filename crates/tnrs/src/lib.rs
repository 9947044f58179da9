//! # tnrs - Tensor Networks for Rust
//!
//! Compressed tensor-train networks with CP cores and Tucker factors,
//! operated on without expanding to a dense array.
//!
//! This is the **meta crate** that re-exports the tnrs components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use tnrs::prelude::*;
//! use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
//!
//! let dense = ArrayD::from_shape_fn(IxDyn(&[6, 6, 6]), |ix| {
//!     (ix[0] + ix[1] + ix[2]) as f64
//! });
//! let mut t = TensorNetwork::from_dense(&dense)?;
//!
//! // A sum of separable terms has TT rank 2
//! t.round(1e-10)?;
//! assert_eq!(t.ranks_tt(), vec![1, 2, 2, 1]);
//!
//! let squared = (&t * &t)?;
//! let value = squared.index(&[1.into(), 2.into(), 3.into()])?.into_scalar();
//! assert!((value.unwrap_or_default() - 36.0).abs() < 1e-8);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Dense Kernels ([`kernels`])
//!
//! Thin QR and SVD, error-budgeted truncation, core unfoldings and
//! contractions, Kronecker and row-wise Khatri-Rao products.
//!
//! ```
//! use tnrs::kernels::{truncated_svd, ErrorBudget, OrthoSide};
//! use scirs2_core::ndarray_ext::array;
//!
//! let m = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
//! let (l, r) = truncated_svd(&m.view(), ErrorBudget::Relative(1e-12), None, OrthoSide::Left)?;
//! assert_eq!((l.ncols(), r.nrows()), (1, 1));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ### Tensor Networks ([`network`])
//!
//! TT, TT-CP, TT-Tucker and TT-CP-Tucker networks with orthogonalization,
//! rounding, elementwise arithmetic, NumPy-style indexing and assignment,
//! contraction-based metrics and automaton helpers.
//!
//! ```
//! use tnrs::network::{accepted_inputs, weight_mask};
//!
//! // Binary strings of length 4 with exactly two ones
//! let mask = weight_mask::<f64>(4, &[2], 2)?;
//! assert_eq!(accepted_inputs(&mask)?.nrows(), 6);
//! # Ok::<(), anyhow::Error>(())
//! ```

// Re-export all components
pub use tnrs_kernels as kernels;
pub use tnrs_network as network;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use tnrs::prelude::*;
    //!
    //! let t = TensorNetwork::<f64>::ones(&[4, 4, 4]).unwrap();
    //! assert_eq!(t.ranks_tt(), vec![1, 1, 1, 1]);
    //! ```

    // Network types
    pub use crate::network::{
        Assigned, Core, Indexed, KeyEntry, NetworkError, Operand, RoundingOptions, SliceSpec,
        TensorNetwork,
    };

    // Automata helpers
    pub use crate::network::{accepted_inputs, weight, weight_mask};

    // Common kernels
    pub use crate::kernels::{truncated_svd, ErrorBudget, OrthoSide, TnScalar};
}
