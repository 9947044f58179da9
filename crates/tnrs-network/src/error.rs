//! Error types for tensor-network operations

use thiserror::Error;
use tnrs_kernels::KernelError;

/// Errors raised while building, combining or indexing networks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("Invalid core structure: {0}")]
    InvalidCoreStructure(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error(transparent)]
    Indexing(#[from] IndexingError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("Unsupported assignment: {0}")]
    UnsupportedAssignment(String),
}

/// Errors specific to key normalization and index evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexingError {
    #[error("Only one ellipsis is allowed in a key")]
    MultipleEllipsis,

    #[error("Too many index entries: {entries} for a tensor with {ndim} modes")]
    TooManyEntries { entries: usize, ndim: usize },

    #[error("Advanced index arrays must be contiguous in the key")]
    NonContiguousFancy,

    #[error("Advanced index arrays must share one length, got {expected} and {actual}")]
    FancyLengthMismatch { expected: usize, actual: usize },

    #[error("Index {index} out of bounds for mode {mode} with size {size}")]
    IndexOutOfBounds { mode: usize, index: isize, size: usize },

    #[error("Slice step must be positive, got {0}")]
    InvalidStep(isize),

    #[error("Mask must select exactly one configuration, entries sum to {sum}")]
    MaskNotSingular { sum: f64 },

    #[error("Mask has {mask} modes but the tensor has {tensor}")]
    MaskShapeMismatch { mask: usize, tensor: usize },

    #[error("Mask selects no position along mode {mode}")]
    EmptyMaskSelection { mode: usize },
}

/// Result alias for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
