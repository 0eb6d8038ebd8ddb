//! Error type shared by the multiplier and the vectorization gateway.

use thiserror::Error;

/// Errors returned by `blockmat` operations.
///
/// Every error is raised before the caller's buffer is touched, so a failed
/// in-place multiply leaves both operands exactly as they were.
#[derive(Debug, Error)]
pub enum Error {
    /// Operand dimensions violate the multiply contract.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Blocks must hold at least one row or column.
    #[error("block size must be at least 1")]
    InvalidBlockSize,

    /// No template entity could be taken from the source.
    #[error("cannot build a matrix from an empty source")]
    EmptySource,

    /// An entity encoded to a vector of the wrong length.
    #[error("row {row}: expected a vector of {expected} parameters, got {found}")]
    VectorLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The worker pool for the threaded variants could not be started.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias for `blockmat` operations.
pub type Result<T> = std::result::Result<T, Error>;
